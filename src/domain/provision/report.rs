// Copyright 2025 JiangLong.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

use crate::domain::intent::{IntentId, ResourceKind};
use crate::shared::error::{DependencyError, ProviderError, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IntentOutcome {
    Succeeded { identity: String },
    Failed { error: ProviderError },
    SkippedDueToDependencyFailure { error: DependencyError },
    /// Never started because the run was cancelled.
    Cancelled,
}

impl IntentOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, IntentOutcome::Succeeded { .. })
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            IntentOutcome::Succeeded { .. } => "succeeded",
            IntentOutcome::Failed { .. } => "failed",
            IntentOutcome::SkippedDueToDependencyFailure { .. } => "skipped",
            IntentOutcome::Cancelled => "cancelled",
        }
    }

    pub fn identity(&self) -> Option<&str> {
        match self {
            IntentOutcome::Succeeded { identity } => Some(identity),
            _ => None,
        }
    }

    pub fn error_message(&self) -> Option<String> {
        match self {
            IntentOutcome::Failed { error } => Some(error.to_string()),
            IntentOutcome::SkippedDueToDependencyFailure { error } => Some(error.to_string()),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IntentReport {
    pub id: IntentId,
    pub kind: ResourceKind,
    pub name: String,
    pub outcome: IntentOutcome,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub succeeded: usize,
    pub failed: usize,
    pub skipped: usize,
    pub cancelled: usize,
}

/// Aggregated result of one run. Partial success is an ordinary report.
#[derive(Debug, Clone, Serialize)]
pub struct RunReport {
    pub project_id: String,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    /// At least one intent never started because the run was cancelled.
    pub cancelled: bool,
    /// One entry per intent, in graph order.
    pub intents: Vec<IntentReport>,
    pub outputs: BTreeMap<String, String>,
}

impl RunReport {
    pub fn is_success(&self) -> bool {
        !self.cancelled && self.intents.iter().all(|i| i.outcome.is_success())
    }

    pub fn summary(&self) -> RunSummary {
        let mut summary = RunSummary::default();
        for intent in &self.intents {
            match intent.outcome {
                IntentOutcome::Succeeded { .. } => summary.succeeded += 1,
                IntentOutcome::Failed { .. } => summary.failed += 1,
                IntentOutcome::SkippedDueToDependencyFailure { .. } => summary.skipped += 1,
                IntentOutcome::Cancelled => summary.cancelled += 1,
            }
        }
        summary
    }

    pub fn outcome_of(&self, kind: ResourceKind, name: &str) -> Option<&IntentOutcome> {
        self.intents
            .iter()
            .find(|i| i.kind == kind && i.name == name)
            .map(|i| &i.outcome)
    }

    pub fn failures(&self) -> impl Iterator<Item = &IntentReport> {
        self.intents.iter().filter(|i| {
            matches!(
                i.outcome,
                IntentOutcome::Failed { .. } | IntentOutcome::SkippedDueToDependencyFailure { .. }
            )
        })
    }

    pub fn duration(&self) -> chrono::Duration {
        self.finished_at - self.started_at
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report() -> RunReport {
        let now = Utc::now();
        RunReport {
            project_id: "p".to_string(),
            started_at: now,
            finished_at: now,
            cancelled: false,
            intents: vec![
                IntentReport {
                    id: IntentId(0),
                    kind: ResourceKind::Cluster,
                    name: "c1".to_string(),
                    outcome: IntentOutcome::Failed {
                        error: ProviderError::api("cluster/c1", "quota exceeded"),
                    },
                },
                IntentReport {
                    id: IntentId(1),
                    kind: ResourceKind::NodePool,
                    name: "c1preemptible".to_string(),
                    outcome: IntentOutcome::SkippedDueToDependencyFailure {
                        error: DependencyError::new("node_pool/c1preemptible", "cluster/c1"),
                    },
                },
                IntentReport {
                    id: IntentId(2),
                    kind: ResourceKind::Bucket,
                    name: "logs".to_string(),
                    outcome: IntentOutcome::Succeeded {
                        identity: "gs://logs".to_string(),
                    },
                },
            ],
            outputs: BTreeMap::new(),
        }
    }

    #[test]
    fn test_summary_counts() {
        let report = report();
        let summary = report.summary();
        assert_eq!(summary.succeeded, 1);
        assert_eq!(summary.failed, 1);
        assert_eq!(summary.skipped, 1);
        assert!(!report.is_success());
        assert_eq!(report.failures().count(), 2);
    }

    #[test]
    fn test_json_shape() {
        let json: serde_json::Value = serde_json::from_str(&report().to_json().unwrap()).unwrap();
        assert_eq!(json["intents"][0]["outcome"]["status"], "failed");
        assert_eq!(json["intents"][0]["outcome"]["error"]["kind"], "api");
        assert_eq!(
            json["intents"][1]["outcome"]["status"],
            "skipped_due_to_dependency_failure"
        );
        assert_eq!(json["intents"][2]["kind"], "bucket");
    }
}
