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

use crate::domain::config::{ProvisionConfig, RunSettings};
use crate::domain::intent::{IntentId, ResourceIntent};
use crate::domain::provision::cancel::CancelHandle;
use crate::domain::provision::exporter::{bucket_url_key, instance_name_key, OutputExporter};
use crate::domain::provision::graph::{GraphNode, ProvisionGraph};
use crate::domain::provision::report::{IntentOutcome, IntentReport, RunReport};
use crate::domain::provision::validator::ConfigValidator;
use crate::infrastructure::provider::CloudProvider;
use crate::shared::error::{DependencyError, ProviderError, ProvisionError, Result};
use chrono::Utc;
use futures::stream::{FuturesUnordered, StreamExt};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::time::timeout;

/// Realizes the intents of one configuration through a provider.
///
/// Independent intents run concurrently up to `max_concurrency`. A node pool
/// is only started once its cluster has returned an identity; when the
/// cluster fails, the pool is reported as skipped without a provider call.
pub struct Orchestrator {
    settings: RunSettings,
    provider: Arc<dyn CloudProvider>,
    cancel: CancelHandle,
}

impl Orchestrator {
    pub fn new(settings: RunSettings, provider: Arc<dyn CloudProvider>) -> Result<Self> {
        settings.validate()?;
        Ok(Self {
            settings,
            provider,
            cancel: CancelHandle::new(),
        })
    }

    pub fn with_cancel_handle(mut self, cancel: CancelHandle) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn cancel_handle(&self) -> CancelHandle {
        self.cancel.clone()
    }

    pub fn settings(&self) -> &RunSettings {
        &self.settings
    }

    /// Validate, build the graph and execute it. Configuration errors are
    /// returned before any provider call is made.
    pub async fn run(&self, config: &ProvisionConfig) -> Result<RunReport> {
        ConfigValidator::new()?.validate(config)?;
        let graph = ProvisionGraph::from_config(config)?;
        self.execute(&graph).await
    }

    pub async fn execute(&self, graph: &ProvisionGraph) -> Result<RunReport> {
        let started_at = Utc::now();
        let semaphore = Semaphore::new(self.settings.max_concurrency);
        let exporter = OutputExporter::new();
        let mut outcomes: BTreeMap<IntentId, IntentOutcome> = BTreeMap::new();
        let mut fatal: Option<ProvisionError> = None;
        // Stops this run only; the caller's handle is left untouched.
        let halt = CancelHandle::new();

        tracing::info!(
            project = %self.settings.project_id,
            provider = self.provider.name(),
            intents = graph.len(),
            max_concurrency = self.settings.max_concurrency,
            "starting provisioning run"
        );

        let mut in_flight = FuturesUnordered::new();
        for node in graph.roots() {
            in_flight.push(self.realize(node, None, &semaphore, &halt));
        }

        while let Some((id, outcome)) = in_flight.next().await {
            let node = graph
                .node(id)
                .ok_or_else(|| ProvisionError::invariant(format!("unknown intent {}", id)))?;

            if let IntentOutcome::Succeeded { identity } = &outcome {
                if let Err(err) = Self::export(&exporter, &node.intent, identity) {
                    tracing::error!(intent = %node.intent.label(), error = %err, "aborting run");
                    halt.cancel();
                    fatal.get_or_insert(err);
                }
            }

            for dependent_id in graph.dependents(id) {
                let dependent = graph.node(*dependent_id).ok_or_else(|| {
                    ProvisionError::invariant(format!("unknown intent {}", dependent_id))
                })?;

                match &outcome {
                    IntentOutcome::Succeeded { identity } => {
                        tracing::debug!(
                            intent = %dependent.intent.label(),
                            dependency = %identity,
                            "dependency satisfied"
                        );
                        in_flight.push(self.realize(
                            dependent,
                            Some(identity.clone()),
                            &semaphore,
                            &halt,
                        ));
                    }
                    IntentOutcome::Cancelled => {
                        Self::settle_subtree(graph, dependent, &mut outcomes, |_| {
                            IntentOutcome::Cancelled
                        });
                    }
                    IntentOutcome::Failed { .. }
                    | IntentOutcome::SkippedDueToDependencyFailure { .. } => {
                        let failed = node.intent.label();
                        Self::settle_subtree(graph, dependent, &mut outcomes, |skipped| {
                            let error = DependencyError::new(skipped.intent.label(), &failed);
                            tracing::warn!(%error, "skipping intent");
                            IntentOutcome::SkippedDueToDependencyFailure { error }
                        });
                    }
                }
            }

            outcomes.insert(id, outcome);
        }

        if let Some(err) = fatal {
            return Err(err);
        }

        let intents = graph
            .nodes()
            .iter()
            .map(|node| {
                let outcome = outcomes.remove(&node.id).ok_or_else(|| {
                    ProvisionError::invariant(format!("no outcome for {}", node.intent.label()))
                })?;
                Ok(IntentReport {
                    id: node.id,
                    kind: node.intent.kind(),
                    name: node.intent.name().to_string(),
                    outcome,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        let cancelled = intents
            .iter()
            .any(|i| matches!(i.outcome, IntentOutcome::Cancelled));

        let report = RunReport {
            project_id: self.settings.project_id.clone(),
            started_at,
            finished_at: Utc::now(),
            cancelled,
            intents,
            outputs: exporter.into_outputs(),
        };

        let summary = report.summary();
        tracing::info!(
            succeeded = summary.succeeded,
            failed = summary.failed,
            skipped = summary.skipped,
            cancelled = summary.cancelled,
            "provisioning run finished"
        );

        Ok(report)
    }

    async fn realize<'a>(
        &'a self,
        node: &'a GraphNode,
        cluster_identity: Option<String>,
        semaphore: &'a Semaphore,
        halt: &'a CancelHandle,
    ) -> (IntentId, IntentOutcome) {
        let stopping = || self.cancel.is_cancelled() || halt.is_cancelled();

        if stopping() {
            return (node.id, IntentOutcome::Cancelled);
        }

        let Ok(_permit) = semaphore.acquire().await else {
            return (node.id, IntentOutcome::Cancelled);
        };

        // The run may have been cancelled while waiting for a permit.
        if stopping() {
            return (node.id, IntentOutcome::Cancelled);
        }

        let label = node.intent.label();
        tracing::debug!(intent = %label, "creating");

        let call = self.call_provider(&node.intent, cluster_identity.as_deref());
        let outcome = match timeout(self.settings.call_timeout, call).await {
            Ok(Ok(identity)) => {
                tracing::info!(intent = %label, %identity, "created");
                IntentOutcome::Succeeded { identity }
            }
            Ok(Err(error)) => {
                tracing::warn!(intent = %label, %error, "creation failed");
                IntentOutcome::Failed { error }
            }
            Err(_) => {
                let error = ProviderError::timeout(&label, self.settings.call_timeout);
                tracing::warn!(intent = %label, %error, "creation timed out");
                IntentOutcome::Failed { error }
            }
        };

        (node.id, outcome)
    }

    async fn call_provider(
        &self,
        intent: &ResourceIntent,
        cluster_identity: Option<&str>,
    ) -> std::result::Result<String, ProviderError> {
        match intent {
            ResourceIntent::Bucket(bucket) => self
                .provider
                .create_bucket(bucket)
                .await
                .map(|created| created.url),
            ResourceIntent::Instance(instance) => self
                .provider
                .create_instance(instance)
                .await
                .map(|created| created.assigned_name),
            ResourceIntent::Cluster(cluster) => self
                .provider
                .create_cluster(cluster)
                .await
                .map(|created| created.assigned_name),
            ResourceIntent::NodePool(pool) => {
                let identity = cluster_identity.ok_or_else(|| {
                    ProviderError::api(intent.label(), "owning cluster has no identity")
                })?;
                let bound = pool.clone().with_cluster_identity(identity);
                self.provider
                    .create_node_pool(&bound, identity)
                    .await
                    .map(|created| created.assigned_name)
            }
        }
    }

    fn export(exporter: &OutputExporter, intent: &ResourceIntent, identity: &str) -> Result<()> {
        match intent {
            ResourceIntent::Bucket(bucket) => exporter.record(bucket_url_key(&bucket.name), identity),
            ResourceIntent::Instance(instance) => {
                exporter.record(instance_name_key(&instance.name), identity)
            }
            ResourceIntent::Cluster(_) | ResourceIntent::NodePool(_) => Ok(()),
        }
    }

    /// Record an outcome for `root` and everything below it without calling
    /// the provider.
    fn settle_subtree(
        graph: &ProvisionGraph,
        root: &GraphNode,
        outcomes: &mut BTreeMap<IntentId, IntentOutcome>,
        outcome_for: impl Fn(&GraphNode) -> IntentOutcome,
    ) {
        let mut stack = vec![root];
        while let Some(node) = stack.pop() {
            outcomes.insert(node.id, outcome_for(node));
            stack.extend(graph.dependents(node.id).iter().filter_map(|id| graph.node(*id)));
        }
    }
}
