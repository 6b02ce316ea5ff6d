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

use crate::infrastructure::constants::{
    DEFAULT_CALL_TIMEOUT_SECS, DEFAULT_MAX_CONCURRENCY, PROJECT_ID_ENV,
};
use crate::shared::error::ConfigError;
use std::time::Duration;
use tokio::sync::Semaphore;

/// Settings for one provisioning run, fixed at orchestrator construction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSettings {
    pub project_id: String,
    pub max_concurrency: usize,
    pub call_timeout: Duration,
}

impl RunSettings {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            max_concurrency: DEFAULT_MAX_CONCURRENCY,
            call_timeout: Duration::from_secs(DEFAULT_CALL_TIMEOUT_SECS),
        }
    }

    pub fn with_max_concurrency(mut self, max_concurrency: usize) -> Self {
        self.max_concurrency = max_concurrency;
        self
    }

    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.project_id.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                "project_id",
                "must not be empty",
            ));
        }

        if self.max_concurrency == 0 {
            return Err(ConfigError::invalid_value(
                "max_concurrency",
                "must be > 0",
            ));
        }

        if self.max_concurrency > Semaphore::MAX_PERMITS {
            return Err(ConfigError::invalid_value(
                "max_concurrency",
                format!("must be <= {}", Semaphore::MAX_PERMITS),
            ));
        }

        if self.call_timeout.is_zero() {
            return Err(ConfigError::invalid_value("call_timeout", "must be > 0"));
        }

        Ok(())
    }
}

/// Resolve the project identifier: explicit value > environment.
pub fn resolve_project_id(explicit: Option<String>) -> Result<String, ConfigError> {
    explicit
        .filter(|p| !p.trim().is_empty())
        .or_else(|| {
            std::env::var(PROJECT_ID_ENV)
                .ok()
                .filter(|p| !p.trim().is_empty())
        })
        .ok_or_else(|| ConfigError::MissingEnvironment {
            var: PROJECT_ID_ENV.to_string(),
        })
}
