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

use serde::Serialize;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, ProvisionError>;

#[derive(Error, Debug)]
pub enum ProvisionError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Provider error: {0}")]
    Provider(#[from] ProviderError),

    #[error("Duplicate export key: '{key}' is already recorded")]
    DuplicateKey { key: String },

    #[error("Dependency error: {0}")]
    Dependency(#[from] DependencyError),

    #[error("Graph invariant violated: {0}")]
    Invariant(String),

    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),
}

impl ProvisionError {
    pub fn duplicate_key(key: impl Into<String>) -> Self {
        Self::DuplicateKey { key: key.into() }
    }

    pub fn invariant(context: impl Into<String>) -> Self {
        Self::Invariant(context.into())
    }
}

/// Malformed or missing input. Always raised before any provider call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required field '{path}'")]
    MissingField { path: String },

    #[error("field '{path}' must be {expected}")]
    InvalidType { path: String, expected: &'static str },

    #[error("invalid value at '{path}': {message}")]
    InvalidValue { path: String, message: String },

    #[error("duplicate name '{name}' at '{path}'")]
    DuplicateName { path: String, name: String },

    #[error("environment variable {var} is not set")]
    MissingEnvironment { var: String },

    #[error("unsupported configuration file '{path}' (expected .yaml, .yml, .json or .toml)")]
    UnsupportedFormat { path: String },
}

impl ConfigError {
    pub fn missing(path: impl Into<String>) -> Self {
        Self::MissingField { path: path.into() }
    }

    pub fn invalid_type(path: impl Into<String>, expected: &'static str) -> Self {
        Self::InvalidType {
            path: path.into(),
            expected,
        }
    }

    pub fn invalid_value(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Path of the offending field, if the error refers to one.
    pub fn path(&self) -> Option<&str> {
        match self {
            Self::MissingField { path }
            | Self::InvalidType { path, .. }
            | Self::InvalidValue { path, .. }
            | Self::DuplicateName { path, .. }
            | Self::UnsupportedFormat { path } => Some(path),
            Self::MissingEnvironment { .. } => None,
        }
    }
}

/// A single resource-creation call failed.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ProviderError {
    #[error("{resource}: {message}")]
    Api { resource: String, message: String },

    #[error("{resource}: provider unavailable: {message}")]
    Unavailable { resource: String, message: String },

    #[error("{resource}: call did not complete within {timeout_ms}ms")]
    Timeout { resource: String, timeout_ms: u64 },
}

impl ProviderError {
    pub fn api(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Api {
            resource: resource.into(),
            message: message.into(),
        }
    }

    pub fn unavailable(resource: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unavailable {
            resource: resource.into(),
            message: message.into(),
        }
    }

    pub fn timeout(resource: impl Into<String>, timeout: std::time::Duration) -> Self {
        Self::Timeout {
            resource: resource.into(),
            timeout_ms: u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Transient failures a provider-side retry policy may repeat.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Unavailable { .. } | Self::Timeout { .. })
    }
}

/// An intent was not attempted because the resource it depends on failed.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{intent} skipped: dependency '{dependency}' was not created")]
pub struct DependencyError {
    pub intent: String,
    pub dependency: String,
}

impl DependencyError {
    pub fn new(intent: impl Into<String>, dependency: impl Into<String>) -> Self {
        Self {
            intent: intent.into(),
            dependency: dependency.into(),
        }
    }
}
