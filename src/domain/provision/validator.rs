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

use crate::domain::config::ProvisionConfig;
use crate::domain::intent::derive_node_pool_name;
use crate::infrastructure::constants::{BUCKET_NAME_PATTERN, RESOURCE_NAME_PATTERN};
use crate::shared::error::{ConfigError, ProvisionError};
use regex::Regex;
use std::collections::HashSet;

/// Semantic checks on a loaded configuration, run before any provider call.
pub struct ConfigValidator {
    resource_name: Regex,
    bucket_name: Regex,
}

impl ConfigValidator {
    pub fn new() -> Result<Self, ProvisionError> {
        Ok(Self {
            resource_name: Regex::new(RESOURCE_NAME_PATTERN)?,
            bucket_name: Regex::new(BUCKET_NAME_PATTERN)?,
        })
    }

    pub fn validate(&self, config: &ProvisionConfig) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for (i, bucket) in config.buckets.iter().enumerate() {
            let path = format!("buckets[{}].name", i);
            self.check_name(&self.bucket_name, &bucket.name, &path)?;
            Self::check_unique(&mut seen, &bucket.name, path)?;
        }

        let mut seen = HashSet::new();
        for (i, instance) in config.instances.iter().enumerate() {
            let path = format!("instances[{}].name", i);
            self.check_name(&self.resource_name, &instance.name, &path)?;
            Self::check_unique(&mut seen, &instance.name, path)?;
        }

        let mut seen = HashSet::new();
        for (i, cluster) in config.clusters.iter().enumerate() {
            let path = format!("clusters[{}].name", i);
            self.check_name(&self.resource_name, &cluster.name, &path)?;

            if !cluster.node_pools.is_empty() {
                let pool_name = derive_node_pool_name(&cluster.name);
                if !self.resource_name.is_match(&pool_name) {
                    return Err(ConfigError::invalid_value(
                        path,
                        format!("derived node pool name '{}' is not a valid name", pool_name),
                    ));
                }
            }

            if cluster.node_pools.len() > 1 {
                tracing::warn!(
                    cluster = %cluster.name,
                    node_pools = cluster.node_pools.len(),
                    "all node pools of a cluster share the name '{}'; the provider will reject all but one",
                    derive_node_pool_name(&cluster.name)
                );
            }

            Self::check_unique(&mut seen, &cluster.name, path)?;
        }

        Ok(())
    }

    fn check_name(&self, rule: &Regex, name: &str, path: &str) -> Result<(), ConfigError> {
        if rule.is_match(name) {
            Ok(())
        } else {
            Err(ConfigError::invalid_value(
                path,
                format!("'{}' does not match {}", name, rule.as_str()),
            ))
        }
    }

    fn check_unique<'a>(
        seen: &mut HashSet<&'a str>,
        name: &'a str,
        path: String,
    ) -> Result<(), ConfigError> {
        if seen.insert(name) {
            Ok(())
        } else {
            Err(ConfigError::DuplicateName {
                path,
                name: name.to_string(),
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::{BucketSpec, ClusterSpec, NodePoolSpec};

    fn bucket(name: &str) -> BucketSpec {
        BucketSpec {
            name: name.to_string(),
            location: "US".to_string(),
        }
    }

    fn cluster(name: &str, pools: usize) -> ClusterSpec {
        ClusterSpec {
            name: name.to_string(),
            location: "us-central1".to_string(),
            remove_default_node_pool: true,
            initial_node_count: 1,
            node_pools: vec![
                NodePoolSpec {
                    preemptible: true,
                    machine_type: "e2-medium".to_string(),
                    disk_size_gb: 50,
                    service_account: "sa@x".to_string(),
                };
                pools
            ],
        }
    }

    #[test]
    fn test_valid_config() {
        let config = ProvisionConfig {
            buckets: vec![bucket("logs"), bucket("assets.example")],
            instances: Vec::new(),
            clusters: vec![cluster("c1", 1), cluster("c2", 0)],
        };
        assert!(ConfigValidator::new().unwrap().validate(&config).is_ok());
    }

    #[test]
    fn test_duplicate_bucket_name() {
        let config = ProvisionConfig {
            buckets: vec![bucket("logs"), bucket("logs")],
            ..Default::default()
        };
        let err = ConfigValidator::new().unwrap().validate(&config).unwrap_err();
        assert_eq!(
            err,
            ConfigError::DuplicateName {
                path: "buckets[1].name".to_string(),
                name: "logs".to_string(),
            }
        );
    }

    #[test]
    fn test_same_name_across_families_allowed() {
        let config = ProvisionConfig {
            buckets: vec![bucket("shared")],
            instances: Vec::new(),
            clusters: vec![cluster("shared", 1)],
        };
        assert!(ConfigValidator::new().unwrap().validate(&config).is_ok());
    }

    #[test]
    fn test_invalid_cluster_name() {
        let config = ProvisionConfig {
            clusters: vec![cluster("Bad_Name", 0)],
            ..Default::default()
        };
        let err = ConfigValidator::new().unwrap().validate(&config).unwrap_err();
        assert_eq!(err.path(), Some("clusters[0].name"));
    }

    #[test]
    fn test_multiple_node_pools_are_not_rejected() {
        let config = ProvisionConfig {
            clusters: vec![cluster("c1", 2)],
            ..Default::default()
        };
        assert!(ConfigValidator::new().unwrap().validate(&config).is_ok());
    }
}
