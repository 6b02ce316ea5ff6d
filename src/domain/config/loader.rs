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

//! Conversion of a parsed configuration tree into the typed model.
//!
//! The tree is a `serde_json::Value` regardless of the file format it came
//! from. Every failure names the path of the offending field, e.g.
//! `clusters[1].node_pools[0].disk_size_gb`.

use crate::domain::config::model::{
    BucketSpec, ClusterSpec, InstanceSpec, NetworkRef, NodePoolSpec, ProvisionConfig,
};
use crate::infrastructure::constants::{KEY_BUCKETS, KEY_CLUSTERS, KEY_INSTANCES};
use crate::shared::error::{ConfigError, ProvisionError};
use serde_json::Value;
use std::fs::read_to_string;
use std::path::Path;

type ConfigResult<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigFormat {
    Yaml,
    Json,
    Toml,
}

impl ConfigFormat {
    pub fn from_path(path: &Path) -> ConfigResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some("yaml") | Some("yml") => Ok(Self::Yaml),
            Some("json") => Ok(Self::Json),
            Some("toml") => Ok(Self::Toml),
            _ => Err(ConfigError::UnsupportedFormat {
                path: path.display().to_string(),
            }),
        }
    }
}

/// Read and convert a configuration file.
pub fn load_config_file(path: impl AsRef<Path>) -> Result<ProvisionConfig, ProvisionError> {
    let path = path.as_ref();
    let format = ConfigFormat::from_path(path)?;
    let content = read_to_string(path)?;
    parse_config_str(&content, format)
}

pub fn parse_config_str(
    content: &str,
    format: ConfigFormat,
) -> Result<ProvisionConfig, ProvisionError> {
    let tree: Value = match format {
        ConfigFormat::Yaml => serde_yaml::from_str(content)?,
        ConfigFormat::Json => serde_json::from_str(content)?,
        ConfigFormat::Toml => toml::from_str(content)?,
    };
    Ok(ProvisionConfig::from_tree(&tree)?)
}

impl ProvisionConfig {
    /// Build the typed model from an already-parsed tree.
    pub fn from_tree(tree: &Value) -> ConfigResult<Self> {
        let root = Node::root(tree);

        let buckets = root
            .get(KEY_BUCKETS)?
            .items()?
            .iter()
            .map(parse_bucket)
            .collect::<ConfigResult<Vec<_>>>()?;

        let instances = root
            .get(KEY_INSTANCES)?
            .items()?
            .iter()
            .map(parse_instance)
            .collect::<ConfigResult<Vec<_>>>()?;

        let clusters = root
            .get(KEY_CLUSTERS)?
            .items()?
            .iter()
            .map(parse_cluster)
            .collect::<ConfigResult<Vec<_>>>()?;

        Ok(Self {
            buckets,
            instances,
            clusters,
        })
    }
}

fn parse_bucket(node: &Node<'_>) -> ConfigResult<BucketSpec> {
    Ok(BucketSpec {
        name: node.get("name")?.string()?,
        location: node.get("location")?.string()?,
    })
}

fn parse_instance(node: &Node<'_>) -> ConfigResult<InstanceSpec> {
    let boot_image = node
        .get("boot_disk")?
        .get("initialize_params")?
        .get("image")?
        .string()?;

    let interfaces = node.get("network_interfaces")?;
    let networks = interfaces
        .items()?
        .iter()
        .map(|iface| -> ConfigResult<NetworkRef> {
            Ok(NetworkRef {
                network: iface.get("network")?.string()?,
            })
        })
        .collect::<ConfigResult<Vec<_>>>()?;

    if networks.is_empty() {
        return Err(ConfigError::invalid_value(
            interfaces.path,
            "an instance needs at least one network interface",
        ));
    }

    Ok(InstanceSpec {
        name: node.get("name")?.string()?,
        zone: node.get("zone")?.string()?,
        machine_type: node.get("machine_type")?.string()?,
        boot_image,
        networks,
    })
}

fn parse_cluster(node: &Node<'_>) -> ConfigResult<ClusterSpec> {
    let node_pools = node
        .get("node_pools")?
        .items()?
        .iter()
        .map(parse_node_pool)
        .collect::<ConfigResult<Vec<_>>>()?;

    Ok(ClusterSpec {
        name: node.get("name")?.string()?,
        location: node.get("location")?.string()?,
        remove_default_node_pool: node.get("remove_default_node_pool")?.boolean()?,
        initial_node_count: node.get("initial_node_count")?.count()?,
        node_pools,
    })
}

fn parse_node_pool(node: &Node<'_>) -> ConfigResult<NodePoolSpec> {
    let disk = node.get("disk_size_gb")?;
    let disk_size_gb = disk.count()?;
    if disk_size_gb == 0 {
        return Err(ConfigError::invalid_value(disk.path, "must be greater than 0"));
    }

    Ok(NodePoolSpec {
        preemptible: node.get("preemptible")?.boolean()?,
        machine_type: node.get("machine_type")?.string()?,
        disk_size_gb,
        service_account: node.get("service_account")?.string()?,
    })
}

/// A value in the tree together with the path that reached it.
struct Node<'a> {
    value: &'a Value,
    path: String,
}

impl<'a> Node<'a> {
    fn root(value: &'a Value) -> Self {
        Self {
            value,
            path: String::new(),
        }
    }

    fn display_path(&self) -> String {
        if self.path.is_empty() {
            "<root>".to_string()
        } else {
            self.path.clone()
        }
    }

    fn child_path(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        }
    }

    fn get(&self, key: &str) -> ConfigResult<Node<'a>> {
        let map = self
            .value
            .as_object()
            .ok_or_else(|| ConfigError::invalid_type(self.display_path(), "a mapping"))?;

        match map.get(key) {
            None | Some(Value::Null) => Err(ConfigError::missing(self.child_path(key))),
            Some(value) => Ok(Node {
                value,
                path: self.child_path(key),
            }),
        }
    }

    fn items(&self) -> ConfigResult<Vec<Node<'a>>> {
        let list = self
            .value
            .as_array()
            .ok_or_else(|| ConfigError::invalid_type(self.display_path(), "a list"))?;

        Ok(list
            .iter()
            .enumerate()
            .map(|(i, value)| Node {
                value,
                path: format!("{}[{}]", self.path, i),
            })
            .collect())
    }

    fn string(&self) -> ConfigResult<String> {
        let s = self
            .value
            .as_str()
            .ok_or_else(|| ConfigError::invalid_type(self.display_path(), "a string"))?;
        if s.trim().is_empty() {
            return Err(ConfigError::invalid_value(
                self.display_path(),
                "must not be empty",
            ));
        }
        Ok(s.to_string())
    }

    fn boolean(&self) -> ConfigResult<bool> {
        self.value
            .as_bool()
            .ok_or_else(|| ConfigError::invalid_type(self.display_path(), "a boolean"))
    }

    fn count(&self) -> ConfigResult<u32> {
        if let Some(n) = self.value.as_i64() {
            if n < 0 {
                return Err(ConfigError::invalid_value(
                    self.display_path(),
                    format!("must be >= 0, got {}", n),
                ));
            }
        }
        let n = self
            .value
            .as_u64()
            .ok_or_else(|| ConfigError::invalid_type(self.display_path(), "an integer"))?;
        u32::try_from(n).map_err(|_| {
            ConfigError::invalid_value(self.display_path(), format!("{} is out of range", n))
        })
    }
}
