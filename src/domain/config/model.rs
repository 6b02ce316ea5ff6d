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

//! Typed representation of the declarative provisioning tree

use serde::{Deserialize, Serialize};

/// The whole declarative tree for one provisioning run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProvisionConfig {
    pub buckets: Vec<BucketSpec>,
    pub instances: Vec<InstanceSpec>,
    pub clusters: Vec<ClusterSpec>,
}

impl ProvisionConfig {
    pub fn node_pool_count(&self) -> usize {
        self.clusters.iter().map(|c| c.node_pools.len()).sum()
    }

    pub fn intent_count(&self) -> usize {
        self.buckets.len() + self.instances.len() + self.clusters.len() + self.node_pool_count()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BucketSpec {
    pub name: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InstanceSpec {
    pub name: String,
    pub zone: String,
    pub machine_type: String,
    pub boot_image: String,
    /// Never empty once loaded.
    pub networks: Vec<NetworkRef>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NetworkRef {
    pub network: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSpec {
    pub name: String,
    pub location: String,
    pub remove_default_node_pool: bool,
    pub initial_node_count: u32,
    pub node_pools: Vec<NodePoolSpec>,
}

/// A node pool has no name of its own; it is named after its cluster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodePoolSpec {
    pub preemptible: bool,
    pub machine_type: String,
    pub disk_size_gb: u32,
    pub service_account: String,
}
