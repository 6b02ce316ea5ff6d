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

//! Resource-creation intents: fully parameterized, not yet executed requests

pub mod builder;

pub use self::builder::{
    build_bucket_intent, build_cluster_intent, build_instance_intent, build_node_pool_intent,
    derive_node_pool_name,
};

use serde::Serialize;
use std::fmt;

/// Position of an intent in its provisioning graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct IntentId(pub usize);

impl fmt::Display for IntentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Bucket,
    Instance,
    Cluster,
    NodePool,
}

impl ResourceKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Bucket => "bucket",
            ResourceKind::Instance => "instance",
            ResourceKind::Cluster => "cluster",
            ResourceKind::NodePool => "node_pool",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BucketIntent {
    pub name: String,
    pub location: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InstanceIntent {
    pub name: String,
    pub zone: String,
    pub machine_type: String,
    pub boot_image: String,
    pub networks: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterIntent {
    pub name: String,
    pub location: String,
    pub remove_default_node_pool: bool,
    pub initial_node_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodePoolIntent {
    pub name: String,
    pub location: String,
    pub node_count: u32,
    pub cluster: ClusterRef,
    pub node_config: NodeConfig,
}

impl NodePoolIntent {
    /// Bind the runtime identity returned for the owning cluster.
    pub fn with_cluster_identity(mut self, identity: impl Into<String>) -> Self {
        self.cluster.identity = Some(identity.into());
        self
    }

    pub fn cluster_identity(&self) -> Option<&str> {
        self.cluster.identity.as_deref()
    }
}

/// Reference from a node pool to the cluster it belongs to. `identity` stays
/// empty until the cluster has been created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ClusterRef {
    pub name: String,
    pub identity: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeConfig {
    pub preemptible: bool,
    pub machine_type: String,
    pub disk_size_gb: u32,
    pub service_account: String,
    pub oauth_scopes: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResourceIntent {
    Bucket(BucketIntent),
    Instance(InstanceIntent),
    Cluster(ClusterIntent),
    NodePool(NodePoolIntent),
}

impl ResourceIntent {
    pub fn kind(&self) -> ResourceKind {
        match self {
            ResourceIntent::Bucket(_) => ResourceKind::Bucket,
            ResourceIntent::Instance(_) => ResourceKind::Instance,
            ResourceIntent::Cluster(_) => ResourceKind::Cluster,
            ResourceIntent::NodePool(_) => ResourceKind::NodePool,
        }
    }

    pub fn name(&self) -> &str {
        match self {
            ResourceIntent::Bucket(b) => &b.name,
            ResourceIntent::Instance(i) => &i.name,
            ResourceIntent::Cluster(c) => &c.name,
            ResourceIntent::NodePool(p) => &p.name,
        }
    }

    /// Only node pools depend on another intent.
    pub fn depends_on(&self) -> Option<&ClusterRef> {
        match self {
            ResourceIntent::NodePool(p) => Some(&p.cluster),
            _ => None,
        }
    }

    /// `kind/name`, used in logs and error messages.
    pub fn label(&self) -> String {
        format!("{}/{}", self.kind(), self.name())
    }
}
