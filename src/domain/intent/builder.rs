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

//! Pure mapping from config entries to intents

use crate::domain::config::{BucketSpec, ClusterSpec, InstanceSpec, NodePoolSpec};
use crate::domain::intent::{
    BucketIntent, ClusterIntent, ClusterRef, InstanceIntent, NodeConfig, NodePoolIntent,
};
use crate::infrastructure::constants::{CLOUD_PLATFORM_SCOPE, NODE_POOL_NAME_SUFFIX};

pub fn build_bucket_intent(spec: &BucketSpec) -> BucketIntent {
    BucketIntent {
        name: spec.name.clone(),
        location: spec.location.clone(),
    }
}

pub fn build_instance_intent(spec: &InstanceSpec) -> InstanceIntent {
    InstanceIntent {
        name: spec.name.clone(),
        zone: spec.zone.clone(),
        machine_type: spec.machine_type.clone(),
        boot_image: spec.boot_image.clone(),
        networks: spec.networks.iter().map(|n| n.network.clone()).collect(),
    }
}

pub fn build_cluster_intent(spec: &ClusterSpec) -> ClusterIntent {
    ClusterIntent {
        name: spec.name.clone(),
        location: spec.location.clone(),
        remove_default_node_pool: spec.remove_default_node_pool,
        initial_node_count: spec.initial_node_count,
    }
}

/// The pool inherits location and node count from its cluster. The cluster
/// identity is bound later, once the cluster exists.
pub fn build_node_pool_intent(cluster: &ClusterIntent, spec: &NodePoolSpec) -> NodePoolIntent {
    NodePoolIntent {
        name: derive_node_pool_name(&cluster.name),
        location: cluster.location.clone(),
        node_count: cluster.initial_node_count,
        cluster: ClusterRef {
            name: cluster.name.clone(),
            identity: None,
        },
        node_config: NodeConfig {
            preemptible: spec.preemptible,
            machine_type: spec.machine_type.clone(),
            disk_size_gb: spec.disk_size_gb,
            service_account: spec.service_account.clone(),
            oauth_scopes: vec![CLOUD_PLATFORM_SCOPE.to_string()],
        },
    }
}

/// Every pool of a cluster gets the same name, so a cluster can hold one pool.
pub fn derive_node_pool_name(cluster_name: &str) -> String {
    format!("{}{}", cluster_name, NODE_POOL_NAME_SUFFIX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::NetworkRef;

    fn cluster_spec() -> ClusterSpec {
        ClusterSpec {
            name: "c1".to_string(),
            location: "us-central1".to_string(),
            remove_default_node_pool: true,
            initial_node_count: 3,
            node_pools: vec![NodePoolSpec {
                preemptible: true,
                machine_type: "e2-medium".to_string(),
                disk_size_gb: 50,
                service_account: "sa@x".to_string(),
            }],
        }
    }

    #[test]
    fn test_instance_intent_keeps_network_order() {
        let spec = InstanceSpec {
            name: "web".to_string(),
            zone: "us-central1-a".to_string(),
            machine_type: "e2-small".to_string(),
            boot_image: "debian-12".to_string(),
            networks: vec![
                NetworkRef {
                    network: "default".to_string(),
                },
                NetworkRef {
                    network: "backend".to_string(),
                },
            ],
        };
        let intent = build_instance_intent(&spec);
        assert_eq!(intent.networks, vec!["default", "backend"]);
        assert_eq!(intent.boot_image, "debian-12");
    }

    #[test]
    fn test_node_pool_inherits_from_cluster() {
        let spec = cluster_spec();
        let cluster = build_cluster_intent(&spec);
        let pool = build_node_pool_intent(&cluster, &spec.node_pools[0]);

        assert_eq!(pool.name, "c1preemptible");
        assert_eq!(pool.location, "us-central1");
        assert_eq!(pool.node_count, 3);
        assert_eq!(pool.cluster.name, "c1");
        assert_eq!(pool.cluster_identity(), None);
        assert_eq!(pool.node_config.oauth_scopes, vec![CLOUD_PLATFORM_SCOPE]);
    }

    #[test]
    fn test_node_pool_name_ignores_pool_index() {
        let mut spec = cluster_spec();
        spec.node_pools.push(spec.node_pools[0].clone());
        let cluster = build_cluster_intent(&spec);
        let names: Vec<_> = spec
            .node_pools
            .iter()
            .map(|p| build_node_pool_intent(&cluster, p).name)
            .collect();
        assert_eq!(names, vec!["c1preemptible", "c1preemptible"]);
    }

    #[test]
    fn test_bind_cluster_identity() {
        let spec = cluster_spec();
        let cluster = build_cluster_intent(&spec);
        let pool =
            build_node_pool_intent(&cluster, &spec.node_pools[0]).with_cluster_identity("c1-xyz");
        assert_eq!(pool.cluster_identity(), Some("c1-xyz"));
    }
}
