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

//! Explicit dependency graph over the intents of one run.
//!
//! Edges run from a cluster to each of its node pools. Nodes are numbered in
//! insertion order (buckets, instances, then each cluster followed by its node
//! pools), which is also the tie-break order of the topological walk.

use crate::domain::config::ProvisionConfig;
use crate::domain::intent::{
    build_bucket_intent, build_cluster_intent, build_instance_intent, build_node_pool_intent,
    IntentId, ResourceIntent,
};
use crate::shared::error::{ProvisionError, Result};
use serde::Serialize;
use std::collections::{BTreeSet, HashMap};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GraphNode {
    pub id: IntentId,
    pub intent: ResourceIntent,
    pub depends_on: Option<IntentId>,
}

#[derive(Debug, Clone, Default)]
pub struct ProvisionGraph {
    nodes: Vec<GraphNode>,
    dependents: HashMap<IntentId, Vec<IntentId>>,
}

impl ProvisionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_config(config: &ProvisionConfig) -> Result<Self> {
        let mut graph = Self::new();

        for bucket in &config.buckets {
            graph.add(ResourceIntent::Bucket(build_bucket_intent(bucket)), None)?;
        }

        for instance in &config.instances {
            graph.add(ResourceIntent::Instance(build_instance_intent(instance)), None)?;
        }

        for cluster in &config.clusters {
            let cluster_intent = build_cluster_intent(cluster);
            let pools: Vec<_> = cluster
                .node_pools
                .iter()
                .map(|pool| build_node_pool_intent(&cluster_intent, pool))
                .collect();

            let cluster_id = graph.add(ResourceIntent::Cluster(cluster_intent), None)?;
            for pool in pools {
                graph.add(ResourceIntent::NodePool(pool), Some(cluster_id))?;
            }
        }

        Ok(graph)
    }

    /// Add an intent. A dependency must already be in the graph.
    pub fn add(
        &mut self,
        intent: ResourceIntent,
        depends_on: Option<IntentId>,
    ) -> Result<IntentId> {
        let id = IntentId(self.nodes.len());

        if let Some(dep) = depends_on {
            let Some(parent) = self.node(dep) else {
                return Err(ProvisionError::invariant(format!(
                    "{} depends on missing intent {}",
                    intent.label(),
                    dep
                )));
            };
            if !matches!(parent.intent, ResourceIntent::Cluster(_))
                || !matches!(intent, ResourceIntent::NodePool(_))
            {
                return Err(ProvisionError::invariant(format!(
                    "{} cannot depend on {}",
                    intent.label(),
                    parent.intent.label()
                )));
            }
            self.dependents.entry(dep).or_default().push(id);
        }

        self.nodes.push(GraphNode {
            id,
            intent,
            depends_on,
        });
        Ok(id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: IntentId) -> Option<&GraphNode> {
        self.nodes.get(id.0)
    }

    pub fn nodes(&self) -> &[GraphNode] {
        &self.nodes
    }

    /// Intents with no dependency, in insertion order.
    pub fn roots(&self) -> impl Iterator<Item = &GraphNode> {
        self.nodes.iter().filter(|n| n.depends_on.is_none())
    }

    pub fn dependents(&self, id: IntentId) -> &[IntentId] {
        self.dependents.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Kahn walk; among ready intents the lowest id goes first.
    pub fn topological_order(&self) -> Result<Vec<IntentId>> {
        let mut indegree: HashMap<IntentId, usize> = self
            .nodes
            .iter()
            .map(|n| (n.id, usize::from(n.depends_on.is_some())))
            .collect();

        let mut ready: BTreeSet<IntentId> = indegree
            .iter()
            .filter(|(_, count)| **count == 0)
            .map(|(id, _)| *id)
            .collect();

        let mut order = Vec::with_capacity(self.nodes.len());
        while let Some(next) = ready.pop_first() {
            order.push(next);

            for dependent in self.dependents(next) {
                let Some(entry) = indegree.get_mut(dependent) else {
                    return Err(ProvisionError::invariant(format!(
                        "missing indegree for {}",
                        dependent
                    )));
                };
                *entry -= 1;
                if *entry == 0 {
                    ready.insert(*dependent);
                }
            }
        }

        if order.len() != self.nodes.len() {
            let mut leftovers: Vec<_> = indegree
                .iter()
                .filter(|(_, count)| **count > 0)
                .map(|(id, _)| id.to_string())
                .collect();
            leftovers.sort();
            return Err(ProvisionError::invariant(format!(
                "unresolvable dependencies: {}",
                leftovers.join(", ")
            )));
        }

        Ok(order)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::{BucketSpec, ClusterSpec, NodePoolSpec};
    use crate::domain::intent::{BucketIntent, ResourceKind};

    fn config() -> ProvisionConfig {
        let pool = NodePoolSpec {
            preemptible: true,
            machine_type: "e2-medium".to_string(),
            disk_size_gb: 50,
            service_account: "sa@x".to_string(),
        };
        ProvisionConfig {
            buckets: vec![BucketSpec {
                name: "logs".to_string(),
                location: "US".to_string(),
            }],
            instances: Vec::new(),
            clusters: vec![
                ClusterSpec {
                    name: "c1".to_string(),
                    location: "us-central1".to_string(),
                    remove_default_node_pool: true,
                    initial_node_count: 1,
                    node_pools: vec![pool.clone()],
                },
                ClusterSpec {
                    name: "c2".to_string(),
                    location: "europe-west1".to_string(),
                    remove_default_node_pool: false,
                    initial_node_count: 2,
                    node_pools: vec![pool],
                },
            ],
        }
    }

    #[test]
    fn test_graph_shape() {
        let graph = ProvisionGraph::from_config(&config()).unwrap();
        assert_eq!(graph.len(), 5);

        let kinds: Vec<_> = graph.nodes().iter().map(|n| n.intent.kind()).collect();
        assert_eq!(
            kinds,
            vec![
                ResourceKind::Bucket,
                ResourceKind::Cluster,
                ResourceKind::NodePool,
                ResourceKind::Cluster,
                ResourceKind::NodePool,
            ]
        );

        assert_eq!(graph.roots().count(), 3);
        assert_eq!(graph.dependents(IntentId(1)), &[IntentId(2)]);
        assert_eq!(graph.dependents(IntentId(3)), &[IntentId(4)]);
        assert!(graph.dependents(IntentId(0)).is_empty());
    }

    #[test]
    fn test_topological_order_places_pools_after_clusters() {
        let graph = ProvisionGraph::from_config(&config()).unwrap();
        let order = graph.topological_order().unwrap();
        let position = |id: usize| order.iter().position(|x| *x == IntentId(id)).unwrap();

        assert_eq!(order.len(), 5);
        assert!(position(1) < position(2));
        assert!(position(3) < position(4));
    }

    #[test]
    fn test_rejects_missing_dependency() {
        let mut graph = ProvisionGraph::new();
        let intent = ResourceIntent::Bucket(BucketIntent {
            name: "logs".to_string(),
            location: "US".to_string(),
        });
        let err = graph.add(intent, Some(IntentId(7))).unwrap_err();
        assert!(err.to_string().contains("missing intent"));
    }

    #[test]
    fn test_rejects_edge_between_wrong_kinds() {
        let mut graph = ProvisionGraph::new();
        let bucket = ResourceIntent::Bucket(BucketIntent {
            name: "logs".to_string(),
            location: "US".to_string(),
        });
        let first = graph.add(bucket.clone(), None).unwrap();
        assert!(graph.add(bucket, Some(first)).is_err());
    }

    #[test]
    fn test_empty_graph() {
        let graph = ProvisionGraph::from_config(&ProvisionConfig::default()).unwrap();
        assert!(graph.is_empty());
        assert!(graph.topological_order().unwrap().is_empty());
    }
}
