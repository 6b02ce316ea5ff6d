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

use crate::domain::intent::{BucketIntent, ClusterIntent, InstanceIntent, NodePoolIntent};
use crate::infrastructure::constants::BUCKET_URL_SCHEME;
use crate::shared::error::ProviderError;
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedBucket {
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreatedResource {
    pub assigned_name: String,
}

/// The external system that actually creates cloud resources.
///
/// Implementations own retries and resource lifecycles; the orchestrator calls
/// each method once per intent and records the identity returned.
#[async_trait::async_trait]
pub trait CloudProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn create_bucket(&self, intent: &BucketIntent) -> Result<CreatedBucket, ProviderError>;

    async fn create_instance(
        &self,
        intent: &InstanceIntent,
    ) -> Result<CreatedResource, ProviderError>;

    async fn create_cluster(
        &self,
        intent: &ClusterIntent,
    ) -> Result<CreatedResource, ProviderError>;

    async fn create_node_pool(
        &self,
        intent: &NodePoolIntent,
        cluster_identity: &str,
    ) -> Result<CreatedResource, ProviderError>;
}

/// Provider that creates nothing. It logs every call and answers with the
/// identities a real project would assign.
pub struct DryRunProvider {
    project_id: String,
    calls: AtomicUsize,
}

impl DryRunProvider {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self {
            project_id: project_id.into(),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn project_id(&self) -> &str {
        &self.project_id
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn cluster_identity(&self, intent: &ClusterIntent) -> String {
        format!(
            "projects/{}/locations/{}/clusters/{}",
            self.project_id, intent.location, intent.name
        )
    }
}

#[async_trait::async_trait]
impl CloudProvider for DryRunProvider {
    fn name(&self) -> &str {
        "dry-run"
    }

    async fn create_bucket(&self, intent: &BucketIntent) -> Result<CreatedBucket, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tracing::info!(
            project = %self.project_id,
            bucket = %intent.name,
            location = %intent.location,
            "would create bucket"
        );
        Ok(CreatedBucket {
            url: format!("{}{}", BUCKET_URL_SCHEME, intent.name),
        })
    }

    async fn create_instance(
        &self,
        intent: &InstanceIntent,
    ) -> Result<CreatedResource, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tracing::info!(
            project = %self.project_id,
            instance = %intent.name,
            zone = %intent.zone,
            machine_type = %intent.machine_type,
            image = %intent.boot_image,
            networks = ?intent.networks,
            "would create instance"
        );
        Ok(CreatedResource {
            assigned_name: intent.name.clone(),
        })
    }

    async fn create_cluster(
        &self,
        intent: &ClusterIntent,
    ) -> Result<CreatedResource, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tracing::info!(
            project = %self.project_id,
            cluster = %intent.name,
            location = %intent.location,
            remove_default_node_pool = intent.remove_default_node_pool,
            initial_node_count = intent.initial_node_count,
            "would create cluster"
        );
        Ok(CreatedResource {
            assigned_name: self.cluster_identity(intent),
        })
    }

    async fn create_node_pool(
        &self,
        intent: &NodePoolIntent,
        cluster_identity: &str,
    ) -> Result<CreatedResource, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        tracing::info!(
            project = %self.project_id,
            node_pool = %intent.name,
            cluster = %cluster_identity,
            node_count = intent.node_count,
            machine_type = %intent.node_config.machine_type,
            disk_size_gb = intent.node_config.disk_size_gb,
            preemptible = intent.node_config.preemptible,
            service_account = %intent.node_config.service_account,
            "would create node pool"
        );
        Ok(CreatedResource {
            assigned_name: intent.name.clone(),
        })
    }
}
