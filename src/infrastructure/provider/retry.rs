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

//! Provider-side retry with exponential backoff.
//!
//! Only retryable errors (`Unavailable`, `Timeout`) are repeated. The
//! orchestrator itself never retries.

use crate::domain::intent::{BucketIntent, ClusterIntent, InstanceIntent, NodePoolIntent};
use crate::infrastructure::constants::{
    DEFAULT_RETRY_ATTEMPTS, DEFAULT_RETRY_FACTOR, DEFAULT_RETRY_MAX_DELAY_SECS,
    DEFAULT_RETRY_MIN_DELAY_MS,
};
use crate::infrastructure::provider::client::{CloudProvider, CreatedBucket, CreatedResource};
use crate::shared::error::ProviderError;
use backon::{ExponentialBuilder, Retryable};
use std::future::Future;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries after the first attempt.
    pub max_retries: usize,
    pub min_delay: Duration,
    pub max_delay: Duration,
    pub factor: f32,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_RETRY_ATTEMPTS,
            min_delay: Duration::from_millis(DEFAULT_RETRY_MIN_DELAY_MS),
            max_delay: Duration::from_secs(DEFAULT_RETRY_MAX_DELAY_SECS),
            factor: DEFAULT_RETRY_FACTOR,
        }
    }
}

impl RetryPolicy {
    pub fn with_max_retries(mut self, max_retries: usize) -> Self {
        self.max_retries = max_retries;
        self
    }

    pub fn with_min_delay(mut self, min_delay: Duration) -> Self {
        self.min_delay = min_delay;
        self
    }

    fn builder(&self) -> ExponentialBuilder {
        ExponentialBuilder::default()
            .with_min_delay(self.min_delay)
            .with_max_delay(self.max_delay)
            .with_factor(self.factor)
            .with_max_times(self.max_retries)
    }
}

pub struct RetryingProvider<P> {
    inner: P,
    policy: RetryPolicy,
}

impl<P: CloudProvider> RetryingProvider<P> {
    pub fn new(inner: P, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn inner(&self) -> &P {
        &self.inner
    }

    async fn retry<T, F, Fut>(&self, resource: &str, call: F) -> Result<T, ProviderError>
    where
        F: FnMut() -> Fut + Send,
        Fut: Future<Output = Result<T, ProviderError>> + Send,
        T: Send,
    {
        call.retry(&self.policy.builder())
            .when(ProviderError::is_retryable)
            .notify(|err: &ProviderError, delay: Duration| {
                tracing::warn!(
                    resource,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    error = %err,
                    "retrying provider call"
                );
            })
            .await
    }
}

#[async_trait::async_trait]
impl<P: CloudProvider> CloudProvider for RetryingProvider<P> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn create_bucket(&self, intent: &BucketIntent) -> Result<CreatedBucket, ProviderError> {
        self.retry(&intent.name, || self.inner.create_bucket(intent))
            .await
    }

    async fn create_instance(
        &self,
        intent: &InstanceIntent,
    ) -> Result<CreatedResource, ProviderError> {
        self.retry(&intent.name, || self.inner.create_instance(intent))
            .await
    }

    async fn create_cluster(
        &self,
        intent: &ClusterIntent,
    ) -> Result<CreatedResource, ProviderError> {
        self.retry(&intent.name, || self.inner.create_cluster(intent))
            .await
    }

    async fn create_node_pool(
        &self,
        intent: &NodePoolIntent,
        cluster_identity: &str,
    ) -> Result<CreatedResource, ProviderError> {
        self.retry(&intent.name, || {
            self.inner.create_node_pool(intent, cluster_identity)
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Fails with the given error for the first `failures` bucket calls.
    struct Flaky {
        failures: usize,
        error: ProviderError,
        calls: AtomicUsize,
    }

    #[async_trait::async_trait]
    impl CloudProvider for Flaky {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn create_bucket(
            &self,
            intent: &BucketIntent,
        ) -> Result<CreatedBucket, ProviderError> {
            let n = self.calls.fetch_add(1, Ordering::SeqCst);
            if n < self.failures {
                Err(self.error.clone())
            } else {
                Ok(CreatedBucket {
                    url: format!("gs://{}", intent.name),
                })
            }
        }

        async fn create_instance(
            &self,
            _intent: &InstanceIntent,
        ) -> Result<CreatedResource, ProviderError> {
            unimplemented!()
        }

        async fn create_cluster(
            &self,
            _intent: &ClusterIntent,
        ) -> Result<CreatedResource, ProviderError> {
            unimplemented!()
        }

        async fn create_node_pool(
            &self,
            _intent: &NodePoolIntent,
            _cluster_identity: &str,
        ) -> Result<CreatedResource, ProviderError> {
            unimplemented!()
        }
    }

    fn bucket() -> BucketIntent {
        BucketIntent {
            name: "logs".to_string(),
            location: "US".to_string(),
        }
    }

    fn policy(retries: usize) -> RetryPolicy {
        RetryPolicy::default()
            .with_max_retries(retries)
            .with_min_delay(Duration::from_millis(1))
    }

    #[tokio::test]
    async fn test_retries_transient_errors() {
        let provider = RetryingProvider::new(
            Flaky {
                failures: 2,
                error: ProviderError::unavailable("logs", "503"),
                calls: AtomicUsize::new(0),
            },
            policy(3),
        );
        let created = provider.create_bucket(&bucket()).await.unwrap();
        assert_eq!(created.url, "gs://logs");
        assert_eq!(provider.inner().calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_gives_up_after_max_retries() {
        let provider = RetryingProvider::new(
            Flaky {
                failures: 10,
                error: ProviderError::unavailable("logs", "503"),
                calls: AtomicUsize::new(0),
            },
            policy(2),
        );
        assert!(provider.create_bucket(&bucket()).await.is_err());
        assert_eq!(provider.inner().calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_does_not_retry_api_errors() {
        let provider = RetryingProvider::new(
            Flaky {
                failures: 1,
                error: ProviderError::api("logs", "bucket name taken"),
                calls: AtomicUsize::new(0),
            },
            policy(3),
        );
        let err = provider.create_bucket(&bucket()).await.unwrap_err();
        assert!(matches!(err, ProviderError::Api { .. }));
        assert_eq!(provider.inner().calls.load(Ordering::SeqCst), 1);
    }
}
