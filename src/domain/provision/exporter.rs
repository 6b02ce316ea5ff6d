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

use crate::infrastructure::constants::{EXPORT_PREFIX_BUCKET_URL, EXPORT_PREFIX_INSTANCE_NAME};
use crate::shared::error::{ProvisionError, Result};
use std::collections::BTreeMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Named outputs of one run. Writers are serialized; a key is recorded once.
#[derive(Debug, Default)]
pub struct OutputExporter {
    entries: Mutex<BTreeMap<String, String>>,
}

impl OutputExporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&self, key: impl Into<String>, value: impl Into<String>) -> Result<()> {
        let key = key.into();
        let mut entries = self.lock();
        if entries.contains_key(&key) {
            return Err(ProvisionError::duplicate_key(key));
        }
        entries.insert(key, value.into());
        Ok(())
    }

    pub fn get(&self, key: &str) -> Option<String> {
        self.lock().get(key).cloned()
    }

    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.lock().clone()
    }

    pub fn into_outputs(self) -> BTreeMap<String, String> {
        self.entries
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    fn lock(&self) -> MutexGuard<'_, BTreeMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

pub fn bucket_url_key(bucket_name: &str) -> String {
    format!("{}{}", EXPORT_PREFIX_BUCKET_URL, bucket_name)
}

pub fn instance_name_key(instance_name: &str) -> String {
    format!("{}{}", EXPORT_PREFIX_INSTANCE_NAME, instance_name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_read_back() {
        let exporter = OutputExporter::new();
        exporter
            .record(bucket_url_key("logs"), "gs://logs")
            .unwrap();
        exporter
            .record(instance_name_key("web"), "web")
            .unwrap();

        let outputs = exporter.into_outputs();
        assert_eq!(outputs.get("bucket_url_logs").map(String::as_str), Some("gs://logs"));
        assert_eq!(outputs.get("instance_name_web").map(String::as_str), Some("web"));
    }

    #[test]
    fn test_duplicate_key_keeps_first_value() {
        let exporter = OutputExporter::new();
        exporter.record("bucket_url_logs", "gs://first").unwrap();

        let err = exporter.record("bucket_url_logs", "gs://second").unwrap_err();
        assert!(matches!(err, ProvisionError::DuplicateKey { ref key } if key == "bucket_url_logs"));
        assert_eq!(exporter.get("bucket_url_logs").as_deref(), Some("gs://first"));
        assert_eq!(exporter.len(), 1);
    }

    #[test]
    fn test_concurrent_writers_keep_keys_unique() {
        let exporter = std::sync::Arc::new(OutputExporter::new());
        let handles: Vec<_> = (0..8)
            .map(|i| {
                let exporter = exporter.clone();
                std::thread::spawn(move || exporter.record("shared", format!("v{}", i)).is_ok())
            })
            .collect();

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(successes, 1);
        assert_eq!(exporter.len(), 1);
    }
}
