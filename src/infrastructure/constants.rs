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

/// Environment
pub const PROJECT_ID_ENV: &str = "GOOGLE_PROJECT_ID";

/// Configuration top-level keys
pub const KEY_BUCKETS: &str = "buckets";
pub const KEY_INSTANCES: &str = "instances";
pub const KEY_CLUSTERS: &str = "clusters";

/// Node pool naming and access
pub const NODE_POOL_NAME_SUFFIX: &str = "preemptible";
pub const CLOUD_PLATFORM_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";

/// Export key prefixes
pub const EXPORT_PREFIX_BUCKET_URL: &str = "bucket_url_";
pub const EXPORT_PREFIX_INSTANCE_NAME: &str = "instance_name_";

/// Storage URL scheme
pub const BUCKET_URL_SCHEME: &str = "gs://";

/// Run defaults
pub const DEFAULT_MAX_CONCURRENCY: usize = 8;
pub const DEFAULT_CALL_TIMEOUT_SECS: u64 = 600;

/// Provider retry defaults
pub const DEFAULT_RETRY_ATTEMPTS: usize = 3;
pub const DEFAULT_RETRY_MIN_DELAY_MS: u64 = 500;
pub const DEFAULT_RETRY_MAX_DELAY_SECS: u64 = 30;
pub const DEFAULT_RETRY_FACTOR: f32 = 2.0;

/// Naming rules
pub const RESOURCE_NAME_PATTERN: &str = r"^[a-z]([-a-z0-9]{0,61}[a-z0-9])?$";
pub const BUCKET_NAME_PATTERN: &str = r"^[a-z0-9][a-z0-9._-]{1,61}[a-z0-9]$";
