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

//! Configuration domain

pub mod loader;
pub mod model;
pub mod settings;

pub use self::loader::{load_config_file, parse_config_str, ConfigFormat};
pub use self::model::{
    BucketSpec, ClusterSpec, InstanceSpec, NetworkRef, NodePoolSpec, ProvisionConfig,
};
pub use self::settings::{resolve_project_id, RunSettings};
