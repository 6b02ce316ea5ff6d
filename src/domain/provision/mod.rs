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

//! Dependency resolution and apply orchestration

pub mod cancel;
pub mod exporter;
pub mod graph;
pub mod orchestrator;
pub mod report;
pub mod validator;

pub use self::cancel::CancelHandle;
pub use self::exporter::{bucket_url_key, instance_name_key, OutputExporter};
pub use self::graph::{GraphNode, ProvisionGraph};
pub use self::orchestrator::Orchestrator;
pub use self::report::{IntentOutcome, IntentReport, RunReport, RunSummary};
pub use self::validator::ConfigValidator;
