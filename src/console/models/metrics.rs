// Copyright 2025 RustFS Team
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

use serde::{Deserialize, Serialize};

use crate::types::metrics::NodeCapacityRecord;

/// Pod metrics query, `?namespace=<ns>`
#[derive(Debug, Default, Deserialize)]
pub struct PodsQuery {
    pub namespace: Option<String>,
}

/// Node capacity entry
#[derive(Debug, Serialize)]
pub struct CapacityItem {
    pub name: String,
    pub cpu: String,
    pub memory: String,
}

/// Node capacity list response
#[derive(Debug, Serialize)]
pub struct CapacityListResponse {
    pub items: Vec<CapacityItem>,
}

impl From<NodeCapacityRecord> for CapacityItem {
    fn from(record: NodeCapacityRecord) -> Self {
        Self {
            name: record.name,
            cpu: record.cpu_capacity_raw,
            memory: record.memory_capacity_raw,
        }
    }
}
