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

//! Wire shapes of the `metrics.k8s.io/v1beta1` API and the flat records the
//! normalizer works on.

use k8s_openapi::api::core::v1 as corev1;
use kube::api::ObjectMeta;
use kube::ResourceExt;
use serde::{Deserialize, Serialize};

pub const METRICS_API_GROUP: &str = "metrics.k8s.io";
pub const METRICS_API_VERSION: &str = "v1beta1";

/// Path of the node metrics collection, relative to the API server root.
pub fn node_metrics_path() -> String {
    format!("/apis/{METRICS_API_GROUP}/{METRICS_API_VERSION}/nodes")
}

/// Path of the pod metrics collection of one namespace.
pub fn pod_metrics_path(namespace: &str) -> String {
    format!("/apis/{METRICS_API_GROUP}/{METRICS_API_VERSION}/namespaces/{namespace}/pods")
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cpu: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeMetrics {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub usage: Usage,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct NodeMetricsList {
    #[serde(default)]
    pub items: Vec<NodeMetrics>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ContainerMetrics {
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage: Option<Usage>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PodMetrics {
    #[serde(default)]
    pub metadata: ObjectMeta,
    #[serde(default)]
    pub containers: Vec<ContainerMetrics>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<String>,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PodMetricsList {
    #[serde(default)]
    pub items: Vec<PodMetrics>,
}

/// Current usage of one node, as reported by the metrics API.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeUsageRecord {
    pub name: String,
    /// `<integer>n`, nanocores.
    pub cpu_usage_raw: String,
    /// `<integer>Ki`, kibibytes.
    pub memory_usage_raw: String,
}

/// Total resources of one node, from `status.capacity`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeCapacityRecord {
    pub name: String,
    /// Decimal number of whole cores.
    pub cpu_capacity_raw: String,
    /// `<integer>Ki`, kibibytes.
    pub memory_capacity_raw: String,
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ContainerUsage {
    pub cpu_usage_raw: Option<String>,
    pub memory_usage_raw: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PodUsageRecord {
    pub name: String,
    pub namespace: String,
    pub containers: Vec<ContainerUsage>,
}

impl From<NodeMetrics> for NodeUsageRecord {
    fn from(node: NodeMetrics) -> Self {
        // A missing field becomes an empty quantity, which the normalizer rejects.
        Self {
            name: node.metadata.name.unwrap_or_default(),
            cpu_usage_raw: node.usage.cpu.unwrap_or_default(),
            memory_usage_raw: node.usage.memory.unwrap_or_default(),
        }
    }
}

impl From<PodMetrics> for PodUsageRecord {
    fn from(pod: PodMetrics) -> Self {
        Self {
            name: pod.metadata.name.unwrap_or_default(),
            namespace: pod.metadata.namespace.unwrap_or_default(),
            containers: pod
                .containers
                .into_iter()
                .map(|c| {
                    let usage = c.usage.unwrap_or_default();
                    ContainerUsage {
                        cpu_usage_raw: usage.cpu,
                        memory_usage_raw: usage.memory,
                    }
                })
                .collect(),
        }
    }
}

impl NodeCapacityRecord {
    /// Builds a capacity record from a Node object.
    ///
    /// Returns `None` when the node reports no cpu or memory capacity, so the
    /// join marks that node's capacity as unavailable.
    pub fn from_node(node: &corev1::Node) -> Option<Self> {
        let capacity = node.status.as_ref()?.capacity.as_ref()?;
        let cpu = capacity.get("cpu")?;
        let memory = capacity.get("memory")?;

        Some(Self {
            name: node.name_any(),
            cpu_capacity_raw: cpu.0.clone(),
            memory_capacity_raw: memory.0.clone(),
        })
    }
}

impl NodeMetricsList {
    pub fn into_records(self) -> Vec<NodeUsageRecord> {
        self.items.into_iter().map(NodeUsageRecord::from).collect()
    }
}

impl PodMetricsList {
    pub fn into_records(self) -> Vec<PodUsageRecord> {
        self.items.into_iter().map(PodUsageRecord::from).collect()
    }
}
