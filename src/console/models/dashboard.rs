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

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::dashboard::{Refresh, RefreshFailure, Snapshot};
use crate::normalize::{ChartSplit, NodeView, PodView};

/// Node view with its pie chart inputs
#[derive(Debug, Serialize)]
pub struct NodeRow<'a> {
    #[serde(flatten)]
    pub view: &'a NodeView,
    pub cpu_chart: ChartSplit,
    pub memory_chart: ChartSplit,
}

impl<'a> From<&'a NodeView> for NodeRow<'a> {
    fn from(view: &'a NodeView) -> Self {
        Self {
            view,
            cpu_chart: view.cpu_chart(),
            memory_chart: view.memory_chart(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SnapshotBody<'a> {
    pub generation: u64,
    pub fetched_at: DateTime<Utc>,
    pub namespace: &'a str,
    pub nodes: Vec<NodeRow<'a>>,
    pub pods: &'a [PodView],
}

impl<'a> From<&'a Snapshot> for SnapshotBody<'a> {
    fn from(snapshot: &'a Snapshot) -> Self {
        Self {
            generation: snapshot.generation,
            fetched_at: snapshot.fetched_at,
            namespace: &snapshot.namespace,
            nodes: snapshot.nodes.iter().map(NodeRow::from).collect(),
            pods: &snapshot.pods,
        }
    }
}

/// Current dashboard state
#[derive(Debug, Serialize)]
pub struct DashboardResponse<'a> {
    pub snapshot: Option<SnapshotBody<'a>>,
    pub last_error: Option<&'a RefreshFailure>,
}

/// Outcome of a manual refresh
#[derive(Debug, Serialize)]
pub struct RefreshResponse<'a> {
    pub generation: u64,
    pub committed: bool,
    pub snapshot: SnapshotBody<'a>,
}

impl<'a> From<&'a Refresh> for RefreshResponse<'a> {
    fn from(refresh: &'a Refresh) -> Self {
        Self {
            generation: refresh.generation,
            committed: refresh.committed,
            snapshot: SnapshotBody::from(&*refresh.snapshot),
        }
    }
}
