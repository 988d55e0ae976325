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

use axum::{
    Json,
    extract::{Query, State},
};
use serde_json::Value;
use snafu::ensure;

use crate::config::{DEFAULT_NAMESPACE, is_valid_namespace};
use crate::console::{
    error::{BadRequestSnafu, Result},
    models::metrics::*,
    state::AppState,
};

/// Pass-through of the upstream node metrics list
pub async fn node_metrics(State(state): State<AppState>) -> Result<Json<Value>> {
    let body = state
        .context
        .node_metrics::<Value>()
        .await
        .inspect_err(|e| tracing::warn!("fetch node metrics error: {}", e))?;

    Ok(Json(body))
}

/// Pass-through of the upstream pod metrics list of one namespace
pub async fn pod_metrics(
    State(state): State<AppState>,
    Query(query): Query<PodsQuery>,
) -> Result<Json<Value>> {
    let namespace = query
        .namespace
        .filter(|ns| !ns.is_empty())
        .unwrap_or_else(|| DEFAULT_NAMESPACE.to_string());

    ensure!(
        is_valid_namespace(&namespace),
        BadRequestSnafu {
            message: format!("invalid namespace '{}'", namespace),
        }
    );

    let body = state
        .context
        .pod_metrics::<Value>(&namespace)
        .await
        .inspect_err(|e| tracing::warn!("fetch pod metrics for '{}' error: {}", namespace, e))?;

    Ok(Json(body))
}

/// Capacity of every node, reduced to cpu and memory
pub async fn node_capacity(State(state): State<AppState>) -> Result<Json<CapacityListResponse>> {
    let records = state
        .context
        .list_node_capacity()
        .await
        .inspect_err(|e| tracing::warn!("fetch node capacity error: {}", e))?;

    Ok(Json(CapacityListResponse {
        items: records.into_iter().map(CapacityItem::from).collect(),
    }))
}
