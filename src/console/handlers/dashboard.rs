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
    extract::State,
    response::{IntoResponse, Response},
};

use crate::console::{
    error::Result,
    models::dashboard::{DashboardResponse, RefreshResponse, SnapshotBody},
    state::AppState,
};

/// Currently published snapshot and the last refresh failure, if any
pub async fn get_dashboard(State(state): State<AppState>) -> Response {
    let snapshot = state.dashboard.snapshot().await;
    let last_error = state.dashboard.last_error().await;

    Json(DashboardResponse {
        snapshot: snapshot.as_deref().map(SnapshotBody::from),
        last_error: last_error.as_ref(),
    })
    .into_response()
}

/// Runs a refresh now
pub async fn refresh_dashboard(State(state): State<AppState>) -> Result<Response> {
    let refresh = state.dashboard.refresh().await?;

    Ok(Json(RefreshResponse::from(&refresh)).into_response())
}
