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

use axum::{extract::State, http::StatusCode, response::IntoResponse};

use crate::console::state::AppState;

/// Liveness check
pub async fn health_check() -> impl IntoResponse {
    (StatusCode::OK, "OK")
}

/// Ready once the first snapshot has been published
pub async fn ready_check(State(state): State<AppState>) -> impl IntoResponse {
    if state.dashboard.snapshot().await.is_some() {
        (StatusCode::OK, "Ready")
    } else {
        (StatusCode::SERVICE_UNAVAILABLE, "Waiting for first refresh")
    }
}
