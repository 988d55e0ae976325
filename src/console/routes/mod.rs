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
    Router,
    routing::{get, post},
};

use crate::console::{handlers, state::AppState};

/// Pass-through routes to the metrics API
pub fn metrics_routes() -> Router<AppState> {
    Router::new()
        .route("/metrics/nodes", get(handlers::metrics::node_metrics))
        .route("/metrics/pods", get(handlers::metrics::pod_metrics))
        .route("/metrics/capacity", get(handlers::metrics::node_capacity))
}

/// Normalized dashboard routes
pub fn dashboard_routes() -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(handlers::dashboard::get_dashboard))
        .route(
            "/dashboard/refresh",
            post(handlers::dashboard::refresh_dashboard),
        )
}

/// Theme routes
pub fn theme_routes() -> Router<AppState> {
    Router::new()
        .route("/theme", get(handlers::theme::get_theme))
        .route("/theme/toggle", post(handlers::theme::toggle_theme))
}

/// HTML page and its form targets
pub fn page_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::page::index))
        .route("/refresh", post(handlers::page::refresh))
        .route("/theme/toggle", post(handlers::page::toggle_theme))
}
