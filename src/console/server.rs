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

use axum::Router;
use axum::http::{HeaderValue, Method, header};
use axum::routing::get;
use std::sync::Arc;
use tower_http::{compression::CompressionLayer, cors::CorsLayer, trace::TraceLayer};

use crate::config::{ServerArgs, UpstreamArgs};
use crate::console::{handlers, routes, state::AppState};
use crate::context::Context;
use crate::dashboard::Dashboard;
use crate::theme::{FileStore, MemoryStore, ThemeController, ThemeStore};

/// Builds the console application
pub fn app(state: AppState, allowed_origin: Option<HeaderValue>) -> Router {
    let app = Router::new()
        .route("/healthz", get(handlers::health::health_check))
        .route("/readyz", get(handlers::health::ready_check))
        .merge(routes::page_routes())
        .nest("/api", api_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new());

    match allowed_origin {
        Some(origin) => app.layer(
            CorsLayer::new()
                .allow_origin(origin)
                .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
                .allow_headers([header::CONTENT_TYPE]),
        ),
        None => app,
    }
}

/// API route composition
fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(routes::metrics_routes())
        .merge(routes::dashboard_routes())
        .merge(routes::theme_routes())
}

/// Starts the console HTTP server
pub async fn run(server: ServerArgs, upstream: UpstreamArgs) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Starting metrics console on {}", server.listen);

    let allowed_origin = server
        .allowed_origin
        .as_deref()
        .map(HeaderValue::from_str)
        .transpose()?;

    let context = Context::connect(&upstream).await?;
    let dashboard = Arc::new(Dashboard::new(
        Arc::new(context.clone()),
        server.namespace.clone(),
    ));

    let store: Arc<dyn ThemeStore> = match &server.theme_file {
        Some(path) => Arc::new(FileStore::new(path)),
        None => Arc::new(MemoryStore::default()),
    };
    let theme = Arc::new(ThemeController::load(store, server.default_theme));

    // initial load; the page shows a failure until the next manual refresh
    tokio::spawn({
        let dashboard = dashboard.clone();
        async move {
            if let Err(e) = dashboard.refresh().await {
                tracing::warn!("initial refresh failed: {}", e);
            }
        }
    });

    let app = app(AppState::new(context, dashboard, theme), allowed_origin);
    let listener = tokio::net::TcpListener::bind(server.listen).await?;

    tracing::info!("Console server listening on http://{}", server.listen);
    tracing::info!("API endpoints:");
    tracing::info!("  - GET  /api/metrics/nodes");
    tracing::info!("  - GET  /api/metrics/pods?namespace=<ns>");
    tracing::info!("  - GET  /api/metrics/capacity");
    tracing::info!("  - GET  /api/dashboard");
    tracing::info!("  - POST /api/dashboard/refresh");
    tracing::info!("  - GET  /healthz");

    axum::serve(listener, app).await?;

    Ok(())
}
