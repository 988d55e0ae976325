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
    extract::State,
    response::{Html, Redirect},
};

use crate::console::{error::Result, state::AppState, views};

/// Server-rendered dashboard page
pub async fn index(State(state): State<AppState>) -> Html<String> {
    let snapshot = state.dashboard.snapshot().await;
    let last_error = state.dashboard.last_error().await;
    let theme = state.theme.current().await;

    Html(views::render_dashboard(&views::Page {
        namespace: state.dashboard.namespace(),
        snapshot: snapshot.as_deref(),
        last_error: last_error.as_ref(),
        theme,
    }))
}

/// Refresh button target. A failure is shown on the page, not returned.
pub async fn refresh(State(state): State<AppState>) -> Redirect {
    if let Err(e) = state.dashboard.refresh().await {
        tracing::debug!("page refresh failed, shown as last error: {}", e);
    }
    Redirect::to("/")
}

/// Theme toggle target
pub async fn toggle_theme(State(state): State<AppState>) -> Result<Redirect> {
    state.theme.toggle().await?;
    Ok(Redirect::to("/"))
}
