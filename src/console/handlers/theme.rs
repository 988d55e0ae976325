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

use axum::{Json, extract::State};

use crate::console::{error::Result, models::theme::ThemeResponse, state::AppState};

pub async fn get_theme(State(state): State<AppState>) -> Json<ThemeResponse> {
    Json(ThemeResponse {
        theme: state.theme.current().await,
    })
}

pub async fn toggle_theme(State(state): State<AppState>) -> Result<Json<ThemeResponse>> {
    let theme = state.theme.toggle().await?;
    Ok(Json(ThemeResponse { theme }))
}
