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
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use snafu::Snafu;

use crate::{context, dashboard, theme};

/// Console API error type
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    #[snafu(display("Bad request: {}", message))]
    BadRequest { message: String },

    #[snafu(transparent)]
    Upstream { source: context::Error },

    #[snafu(transparent)]
    Refresh { source: dashboard::Error },

    #[snafu(transparent)]
    Theme { source: theme::Error },
}

/// Error envelope of every JSON endpoint: `{"error": "<message>"}`
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl Error {
    pub fn status(&self) -> StatusCode {
        match self {
            Error::BadRequest { .. } => StatusCode::BAD_REQUEST,
            Error::Upstream { .. } | Error::Refresh { .. } | Error::Theme { .. } => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!("{}", self);
        }

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}

/// Result type for Console API
pub type Result<T> = std::result::Result<T, Error>;
