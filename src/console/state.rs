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

use std::sync::Arc;

use crate::context::Context;
use crate::dashboard::Dashboard;
use crate::theme::ThemeController;

/// Console application state
#[derive(Clone)]
pub struct AppState {
    /// Upstream Kubernetes API, used by the pass-through endpoints
    pub context: Context,
    pub dashboard: Arc<Dashboard>,
    pub theme: Arc<ThemeController>,
}

impl AppState {
    pub fn new(context: Context, dashboard: Arc<Dashboard>, theme: Arc<ThemeController>) -> Self {
        Self {
            context,
            dashboard,
            theme,
        }
    }
}
