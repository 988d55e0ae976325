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

use clap::{Args, ValueEnum};
use std::net::SocketAddr;
use std::path::PathBuf;

use crate::theme::Theme;

/// Connection to the Kubernetes API server.
#[derive(Args, Clone)]
pub struct UpstreamArgs {
    /// Base URL of the Kubernetes API server
    #[arg(long = "k8s-api-url", env = "K8S_API_URL")]
    pub api_url: String,

    /// Bearer token with read access to the metrics.k8s.io API group
    #[arg(long = "k8s-token", env = "K8S_TOKEN", hide_env_values = true)]
    pub token: String,

    /// PEM CA bundle for the API server. Certificate verification is disabled without it.
    #[arg(long = "k8s-ca-file", env = "K8S_CA_FILE")]
    pub ca_file: Option<PathBuf>,
}

/// Console server settings.
#[derive(Args, Clone, Debug)]
pub struct ServerArgs {
    /// Listen address
    #[arg(long, env = "CONSOLE_LISTEN", default_value = "0.0.0.0:3000")]
    pub listen: SocketAddr,

    /// Namespace whose pods the dashboard shows
    #[arg(
        long,
        env = "CONSOLE_NAMESPACE",
        default_value = DEFAULT_NAMESPACE,
        value_parser = parse_namespace
    )]
    pub namespace: String,

    /// File the selected theme is persisted to. Kept in memory if unset.
    #[arg(long, env = "CONSOLE_THEME_FILE")]
    pub theme_file: Option<PathBuf>,

    /// Theme used until one has been persisted
    #[arg(long, env = "CONSOLE_DEFAULT_THEME", default_value_t = Theme::Dark)]
    pub default_theme: Theme,

    /// Origin allowed to call the JSON API from a browser
    #[arg(long, env = "CONSOLE_ALLOWED_ORIGIN")]
    pub allowed_origin: Option<String>,
}

pub const DEFAULT_NAMESPACE: &str = "default";

/// Output format of the `snapshot` command.
#[derive(ValueEnum, Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OutputFormat {
    #[default]
    Json,
    Yaml,
}

/// Accepts RFC 1123 labels, the format Kubernetes requires for namespace names.
pub fn is_valid_namespace(ns: &str) -> bool {
    let bytes = ns.as_bytes();
    !bytes.is_empty()
        && bytes.len() <= 63
        && bytes
            .iter()
            .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || *b == b'-')
        && bytes.first() != Some(&b'-')
        && bytes.last() != Some(&b'-')
}

/// clap value parser for namespace arguments.
pub fn parse_namespace(ns: &str) -> Result<String, String> {
    if is_valid_namespace(ns) {
        Ok(ns.to_string())
    } else {
        Err(format!("'{}' is not a valid namespace name (RFC 1123 label)", ns))
    }
}
