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

use std::pin::Pin;
use std::sync::Arc;
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing_subscriber::EnvFilter;

use crate::config::{OutputFormat, ServerArgs, UpstreamArgs};
use crate::context::Context;
use crate::dashboard::Dashboard;

pub mod config;
pub mod console;
pub mod context;
pub mod dashboard;
pub mod normalize;
pub mod theme;
pub mod types;
pub mod utils;


fn init_tracing() {
    // stdout is reserved for `snapshot` output
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .with_level(true)
        .with_file(true)
        .with_line_number(true)
        .with_target(true)
        .init();

    if !utils::tls::install_crypto_provider() {
        tracing::debug!("a rustls crypto provider was already installed");
    }
}

/// Runs the console server until it fails.
pub async fn run(server: ServerArgs, upstream: UpstreamArgs) -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();
    console::server::run(server, upstream).await
}

/// Runs one refresh and writes the normalized snapshot to `file`, or stdout.
pub async fn snapshot(
    upstream: UpstreamArgs,
    namespace: String,
    format: OutputFormat,
    file: Option<String>,
) -> Result<(), Box<dyn std::error::Error>> {
    init_tracing();

    let context = Context::connect(&upstream).await?;
    let dashboard = Dashboard::new(Arc::new(context), namespace);
    let refresh = dashboard.refresh().await?;

    let body = match format {
        OutputFormat::Json => serde_json::to_string_pretty(&*refresh.snapshot)? + "\n",
        OutputFormat::Yaml => serde_yaml_ng::to_string(&*refresh.snapshot)?,
    };

    let mut writer: Pin<Box<dyn AsyncWrite + Send>> = if let Some(file) = file {
        Box::pin(
            tokio::fs::OpenOptions::new()
                .create(true)
                .truncate(true)
                .write(true)
                .open(file)
                .await?,
        )
    } else {
        Box::pin(tokio::io::stdout())
    };

    writer.write_all(body.as_bytes()).await?;
    writer.flush().await?;

    Ok(())
}
