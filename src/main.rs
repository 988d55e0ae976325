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

use clap::{Parser, Subcommand};
use metrics_console::config::{
    DEFAULT_NAMESPACE, OutputFormat, ServerArgs, UpstreamArgs, parse_namespace,
};

shadow_rs::shadow!(build);

#[derive(Parser)]
#[command(name = "metrics-console")]
#[command(about = "Kubernetes node and pod metrics console", long_about = None)]
#[command(version = build::PKG_VERSION, long_version = build::CLAP_LONG_VERSION)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the dashboard and the metrics API pass-through
    Server {
        #[command(flatten)]
        server: ServerArgs,

        #[command(flatten)]
        upstream: UpstreamArgs,
    },

    /// Fetch metrics once and print the normalized views
    Snapshot {
        #[command(flatten)]
        upstream: UpstreamArgs,

        /// Namespace whose pods are included
        #[arg(short, long, default_value = DEFAULT_NAMESPACE, value_parser = parse_namespace)]
        namespace: String,

        #[arg(short, long, value_enum, default_value_t = OutputFormat::Json)]
        output: OutputFormat,

        /// Optional output path. If not set, the output will be written to stdout.
        #[arg(short, long)]
        file: Option<String>,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Server { server, upstream } => metrics_console::run(server, upstream).await?,
        Commands::Snapshot {
            upstream,
            namespace,
            output,
            file,
        } => metrics_console::snapshot(upstream, namespace, output, file).await?,
    }

    Ok(())
}
