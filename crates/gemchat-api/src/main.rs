//! gemchat entry point.
//!
//! Binary name: `gemchat`
//!
//! Parses CLI arguments, installs tracing, loads `config.toml` from the data
//! directory and starts the web server.

mod cli;
mod http;
mod state;

use clap::Parser;

use gemchat_infra::config::load_app_config;
use gemchat_infra::filesystem::resolve_data_dir;
use gemchat_observe::tracing_setup::{TracingOptions, init_tracing, shutdown_tracing};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let log_filter = cli.log_filter();

    let Commands::Serve {
        host,
        port,
        otel,
        json_logs,
    } = cli.command;

    init_tracing(&TracingOptions {
        default_filter: log_filter.to_string(),
        enable_otel: otel,
        json: json_logs,
    })
    .map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let data_dir = cli.data_dir.unwrap_or_else(resolve_data_dir);
    let mut config = load_app_config(&data_dir).await;
    if let Some(host) = host {
        config.server.host = host;
    }
    if let Some(port) = port {
        config.server.port = port;
    }

    let result = cli::serve::serve(data_dir, config).await;
    shutdown_tracing();
    result
}
