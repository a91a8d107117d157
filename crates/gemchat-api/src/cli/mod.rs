//! CLI definitions for the `gemchat` binary.

pub mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Browser chat front-end backed by Gemini, with history kept in SQLite.
#[derive(Parser)]
#[command(name = "gemchat", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Suppress all output except errors.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Directory holding the database, uploads and config.toml.
    #[arg(long, global = true, env = "GEMCHAT_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the chat web server.
    Serve {
        /// Interface to bind (overrides config.toml).
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config.toml).
        #[arg(long, short)]
        port: Option<u16>,

        /// Export spans to stdout through OpenTelemetry.
        #[arg(long)]
        otel: bool,

        /// Emit logs as JSON lines.
        #[arg(long)]
        json_logs: bool,
    },
}

impl Cli {
    /// Default log filter derived from `-v` / `--quiet`.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 if self.quiet => "error",
            0 => "info",
            1 => "info,gemchat=debug,gemchat_core=debug,gemchat_infra=debug",
            _ => "trace",
        }
    }
}
