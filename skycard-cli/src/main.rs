//! Binary crate for the `skycard` command-line tool.
//!
//! This crate focuses on:
//! - Parsing CLI arguments
//! - Interactive configuration
//! - Rendering weather cards as terminal text

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod render;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let cmd = cli::Cli::parse();
    cmd.run().await
}

/// Logs go to stderr so the rendered cards on stdout stay clean.
fn init_tracing() {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("skycard_core=warn,skycard_cli=warn"));
    let json_logs = std::env::var("SKYCARD_LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    let builder = tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr);

    if json_logs {
        builder.with_target(false).json().init();
    } else {
        builder.init();
    }
}
