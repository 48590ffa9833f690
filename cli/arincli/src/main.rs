//! arincli - CLI for the ARIN Reg-RWS provisioning API.
//!
//! Shows and deletes customers and networks. Each command makes at most
//! three sequential registry calls and keeps no state between runs.

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod client;
mod commands;
mod config;
mod error;
mod model;
mod output;
mod registry;
mod url;

use commands::Cli;

#[tokio::main]
async fn main() -> Result<()> {
    // Diagnostics go to stderr; RUST_LOG overrides the default level.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    // Ctrl-C abandons the in-flight call; finished steps stay done.
    let result = tokio::select! {
        result = cli.run() => result,
        _ = tokio::signal::ctrl_c() => Err(anyhow::anyhow!("interrupted")),
    };

    if let Err(e) = result {
        error::print_error(&e);
        std::process::exit(1);
    }

    Ok(())
}
