//! CLI commands.

mod customer;
mod net;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::debug;

use crate::client::RegistryClient;
use crate::config::Config;
use crate::output::OutputFormat;
use crate::registry::Registry;

/// arincli - manage customers and networks through ARIN Reg-RWS.
#[derive(Debug, Parser)]
#[command(name = "arincli")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Config file (default is $HOME/.arincli.yaml).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Show the raw body of every REST call on stderr.
    #[arg(long, global = true)]
    dump: bool,

    /// Show verbose output.
    #[arg(short = 'v', long = "verbose", global = true)]
    verbose: bool,

    /// Print resources as XML instead of a summary.
    #[arg(long, global = true)]
    xml: bool,

    /// Registry base URL (overrides `baseurl` from config).
    #[arg(long, global = true)]
    url: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Manage customers (add, delete, show).
    Customer(customer::CustomerCommand),

    /// Manage networks (add, delete, show).
    Net(net::NetCommand),

    /// Show CLI version.
    Version,
}

impl Cli {
    /// Run the CLI command.
    pub async fn run(self) -> Result<()> {
        let format = if self.xml {
            OutputFormat::Xml
        } else {
            OutputFormat::Text
        };

        let mut config = Config::load(self.config.as_deref())?;
        config.dump = self.dump;
        config.verbose = self.verbose;
        if let Some(url) = self.url {
            config.base_url = url;
        }
        if let Some(source) = config.source.as_deref() {
            debug!(path = %source.display(), "using config file");
            if config.verbose {
                eprintln!("Using config file: {}", source.display());
            }
        }

        match self.command {
            Commands::Customer(cmd) => cmd.run(CommandContext::new(config, format)?).await,
            Commands::Net(cmd) => cmd.run(CommandContext::new(config, format)?).await,
            Commands::Version => {
                println!("arincli {}", env!("CARGO_PKG_VERSION"));
                Ok(())
            }
        }
    }
}

/// Shared command context.
pub struct CommandContext {
    pub registry: Registry,
    pub format: OutputFormat,
    pub verbose: bool,
}

impl CommandContext {
    /// Build the registry client; fails before any call when no API key is
    /// configured.
    pub fn new(config: Config, format: OutputFormat) -> Result<Self> {
        config.require_api_key()?;
        let client = RegistryClient::new(&config)?;
        Ok(Self {
            registry: Registry::new(client),
            format,
            verbose: config.verbose,
        })
    }
}
