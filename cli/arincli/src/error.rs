//! Error handling and display for the CLI.

use colored::Colorize;
use thiserror::Error;

use crate::model::Network;

/// CLI-specific errors.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),

    #[error("missing APIKEY in config file or environment")]
    MissingApiKey,

    #[error("Network error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The registry answered with its error envelope.
    #[error("{message}")]
    Registry {
        code: String,
        message: String,
        details: Vec<String>,
    },

    #[error("Failed to decode response: {0}")]
    Decode(String),

    /// The customer delete that follows a reassigned network delete failed.
    #[error(
        "network {} was deleted, but deleting customer {customer} failed: {source}",
        .network.handle
    )]
    Cascade {
        network: Box<Network>,
        customer: String,
        #[source]
        source: Box<CliError>,
    },

    #[error("Invalid request URL: {0}")]
    InvalidUrl(String),

    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl CliError {
    /// Create a registry error from envelope details.
    pub fn registry(
        code: impl Into<String>,
        message: impl Into<String>,
        details: Vec<String>,
    ) -> Self {
        Self::Registry {
            code: code.into(),
            message: message.into(),
            details,
        }
    }

    /// Wrap a failed customer delete that followed a successful network delete.
    pub fn cascade(network: Network, customer: impl Into<String>, source: CliError) -> Self {
        Self::Cascade {
            network: Box::new(network),
            customer: customer.into(),
            source: Box::new(source),
        }
    }
}

/// Print an error in a user-friendly format.
pub fn print_error(err: &anyhow::Error) {
    eprintln!("{} {}", "Error:".red().bold(), err);

    if let Some(cli_err) = err.downcast_ref::<CliError>() {
        match cli_err {
            CliError::MissingApiKey => {
                eprintln!(
                    "\n{}",
                    "Hint: Set `apikey` in ~/.arincli.yaml or export APIKEY.".yellow()
                );
            }
            CliError::MissingArgument(_) => {
                eprintln!(
                    "\n{}",
                    "Hint: Pass the resource handle, e.g. `arincli net show NET-1`.".yellow()
                );
            }
            CliError::Registry { code, details, .. } => {
                if !code.is_empty() {
                    eprintln!("\nCode: {}", code);
                }
                for detail in details {
                    eprintln!("  {}", detail);
                }
            }
            CliError::Cascade { .. } => {
                eprintln!(
                    "\n{}",
                    "Hint: The network is gone; delete the customer with `arincli customer delete`."
                        .yellow()
                );
            }
            CliError::Transport(_) => {
                eprintln!(
                    "\n{}",
                    "Hint: Check your network connection and registry URL.".yellow()
                );
            }
            _ => {}
        }
    }
}
