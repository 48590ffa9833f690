//! Customer commands.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::output::{print_deleted, print_info, print_resource};

use super::CommandContext;

/// Customer commands.
#[derive(Debug, Args)]
pub struct CustomerCommand {
    #[command(subcommand)]
    command: CustomerSubcommand,
}

#[derive(Debug, Subcommand)]
enum CustomerSubcommand {
    /// Add a new customer.
    Add,

    /// Show a customer.
    Show(HandleArgs),

    /// Delete a customer.
    Delete(HandleArgs),
}

#[derive(Debug, Args)]
struct HandleArgs {
    /// Customer handle.
    handle: Option<String>,
}

impl CustomerCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            CustomerSubcommand::Add => {
                print_info("Adding customers is not supported yet.");
                Ok(())
            }
            CustomerSubcommand::Show(args) => show_customer(ctx, args).await,
            CustomerSubcommand::Delete(args) => delete_customer(ctx, args).await,
        }
    }
}

async fn show_customer(ctx: CommandContext, args: HandleArgs) -> Result<()> {
    let customer = ctx.registry.show_customer(args.handle.as_deref()).await?;
    print_resource(&customer, ctx.format);
    Ok(())
}

async fn delete_customer(ctx: CommandContext, args: HandleArgs) -> Result<()> {
    let customer = ctx.registry.delete_customer(args.handle.as_deref()).await?;
    print_deleted(&customer.handle, &customer, ctx.verbose, ctx.format);
    Ok(())
}
