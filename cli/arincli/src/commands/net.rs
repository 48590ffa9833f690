//! Network commands.

use anyhow::Result;
use clap::{Args, Subcommand};

use crate::error::CliError;
use crate::output::{deleted_report, print_info, print_resource, OutputFormat};
use crate::registry::NetworkDeletion;

use super::CommandContext;

/// Network commands.
#[derive(Debug, Args)]
pub struct NetCommand {
    #[command(subcommand)]
    command: NetSubcommand,
}

#[derive(Debug, Subcommand)]
enum NetSubcommand {
    /// Add a new network.
    Add,

    /// Show a network.
    Show(ShowNetArgs),

    /// Delete a network.
    Delete(DeleteNetArgs),
}

#[derive(Debug, Args)]
struct ShowNetArgs {
    /// Network handle.
    handle: Option<String>,
}

#[derive(Debug, Args)]
struct DeleteNetArgs {
    /// Network handle.
    handle: Option<String>,

    /// Also delete the customer if the network was reassigned.
    #[arg(long)]
    custdel: bool,
}

impl NetCommand {
    pub async fn run(self, ctx: CommandContext) -> Result<()> {
        match self.command {
            NetSubcommand::Add => {
                print_info("Adding networks is not supported yet.");
                Ok(())
            }
            NetSubcommand::Show(args) => show_network(ctx, args).await,
            NetSubcommand::Delete(args) => delete_network(ctx, args).await,
        }
    }
}

async fn show_network(ctx: CommandContext, args: ShowNetArgs) -> Result<()> {
    let network = ctx.registry.show_network(args.handle.as_deref()).await?;
    print_resource(&network, ctx.format);
    Ok(())
}

async fn delete_network(ctx: CommandContext, args: DeleteNetArgs) -> Result<()> {
    let outcome = ctx
        .registry
        .delete_network(args.handle.as_deref(), args.custdel)
        .await;

    for line in deletion_report(&outcome, ctx.verbose, ctx.format) {
        println!("{}", line);
    }
    outcome.map(|_| ()).map_err(Into::into)
}

/// Confirmations for everything a network delete removed.
fn deletion_report(
    outcome: &Result<NetworkDeletion, CliError>,
    verbose: bool,
    format: OutputFormat,
) -> Vec<String> {
    match outcome {
        Ok(deletion) => {
            let network = &deletion.network;
            let mut report = vec![deleted_report(&network.handle, network, verbose, format)];
            if let Some(customer) = &deletion.customer {
                let handle = network.customer().unwrap_or(&customer.handle);
                report.push(deleted_report(handle, customer, verbose, format));
            }
            report
        }
        // The network is gone even when the customer delete failed.
        Err(CliError::Cascade { network, .. }) => {
            vec![deleted_report(&network.handle, &**network, verbose, format)]
        }
        Err(_) => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use reqwest::Method;

    use super::*;
    use crate::client::fake::{client, FakeTransport};
    use crate::model::fixtures::{customer_xml, network_xml, ERROR_XML, TICKET_XML};
    use crate::registry::Registry;

    async fn delete(transport: &FakeTransport, handle: &str) -> Result<NetworkDeletion, CliError> {
        Registry::new(client(transport))
            .delete_network(Some(handle), true)
            .await
    }

    #[tokio::test]
    async fn test_report_lists_network_then_customer() {
        let transport = FakeTransport::new();
        transport
            .respond(Method::GET, "/rest/net/NET-1", &network_xml("NET-1", "S", "CUST-1"))
            .respond(Method::DELETE, "/rest/net/NET-1", TICKET_XML)
            .respond(Method::DELETE, "/rest/customer/CUST-1", &customer_xml("CUST-1"));

        let outcome = delete(&transport, "NET-1").await;
        let report = deletion_report(&outcome, false, OutputFormat::Text);
        assert_eq!(report.len(), 2);
        assert!(report[0].ends_with("Network NET-1 deleted"));
        assert!(report[1].ends_with("Customer CUST-1 deleted"));
    }

    #[tokio::test]
    async fn test_failed_cascade_still_reports_network() {
        let transport = FakeTransport::new();
        transport
            .respond(Method::GET, "/rest/net/NET-6", &network_xml("NET-6", "S", "CUST-6"))
            .respond(Method::DELETE, "/rest/net/NET-6", TICKET_XML)
            .respond(Method::DELETE, "/rest/customer/CUST-6", ERROR_XML);

        let outcome = delete(&transport, "NET-6").await;
        assert!(matches!(outcome, Err(CliError::Cascade { .. })));
        let report = deletion_report(&outcome, false, OutputFormat::Text);
        assert_eq!(report.len(), 1);
        assert!(report[0].ends_with("Network NET-6 deleted"));
    }

    #[tokio::test]
    async fn test_verbose_report_includes_network_summary() {
        let transport = FakeTransport::new();
        transport
            .respond(Method::GET, "/rest/net/NET-6", &network_xml("NET-6", "S", "CUST-6"))
            .respond(Method::DELETE, "/rest/net/NET-6", TICKET_XML)
            .respond(Method::DELETE, "/rest/customer/CUST-6", ERROR_XML);

        let outcome = delete(&transport, "NET-6").await;
        let report = deletion_report(&outcome, true, OutputFormat::Text);
        assert_eq!(report.len(), 1);
        assert!(report[0].contains("Network NET-6 deleted\n"));
        assert!(report[0].contains("192.0.2.0-192.0.2.255"));
    }

    #[tokio::test]
    async fn test_failed_network_delete_reports_nothing() {
        let transport = FakeTransport::new();
        transport
            .respond(Method::GET, "/rest/net/NET-5", &network_xml("NET-5", "S", "CUST-5"))
            .respond(Method::DELETE, "/rest/net/NET-5", ERROR_XML);

        let outcome = delete(&transport, "NET-5").await;
        assert!(deletion_report(&outcome, false, OutputFormat::Text).is_empty());
    }
}
