//! Customer and network workflows.

use tracing::{debug, info, warn};

use crate::client::RegistryClient;
use crate::error::CliError;
use crate::model::{Customer, Network};

/// Result of a network delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NetworkDeletion {
    /// The network as it was before deletion.
    pub network: Network,

    /// Customer removed along with the network, if any.
    pub customer: Option<Customer>,
}

/// Show/delete operations against the registry.
pub struct Registry {
    client: RegistryClient,
}

impl Registry {
    pub fn new(client: RegistryClient) -> Self {
        Self { client }
    }

    pub async fn show_customer(&self, handle: Option<&str>) -> Result<Customer, CliError> {
        let handle = require_handle(handle)?;
        let url = self.client.resource_url::<Customer>(handle)?;
        self.client.get(url).await
    }

    /// Delete a customer; the registry echoes the removed record.
    pub async fn delete_customer(&self, handle: Option<&str>) -> Result<Customer, CliError> {
        let handle = require_handle(handle)?;
        let url = self.client.resource_url::<Customer>(handle)?;
        let customer = self.client.delete(url).await?;
        info!(handle, "customer deleted");
        Ok(customer)
    }

    pub async fn show_network(&self, handle: Option<&str>) -> Result<Network, CliError> {
        let handle = require_handle(handle)?;
        let url = self.client.resource_url::<Network>(handle)?;
        self.client.get(url).await
    }

    /// Delete a network, and with `cascade_customer` also the customer it
    /// was reassigned to.
    ///
    /// The network is fetched first: the delete answers with a ticket, and
    /// the record can't be read once it is gone. The customer is deleted
    /// only when the snapshot names one and its first block is reassigned
    /// (`S`). If that last step fails the network stays deleted and the
    /// failure comes back as [`CliError::Cascade`].
    pub async fn delete_network(
        &self,
        handle: Option<&str>,
        cascade_customer: bool,
    ) -> Result<NetworkDeletion, CliError> {
        let handle = require_handle(handle)?;
        let url = self.client.resource_url::<Network>(handle)?;

        let network: Network = self.client.get(url.clone()).await?;
        self.client.delete_discarding(url).await?;
        info!(handle, "network deleted");

        let target = network
            .cascade_customer()
            .filter(|_| cascade_customer)
            .map(str::to_string);
        let Some(target) = target else {
            if cascade_customer {
                debug!(handle, "network is not a reassignment; customer left in place");
            }
            return Ok(NetworkDeletion {
                network,
                customer: None,
            });
        };

        match self.delete_customer(Some(target.as_str())).await {
            Ok(customer) => Ok(NetworkDeletion {
                network,
                customer: Some(customer),
            }),
            Err(e) => {
                warn!(
                    handle,
                    customer = %target,
                    error = %e,
                    "customer delete failed after network delete"
                );
                Err(CliError::cascade(network, target, e))
            }
        }
    }
}

/// The handle argument, rejecting a missing or blank one.
fn require_handle(handle: Option<&str>) -> Result<&str, CliError> {
    match handle.map(str::trim) {
        Some(handle) if !handle.is_empty() => Ok(handle),
        _ => Err(CliError::MissingArgument("handle")),
    }
}
