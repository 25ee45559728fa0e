use crate::catalog_actor::CatalogError;
use crate::clients::{CatalogClient, OrderClient};
use crate::model::MenuItemCreate;
use std::time::Duration;
use tracing::{error, info};

/// Starts, wires, and stops the actors behind the service.
///
/// # Architecture
///
/// - **Catalog Actor**: menu items. No dependencies.
/// - **Order Actor**: orders, line items, payment records. Receives the catalog client
///   as its context so checkout can price lines.
///
/// # Example
///
/// ```ignore
/// let system = OrderSystem::new(Duration::from_secs(2));
/// system.seed_catalog(items).await?;
///
/// let order_id = system.order_client.create_order(params).await?;
///
/// system.shutdown().await?;
/// ```
pub struct OrderSystem {
    /// Client for interacting with the Order actor
    pub order_client: OrderClient,

    /// Client for interacting with the Catalog actor
    pub catalog_client: CatalogClient,

    /// Task handles for all running actors (used for graceful shutdown)
    handles: Vec<tokio::task::JoinHandle<()>>,
}

impl OrderSystem {
    /// Creates both actors and spawns them. Catalog reads time out after
    /// `catalog_timeout`.
    pub fn new(catalog_timeout: Duration) -> Self {
        // 1. Create actors (no dependencies)
        let (catalog_actor, catalog_client) = crate::catalog_actor::new(catalog_timeout);
        let (order_actor, order_client) = crate::order_actor::new();

        // 2. Start actors with injected context
        let catalog_handle = tokio::spawn(catalog_actor.run(()));
        let order_handle = tokio::spawn(order_actor.run(catalog_client.clone()));

        Self {
            order_client,
            catalog_client,
            handles: vec![catalog_handle, order_handle],
        }
    }

    /// Loads the boot-time menu. Stops at the first invalid entry.
    pub async fn seed_catalog(&self, items: Vec<MenuItemCreate>) -> Result<usize, CatalogError> {
        let count = items.len();
        for item in items {
            self.catalog_client.add_item(item).await?;
        }
        info!(count, "Catalog seeded");
        Ok(count)
    }

    /// Gracefully shuts down the entire system.
    ///
    /// Dropping the clients closes the channels; each actor drains its queue and exits.
    /// Clones handed out elsewhere (the HTTP state) must be dropped first, or this waits
    /// for them.
    pub async fn shutdown(self) -> Result<(), String> {
        info!("Shutting down system...");

        // Order first: it holds a catalog client in its context.
        drop(self.order_client);
        drop(self.catalog_client);

        for handle in self.handles.into_iter().rev() {
            if let Err(e) = handle.await {
                error!("Actor task failed: {:?}", e);
                return Err(format!("Actor task failed: {:?}", e));
            }
        }

        info!("System shutdown complete.");
        Ok(())
    }
}
