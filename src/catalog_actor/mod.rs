//! # Catalog Actor
//!
//! Owns the menu. From the order core's point of view it is a read-only store: orders
//! list it and price lines against it, nothing else writes after boot.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](actor_framework::ActorEntity) implementation for [`MenuItem`]
//! - [`error`] - [`CatalogError`]
//! - [`new()`] - Factory function that creates the actor and client
//! - [`read_seed()`] - Loads the boot-time menu from a JSON file
//!
//! ## Usage
//!
//! ```rust
//! use cafe_orders::catalog_actor;
//! use cafe_orders::model::{Category, MenuItemCreate};
//! use rust_decimal::Decimal;
//! use std::time::Duration;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let (actor, catalog) = catalog_actor::new(Duration::from_secs(2));
//!     tokio::spawn(actor.run(()));
//!
//!     catalog
//!         .add_item(MenuItemCreate {
//!             name: "Espresso".into(),
//!             price: Decimal::from(180),
//!             category: Category::new("coffee"),
//!             image: None,
//!         })
//!         .await?;
//!     assert_eq!(catalog.list_items().await?.len(), 1);
//!     Ok(())
//! }
//! ```

pub mod entity;
pub mod error;

pub use error::*;

use crate::clients::CatalogClient;
use crate::model::{MenuItem, MenuItemCreate, MenuItemId};
use actor_framework::ResourceActor;
use std::path::Path;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// Creates a new Catalog actor and its client.
///
/// Reads through the client give up after `read_timeout`.
pub fn new(read_timeout: Duration) -> (ResourceActor<MenuItem>, CatalogClient) {
    let item_id_counter = Arc::new(AtomicU32::new(1));
    let next_item_id = move || MenuItemId(item_id_counter.fetch_add(1, Ordering::SeqCst));

    let (actor, generic_client) = ResourceActor::new(32, next_item_id);
    let client = CatalogClient::new(generic_client.with_timeout(read_timeout));

    (actor, client)
}

/// Reads a JSON array of [`MenuItemCreate`] entries.
pub fn read_seed(path: &Path) -> Result<Vec<MenuItemCreate>, CatalogError> {
    let raw = std::fs::read_to_string(path)
        .map_err(|e| CatalogError::Seed(format!("{}: {e}", path.display())))?;
    serde_json::from_str(&raw).map_err(|e| CatalogError::Seed(format!("{}: {e}", path.display())))
}
