//! # Order Actor
//!
//! Owns every order together with its line items and payment record, and is the only
//! place order state changes. Checkout pricing, the fulfilment state machine, gateway
//! order attachment, and payment confirmation all run as single steps of this actor.
//!
//! ## Structure
//!
//! - [`entity`] - [`ActorEntity`](actor_framework::ActorEntity) implementation for [`Order`]
//! - [`actions`] - [`OrderAction`] / [`OrderActionResult`]
//! - [`error`] - [`OrderError`]
//!
//! ## Dependencies
//!
//! Started with a [`CatalogClient`](crate::clients::CatalogClient) as its context:
//!
//! ```rust,ignore
//! let (order_actor, orders) = order_actor::new();
//! tokio::spawn(order_actor.run(catalog.clone()));
//! ```

pub mod actions;
pub mod entity;
pub mod error;

pub use actions::*;
pub use error::*;

use crate::clients::OrderClient;
use crate::model::{Order, OrderId};
use actor_framework::ResourceActor;

/// Creates a new Order actor and its client. Ids are random UUIDs.
pub fn new() -> (ResourceActor<Order>, OrderClient) {
    let (actor, generic_client) = ResourceActor::new(64, OrderId::random);
    let client = OrderClient::new(generic_client);

    (actor, client)
}
