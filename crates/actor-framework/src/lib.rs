//! # Actor Framework
//!
//! This crate provides the building blocks for type-safe, concurrent actor systems. It
//! implements a **Resource-Oriented Architecture (ROA)** on top of the **Actor Model**:
//! each resource type (menu item, order) gets one actor that owns every instance of it,
//! and everything else talks to that actor through a cloneable client.
//!
//! ## Architecture Overview
//!
//! 1. **Entity Layer** ([`ActorEntity`]) - domain model, validation, and lifecycle hooks
//! 2. **Runtime Layer** ([`ResourceActor`]) - message processing and the entity store
//! 3. **Interface Layer** ([`ResourceClient`], [`ActorClient`]) - type-safe communication
//!
//! Business logic is written once in the entity; the framework handles message passing,
//! error transport, and state ownership.
//!
//! ## Example
//!
//! ```rust
//! use actor_framework::{ActorEntity, ResourceActor};
//! use async_trait::async_trait;
//! use std::sync::atomic::{AtomicU32, Ordering};
//!
//! #[derive(Clone, Debug)]
//! struct Table {
//!     id: u32,
//!     seats: u8,
//! }
//!
//! #[derive(Debug)] struct TableCreate { seats: u8 }
//! #[derive(Debug)] struct MinSeats(u8);
//! #[derive(Debug)] struct TableError;
//!
//! impl std::fmt::Display for TableError {
//!     fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result { write!(f, "table error") }
//! }
//! impl std::error::Error for TableError {}
//!
//! #[async_trait]
//! impl ActorEntity for Table {
//!     type Id = u32;
//!     type Create = TableCreate;
//!     type Update = u8;
//!     type Query = MinSeats;
//!     type Action = ();
//!     type ActionResult = ();
//!     type Context = ();
//!     type Error = TableError;
//!
//!     fn from_create_params(id: u32, params: TableCreate) -> Result<Self, Self::Error> {
//!         Ok(Self { id, seats: params.seats })
//!     }
//!
//!     fn matches(&self, query: &MinSeats) -> bool {
//!         self.seats >= query.0
//!     }
//!
//!     async fn on_update(&mut self, seats: u8, _ctx: &()) -> Result<(), Self::Error> {
//!         self.seats = seats;
//!         Ok(())
//!     }
//!
//!     async fn handle_action(&mut self, _: (), _: &()) -> Result<(), Self::Error> {
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() {
//!     let counter = AtomicU32::new(1);
//!     let (actor, client) =
//!         ResourceActor::<Table>::new(10, move || counter.fetch_add(1, Ordering::Relaxed));
//!     tokio::spawn(actor.run(()));
//!
//!     client.create(TableCreate { seats: 2 }).await.unwrap();
//!     client.create(TableCreate { seats: 6 }).await.unwrap();
//!
//!     let big = client.query(MinSeats(4)).await.unwrap();
//!     assert_eq!(big.len(), 1);
//!     assert_eq!(big[0].seats, 6);
//! }
//! ```
//!
//! ## Context Injection Pattern
//!
//! Dependencies are injected at **runtime** via `run(context)`, not at construction time.
//! The order actor is started with the catalog's client as its context, so order creation
//! can price line items without the catalog knowing orders exist.
//!
//! ## Concurrency Model
//!
//! - Each actor runs in its own Tokio task
//! - Messages are processed **sequentially** within an actor, so a read-check-write inside
//!   one hook is atomic with respect to every other request for that resource type
//! - Different actors run in parallel
//! - No shared mutable state between actors
//!
//! ## Testing
//!
//! [`mock::MockClient`] hands out a real `ResourceClient<T>` answered from scripted
//! expectations. See the [`mock`] module.

pub mod actor;
pub mod client;
pub mod client_trait;
pub mod entity;
pub mod error;
pub mod message;
pub mod mock;

// Re-export core types for convenience
pub use actor::ResourceActor;
pub use client::ResourceClient;
pub use client_trait::ActorClient;
pub use entity::ActorEntity;
pub use error::FrameworkError;
pub use message::{ResourceRequest, Response};
