//! # ActorEntity Trait
//!
//! The `ActorEntity` trait defines the contract that every resource (menu item, order, …)
//! must implement to be managed by the generic `ResourceActor`. It specifies associated
//! types for IDs, DTOs, queries, actions, context, and errors, and provides lifecycle hooks
//! (`on_create`, `on_update`, `on_delete`, `handle_action`).
//!
//! # Provided Methods (Hooks)
//! - [`ActorEntity::on_create`]
//! - [`ActorEntity::on_delete`]
//!
//! The default implementations do nothing (`Ok(())`).

use async_trait::async_trait;
use std::fmt::{Debug, Display};
use std::hash::Hash;

/// Trait that any resource entity must implement to be managed by ResourceActor.
///
/// # Async & Context
/// Hooks are `#[async_trait]` so they can call other actors. The `Context` type is
/// injected into every hook at `run()` time ("late binding"), which is how the order
/// actor reaches the catalog without either side knowing about the other at construction.
///
/// # Atomic create
/// The actor inserts an entity only after both `from_create_params` and `on_create`
/// succeed. Anything the entity owns by value (an order's line items, say) becomes visible
/// to readers in the same step, or not at all.
#[async_trait]
pub trait ActorEntity: Clone + Send + Sync + 'static {
    /// The unique identifier for this entity. Generated by the actor's id function.
    type Id: Eq + Hash + Clone + Send + Sync + Display + Debug;

    /// The data required to create a new instance.
    type Create: Send + Sync + Debug;

    /// The data required to update an existing instance.
    type Update: Send + Sync + Debug;

    /// Filter used by `Query` requests to select a subset of the store.
    type Query: Send + Sync + Debug;

    /// Enum representing resource-specific operations (e.g., `TransitionFulfillment`).
    type Action: Send + Sync + Debug;

    /// The result type returned by custom actions.
    type ActionResult: Send + Sync + Debug;

    /// The runtime context (dependencies) injected into the actor.
    /// Use `()` if no dependencies are needed.
    type Context: Send + Sync;

    /// The error type for this entity.
    ///
    /// One enum per actor rather than one per message. Clients deal with a single error
    /// type, at the cost of every operation's signature admitting every variant.
    type Error: std::error::Error + Send + Sync + 'static;

    /// Construct the full Entity from the ID and Payload.
    /// This is called synchronously before `on_create`.
    fn from_create_params(id: Self::Id, params: Self::Create) -> Result<Self, Self::Error>;

    /// Whether this entity is selected by `query`.
    fn matches(&self, query: &Self::Query) -> bool;

    // --- Lifecycle Hooks (Async) ---

    /// Called after construction and before the entity is stored.
    /// Returning an error aborts the create; nothing is inserted.
    async fn on_create(&mut self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    /// Called when an update request is received.
    async fn on_update(
        &mut self,
        update: Self::Update,
        _ctx: &Self::Context,
    ) -> Result<(), Self::Error>;

    /// Called immediately before the entity is removed from the system.
    async fn on_delete(&self, _ctx: &Self::Context) -> Result<(), Self::Error> {
        Ok(())
    }

    // --- Action Handler (Async) ---

    /// Handle a custom resource-specific action.
    ///
    /// Actions run inside the actor's sequential loop, so a check of the current state
    /// followed by a write is a single atomic step (compare-and-set).
    async fn handle_action(
        &mut self,
        action: Self::Action,
        _ctx: &Self::Context,
    ) -> Result<Self::ActionResult, Self::Error>;
}
