//! # Generic Actor Server
//!
//! This module defines the `ResourceActor`, the core component that manages the lifecycle
//! and state of entities. It implements the "Server" side of the Actor Model, processing
//! messages sequentially and ensuring exclusive access to the entity store.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use std::collections::HashMap;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

/// The generic actor that manages a collection of entities.
///
/// This struct is the "Server" half of the actor. It owns the state (`store`) and
/// the receiver end of the channel. Each actor processes its own messages one at a time,
/// so the store needs no `Mutex`: a read followed by a write inside one hook can never
/// interleave with another request.
///
/// # Usage Pattern
///
/// 1.  **Create**: Call `ResourceActor::new()` with a buffer size and an id generator to
///     get the `actor` (server) and `client` (interface).
/// 2.  **Wire**: Pass dependencies (other clients) into `actor.run(context)`.
/// 3.  **Run**: Spawn the actor's run loop in a background task.
///
/// ```rust,ignore
/// let (actor, client) = ResourceActor::<Order>::new(32, || OrderId::random());
/// tokio::spawn(actor.run(catalog_client));
/// ```
///
/// # Operations
///
/// * **Create**: generates an id with `next_id_fn`, calls `T::from_create_params`, then
///   `on_create`, and inserts only if both succeed.
/// * **Get**: returns a clone of the entity, or `None`.
/// * **Query**: returns clones of every entity for which `T::matches` holds.
/// * **Update**: calls `on_update` on the stored entity and returns the new state.
/// * **Delete**: calls `on_delete`, then removes the entity.
/// * **Action**: calls `handle_action` on the stored entity and returns its result.
pub struct ResourceActor<T: ActorEntity> {
    receiver: mpsc::Receiver<ResourceRequest<T>>,
    store: HashMap<T::Id, T>,
    next_id_fn: Box<dyn Fn() -> T::Id + Send + Sync>,
}

impl<T: ActorEntity> ResourceActor<T> {
    /// Creates a new `ResourceActor` and its associated `ResourceClient`.
    ///
    /// # Arguments
    ///
    /// * `buffer_size` - The capacity of the MPSC channel. If the channel is full,
    ///   calls to the client will wait until there is space.
    /// * `next_id_fn` - Produces the id for each created entity. Orders use random
    ///   UUIDs here so ids cannot be enumerated.
    pub fn new(
        buffer_size: usize,
        next_id_fn: impl Fn() -> T::Id + Send + Sync + 'static,
    ) -> (Self, ResourceClient<T>) {
        let (sender, receiver) = mpsc::channel(buffer_size);
        let actor = Self {
            receiver,
            store: HashMap::new(),
            next_id_fn: Box::new(next_id_fn),
        };
        let client = ResourceClient::new(sender);
        (actor, client)
    }

    /// Runs the actor's event loop, processing messages until every client is dropped.
    ///
    /// The `context` argument is injected into every entity hook.
    pub async fn run(mut self, context: T::Context) {
        // "Order" rather than "cafe_orders::model::order::Order"
        let entity_type = std::any::type_name::<T>()
            .split("::")
            .last()
            .unwrap_or("Unknown");
        info!(entity_type, "Actor started");

        while let Some(msg) = self.receiver.recv().await {
            match msg {
                ResourceRequest::Create { params, respond_to } => {
                    debug!(entity_type, ?params, "Create");
                    let _ = respond_to.send(self.create(params, &context, entity_type).await);
                }
                ResourceRequest::Get { id, respond_to } => {
                    let item = self.store.get(&id).cloned();
                    debug!(entity_type, %id, found = item.is_some(), "Get");
                    let _ = respond_to.send(Ok(item));
                }
                ResourceRequest::Query { query, respond_to } => {
                    let items: Vec<T> = self
                        .store
                        .values()
                        .filter(|item| item.matches(&query))
                        .cloned()
                        .collect();
                    debug!(entity_type, ?query, hits = items.len(), "Query");
                    let _ = respond_to.send(Ok(items));
                }
                ResourceRequest::Update {
                    id,
                    update,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?update, "Update");
                    let result = match self.store.get_mut(&id) {
                        Some(item) => item
                            .on_update(update, &context)
                            .await
                            .map(|()| item.clone())
                            .map_err(entity_error),
                        None => Err(FrameworkError::NotFound(id.to_string())),
                    };
                    log_outcome(entity_type, &id, "Update", &result);
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Delete { id, respond_to } => {
                    debug!(entity_type, %id, "Delete");
                    let result = self.delete(&id, &context).await;
                    log_outcome(entity_type, &id, "Delete", &result);
                    let _ = respond_to.send(result);
                }
                ResourceRequest::Action {
                    id,
                    action,
                    respond_to,
                } => {
                    debug!(entity_type, %id, ?action, "Action");
                    let result = match self.store.get_mut(&id) {
                        Some(item) => item
                            .handle_action(action, &context)
                            .await
                            .map_err(entity_error),
                        None => Err(FrameworkError::NotFound(id.to_string())),
                    };
                    log_outcome(entity_type, &id, "Action", &result);
                    let _ = respond_to.send(result);
                }
            }
        }

        info!(entity_type, size = self.store.len(), "Shutdown");
    }

    /// Builds the entity and runs `on_create`; the store is touched only when both pass.
    async fn create(
        &mut self,
        params: T::Create,
        context: &T::Context,
        entity_type: &str,
    ) -> Result<T::Id, FrameworkError> {
        let id = (self.next_id_fn)();
        let mut item = T::from_create_params(id.clone(), params).map_err(|e| {
            warn!(entity_type, error = %e, "Create rejected");
            entity_error(e)
        })?;
        item.on_create(context).await.map_err(|e| {
            warn!(entity_type, %id, error = %e, "on_create failed");
            entity_error(e)
        })?;

        self.store.insert(id.clone(), item);
        info!(entity_type, %id, size = self.store.len(), "Created");
        Ok(id)
    }

    async fn delete(&mut self, id: &T::Id, context: &T::Context) -> Result<(), FrameworkError> {
        let item = self
            .store
            .get(id)
            .ok_or_else(|| FrameworkError::NotFound(id.to_string()))?;
        item.on_delete(context).await.map_err(entity_error)?;
        self.store.remove(id);
        Ok(())
    }
}

fn entity_error<E: std::error::Error + Send + Sync + 'static>(e: E) -> FrameworkError {
    FrameworkError::EntityError(Box::new(e))
}

fn log_outcome<I: std::fmt::Display, R>(
    entity_type: &str,
    id: &I,
    op: &str,
    result: &Result<R, FrameworkError>,
) {
    match result {
        Ok(_) => info!(entity_type, %id, op, "Done"),
        Err(FrameworkError::NotFound(_)) => warn!(entity_type, %id, op, "Not found"),
        Err(e) => warn!(entity_type, %id, op, error = %e, "Failed"),
    }
}
