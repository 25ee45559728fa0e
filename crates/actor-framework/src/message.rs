//! # Generic Messages
//!
//! This module defines the generic message types used for communication between
//! the `ResourceClient` and `ResourceActor`.

use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use tokio::sync::oneshot;

/// Type alias for the one-shot response channel used by actors.
pub type Response<T> = oneshot::Sender<Result<T, FrameworkError>>;

/// Internal message type sent to the actor to request operations.
///
/// The variants map to CRUD on a single resource type, plus `Query` for filtered reads
/// and `Action` for resource-specific logic that doesn't fit the CRUD model.
///
/// - **Create**: Uses [`ActorEntity::Create`] to initialize a new resource.
/// - **Get**: Fetches the current state of one resource by ID.
/// - **Query**: Returns every resource selected by [`ActorEntity::Query`].
/// - **Update**: Uses [`ActorEntity::Update`] to modify an existing resource.
/// - **Delete**: Removes the resource.
/// - **Action**: Executes a custom [`ActorEntity::Action`].
#[derive(Debug)]
pub enum ResourceRequest<T: ActorEntity> {
    Create {
        params: T::Create,
        respond_to: Response<T::Id>,
    },
    Get {
        id: T::Id,
        respond_to: Response<Option<T>>,
    },
    Query {
        query: T::Query,
        respond_to: Response<Vec<T>>,
    },
    Update {
        id: T::Id,
        update: T::Update,
        respond_to: Response<T>,
    },
    Delete {
        id: T::Id,
        respond_to: Response<()>,
    },
    Action {
        id: T::Id,
        action: T::Action,
        respond_to: Response<T::ActionResult>,
    },
}
