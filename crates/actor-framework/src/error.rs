//! # Framework Errors
//!
//! This module defines the common error types used throughout the actor framework.
//! Entity errors travel across the channel boxed; typed clients get them back with
//! [`FrameworkError::downcast_entity`] so callers can still match on their own enums.

use std::time::Duration;

/// Errors that can occur within the actor framework itself.
#[derive(Debug, thiserror::Error)]
pub enum FrameworkError {
    #[error("Actor closed")]
    ActorClosed,
    #[error("Actor dropped response channel")]
    ActorDropped,
    #[error("Item not found: {0}")]
    NotFound(String),
    #[error("Request timed out after {0:?}")]
    Timeout(Duration),
    #[error("Entity error: {0}")]
    EntityError(Box<dyn std::error::Error + Send + Sync>),
}

impl FrameworkError {
    /// Recovers the concrete entity error `E` carried by an [`FrameworkError::EntityError`].
    ///
    /// Returns the original error unchanged when it is not an entity error or when the
    /// boxed error is of a different type.
    pub fn downcast_entity<E>(self) -> Result<E, FrameworkError>
    where
        E: std::error::Error + 'static,
    {
        match self {
            FrameworkError::EntityError(err) => match err.downcast::<E>() {
                Ok(concrete) => Ok(*concrete),
                Err(err) => Err(FrameworkError::EntityError(err)),
            },
            other => Err(other),
        }
    }

    /// True for failures where the request may not have reached the actor at all.
    pub fn is_transient(&self) -> bool {
        matches!(self, FrameworkError::Timeout(_) | FrameworkError::ActorDropped)
    }
}
