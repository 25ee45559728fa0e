//! Error types for the Catalog actor.

use crate::error::{DomainError, ErrorKind};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur during catalog operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum CatalogError {
    /// The requested menu item was not found.
    #[error("Menu item not found: {0}")]
    NotFound(String),

    /// The menu item data provided is invalid.
    #[error("Invalid menu item: {0}")]
    InvalidItem(String),

    /// The seed file could not be read or parsed.
    #[error("Catalog seed error: {0}")]
    Seed(String),

    /// The catalog did not answer in time.
    #[error("Catalog timed out after {0:?}")]
    Timeout(Duration),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for CatalogError {
    fn from(msg: String) -> Self {
        CatalogError::ActorCommunicationError(msg)
    }
}

impl DomainError for CatalogError {
    fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::NotFound(_) => ErrorKind::NotFound,
            CatalogError::InvalidItem(_) => ErrorKind::Validation,
            CatalogError::Seed(_) => ErrorKind::Internal,
            CatalogError::Timeout(_) => ErrorKind::UpstreamTimeout,
            CatalogError::ActorCommunicationError(_) => ErrorKind::UpstreamUnavailable,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            CatalogError::InvalidItem(_) => "INVALID_MENU_ITEM",
            other => other.kind().as_str(),
        }
    }
}
