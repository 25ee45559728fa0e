//! # ActorClient Trait
//!
//! Provides a common interface for resource‑specific clients, adding default `get`,
//! `query` and `delete` methods built on top of a generic `ResourceClient`.
use crate::{ActorEntity, FrameworkError, ResourceClient};
use async_trait::async_trait;

/// Trait for resource-specific clients to inherit standard read/delete operations.
///
/// # Example
///
/// ```rust,ignore
/// #[derive(Clone)]
/// pub struct CatalogClient {
///     inner: ResourceClient<MenuItem>,
/// }
///
/// #[async_trait]
/// impl ActorClient<MenuItem> for CatalogClient {
///     type Error = CatalogError;
///
///     fn inner(&self) -> &ResourceClient<MenuItem> {
///         &self.inner
///     }
///
///     fn map_error(e: FrameworkError) -> Self::Error {
///         match e.downcast_entity::<CatalogError>() {
///             Ok(err) => err,
///             Err(other) => CatalogError::ActorCommunicationError(other.to_string()),
///         }
///     }
/// }
///
/// // get(), query() and delete() are now available on CatalogClient.
/// ```
#[async_trait]
pub trait ActorClient<T: ActorEntity>: Send + Sync {
    /// The resource-specific error type.
    type Error: From<String> + Send + Sync;

    /// Access the inner generic ResourceClient.
    fn inner(&self) -> &ResourceClient<T>;

    /// Map framework errors to the specific resource error type.
    fn map_error(e: FrameworkError) -> Self::Error;

    /// Fetch an entity by ID.
    #[tracing::instrument(skip(self))]
    async fn get(&self, id: T::Id) -> Result<Option<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().get(id).await.map_err(Self::map_error)
    }

    /// Fetch every entity selected by `query`.
    #[tracing::instrument(skip(self))]
    async fn query(&self, query: T::Query) -> Result<Vec<T>, Self::Error> {
        tracing::debug!("Sending request");
        self.inner().query(query).await.map_err(Self::map_error)
    }

    /// Delete an entity by ID.
    #[tracing::instrument(skip(self))]
    async fn delete(&self, id: T::Id) -> Result<(), Self::Error> {
        tracing::debug!("Sending request");
        self.inner().delete(id).await.map_err(Self::map_error)
    }
}
