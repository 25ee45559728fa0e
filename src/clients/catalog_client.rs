//! # Catalog Client
//!
//! High-level API for the catalog actor. Reads are bounded by the client timeout and,
//! being idempotent, retried once after a short backoff.
use crate::catalog_actor::CatalogError;
use crate::model::{CatalogQuery, MenuItem, MenuItemCreate, MenuItemId};
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Pause before the single retry of a failed catalog read.
pub const READ_RETRY_BACKOFF: Duration = Duration::from_millis(100);

/// Client for interacting with the Catalog actor.
#[derive(Clone)]
pub struct CatalogClient {
    inner: ResourceClient<MenuItem>,
}

impl CatalogClient {
    pub fn new(inner: ResourceClient<MenuItem>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<MenuItem> for CatalogClient {
    type Error = CatalogError;

    fn inner(&self) -> &ResourceClient<MenuItem> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.downcast_entity::<CatalogError>() {
            Ok(err) => err,
            Err(FrameworkError::Timeout(limit)) => CatalogError::Timeout(limit),
            Err(FrameworkError::NotFound(id)) => CatalogError::NotFound(id),
            Err(other) => CatalogError::ActorCommunicationError(other.to_string()),
        }
    }
}

impl CatalogClient {
    #[instrument(skip(self))]
    pub async fn add_item(&self, params: MenuItemCreate) -> Result<MenuItemId, CatalogError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    /// The whole menu, ordered by item id.
    #[instrument(skip(self))]
    pub async fn list_items(&self) -> Result<Vec<MenuItem>, CatalogError> {
        let mut items = self.read(CatalogQuery::All).await?;
        items.sort_by_key(|item| item.id);
        Ok(items)
    }

    /// The items among `ids` that exist. Unknown ids are simply absent from the result.
    #[instrument(skip(self))]
    pub async fn get_items_by_ids(
        &self,
        ids: Vec<MenuItemId>,
    ) -> Result<Vec<MenuItem>, CatalogError> {
        self.read(CatalogQuery::Ids(ids)).await
    }

    async fn read(&self, query: CatalogQuery) -> Result<Vec<MenuItem>, CatalogError> {
        debug!("Sending request");
        match self.inner.query(query.clone()).await {
            Err(e) if e.is_transient() => {
                warn!(error = %e, "Catalog read failed, retrying once");
                tokio::time::sleep(READ_RETRY_BACKOFF).await;
                self.inner.query(query).await.map_err(Self::map_error)
            }
            other => other.map_err(Self::map_error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Category;
    use actor_framework::mock::{create_mock_client, expect_query, MockClient};
    use rust_decimal::Decimal;

    fn espresso() -> MenuItem {
        MenuItem::new(
            MenuItemId(1),
            "Espresso",
            Decimal::from(180),
            Category::new("coffee"),
            None,
        )
    }

    #[tokio::test]
    async fn test_get_items_by_ids_sends_id_query() {
        let (client, mut receiver) = create_mock_client::<MenuItem>(10);
        let catalog = CatalogClient::new(client);

        let task =
            tokio::spawn(async move { catalog.get_items_by_ids(vec![MenuItemId(1)]).await });

        let (query, responder) = expect_query(&mut receiver)
            .await
            .expect("Expected Query request");
        assert_eq!(query, CatalogQuery::Ids(vec![MenuItemId(1)]));
        responder.send(Ok(vec![espresso()])).unwrap();

        let items = task.await.unwrap().unwrap();
        assert_eq!(items, vec![espresso()]);
    }

    #[tokio::test]
    async fn test_timeout_is_retried_once() {
        let mut mock = MockClient::<MenuItem>::new();
        mock.expect_query()
            .return_err(FrameworkError::Timeout(Duration::from_millis(5)));
        mock.expect_query().return_ok(vec![espresso()]);

        let catalog = CatalogClient::new(mock.client());
        let items = catalog.list_items().await.unwrap();
        assert_eq!(items.len(), 1);
        mock.verify();
    }

    #[tokio::test]
    async fn test_second_timeout_surfaces_as_timeout() {
        let mut mock = MockClient::<MenuItem>::new();
        let limit = Duration::from_millis(5);
        mock.expect_query().return_err(FrameworkError::Timeout(limit));
        mock.expect_query().return_err(FrameworkError::Timeout(limit));

        let catalog = CatalogClient::new(mock.client());
        let err = catalog.list_items().await.unwrap_err();
        assert_eq!(err, CatalogError::Timeout(limit));
        mock.verify();
    }

    #[tokio::test]
    async fn test_entity_errors_keep_their_type() {
        let mut mock = MockClient::<MenuItem>::new();
        mock.expect_create()
            .return_err(FrameworkError::EntityError(Box::new(
                CatalogError::InvalidItem("name is empty".into()),
            )));

        let catalog = CatalogClient::new(mock.client());
        let err = catalog
            .add_item(MenuItemCreate {
                name: " ".into(),
                price: Decimal::ONE,
                category: Category::new("coffee"),
                image: None,
            })
            .await
            .unwrap_err();
        assert_eq!(err, CatalogError::InvalidItem("name is empty".into()));
    }
}
