//! # Mock Framework & Testing Guide
//!
//! `MockClient<T>` hands out a real `ResourceClient<T>` whose requests are answered from
//! a queue of expectations instead of a running actor. It lets a test drive an actor that
//! depends on another actor (the order actor's catalog lookups, say) without spawning the
//! dependency, and inject failures such as timeouts that are awkward to provoke for real.
//!
//! | Feature | MockClient | Real Actor |
//! |---------|------------|------------|
//! | **Determinism** | Fully scripted | Subject to scheduler |
//! | **State** | None (expectations) | Real state management |
//! | **Error Injection** | `return_err` | Requires specific state |
//!
//! ## Testing Patterns
//!
//! 1. **Client logic**: wrap `mock.client()` in a typed client and assert on its results.
//! 2. **Single actor**: spawn one `ResourceActor` with `()` context.
//! 3. **Actor with mocked dependencies**: spawn the real actor with a context built from
//!    mock clients (see `tests/order_actor_test.rs` in the application crate).
//! 4. **Full system**: start every actor and drive them through their clients.
//!
//! ```rust,ignore
//! let mut catalog = MockClient::<MenuItem>::new();
//! catalog.expect_query().return_ok(vec![espresso.clone()]);
//!
//! let (order_actor, orders) = order_actor::new();
//! tokio::spawn(order_actor.run(CatalogClient::new(catalog.client())));
//! // ... create an order, then:
//! catalog.verify();
//! ```
//!
//! For step-by-step control, [`create_mock_client`] returns the receiver so the test can
//! answer each request itself with the `expect_*` helpers.

use crate::client::ResourceClient;
use crate::entity::ActorEntity;
use crate::error::FrameworkError;
use crate::message::ResourceRequest;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc;

// =============================================================================
// EXPECTATION BUILDER API
// =============================================================================

/// A scripted response for the next request of a given kind.
enum Expectation<T: ActorEntity> {
    Get {
        response: Result<Option<T>, FrameworkError>,
    },
    Create {
        response: Result<T::Id, FrameworkError>,
    },
    Query {
        response: Result<Vec<T>, FrameworkError>,
    },
    Update {
        response: Result<T, FrameworkError>,
    },
    Delete {
        response: Result<(), FrameworkError>,
    },
    Action {
        response: Result<T::ActionResult, FrameworkError>,
    },
}

type Expectations<T> = Arc<Mutex<VecDeque<Expectation<T>>>>;

/// A mock client with expectation tracking for fluent testing.
///
/// Expectations are consumed in order. A request that does not match the kind of the
/// next expectation panics the background task, which drops the response channel and
/// surfaces as `FrameworkError::ActorDropped` in the caller.
pub struct MockClient<T: ActorEntity> {
    client: ResourceClient<T>,
    expectations: Expectations<T>,
    _handle: tokio::task::JoinHandle<()>,
}

impl<T: ActorEntity> Default for MockClient<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: ActorEntity> MockClient<T> {
    /// Creates a new mock client with no expectations.
    pub fn new() -> Self {
        let (sender, mut receiver) = mpsc::channel::<ResourceRequest<T>>(100);
        let expectations: Expectations<T> = Arc::new(Mutex::new(VecDeque::new()));
        let expectations_clone = expectations.clone();

        let handle = tokio::spawn(async move {
            while let Some(request) = receiver.recv().await {
                let expectation = expectations_clone
                    .lock()
                    .expect("expectation lock poisoned")
                    .pop_front();

                match (request, expectation) {
                    (ResourceRequest::Get { respond_to, .. }, Some(Expectation::Get { response })) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Create { respond_to, .. },
                        Some(Expectation::Create { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Query { respond_to, .. },
                        Some(Expectation::Query { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Update { respond_to, .. },
                        Some(Expectation::Update { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Delete { respond_to, .. },
                        Some(Expectation::Delete { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    (
                        ResourceRequest::Action { respond_to, .. },
                        Some(Expectation::Action { response }),
                    ) => {
                        let _ = respond_to.send(response);
                    }
                    _ => {
                        panic!("Unexpected request or expectation mismatch");
                    }
                }
            }
        });

        Self {
            client: ResourceClient::new(sender),
            expectations,
            _handle: handle,
        }
    }

    /// Returns the client for use in tests.
    pub fn client(&self) -> ResourceClient<T> {
        self.client.clone()
    }

    /// Expects a `get` operation.
    pub fn expect_get(&mut self) -> ExpectationBuilder<T, Option<T>> {
        self.builder(|response| Expectation::Get { response })
    }

    /// Expects a `create` operation.
    pub fn expect_create(&mut self) -> ExpectationBuilder<T, T::Id> {
        self.builder(|response| Expectation::Create { response })
    }

    /// Expects a `query` operation.
    pub fn expect_query(&mut self) -> ExpectationBuilder<T, Vec<T>> {
        self.builder(|response| Expectation::Query { response })
    }

    /// Expects an `update` operation.
    pub fn expect_update(&mut self) -> ExpectationBuilder<T, T> {
        self.builder(|response| Expectation::Update { response })
    }

    /// Expects a `delete` operation.
    pub fn expect_delete(&mut self) -> ExpectationBuilder<T, ()> {
        self.builder(|response| Expectation::Delete { response })
    }

    /// Expects an `action` operation.
    pub fn expect_action(&mut self) -> ExpectationBuilder<T, T::ActionResult> {
        self.builder(|response| Expectation::Action { response })
    }

    fn builder<R>(
        &self,
        wrap: fn(Result<R, FrameworkError>) -> Expectation<T>,
    ) -> ExpectationBuilder<T, R> {
        ExpectationBuilder {
            wrap,
            expectations: self.expectations.clone(),
        }
    }

    /// Verifies that all expectations were met.
    pub fn verify(&self) {
        let remaining = self
            .expectations
            .lock()
            .expect("expectation lock poisoned")
            .len();
        if remaining != 0 {
            panic!("Not all expectations were met. {} remaining", remaining);
        }
    }
}

/// Builder that queues one expectation returning `R`.
pub struct ExpectationBuilder<T: ActorEntity, R> {
    wrap: fn(Result<R, FrameworkError>) -> Expectation<T>,
    expectations: Expectations<T>,
}

impl<T: ActorEntity, R> ExpectationBuilder<T, R> {
    /// Sets the expectation to return a successful result.
    pub fn return_ok(self, value: R) {
        self.push(Ok(value));
    }

    /// Sets the expectation to return an error.
    pub fn return_err(self, error: FrameworkError) {
        self.push(Err(error));
    }

    fn push(self, response: Result<R, FrameworkError>) {
        self.expectations
            .lock()
            .expect("expectation lock poisoned")
            .push_back((self.wrap)(response));
    }
}

// =============================================================================
// STEP-BY-STEP HELPERS
// =============================================================================

/// Creates a client and the receiver its requests arrive on.
///
/// The test plays the actor: it pulls each request with one of the `expect_*` helpers,
/// asserts on the payload, and answers through the returned responder.
pub fn create_mock_client<T: ActorEntity>(
    buffer_size: usize,
) -> (ResourceClient<T>, mpsc::Receiver<ResourceRequest<T>>) {
    let (sender, receiver) = mpsc::channel(buffer_size);
    (ResourceClient::new(sender), receiver)
}

/// Helper to verify that the next message is a Create request
pub async fn expect_create<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(
    T::Create,
    tokio::sync::oneshot::Sender<Result<T::Id, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(ResourceRequest::Create { params, respond_to }) => Some((params, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is a Query request
pub async fn expect_query<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(
    T::Query,
    tokio::sync::oneshot::Sender<Result<Vec<T>, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(ResourceRequest::Query { query, respond_to }) => Some((query, respond_to)),
        _ => None,
    }
}

/// Helper to verify that the next message is an Action request
pub async fn expect_action<T: ActorEntity>(
    receiver: &mut mpsc::Receiver<ResourceRequest<T>>,
) -> Option<(
    T::Id,
    T::Action,
    tokio::sync::oneshot::Sender<Result<T::ActionResult, FrameworkError>>,
)> {
    match receiver.recv().await {
        Some(ResourceRequest::Action {
            id,
            action,
            respond_to,
        }) => Some((id, action, respond_to)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::ActorEntity;
    use async_trait::async_trait;
    use std::time::Duration;

    #[derive(Clone, Debug, PartialEq)]
    struct Pastry {
        id: u32,
        name: String,
    }

    #[derive(Debug)]
    struct PastryCreate {
        name: String,
    }

    #[derive(Debug, thiserror::Error)]
    #[error("Pastry error")]
    struct PastryError;

    #[async_trait]
    impl ActorEntity for Pastry {
        type Id = u32;
        type Create = PastryCreate;
        type Update = ();
        type Query = ();
        type Action = ();
        type ActionResult = ();
        type Context = ();
        type Error = PastryError;

        fn from_create_params(id: u32, params: PastryCreate) -> Result<Self, Self::Error> {
            Ok(Self {
                id,
                name: params.name,
            })
        }

        fn matches(&self, _query: &()) -> bool {
            true
        }

        async fn on_update(&mut self, _update: (), _ctx: &()) -> Result<(), Self::Error> {
            Ok(())
        }

        async fn handle_action(&mut self, _action: (), _ctx: &()) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_mock_client() {
        let (client, mut receiver) = create_mock_client::<Pastry>(10);

        let create_task = tokio::spawn(async move {
            client
                .create(PastryCreate {
                    name: "Croissant".to_string(),
                })
                .await
        });

        let (payload, responder) = expect_create(&mut receiver)
            .await
            .expect("Expected Create request");
        assert_eq!(payload.name, "Croissant");
        responder.send(Ok(1)).unwrap();

        let result = create_task.await.unwrap();
        assert!(matches!(result, Ok(1)));
    }

    #[tokio::test]
    async fn test_mock_client_with_expectations() {
        let mut mock = MockClient::<Pastry>::new();

        mock.expect_create().return_ok(1);
        mock.expect_query().return_ok(vec![Pastry {
            id: 1,
            name: "Croissant".to_string(),
        }]);
        mock.expect_get().return_err(FrameworkError::ActorClosed);

        let client = mock.client();

        let id = client
            .create(PastryCreate {
                name: "Croissant".to_string(),
            })
            .await
            .unwrap();
        assert_eq!(id, 1);

        let all = client.query(()).await.unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all[0].name, "Croissant");

        let missing = client.get(1).await;
        assert!(matches!(missing, Err(FrameworkError::ActorClosed)));

        mock.verify();
    }

    #[tokio::test]
    async fn test_client_timeout_when_nobody_answers() {
        // Keep the receiver alive but never answer.
        let (client, _receiver) = create_mock_client::<Pastry>(10);
        let client = client.with_timeout(Duration::from_millis(20));

        let result = client.get(7).await;
        assert!(matches!(result, Err(FrameworkError::Timeout(_))));
    }
}
