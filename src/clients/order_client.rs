use crate::access::AdminIdentity;
use crate::model::{FulfillmentStatus, Order, OrderCreate, OrderId, OrderQuery, TotalCorrection};
use crate::order_actor::{OrderAction, OrderActionResult, OrderError};
use crate::payment::VerifiedPayment;
use actor_framework::{ActorClient, FrameworkError, ResourceClient};
use async_trait::async_trait;
use rust_decimal::Decimal;
use tracing::{debug, instrument};

/// Client for interacting with the Order actor.
///
/// Checkout pricing happens in the Order actor's `on_create` hook; this client only
/// shapes requests and unpacks results.
#[derive(Clone)]
pub struct OrderClient {
    inner: ResourceClient<Order>,
}

impl OrderClient {
    pub fn new(inner: ResourceClient<Order>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ActorClient<Order> for OrderClient {
    type Error = OrderError;

    fn inner(&self) -> &ResourceClient<Order> {
        &self.inner
    }

    fn map_error(e: FrameworkError) -> Self::Error {
        match e.downcast_entity::<OrderError>() {
            Ok(err) => err,
            Err(FrameworkError::NotFound(id)) => OrderError::NotFound(id),
            Err(other) => OrderError::ActorCommunicationError(other.to_string()),
        }
    }
}

fn unexpected(result: OrderActionResult) -> OrderError {
    OrderError::ActorCommunicationError(format!("unexpected action result: {result:?}"))
}

impl OrderClient {
    #[instrument(skip(self, params))]
    pub async fn create_order(&self, params: OrderCreate) -> Result<OrderId, OrderError> {
        debug!("Sending request");
        self.inner.create(params).await.map_err(Self::map_error)
    }

    /// Orders selected by `query`, newest first.
    #[instrument(skip(self))]
    pub async fn list_orders(&self, query: OrderQuery) -> Result<Vec<Order>, OrderError> {
        let mut orders = self.query(query).await?;
        orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(orders)
    }

    /// Moves fulfilment to `to`. Returns whether a counter payment was settled too.
    #[instrument(skip(self, by))]
    pub async fn transition_fulfillment(
        &self,
        id: OrderId,
        expected: Option<FulfillmentStatus>,
        to: FulfillmentStatus,
        by: AdminIdentity,
    ) -> Result<bool, OrderError> {
        debug!(admin = by.email(), "Sending request");
        let action = OrderAction::TransitionFulfillment { expected, to, by };
        match self
            .inner
            .perform_action(id, action)
            .await
            .map_err(Self::map_error)?
        {
            OrderActionResult::TransitionFulfillment { settled, .. } => Ok(settled),
            other => Err(unexpected(other)),
        }
    }

    /// Attaches a gateway order created for `total`. Returns the id actually attached.
    #[instrument(skip(self))]
    pub async fn attach_gateway_order(
        &self,
        id: OrderId,
        gateway_order_id: String,
        total: Decimal,
    ) -> Result<String, OrderError> {
        debug!("Sending request");
        let action = OrderAction::AttachGatewayOrder {
            gateway_order_id,
            total,
        };
        match self
            .inner
            .perform_action(id, action)
            .await
            .map_err(Self::map_error)?
        {
            OrderActionResult::AttachGatewayOrder(attached) => Ok(attached),
            other => Err(unexpected(other)),
        }
    }

    /// Marks the order paid. Returns `true` when this callback was already applied.
    #[instrument(skip(self))]
    pub async fn confirm_payment(
        &self,
        id: OrderId,
        payment: VerifiedPayment,
    ) -> Result<bool, OrderError> {
        debug!("Sending request");
        match self
            .inner
            .perform_action(id, OrderAction::ConfirmPayment(payment))
            .await
            .map_err(Self::map_error)?
        {
            OrderActionResult::ConfirmPayment { replayed } => Ok(replayed),
            other => Err(unexpected(other)),
        }
    }

    #[instrument(skip(self, by))]
    pub async fn correct_total(
        &self,
        id: OrderId,
        total: Decimal,
        by: AdminIdentity,
    ) -> Result<Order, OrderError> {
        debug!(admin = by.email(), "Sending request");
        self.inner
            .update(id, TotalCorrection { total, by })
            .await
            .map_err(Self::map_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Customer, LineRequest, MenuItemId, Owner, PaymentMethod};
    use actor_framework::mock::{create_mock_client, expect_action, MockClient};
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    /// Collects formatted log output in memory.
    #[derive(Clone, Default)]
    struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

    impl Write for CapturedLogs {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_create_order_logs_no_customer_details() {
        let logs = CapturedLogs::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::TRACE)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let mut mock = MockClient::<Order>::new();
        let id = OrderId::random();
        mock.expect_create().return_ok(id);

        let orders = OrderClient::new(mock.client());
        let created = orders
            .create_order(OrderCreate {
                owner: Owner::Anonymous,
                customer: Customer {
                    name: "Asha Menon".into(),
                    phone: "9812345670".into(),
                    email: Some("asha@example.com".into()),
                    notes: None,
                },
                lines: vec![LineRequest {
                    item_id: MenuItemId(1),
                    quantity: 1,
                    image: None,
                }],
                payment_method: PaymentMethod::Counter,
                client_total: None,
            })
            .await
            .unwrap();
        assert_eq!(created, id);
        mock.verify();

        let output = String::from_utf8(logs.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("Sending request"));
        assert!(!output.contains("9812345670"));
        assert!(!output.contains("Asha Menon"));
        assert!(!output.contains("asha@example.com"));
    }

    #[tokio::test]
    async fn test_confirm_payment_unpacks_replay_flag() {
        let (client, mut receiver) = create_mock_client::<Order>(10);
        let orders = OrderClient::new(client);
        let id = OrderId::random();
        let payment = VerifiedPayment::for_tests("order_G1", "pay_P1");

        let task = tokio::spawn(async move { orders.confirm_payment(id, payment).await });

        let (got_id, action, responder) = expect_action(&mut receiver)
            .await
            .expect("Expected Action request");
        assert_eq!(got_id, id);
        assert!(matches!(action, OrderAction::ConfirmPayment(ref p) if p.gateway_payment_id() == "pay_P1"));
        responder
            .send(Ok(OrderActionResult::ConfirmPayment { replayed: true }))
            .unwrap();

        assert!(task.await.unwrap().unwrap());
    }

    #[tokio::test]
    async fn test_not_found_maps_to_order_error() {
        let mut mock = MockClient::<Order>::new();
        let id = OrderId::random();
        mock.expect_action()
            .return_err(FrameworkError::NotFound(id.to_string()));

        let orders = OrderClient::new(mock.client());
        let err = orders
            .attach_gateway_order(id, "order_G1".into(), Decimal::from(360))
            .await
            .unwrap_err();
        assert_eq!(err, OrderError::NotFound(id.to_string()));
        mock.verify();
    }

    #[tokio::test]
    async fn test_mismatched_result_is_reported() {
        let mut mock = MockClient::<Order>::new();
        mock.expect_action()
            .return_ok(OrderActionResult::AttachGatewayOrder("order_G1".into()));

        let orders = OrderClient::new(mock.client());
        let err = orders
            .confirm_payment(OrderId::random(), VerifiedPayment::for_tests("order_G1", "pay_P1"))
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::ActorCommunicationError(_)));
    }
}
