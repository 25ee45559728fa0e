//! Checkout payments: opening a gateway order for a stored order and applying the
//! signed callback.

use super::{PaymentCallback, PaymentError, PaymentGateway, RemoteOrderRequest, SignatureVerifier};
use crate::clients::OrderClient;
use crate::model::money::to_minor_units;
use crate::model::{FulfillmentStatus, OrderId};
use crate::order_actor::OrderError;
use actor_framework::ActorClient;
use serde::Serialize;
use std::sync::Arc;
use tracing::{info, instrument, warn};

/// What the checkout widget needs to collect a payment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutSession {
    pub gateway_order_id: String,
    /// Minor units.
    pub amount: u64,
    pub currency: String,
    #[serde(rename = "key")]
    pub key_id: String,
}

#[derive(Clone)]
pub struct PaymentService {
    orders: OrderClient,
    gateway: Arc<dyn PaymentGateway>,
    verifier: SignatureVerifier,
    currency: String,
}

impl PaymentService {
    pub fn new(
        orders: OrderClient,
        gateway: Arc<dyn PaymentGateway>,
        verifier: SignatureVerifier,
        currency: impl Into<String>,
    ) -> Self {
        Self {
            orders,
            gateway,
            verifier,
            currency: currency.into(),
        }
    }

    /// Opens (or reuses) the gateway order for `order_id`.
    ///
    /// The amount always comes from the stored order total. Gateway failures leave the
    /// order untouched and are never retried here.
    #[instrument(skip(self))]
    pub async fn create_remote_order(
        &self,
        order_id: OrderId,
    ) -> Result<CheckoutSession, PaymentError> {
        let order = self
            .orders
            .get(order_id)
            .await?
            .ok_or_else(|| OrderError::NotFound(order_id.to_string()))?;
        if order.payment.is_paid() {
            return Err(OrderError::AlreadyPaid.into());
        }
        if order.fulfillment_status == FulfillmentStatus::Cancelled {
            return Err(OrderError::OrderCancelled.into());
        }

        let amount = to_minor_units(order.total)
            .filter(|&minor| minor > 0)
            .ok_or(PaymentError::AmountOutOfRange(order.total))?;
        let session = |gateway_order_id: String| CheckoutSession {
            gateway_order_id,
            amount,
            currency: self.currency.clone(),
            key_id: self.gateway.key_id().to_string(),
        };

        if let Some(existing) = order.payment.gateway_order_id {
            info!(%order_id, gateway_order_id = %existing, "Reusing gateway order");
            return Ok(session(existing));
        }

        let request = RemoteOrderRequest {
            amount,
            currency: self.currency.clone(),
            receipt: order_id.to_string(),
        };
        let remote = self.gateway.create_order(request).await.map_err(|e| {
            warn!(%order_id, error = %e, "Gateway order creation failed");
            e
        })?;
        if remote.amount != amount {
            return Err(super::GatewayError::InvalidResponse(format!(
                "gateway amount {} differs from requested {amount}",
                remote.amount
            ))
            .into());
        }

        let attached = self
            .orders
            .attach_gateway_order(order_id, remote.id, order.total)
            .await?;
        Ok(session(attached))
    }

    /// Verifies the callback and marks the order paid.
    ///
    /// Returns `true` when the same payment had already been applied.
    #[instrument(skip(self, callback), fields(gateway_order_id = %callback.gateway_order_id))]
    pub async fn verify_payment(
        &self,
        order_id: OrderId,
        callback: PaymentCallback,
    ) -> Result<bool, PaymentError> {
        let verified = self.verifier.verify(&callback).map_err(|e| {
            warn!(%order_id, "Rejected payment signature");
            e
        })?;
        let replayed = self.orders.confirm_payment(order_id, verified).await?;
        if replayed {
            info!(%order_id, "Payment callback replayed");
        }
        Ok(replayed)
    }
}
