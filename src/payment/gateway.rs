//! Remote payment order creation.

use super::GatewayError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info, instrument, warn};

/// Body of the gateway's create-order call. `amount` is in minor units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteOrderRequest {
    pub amount: u64,
    pub currency: String,
    pub receipt: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RemoteOrder {
    pub id: String,
    pub amount: u64,
    pub currency: String,
}

/// A processor that can open a payment order for the checkout widget.
#[async_trait]
pub trait PaymentGateway: Send + Sync {
    async fn create_order(&self, request: RemoteOrderRequest) -> Result<RemoteOrder, GatewayError>;

    /// Public key id handed to the checkout widget.
    fn key_id(&self) -> &str;
}

/// Razorpay-compatible gateway over HTTPS with basic auth.
pub struct RazorpayGateway {
    http: reqwest::Client,
    base_url: String,
    key_id: String,
    key_secret: String,
}

impl RazorpayGateway {
    pub fn new(
        base_url: impl Into<String>,
        key_id: impl Into<String>,
        key_secret: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, GatewayError> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| GatewayError::Unavailable(e.to_string()))?;
        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            key_id: key_id.into(),
            key_secret: key_secret.into(),
        })
    }
}

fn classify(e: reqwest::Error) -> GatewayError {
    if e.is_timeout() {
        GatewayError::Timeout
    } else {
        GatewayError::Unavailable(e.to_string())
    }
}

#[async_trait]
impl PaymentGateway for RazorpayGateway {
    #[instrument(skip(self))]
    async fn create_order(&self, request: RemoteOrderRequest) -> Result<RemoteOrder, GatewayError> {
        let url = format!("{}/v1/orders", self.base_url);
        debug!(%url, "Creating gateway order");

        let response = self
            .http
            .post(&url)
            .basic_auth(&self.key_id, Some(&self.key_secret))
            .json(&request)
            .send()
            .await
            .map_err(classify)?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            warn!(status = status.as_u16(), %message, "Gateway rejected order");
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let order: RemoteOrder = response
            .json()
            .await
            .map_err(|e| GatewayError::InvalidResponse(e.to_string()))?;
        info!(gateway_order_id = %order.id, amount = order.amount, "Gateway order created");
        Ok(order)
    }

    fn key_id(&self) -> &str {
        &self.key_id
    }
}
