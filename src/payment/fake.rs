//! In-process gateway for tests and local runs.
//!
//! Hands out `order_fake_{n}` ids, remembers every request, and can be told to fail the
//! next call. Pair it with a [`SignatureVerifier`](super::SignatureVerifier) using the
//! same secret to produce valid callbacks.

use super::{GatewayError, PaymentGateway, RemoteOrder, RemoteOrderRequest};
use async_trait::async_trait;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

pub struct FakeGateway {
    key_id: String,
    next_id: AtomicU32,
    requests: Mutex<Vec<RemoteOrderRequest>>,
    failure: Mutex<Option<GatewayError>>,
}

impl FakeGateway {
    pub fn new(key_id: impl Into<String>) -> Self {
        Self {
            key_id: key_id.into(),
            next_id: AtomicU32::new(1),
            requests: Mutex::new(Vec::new()),
            failure: Mutex::new(None),
        }
    }

    /// Makes the next `create_order` call fail with `error`.
    pub fn fail_next(&self, error: GatewayError) {
        if let Ok(mut failure) = self.failure.lock() {
            *failure = Some(error);
        }
    }

    /// Every request received so far, failed ones included.
    pub fn requests(&self) -> Vec<RemoteOrderRequest> {
        self.requests
            .lock()
            .map(|requests| requests.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl PaymentGateway for FakeGateway {
    async fn create_order(&self, request: RemoteOrderRequest) -> Result<RemoteOrder, GatewayError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(request.clone());
        }
        if let Some(error) = self.failure.lock().ok().and_then(|mut f| f.take()) {
            return Err(error);
        }

        let n = self.next_id.fetch_add(1, Ordering::SeqCst);
        Ok(RemoteOrder {
            id: format!("order_fake_{n}"),
            amount: request.amount,
            currency: request.currency,
        })
    }

    fn key_id(&self) -> &str {
        &self.key_id
    }
}
