//! # Payment Gateway Adapter
//!
//! - [`gateway`] - the [`PaymentGateway`] seam and the Razorpay-compatible client
//! - [`signature`] - HMAC-SHA256 callback verification
//! - [`service`] - [`PaymentService`], which ties both to the order actor
//! - [`fake`] - in-process gateway for tests

pub mod fake;
pub mod gateway;
pub mod service;
pub mod signature;

pub use fake::FakeGateway;
pub use gateway::*;
pub use service::*;
pub use signature::*;

use crate::error::{DomainError, ErrorKind};
use crate::order_actor::OrderError;
use rust_decimal::Decimal;
use thiserror::Error;

/// Failures talking to the payment processor.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum GatewayError {
    #[error("Payment gateway unreachable: {0}")]
    Unavailable(String),

    #[error("Payment gateway timed out")]
    Timeout,

    #[error("Payment gateway rejected request ({status}): {message}")]
    Rejected { status: u16, message: String },

    #[error("Unexpected gateway response: {0}")]
    InvalidResponse(String),
}

impl DomainError for GatewayError {
    fn kind(&self) -> ErrorKind {
        match self {
            GatewayError::Timeout => ErrorKind::UpstreamTimeout,
            _ => ErrorKind::UpstreamUnavailable,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            GatewayError::Rejected { .. } => "GATEWAY_REJECTED",
            other => other.kind().as_str(),
        }
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum PaymentError {
    #[error("Payment signature is invalid")]
    InvalidSignature,

    #[error("Payment key secret is unusable")]
    InvalidKey,

    #[error("Order total {0} cannot be charged")]
    AmountOutOfRange(Decimal),

    #[error(transparent)]
    Gateway(#[from] GatewayError),

    #[error(transparent)]
    Order(#[from] OrderError),
}

impl DomainError for PaymentError {
    fn kind(&self) -> ErrorKind {
        match self {
            PaymentError::InvalidSignature => ErrorKind::InvalidSignature,
            PaymentError::InvalidKey => ErrorKind::Internal,
            PaymentError::AmountOutOfRange(_) => ErrorKind::Validation,
            PaymentError::Gateway(e) => e.kind(),
            PaymentError::Order(e) => e.kind(),
        }
    }

    fn code(&self) -> &'static str {
        match self {
            PaymentError::AmountOutOfRange(_) => "INVALID_TOTAL",
            PaymentError::Gateway(e) => e.code(),
            PaymentError::Order(e) => e.code(),
            other => other.kind().as_str(),
        }
    }
}
