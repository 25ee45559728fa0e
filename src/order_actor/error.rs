//! Error types for the Order actor.

use crate::catalog_actor::CatalogError;
use crate::error::{DomainError, ErrorKind};
use crate::model::{FulfillmentStatus, MenuItemId};
use rust_decimal::Decimal;
use thiserror::Error;

/// Errors that can occur during order operations.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum OrderError {
    /// Checkout without any lines.
    #[error("Cart is empty")]
    EmptyCart,

    /// Name or phone missing after trimming.
    #[error("Missing contact field: {0}")]
    MissingContact(&'static str),

    /// Bad quantity, unknown item, or an unusable catalog price.
    #[error("Invalid line {item_id}: {reason}")]
    InvalidLine { item_id: MenuItemId, reason: String },

    /// Total not positive, or overflowed.
    #[error("Invalid order total")]
    InvalidTotal,

    /// The requested order was not found.
    #[error("Order not found: {0}")]
    NotFound(String),

    #[error("Cannot move order from {from} to {to}")]
    InvalidTransition {
        from: FulfillmentStatus,
        to: FulfillmentStatus,
    },

    /// Compare-and-set failed: someone moved the order first.
    #[error("Order is {actual}, expected {expected}")]
    StaleStatus {
        expected: FulfillmentStatus,
        actual: FulfillmentStatus,
    },

    #[error("Order is already paid")]
    AlreadyPaid,

    #[error("Order is cancelled")]
    OrderCancelled,

    /// Total correction on a completed or cancelled order.
    #[error("Order is closed ({0})")]
    OrderClosed(FulfillmentStatus),

    /// The verified gateway order is not the one attached to this order.
    #[error("Gateway order does not match this order")]
    GatewayOrderMismatch,

    /// The order was already paid by a different gateway payment.
    #[error("Order already paid by another payment")]
    PaymentConflict,

    /// The total changed while a gateway order was being created for it.
    #[error("Order total changed from {expected} to {actual}")]
    TotalChanged { expected: Decimal, actual: Decimal },

    /// Catalog lookup failed during checkout.
    #[error("Catalog unavailable: {0}")]
    Catalog(#[from] CatalogError),

    /// An error occurred while communicating with the actor system.
    #[error("Actor communication error: {0}")]
    ActorCommunicationError(String),
}

impl From<String> for OrderError {
    fn from(msg: String) -> Self {
        OrderError::ActorCommunicationError(msg)
    }
}

impl DomainError for OrderError {
    fn kind(&self) -> ErrorKind {
        match self {
            OrderError::EmptyCart
            | OrderError::MissingContact(_)
            | OrderError::InvalidLine { .. }
            | OrderError::InvalidTotal
            | OrderError::AlreadyPaid
            | OrderError::OrderCancelled => ErrorKind::Validation,
            OrderError::NotFound(_) => ErrorKind::NotFound,
            OrderError::InvalidTransition { .. }
            | OrderError::StaleStatus { .. }
            | OrderError::OrderClosed(_)
            | OrderError::PaymentConflict
            | OrderError::TotalChanged { .. } => ErrorKind::InvalidTransition,
            OrderError::GatewayOrderMismatch => ErrorKind::InvalidSignature,
            OrderError::Catalog(CatalogError::Timeout(_)) => ErrorKind::UpstreamTimeout,
            OrderError::Catalog(_) => ErrorKind::UpstreamUnavailable,
            OrderError::ActorCommunicationError(_) => ErrorKind::Internal,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            OrderError::EmptyCart => "EMPTY_CART",
            OrderError::MissingContact(_) => "MISSING_CONTACT",
            OrderError::InvalidLine { .. } => "INVALID_LINE",
            OrderError::InvalidTotal => "INVALID_TOTAL",
            OrderError::StaleStatus { .. } => "STALE_STATUS",
            OrderError::AlreadyPaid => "ALREADY_PAID",
            OrderError::OrderCancelled => "ORDER_CANCELLED",
            OrderError::OrderClosed(_) => "ORDER_CLOSED",
            OrderError::GatewayOrderMismatch => "GATEWAY_ORDER_MISMATCH",
            OrderError::PaymentConflict => "PAYMENT_CONFLICT",
            OrderError::TotalChanged { .. } => "TOTAL_CHANGED",
            other => other.kind().as_str(),
        }
    }
}
