//! Custom actions for the Order actor.
//!
//! Each action runs inside the actor's sequential loop, so checking the current state
//! and writing the new one is a single step that no other request can interleave with.

use crate::access::AdminIdentity;
use crate::model::FulfillmentStatus;
use crate::payment::VerifiedPayment;
use rust_decimal::Decimal;

#[derive(Debug, Clone)]
pub enum OrderAction {
    /// Moves fulfilment along one legal edge.
    ///
    /// `expected: None` means "whatever the status is now"; the edge table still applies.
    TransitionFulfillment {
        expected: Option<FulfillmentStatus>,
        to: FulfillmentStatus,
        by: AdminIdentity,
    },
    /// Records the gateway order created for `total`.
    AttachGatewayOrder {
        gateway_order_id: String,
        total: Decimal,
    },
    /// Marks the order paid after a verified callback.
    ConfirmPayment(VerifiedPayment),
}

/// Results from OrderActions - variants match 1:1 with OrderAction
#[derive(Debug, Clone, PartialEq)]
pub enum OrderActionResult {
    TransitionFulfillment {
        from: FulfillmentStatus,
        to: FulfillmentStatus,
        /// Counter order completed and settled in the same step.
        settled: bool,
    },
    /// The gateway order id now attached. May be an earlier one if another request
    /// attached first for the same total.
    AttachGatewayOrder(String),
    ConfirmPayment { replayed: bool },
}
