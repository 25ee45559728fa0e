//! Order status fields and the legal fulfilment edges.
//!
//! Fulfilment and payment are tracked separately: an order can be `ready` but unpaid
//! (counter orders) or `paid` but still `pending` (online orders waiting for the kitchen).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Where the order is in the kitchen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FulfillmentStatus {
    Pending,
    Preparing,
    Ready,
    Completed,
    Cancelled,
}

impl FulfillmentStatus {
    /// Every state reachable in one step from `self`.
    pub fn next_states(&self) -> &'static [FulfillmentStatus] {
        use FulfillmentStatus::*;
        match self {
            Pending => &[Preparing, Ready, Cancelled],
            Preparing => &[Ready, Cancelled],
            Ready => &[Completed, Cancelled],
            Completed | Cancelled => &[],
        }
    }

    pub fn can_transition_to(&self, next: FulfillmentStatus) -> bool {
        self.next_states().contains(&next)
    }

    pub fn is_terminal(&self) -> bool {
        self.next_states().is_empty()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            FulfillmentStatus::Pending => "pending",
            FulfillmentStatus::Preparing => "preparing",
            FulfillmentStatus::Ready => "ready",
            FulfillmentStatus::Completed => "completed",
            FulfillmentStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for FulfillmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Unknown status: {0}")]
pub struct UnknownStatus(pub String);

impl FromStr for FulfillmentStatus {
    type Err = UnknownStatus;

    /// Case-insensitive, so admin tools sending `PREPARING` keep working.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(FulfillmentStatus::Pending),
            "preparing" => Ok(FulfillmentStatus::Preparing),
            "ready" => Ok(FulfillmentStatus::Ready),
            "completed" => Ok(FulfillmentStatus::Completed),
            "cancelled" | "canceled" => Ok(FulfillmentStatus::Cancelled),
            _ => Err(UnknownStatus(s.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentStatus {
    Pending,
    Paid,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Paid => "paid",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    Online,
    Counter,
}
