//! Orders, their line items, and the embedded payment record.
//!
//! [`Order`] implements [`ActorEntity`](actor_framework::ActorEntity); see
//! [`crate::order_actor`] for creation, the status machine, and payment confirmation.
//! Line items are owned by value, so storing or deleting an order stores or deletes
//! its items in the same step.

use crate::access::AdminIdentity;
use crate::model::{FulfillmentStatus, MenuItemId, PaymentMethod, PaymentStatus};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt::Display;
use std::str::FromStr;
use uuid::Uuid;

/// Random, non-guessable order identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OrderId(pub Uuid);

impl OrderId {
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Display for OrderId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for OrderId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Who placed the order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Owner {
    /// Signed-in customer, by identity provider user id.
    User(String),
    /// Guest checkout carrying a client-generated correlation token.
    Guest(String),
    /// Guest checkout without a token; reachable only by phone number.
    Anonymous,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// One requested line at checkout. Quantity is signed so bad input can be reported
/// as `INVALID_LINE` rather than a body parse failure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineRequest {
    pub item_id: MenuItemId,
    pub quantity: i64,
    /// Fallback image used only when the catalog has none.
    #[serde(default)]
    pub image: Option<String>,
}

/// Snapshot of a menu item at checkout time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub item_id: MenuItemId,
    pub name: String,
    pub unit_price: Decimal,
    pub quantity: u32,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentRecord {
    pub status: PaymentStatus,
    pub method: PaymentMethod,
    pub gateway_order_id: Option<String>,
    pub gateway_payment_id: Option<String>,
    pub signature_verified: bool,
    pub paid_at: Option<DateTime<Utc>>,
}

impl PaymentRecord {
    pub fn new(method: PaymentMethod) -> Self {
        Self {
            status: PaymentStatus::Pending,
            method,
            gateway_order_id: None,
            gateway_payment_id: None,
            signature_verified: false,
            paid_at: None,
        }
    }

    pub fn is_paid(&self) -> bool {
        self.status == PaymentStatus::Paid
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChangeField {
    Fulfillment,
    Payment,
    Total,
}

/// Audit entry appended on every state change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChange {
    pub at: DateTime<Utc>,
    pub field: ChangeField,
    pub from: String,
    pub to: String,
    /// Admin email, `gateway`, or `system`.
    pub by: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: OrderId,
    pub owner: Owner,
    pub customer: Customer,
    pub items: Vec<OrderItem>,
    pub total: Decimal,
    pub fulfillment_status: FulfillmentStatus,
    pub payment: PaymentRecord,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub history: Vec<StatusChange>,
    /// Checkout input awaiting catalog pricing. Drained by `on_create`.
    #[serde(skip)]
    pub(crate) pending: Option<PendingCheckout>,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct PendingCheckout {
    pub lines: Vec<(LineRequest, u32)>,
    pub client_total: Option<Decimal>,
}

impl Order {
    pub fn payment_status(&self) -> PaymentStatus {
        self.payment.status
    }

    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    pub(crate) fn record(
        &mut self,
        field: ChangeField,
        from: impl Display,
        to: impl Display,
        by: impl Into<String>,
    ) {
        let now = Utc::now();
        self.history.push(StatusChange {
            at: now,
            field,
            from: from.to_string(),
            to: to.to_string(),
            by: by.into(),
        });
        self.updated_at = now;
    }
}

/// Payload for creating a new order.
#[derive(Debug, Clone)]
pub struct OrderCreate {
    pub owner: Owner,
    pub customer: Customer,
    pub lines: Vec<LineRequest>,
    pub payment_method: PaymentMethod,
    /// Total the client computed. Never used for pricing; only compared and logged.
    pub client_total: Option<Decimal>,
}

/// Admin correction of an order's total (the actor's update payload).
#[derive(Debug, Clone)]
pub struct TotalCorrection {
    pub total: Decimal,
    pub by: AdminIdentity,
}

/// Which orders a caller may see.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderScope {
    User(String),
    Guest {
        guest_id: Option<String>,
        phone: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderQuery {
    All,
    Scope(OrderScope),
}

impl OrderScope {
    /// Whether an order with this owner and phone falls inside the scope.
    ///
    /// Guests match on their correlation token when they have one, otherwise on phone.
    /// Phone matching never reaches orders placed by a signed-in user.
    pub fn admits(&self, owner: &Owner, phone: &str) -> bool {
        match self {
            OrderScope::User(user_id) => matches!(owner, Owner::User(id) if id == user_id),
            OrderScope::Guest {
                guest_id: Some(token),
                ..
            } => matches!(owner, Owner::Guest(id) if id == token),
            OrderScope::Guest {
                guest_id: None,
                phone: Some(wanted),
            } => !matches!(owner, Owner::User(_)) && phone.trim() == wanted.trim(),
            OrderScope::Guest {
                guest_id: None,
                phone: None,
            } => false,
        }
    }
}
