//! [`ActorEntity`] implementation for [`Order`].
//!
//! Checkout is split across the two creation hooks:
//!
//! 1. `from_create_params` runs the checks that need no I/O, in the order callers see
//!    them: empty cart, missing contact, bad quantity.
//! 2. `on_create` prices every line from the catalog (the `Context`) and computes the
//!    total. The client's own total is never used.
//!
//! The actor stores the order only if both succeed, so a rejected checkout leaves
//! nothing behind.

use super::{OrderAction, OrderActionResult, OrderError};
use crate::clients::CatalogClient;
use crate::model::money::{is_whole_minor_units, line_total};
use crate::model::{
    ChangeField, Customer, FulfillmentStatus, MenuItem, MenuItemId, Order, OrderCreate,
    OrderId, OrderItem, OrderQuery, PaymentMethod, PaymentRecord, PaymentStatus,
    PendingCheckout, TotalCorrection,
};
use crate::payment::VerifiedPayment;
use actor_framework::ActorEntity;
use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use std::collections::HashMap;
use tracing::{info, warn};

/// Audit actor for payment confirmations.
const GATEWAY: &str = "gateway";

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn clean_customer(customer: Customer) -> Result<Customer, OrderError> {
    let name = customer.name.trim().to_string();
    if name.is_empty() {
        return Err(OrderError::MissingContact("name"));
    }
    let phone = customer.phone.trim().to_string();
    if phone.is_empty() {
        return Err(OrderError::MissingContact("phone"));
    }
    Ok(Customer {
        name,
        phone,
        email: non_empty(customer.email),
        notes: non_empty(customer.notes),
    })
}

impl Order {
    fn transition(
        &mut self,
        expected: Option<FulfillmentStatus>,
        to: FulfillmentStatus,
        by: &str,
    ) -> Result<OrderActionResult, OrderError> {
        let from = self.fulfillment_status;
        if let Some(expected) = expected {
            if expected != from {
                return Err(OrderError::StaleStatus {
                    expected,
                    actual: from,
                });
            }
        }
        if !from.can_transition_to(to) {
            return Err(OrderError::InvalidTransition { from, to });
        }

        self.fulfillment_status = to;
        self.record(ChangeField::Fulfillment, from, to, by);

        let settled = to == FulfillmentStatus::Completed
            && self.payment.method == PaymentMethod::Counter
            && !self.payment.is_paid();
        if settled {
            self.payment.status = PaymentStatus::Paid;
            self.payment.paid_at = Some(Utc::now());
            self.record(ChangeField::Payment, PaymentStatus::Pending, PaymentStatus::Paid, by);
        }

        info!(order_id = %self.id, %from, %to, by, settled, "Fulfilment status changed");
        Ok(OrderActionResult::TransitionFulfillment { from, to, settled })
    }

    fn attach_gateway_order(
        &mut self,
        gateway_order_id: String,
        total: Decimal,
    ) -> Result<OrderActionResult, OrderError> {
        if self.payment.is_paid() {
            return Err(OrderError::AlreadyPaid);
        }
        if self.fulfillment_status == FulfillmentStatus::Cancelled {
            return Err(OrderError::OrderCancelled);
        }
        if self.total != total {
            return Err(OrderError::TotalChanged {
                expected: total,
                actual: self.total,
            });
        }
        if let Some(existing) = &self.payment.gateway_order_id {
            return Ok(OrderActionResult::AttachGatewayOrder(existing.clone()));
        }

        info!(order_id = %self.id, %gateway_order_id, "Gateway order attached");
        self.payment.gateway_order_id = Some(gateway_order_id.clone());
        self.updated_at = Utc::now();
        Ok(OrderActionResult::AttachGatewayOrder(gateway_order_id))
    }

    fn confirm_payment(&mut self, payment: VerifiedPayment) -> Result<OrderActionResult, OrderError> {
        if self.payment.gateway_order_id.as_deref() != Some(payment.gateway_order_id()) {
            warn!(order_id = %self.id, gateway_order_id = payment.gateway_order_id(), "Gateway order mismatch");
            return Err(OrderError::GatewayOrderMismatch);
        }
        if self.payment.is_paid() {
            return if self.payment.gateway_payment_id.as_deref() == Some(payment.gateway_payment_id()) {
                Ok(OrderActionResult::ConfirmPayment { replayed: true })
            } else {
                warn!(order_id = %self.id, gateway_payment_id = payment.gateway_payment_id(), "Second payment for paid order");
                Err(OrderError::PaymentConflict)
            };
        }

        if self.fulfillment_status == FulfillmentStatus::Cancelled {
            warn!(order_id = %self.id, "Payment captured for cancelled order");
        }
        self.payment.status = PaymentStatus::Paid;
        self.payment.method = PaymentMethod::Online;
        self.payment.gateway_payment_id = Some(payment.gateway_payment_id().to_string());
        self.payment.signature_verified = true;
        self.payment.paid_at = Some(Utc::now());
        self.record(
            ChangeField::Payment,
            PaymentStatus::Pending,
            PaymentStatus::Paid,
            GATEWAY,
        );
        info!(order_id = %self.id, gateway_payment_id = payment.gateway_payment_id(), "Payment confirmed");
        Ok(OrderActionResult::ConfirmPayment { replayed: false })
    }
}

#[async_trait]
impl ActorEntity for Order {
    type Id = OrderId;
    type Create = OrderCreate;
    type Update = TotalCorrection;
    type Query = OrderQuery;
    type Action = OrderAction;
    type ActionResult = OrderActionResult;
    type Context = CatalogClient;
    type Error = OrderError;

    fn from_create_params(id: OrderId, params: OrderCreate) -> Result<Self, Self::Error> {
        if params.lines.is_empty() {
            return Err(OrderError::EmptyCart);
        }
        let customer = clean_customer(params.customer)?;

        let mut lines = Vec::with_capacity(params.lines.len());
        for line in params.lines {
            let quantity = u32::try_from(line.quantity)
                .ok()
                .filter(|&q| q > 0)
                .ok_or_else(|| OrderError::InvalidLine {
                    item_id: line.item_id,
                    reason: format!("quantity must be at least 1, got {}", line.quantity),
                })?;
            lines.push((line, quantity));
        }

        let now = Utc::now();
        Ok(Self {
            id,
            owner: params.owner,
            customer,
            items: Vec::new(),
            total: Decimal::ZERO,
            fulfillment_status: FulfillmentStatus::Pending,
            payment: PaymentRecord::new(params.payment_method),
            created_at: now,
            updated_at: now,
            history: Vec::new(),
            pending: Some(PendingCheckout {
                lines,
                client_total: params.client_total,
            }),
        })
    }

    fn matches(&self, query: &OrderQuery) -> bool {
        match query {
            OrderQuery::All => true,
            OrderQuery::Scope(scope) => scope.admits(&self.owner, &self.customer.phone),
        }
    }

    /// Prices the order from the catalog.
    async fn on_create(&mut self, catalog: &CatalogClient) -> Result<(), Self::Error> {
        let Some(pending) = self.pending.take() else {
            return Err(OrderError::EmptyCart);
        };

        let mut ids: Vec<MenuItemId> = pending.lines.iter().map(|(line, _)| line.item_id).collect();
        ids.sort();
        ids.dedup();
        let priced: HashMap<MenuItemId, MenuItem> = catalog
            .get_items_by_ids(ids)
            .await?
            .into_iter()
            .map(|item| (item.id, item))
            .collect();

        let mut total = Decimal::ZERO;
        let mut items = Vec::with_capacity(pending.lines.len());
        for (line, quantity) in pending.lines {
            let item = priced.get(&line.item_id).ok_or_else(|| OrderError::InvalidLine {
                item_id: line.item_id,
                reason: "not on the menu".into(),
            })?;
            if item.price <= Decimal::ZERO || !is_whole_minor_units(item.price) {
                return Err(OrderError::InvalidLine {
                    item_id: line.item_id,
                    reason: format!("catalog price {} is not a valid amount", item.price),
                });
            }
            total = line_total(item.price, quantity)
                .and_then(|amount| total.checked_add(amount))
                .ok_or(OrderError::InvalidTotal)?;
            items.push(OrderItem {
                item_id: item.id,
                name: item.name.clone(),
                unit_price: item.price,
                quantity,
                image: item.image.clone().or(line.image),
            });
        }
        if total <= Decimal::ZERO {
            return Err(OrderError::InvalidTotal);
        }

        if let Some(client_total) = pending.client_total {
            if client_total != total {
                warn!(order_id = %self.id, %client_total, %total, "Client total ignored");
            }
        }

        self.items = items;
        self.total = total;
        info!(order_id = %self.id, %total, lines = self.items.len(), "Order priced");
        Ok(())
    }

    /// Admin total correction. Detaches any gateway order, whose amount no longer matches.
    async fn on_update(
        &mut self,
        correction: TotalCorrection,
        _ctx: &CatalogClient,
    ) -> Result<(), Self::Error> {
        if self.payment.is_paid() {
            return Err(OrderError::AlreadyPaid);
        }
        if self.fulfillment_status.is_terminal() {
            return Err(OrderError::OrderClosed(self.fulfillment_status));
        }
        if correction.total <= Decimal::ZERO || !is_whole_minor_units(correction.total) {
            return Err(OrderError::InvalidTotal);
        }

        let previous = self.total;
        self.total = correction.total;
        self.payment.gateway_order_id = None;
        self.record(ChangeField::Total, previous, correction.total, correction.by.email());
        info!(order_id = %self.id, %previous, total = %self.total, by = correction.by.email(), "Total corrected");
        Ok(())
    }

    async fn on_delete(&self, _ctx: &CatalogClient) -> Result<(), Self::Error> {
        info!(order_id = %self.id, items = self.items.len(), "Deleting order with its items");
        Ok(())
    }

    async fn handle_action(
        &mut self,
        action: OrderAction,
        _ctx: &CatalogClient,
    ) -> Result<OrderActionResult, Self::Error> {
        match action {
            OrderAction::TransitionFulfillment { expected, to, by } => {
                self.transition(expected, to, by.email())
            }
            OrderAction::AttachGatewayOrder {
                gateway_order_id,
                total,
            } => self.attach_gateway_order(gateway_order_id, total),
            OrderAction::ConfirmPayment(payment) => self.confirm_payment(payment),
        }
    }
}
