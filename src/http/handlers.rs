use super::extract::{Admin, ApiJson};
use super::{ApiError, AppState};
use crate::access::{Caller, GuestKeys};
use crate::model::{
    Customer, FulfillmentStatus, LineRequest, Order, OrderCreate, OrderId, OrderQuery,
    PaymentMethod, PaymentStatus,
};
use crate::payment::{CheckoutSession, PaymentCallback};
use actor_framework::{ActorClient, ActorEntity};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::{info, warn};

type ApiResult<T> = Result<T, ApiError>;

fn parse_order_id(raw: &str) -> ApiResult<OrderId> {
    raw.parse().map_err(|_| ApiError::not_found(format!("Order {raw}")))
}

fn parse_status(field: &'static str, raw: &str) -> ApiResult<FulfillmentStatus> {
    raw.parse()
        .map_err(|_| ApiError::bad_request("UNKNOWN_STATUS", format!("{field}: unknown status {raw:?}")))
}

pub async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

pub async fn menu(State(state): State<AppState>) -> ApiResult<Json<Value>> {
    let items = state.catalog.list_items().await?;
    Ok(Json(json!({ "items": items })))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default, alias = "lines")]
    pub items: Vec<LineRequest>,
    #[serde(default = "default_payment_method")]
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub total: Option<Decimal>,
    #[serde(default)]
    pub guest_id: Option<String>,
}

fn default_payment_method() -> PaymentMethod {
    PaymentMethod::Counter
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatedOrder {
    pub order_id: OrderId,
    pub total: Decimal,
    pub status: FulfillmentStatus,
    pub payment_status: PaymentStatus,
}

pub async fn create_order(
    State(state): State<AppState>,
    caller: Caller,
    ApiJson(body): ApiJson<CreateOrderRequest>,
) -> ApiResult<impl IntoResponse> {
    let guest = GuestKeys::new(body.guest_id, Some(body.phone.clone()));
    let params = OrderCreate {
        owner: caller.owner(&guest),
        customer: Customer {
            name: body.name,
            phone: body.phone,
            email: body.email,
            notes: body.notes,
        },
        lines: body.items,
        payment_method: body.payment_method,
        client_total: body.total,
    };

    let order_id = state.orders.create_order(params).await?;
    let order = state
        .orders
        .get(order_id)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Order {order_id}")))?;

    let created = CreatedOrder {
        order_id,
        total: order.total,
        status: order.fulfillment_status,
        payment_status: order.payment_status(),
    };
    Ok((StatusCode::CREATED, Json(created)))
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuestParams {
    pub guest_id: Option<String>,
    pub phone: Option<String>,
}

impl From<GuestParams> for GuestKeys {
    fn from(params: GuestParams) -> Self {
        GuestKeys::new(params.guest_id, params.phone)
    }
}

pub async fn list_orders(
    State(state): State<AppState>,
    caller: Caller,
    Query(guest): Query<GuestParams>,
) -> ApiResult<Json<Value>> {
    let orders = state.orders.list_orders(caller.order_query(guest.into())).await?;
    Ok(Json(json!({ "orders": orders })))
}

/// Loads an order the caller may see. Anything outside their scope reads as missing.
async fn visible_order(state: &AppState, query: &OrderQuery, raw_id: &str) -> ApiResult<Order> {
    let id = parse_order_id(raw_id)?;
    state
        .orders
        .get(id)
        .await?
        .filter(|order| order.matches(query))
        .ok_or_else(|| ApiError::not_found(format!("Order {id}")))
}

pub async fn get_order(
    State(state): State<AppState>,
    caller: Caller,
    Path(id): Path<String>,
    Query(guest): Query<GuestParams>,
) -> ApiResult<Json<Order>> {
    let query = caller.order_query(guest.into());
    Ok(Json(visible_order(&state, &query, &id).await?))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePaymentRequest {
    pub order_id: String,
}

pub async fn create_payment(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<CreatePaymentRequest>,
) -> ApiResult<Json<CheckoutSession>> {
    let order_id = parse_order_id(&body.order_id)?;
    let session = state.payments.create_remote_order(order_id).await?;
    Ok(Json(session))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyPaymentRequest {
    pub order_id: String,
    #[serde(alias = "razorpay_order_id")]
    pub gateway_order_id: String,
    #[serde(alias = "razorpay_payment_id")]
    pub gateway_payment_id: String,
    #[serde(alias = "razorpay_signature")]
    pub signature: String,
}

pub async fn verify_payment(
    State(state): State<AppState>,
    ApiJson(body): ApiJson<VerifyPaymentRequest>,
) -> ApiResult<Json<Value>> {
    let order_id = parse_order_id(&body.order_id)?;
    let callback = PaymentCallback {
        gateway_order_id: body.gateway_order_id,
        gateway_payment_id: body.gateway_payment_id,
        signature: body.signature,
    };

    match state.payments.verify_payment(order_id, callback).await {
        Ok(replayed) => Ok(Json(json!({ "success": true, "replayed": replayed }))),
        Err(e) => {
            warn!(%order_id, error = %e, "Payment verification failed");
            Err(ApiError::from(e).for_order(order_id))
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusChangeRequest {
    pub status: String,
    #[serde(default)]
    pub expected_status: Option<String>,
}

pub async fn update_status(
    State(state): State<AppState>,
    Admin(admin): Admin,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<StatusChangeRequest>,
) -> ApiResult<Json<Value>> {
    let id = parse_order_id(&id)?;
    let to = parse_status("status", &body.status)?;
    let expected = body
        .expected_status
        .as_deref()
        .map(|raw| parse_status("expectedStatus", raw))
        .transpose()?;

    let settled = state
        .orders
        .transition_fulfillment(id, expected, to, admin)
        .await?;
    Ok(Json(json!({ "success": true, "settled": settled })))
}

pub async fn admin_list_orders(
    State(state): State<AppState>,
    Admin(_): Admin,
) -> ApiResult<Json<Value>> {
    let orders = state.orders.list_orders(OrderQuery::All).await?;
    Ok(Json(json!({ "orders": orders })))
}

pub async fn admin_get_order(
    State(state): State<AppState>,
    Admin(_): Admin,
    Path(id): Path<String>,
) -> ApiResult<Json<Order>> {
    Ok(Json(visible_order(&state, &OrderQuery::All, &id).await?))
}

#[derive(Debug, Deserialize)]
pub struct TotalCorrectionRequest {
    pub total: Decimal,
}

pub async fn admin_correct_total(
    State(state): State<AppState>,
    Admin(admin): Admin,
    Path(id): Path<String>,
    ApiJson(body): ApiJson<TotalCorrectionRequest>,
) -> ApiResult<Json<Order>> {
    let id = parse_order_id(&id)?;
    let order = state.orders.correct_total(id, body.total, admin).await?;
    Ok(Json(order))
}

pub async fn admin_delete_order(
    State(state): State<AppState>,
    Admin(admin): Admin,
    Path(id): Path<String>,
) -> ApiResult<StatusCode> {
    let id = parse_order_id(&id)?;
    state.orders.delete(id).await?;
    info!(order_id = %id, admin = admin.email(), "Order deleted");
    Ok(StatusCode::NO_CONTENT)
}
