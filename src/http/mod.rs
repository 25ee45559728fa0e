//! # HTTP Surface
//!
//! JSON over axum. Handlers hold no state of their own: everything lives in the actors
//! behind the cloneable clients in [`AppState`].
//!
//! Every failure is an [`ApiError`] with body `{error, kind, message, orderId?}`.

pub mod error;
pub mod extract;
pub mod handlers;

pub use error::ApiError;

use crate::access::AccessGate;
use crate::clients::{CatalogClient, OrderClient};
use crate::payment::PaymentService;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE};
use axum::http::Method;
use axum::routing::{get, patch, post};
use axum::Router;
use std::future::Future;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tracing::info;

#[derive(Clone)]
pub struct AppState {
    pub orders: OrderClient,
    pub catalog: CatalogClient,
    pub payments: PaymentService,
    pub gate: AccessGate,
}

pub fn router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([CONTENT_TYPE, AUTHORIZATION])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/menu", get(handlers::menu))
        .route("/orders", post(handlers::create_order).get(handlers::list_orders))
        .route("/orders/:id", get(handlers::get_order))
        .route("/orders/:id/status", patch(handlers::update_status))
        .route("/payments/create", post(handlers::create_payment))
        .route("/payments/verify", post(handlers::verify_payment))
        .route("/admin/orders", get(handlers::admin_list_orders))
        .route(
            "/admin/orders/:id",
            get(handlers::admin_get_order).delete(handlers::admin_delete_order),
        )
        .route("/admin/orders/:id/total", patch(handlers::admin_correct_total))
        .layer(cors)
        .with_state(state)
}

/// Serves until `shutdown` resolves, then lets in-flight requests finish.
pub async fn serve<F>(listener: TcpListener, state: AppState, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    if let Ok(address) = listener.local_addr() {
        info!("Server running on {address}");
    }
    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown)
        .await
}
