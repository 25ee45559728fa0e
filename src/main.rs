//! Café Orders server.
//!
//! Loads [`Config`] from the environment, starts the actors, seeds the menu, and
//! serves the HTTP API until Ctrl+C or SIGTERM.

use cafe_orders::access::{
    AccessGate, AdminAllowList, IdentityProvider, RemoteIdentityProvider, StaticIdentityProvider,
};
use cafe_orders::catalog_actor::read_seed;
use cafe_orders::config::{Config, IdentitySource};
use cafe_orders::http::{self, AppState};
use cafe_orders::lifecycle::{setup_tracing, OrderSystem};
use cafe_orders::payment::{PaymentService, RazorpayGateway, SignatureVerifier};
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
#[cfg(unix)]
use tokio::signal::unix::{signal, SignalKind};
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), String> {
    // Setup tracing once for the entire application
    setup_tracing();

    let config = Config::from_env().map_err(|e| {
        error!(error = %e, "Invalid configuration");
        e.to_string()
    })?;

    let system = OrderSystem::new(config.catalog_timeout);
    if let Some(path) = &config.catalog_seed {
        let items = read_seed(path).map_err(|e| e.to_string())?;
        system.seed_catalog(items).await.map_err(|e| e.to_string())?;
    }

    let provider: Arc<dyn IdentityProvider> = match &config.identity {
        IdentitySource::Remote {
            user_url,
            api_key,
            timeout,
        } => Arc::new(
            RemoteIdentityProvider::new(user_url.clone(), api_key.clone(), *timeout)
                .map_err(|e| e.to_string())?,
        ),
        IdentitySource::TokensFile(path) => {
            Arc::new(StaticIdentityProvider::from_file(path).map_err(|e| e.to_string())?)
        }
    };
    let gate = AccessGate::new(provider, AdminAllowList::new(&config.admin_emails));

    let gateway = RazorpayGateway::new(
        config.payment.api_base.clone(),
        config.payment.key_id.clone(),
        config.payment.key_secret.clone(),
        config.payment.timeout,
    )
    .map_err(|e| e.to_string())?;
    let verifier = SignatureVerifier::new(&config.payment.key_secret).map_err(|e| e.to_string())?;
    let payments = PaymentService::new(
        system.order_client.clone(),
        Arc::new(gateway),
        verifier,
        config.currency.clone(),
    );

    let state = AppState {
        orders: system.order_client.clone(),
        catalog: system.catalog_client.clone(),
        payments,
        gate,
    };

    let address = format!("0.0.0.0:{}", config.port);
    info!("Binding to {address}");
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|e| format!("Failed to bind {address}: {e}"))?;

    // The router owns the last client clones; it is dropped when serve returns.
    http::serve(listener, state, shutdown_signal())
        .await
        .map_err(|e| e.to_string())?;

    system.shutdown().await
}

async fn shutdown_signal() {
    let ctrl_c = async {
        ctrl_c().await.expect("Failed to install Ctrl+C handler");

        info!("Received Ctrl+C, shutting down");
    };

    #[cfg(unix)]
    let terminate = async {
        signal(SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;

        info!("Received terminate signal, shutting down");
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
