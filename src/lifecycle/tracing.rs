//! # Observability & Tracing
//!
//! [`setup_tracing`] installs the global subscriber once, at process start.
//!
//! - **Structured logging** with the `tracing` crate
//! - **Configurable log levels** via the `RUST_LOG` environment variable
//! - **Compact format** without module paths (`with_target(false)`); actors log an
//!   `entity_type` field instead
//!
//! ## Usage Examples
//!
//! ```bash
//! # Lifecycle, created orders, status changes, payments
//! RUST_LOG=info cargo run
//!
//! # Every actor request with its payload
//! RUST_LOG=debug cargo run
//!
//! # Quiet the HTTP clients
//! RUST_LOG=debug,hyper=info,reqwest=info cargo run
//! ```
//!
//! ## What Gets Logged
//!
//! **With `RUST_LOG=info`**, a counter checkout followed by an admin completing it:
//!
//! ```text
//! INFO Actor started entity_type="MenuItem"
//! INFO Actor started entity_type="Order"
//! INFO Catalog seeded count=6
//! INFO Order priced order_id=6f1c… total=360 lines=1
//! INFO Created entity_type="Order" id=6f1c… size=1
//! INFO Fulfilment status changed order_id=6f1c… from=ready to=completed by="staff@cafe.example" settled=true
//! ```
//!
//! **At `warn`** the things worth a look: client totals that disagree with the catalog,
//! rejected payment signatures, gateway failures, and catalog retries.
pub fn setup_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false) // Don't show module paths - we use entity_type instead
        .compact() // Compact format shows spans inline (e.g., "create_order: ...")
        .init();
}
