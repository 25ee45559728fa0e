//! Process wiring: actor startup and shutdown, and the tracing subscriber.

pub mod order_system;
pub mod tracing;

pub use order_system::OrderSystem;
pub use self::tracing::setup_tracing;
