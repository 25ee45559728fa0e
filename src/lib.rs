//! # Café Orders
//!
//! > **Order intake, payments and fulfilment for a small café, built on resource actors.**
//!
//! Customers browse the menu, check out as a guest or a signed-in user, and pay online
//! or at the counter. Staff on the admin allow-list move orders through preparation.
//!
//! ## 🏗️ Design
//!
//! All mutable state lives in two actors built on [`actor_framework`]:
//! - the **catalog actor** holds menu items;
//! - the **order actor** holds orders, their line items and their payment record.
//!
//! Each actor processes one message at a time, so every order mutation (pricing a
//! checkout, a compare-and-set status change, applying a verified payment) is a single
//! sequential step. HTTP handlers only hold cloneable clients.
//!
//! Privileged operations are typed: a status change needs an
//! [`AdminIdentity`](access::AdminIdentity), which only the [`AccessGate`](access::AccessGate)
//! can produce, and marking an order paid needs a
//! [`VerifiedPayment`](payment::VerifiedPayment), which only the signature verifier can
//! produce.
//!
//! ## 🗺️ Module Tour
//!
//! ### 1. The Domain ([`model`], [`error`])
//! Menu items, orders, the two status fields and their edge table, money helpers, and
//! the client-side [`Cart`](model::Cart).
//!
//! ### 2. The Actors ([`catalog_actor`], [`order_actor`])
//! `ActorEntity` implementations. Checkout pricing happens in the order actor's
//! `on_create`, which reads current prices from the catalog actor.
//!
//! ### 3. The Interface ([`clients`])
//! [`CatalogClient`](clients::CatalogClient) and [`OrderClient`](clients::OrderClient)
//! wrap the generic `ResourceClient` and recover typed errors across the actor boundary.
//!
//! ### 4. The Edges ([`payment`], [`access`], [`http`])
//! The payment gateway adapter, bearer-token identity with the admin allow-list, and
//! the axum router.
//!
//! ### 5. The Orchestrator ([`lifecycle`], [`config`])
//! Configuration from the environment, tracing setup, actor startup and shutdown.
//!
//! ## 🚀 Quick Start
//!
//! ```bash
//! PAYMENT_KEY_ID=rzp_test_x PAYMENT_KEY_SECRET=secret \
//! IDENTITY_TOKENS_FILE=tokens.json CAFE_CATALOG_SEED=menu.json \
//! CAFE_ADMIN_EMAILS=staff@cafe.example RUST_LOG=info cargo run
//! ```
//!
//! ### Running Tests
//!
//! ```bash
//! cargo test
//! ```

pub mod access;
pub mod catalog_actor;
pub mod clients;
pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod model;
pub mod order_actor;
pub mod payment;
