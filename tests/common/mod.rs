#![allow(dead_code)]

use cafe_orders::access::{
    AccessGate, AdminAllowList, AdminIdentity, Caller, Identity, StaticIdentityProvider,
};
use cafe_orders::lifecycle::OrderSystem;
use cafe_orders::model::{
    Category, Customer, LineRequest, MenuItemCreate, MenuItemId, OrderCreate, Owner,
    PaymentMethod,
};
use cafe_orders::payment::{FakeGateway, PaymentCallback, PaymentService, SignatureVerifier};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Duration;

pub const KEY_SECRET: &str = "test_key_secret";
pub const KEY_ID: &str = "rzp_test_cafe";

pub const STAFF_TOKEN: &str = "staff-token";
pub const ASHA_TOKEN: &str = "asha-token";
pub const RAVI_TOKEN: &str = "ravi-token";

pub const ESPRESSO: MenuItemId = MenuItemId(1);
pub const CROISSANT: MenuItemId = MenuItemId(2);
pub const LATTE: MenuItemId = MenuItemId(3);

pub fn menu() -> Vec<MenuItemCreate> {
    vec![
        MenuItemCreate {
            name: "Espresso".into(),
            price: Decimal::from(180),
            category: Category::new("coffee"),
            image: Some("/img/espresso.webp".into()),
        },
        MenuItemCreate {
            name: "Croissant".into(),
            price: Decimal::new(9550, 2),
            category: Category::new("bakery"),
            image: None,
        },
        MenuItemCreate {
            name: "Latte".into(),
            price: Decimal::from(220),
            category: Category::new("coffee"),
            image: None,
        },
    ]
}

/// Both actors running, menu seeded with ids 1..=3.
pub async fn seeded_system() -> OrderSystem {
    let system = OrderSystem::new(Duration::from_secs(2));
    system.seed_catalog(menu()).await.unwrap();
    system
}

pub fn gate() -> AccessGate {
    let provider = StaticIdentityProvider::default()
        .with_token(
            STAFF_TOKEN,
            Identity {
                id: "u-staff".into(),
                email: "Staff@Cafe.example".into(),
            },
        )
        .with_token(
            ASHA_TOKEN,
            Identity {
                id: "u-asha".into(),
                email: "asha@example.com".into(),
            },
        )
        .with_token(
            RAVI_TOKEN,
            Identity {
                id: "u-ravi".into(),
                email: "ravi@example.com".into(),
            },
        );
    AccessGate::new(Arc::new(provider), AdminAllowList::new(["staff@cafe.example"]))
}

pub async fn admin() -> AdminIdentity {
    let caller = gate()
        .classify(Some(&format!("Bearer {STAFF_TOKEN}")))
        .await
        .unwrap();
    AccessGate::require_admin(caller).unwrap()
}

pub async fn customer(token: &str) -> Caller {
    gate()
        .classify(Some(&format!("Bearer {token}")))
        .await
        .unwrap()
}

pub fn verifier() -> SignatureVerifier {
    SignatureVerifier::new(KEY_SECRET).unwrap()
}

pub fn payments(system: &OrderSystem, gateway: Arc<FakeGateway>) -> PaymentService {
    PaymentService::new(system.order_client.clone(), gateway, verifier(), "INR")
}

/// A callback as the checkout widget would post it after a successful payment.
pub fn signed_callback(gateway_order_id: &str, gateway_payment_id: &str) -> PaymentCallback {
    PaymentCallback {
        gateway_order_id: gateway_order_id.into(),
        gateway_payment_id: gateway_payment_id.into(),
        signature: verifier().sign(gateway_order_id, gateway_payment_id),
    }
}

pub fn line(item_id: MenuItemId, quantity: i64) -> LineRequest {
    LineRequest {
        item_id,
        quantity,
        image: None,
    }
}

pub fn asha() -> Customer {
    Customer {
        name: "Asha".into(),
        phone: "9999999999".into(),
        email: None,
        notes: None,
    }
}

pub fn order(owner: Owner, method: PaymentMethod, lines: Vec<LineRequest>) -> OrderCreate {
    OrderCreate {
        owner,
        customer: asha(),
        lines,
        payment_method: method,
        client_total: None,
    }
}
