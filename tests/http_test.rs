mod common;

use cafe_orders::http::{self, AppState};
use cafe_orders::lifecycle::OrderSystem;
use cafe_orders::payment::FakeGateway;
use common::*;
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::sync::oneshot;

/// A running server on an ephemeral port. Dropping it stops the server.
struct TestServer {
    base: String,
    http: reqwest::Client,
    gateway: Arc<FakeGateway>,
    _system: OrderSystem,
    _stop: oneshot::Sender<()>,
}

impl TestServer {
    async fn start() -> Self {
        let system = seeded_system().await;
        let gateway = Arc::new(FakeGateway::new(KEY_ID));
        let state = AppState {
            orders: system.order_client.clone(),
            catalog: system.catalog_client.clone(),
            payments: payments(&system, gateway.clone()),
            gate: gate(),
        };

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr: SocketAddr = listener.local_addr().unwrap();
        let (stop, stopped) = oneshot::channel::<()>();
        tokio::spawn(http::serve(listener, state, async move {
            let _ = stopped.await;
        }));

        Self {
            base: format!("http://{addr}"),
            http: reqwest::Client::new(),
            gateway,
            _system: system,
            _stop: stop,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    async fn get(&self, path: &str, token: Option<&str>) -> (StatusCode, Value) {
        let mut request = self.http.get(self.url(path));
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        read(request.send().await.unwrap()).await
    }

    async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let response = self.http.post(self.url(path)).json(&body).send().await.unwrap();
        read(response).await
    }

    async fn patch(&self, path: &str, token: Option<&str>, body: Value) -> (StatusCode, Value) {
        let mut request = self.http.patch(self.url(path)).json(&body);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }
        read(request.send().await.unwrap()).await
    }

    /// Places an order and returns its id.
    async fn place(&self, body: Value) -> String {
        let (status, created) = self.post("/orders", body).await;
        assert_eq!(status, StatusCode::CREATED, "{created}");
        created["orderId"].as_str().unwrap().to_string()
    }
}

async fn read(response: reqwest::Response) -> (StatusCode, Value) {
    let status = response.status();
    let text = response.text().await.unwrap();
    let body = if text.is_empty() {
        Value::Null
    } else {
        serde_json::from_str(&text).unwrap()
    };
    (status, body)
}

fn espresso_order(method: &str) -> Value {
    json!({
        "name": "Asha",
        "phone": "9999999999",
        "items": [{ "itemId": 1, "quantity": 2 }],
        "paymentMethod": method,
        "guestId": "guest-42"
    })
}

#[tokio::test]
async fn test_health_and_menu() {
    let server = TestServer::start().await;

    let (status, body) = server.get("/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "status": "ok" }));

    let (status, body) = server.get("/menu", None).await;
    assert_eq!(status, StatusCode::OK);
    let items = body["items"].as_array().unwrap();
    assert_eq!(items.len(), 3);
    assert_eq!(items[0]["name"], "Espresso");
    assert_eq!(items[0]["id"], 1);
    assert_eq!(items[0]["category"], "coffee");
}

#[tokio::test]
async fn test_counter_checkout() {
    let server = TestServer::start().await;

    let (status, body) = server.post("/orders", espresso_order("COUNTER")).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["total"].as_f64(), Some(360.0));
    assert_eq!(body["status"], "pending");
    assert_eq!(body["paymentStatus"], "pending");
    assert!(body["orderId"].as_str().is_some());
}

#[tokio::test]
async fn test_client_total_is_recomputed() {
    let server = TestServer::start().await;

    let mut order = espresso_order("COUNTER");
    order["total"] = json!(1);
    let (status, body) = server.post("/orders", order).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["total"].as_f64(), Some(360.0));
}

#[tokio::test]
async fn test_checkout_validation_errors() {
    let server = TestServer::start().await;

    let mut empty = espresso_order("COUNTER");
    empty["items"] = json!([]);
    let (status, body) = server.post("/orders", empty).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "EMPTY_CART");
    assert_eq!(body["kind"], "VALIDATION_ERROR");

    let mut nameless = espresso_order("COUNTER");
    nameless["name"] = json!("  ");
    let (status, body) = server.post("/orders", nameless).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "MISSING_CONTACT");

    let mut unknown = espresso_order("COUNTER");
    unknown["items"] = json!([{ "itemId": 404, "quantity": 1 }]);
    let (status, body) = server.post("/orders", unknown).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_LINE");

    let response = server
        .http
        .post(server.url("/orders"))
        .header("content-type", "application/json")
        .body("{not json")
        .send()
        .await
        .unwrap();
    let (status, body) = read(response).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_BODY");

    let (_, listed) = server.get("/admin/orders", Some(STAFF_TOKEN)).await;
    assert_eq!(listed["orders"].as_array().unwrap().len(), 0);
}

#[tokio::test]
async fn test_online_payment_flow() {
    let server = TestServer::start().await;
    let order_id = server.place(espresso_order("ONLINE")).await;

    let (status, session) = server
        .post("/payments/create", json!({ "orderId": order_id }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["amount"], 36000);
    assert_eq!(session["currency"], "INR");
    assert_eq!(session["key"], KEY_ID);
    let gateway_order_id = session["gatewayOrderId"].as_str().unwrap().to_string();
    assert_eq!(server.gateway.requests().len(), 1);

    // The widget posts back the processor's own field names
    let callback = signed_callback(&gateway_order_id, "pay_abc");
    let verify = json!({
        "orderId": order_id,
        "razorpay_order_id": callback.gateway_order_id,
        "razorpay_payment_id": callback.gateway_payment_id,
        "razorpay_signature": callback.signature,
    });
    let (status, body) = server.post("/payments/verify", verify.clone()).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, body) = server.post("/payments/verify", verify).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);

    let (status, order) = server
        .get(&format!("/orders/{order_id}?guestId=guest-42"), None)
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["payment"]["status"], "paid");
    assert_eq!(order["payment"]["method"], "ONLINE");
    assert_eq!(order["fulfillmentStatus"], "pending");
}

#[tokio::test]
async fn test_tampered_signature_is_rejected() {
    let server = TestServer::start().await;
    let order_id = server.place(espresso_order("ONLINE")).await;
    let (_, session) = server
        .post("/payments/create", json!({ "orderId": order_id }))
        .await;
    let gateway_order_id = session["gatewayOrderId"].as_str().unwrap();

    let callback = signed_callback(gateway_order_id, "pay_abc");
    let (status, body) = server
        .post(
            "/payments/verify",
            json!({
                "orderId": order_id,
                "gatewayOrderId": gateway_order_id,
                "gatewayPaymentId": "pay_forged",
                "signature": callback.signature,
            }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "INVALID_SIGNATURE");
    assert_eq!(body["orderId"], order_id.as_str());
    assert!(body["message"].as_str().unwrap().contains("contact support"));

    let (_, order) = server
        .get(&format!("/admin/orders/{order_id}"), Some(STAFF_TOKEN))
        .await;
    assert_eq!(order["payment"]["status"], "pending");
}

#[tokio::test]
async fn test_status_changes_require_admin() {
    let server = TestServer::start().await;
    let order_id = server.place(espresso_order("COUNTER")).await;
    let path = format!("/orders/{order_id}/status");
    let body = json!({ "status": "preparing" });

    let (status, err) = server.patch(&path, None, body.clone()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(err["error"], "UNAUTHORIZED");

    let (status, _) = server.patch(&path, Some("no-such-token"), body.clone()).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, err) = server.patch(&path, Some(ASHA_TOKEN), body.clone()).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(err["error"], "FORBIDDEN");

    let (status, ok) = server.patch(&path, Some(STAFF_TOKEN), body).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ok["success"], true);
}

#[tokio::test]
async fn test_cancelled_order_cannot_be_prepared() {
    let server = TestServer::start().await;
    let order_id = server.place(espresso_order("COUNTER")).await;
    let path = format!("/orders/{order_id}/status");

    let (status, _) = server
        .patch(&path, Some(STAFF_TOKEN), json!({ "status": "cancelled" }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, err) = server
        .patch(&path, Some(STAFF_TOKEN), json!({ "status": "preparing" }))
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["error"], "INVALID_TRANSITION");
    assert_eq!(err["kind"], "INVALID_TRANSITION");
}

#[tokio::test]
async fn test_stale_expected_status_conflicts() {
    let server = TestServer::start().await;
    let order_id = server.place(espresso_order("COUNTER")).await;
    let path = format!("/orders/{order_id}/status");

    let (status, _) = server
        .patch(&path, Some(STAFF_TOKEN), json!({ "status": "ready" }))
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, err) = server
        .patch(
            &path,
            Some(STAFF_TOKEN),
            json!({ "status": "cancelled", "expectedStatus": "pending" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(err["error"], "STALE_STATUS");

    let (status, err) = server
        .patch(&path, Some(STAFF_TOKEN), json!({ "status": "shipped" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "UNKNOWN_STATUS");
}

#[tokio::test]
async fn test_orders_are_only_visible_in_scope() {
    let server = TestServer::start().await;
    let order_id = server.place(espresso_order("COUNTER")).await;

    let (status, _) = server
        .get(&format!("/orders/{order_id}?guestId=guest-42"), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let (status, err) = server
        .get(&format!("/orders/{order_id}?guestId=someone-else"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(err["error"], "NOT_FOUND");

    let (status, _) = server.get(&format!("/orders/{order_id}"), Some(ASHA_TOKEN)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = server.get("/orders/not-a-uuid", None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, body) = server.get("/orders?guestId=guest-42", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["orders"].as_array().unwrap().len(), 1);

    let (_, body) = server.get("/orders", None).await;
    assert!(body["orders"].as_array().unwrap().is_empty());

    let (status, _) = server.get("/admin/orders", Some(ASHA_TOKEN)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_signed_in_customer_sees_own_orders() {
    let server = TestServer::start().await;

    let response = server
        .http
        .post(server.url("/orders"))
        .bearer_auth(ASHA_TOKEN)
        .json(&espresso_order("COUNTER"))
        .send()
        .await
        .unwrap();
    let (status, created) = read(response).await;
    assert_eq!(status, StatusCode::CREATED);
    let order_id = created["orderId"].as_str().unwrap();

    let (_, mine) = server.get("/orders", Some(ASHA_TOKEN)).await;
    assert_eq!(mine["orders"][0]["id"], order_id);

    let (_, theirs) = server.get("/orders", Some(RAVI_TOKEN)).await;
    assert!(theirs["orders"].as_array().unwrap().is_empty());

    // Owned by a user, so the guest token sent at checkout does not reach it
    let (status, _) = server
        .get(&format!("/orders/{order_id}?guestId=guest-42"), None)
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_admin_total_correction_and_delete() {
    let server = TestServer::start().await;
    let order_id = server.place(espresso_order("ONLINE")).await;
    let path = format!("/admin/orders/{order_id}");

    let (status, order) = server
        .patch(&format!("{path}/total"), Some(STAFF_TOKEN), json!({ "total": 300 }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(order["total"].as_f64(), Some(300.0));

    let (_, session) = server
        .post("/payments/create", json!({ "orderId": order_id }))
        .await;
    assert_eq!(session["amount"], 30000);

    let (status, err) = server
        .patch(&format!("{path}/total"), Some(STAFF_TOKEN), json!({ "total": -5 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "INVALID_TOTAL");

    let response = server
        .http
        .delete(server.url(&path))
        .bearer_auth(STAFF_TOKEN)
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let (status, _) = server.get(&path, Some(STAFF_TOKEN)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_sub_paisa_total_is_rejected() {
    let server = TestServer::start().await;
    let order_id = server.place(espresso_order("ONLINE")).await;

    let (status, err) = server
        .patch(
            &format!("/admin/orders/{order_id}/total"),
            Some(STAFF_TOKEN),
            json!({ "total": 0.004 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(err["error"], "INVALID_TOTAL");

    let (status, session) = server
        .post("/payments/create", json!({ "orderId": order_id }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(session["amount"], 36000);
    assert_eq!(server.gateway.requests()[0].amount, 36000);
}
