//! Black-box HTTP tests against the real router.
//!
//! Each test gets a fresh in-memory database and an in-memory session
//! store; the session cookie is carried between requests by [`TestClient`].

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use confeitaria_api::{build_app, session::session_layer, AppState, ServerConfig};
use confeitaria_db::{Database, DbConfig};
use serde_json::{json, Value};
use tower::ServiceExt;
use tower_sessions::MemoryStore;

struct TestClient {
    app: Router,
    cookie: Option<String>,
}

impl TestClient {
    async fn new() -> Self {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let sessions = session_layer(MemoryStore::default(), &ServerConfig::default());

        TestClient {
            app: build_app(AppState::new(db), sessions),
            cookie: None,
        }
    }

    /// Another browser against the same server.
    fn anonymous(&self) -> Self {
        TestClient {
            app: self.app.clone(),
            cookie: None,
        }
    }

    async fn send(&mut self, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(cookie) = &self.cookie {
            builder = builder.header(header::COOKIE, cookie);
        }
        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = self.app.clone().oneshot(request).await.unwrap();

        if let Some(set_cookie) = response.headers().get(header::SET_COOKIE) {
            let pair = set_cookie.to_str().unwrap().split(';').next().unwrap();
            self.cookie = Some(pair.to_string());
        }

        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes)
                .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()))
        };

        (status, value)
    }

    async fn get(&mut self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::GET, uri, None).await
    }

    async fn post(&mut self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, uri, Some(body)).await
    }

    async fn put(&mut self, uri: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::PUT, uri, Some(body)).await
    }

    async fn delete(&mut self, uri: &str) -> (StatusCode, Value) {
        self.send(Method::DELETE, uri, None).await
    }

    async fn signup(&mut self, email: &str) -> Value {
        let (status, user) = self
            .post(
                "/api/signup",
                json!({ "name": "Ana", "email": email, "password": "docinho123" }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "{user}");
        user
    }

    async fn client(&mut self, name: &str, status: Option<&str>) -> i64 {
        let mut body = json!({ "name": name, "email": format!("{}@example.com", name.to_lowercase()) });
        if let Some(status) = status {
            body["status"] = json!(status);
        }
        let (code, client) = self.post("/api/clients", body).await;
        assert_eq!(code, StatusCode::CREATED, "{client}");
        client["id"].as_i64().unwrap()
    }

    async fn product(&mut self, name: &str, price_cents: i64, stock: i64) -> i64 {
        let (code, product) = self
            .post(
                "/api/products",
                json!({ "name": name, "price_cents": price_cents, "stock": stock }),
            )
            .await;
        assert_eq!(code, StatusCode::CREATED, "{product}");
        product["id"].as_i64().unwrap()
    }

    async fn stock(&mut self, product_id: i64) -> i64 {
        let (_, products) = self.get("/api/products").await;
        products
            .as_array()
            .unwrap()
            .iter()
            .find(|p| p["id"] == json!(product_id))
            .unwrap()["stock"]
            .as_i64()
            .unwrap()
    }
}

// =============================================================================
// Health & Auth
// =============================================================================

#[tokio::test]
async fn health_endpoints_respond() {
    let mut app = TestClient::new().await;

    assert_eq!(app.get("/health").await.0, StatusCode::OK);
    assert_eq!(app.get("/health/ready").await.0, StatusCode::OK);
}

#[tokio::test]
async fn protected_routes_require_session() {
    let mut app = TestClient::new().await;

    for uri in ["/api/orders", "/api/clients", "/api/products", "/api/me", "/api/reports/sales"] {
        let (status, body) = app.get(uri).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{uri}");
        assert_eq!(body["code"], "UNAUTHORIZED");
    }

    let (status, _) = app
        .post(
            "/api/orders/single",
            json!({ "client_id": 1, "product_id": 1, "quantity": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn signup_login_logout_cycle() {
    let mut app = TestClient::new().await;
    let user = app.signup("Ana@Example.com").await;
    assert_eq!(user["email"], "ana@example.com");
    assert_eq!(user["plan"], "Free");
    assert!(user.get("password_hash").is_none());

    let (status, me) = app.get("/api/me").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(me["id"], user["id"]);

    let (status, _) = app.post("/api/logout", json!({})).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(app.get("/api/me").await.0, StatusCode::UNAUTHORIZED);

    let (status, body) = app
        .post("/api/login", json!({ "email": "ana@example.com", "password": "wrong-one" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_CREDENTIALS");

    let (status, _) = app
        .post("/api/login", json!({ "email": "nobody@example.com", "password": "docinho123" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, logged) = app
        .post("/api/login", json!({ "email": "ana@example.com", "password": "docinho123" }))
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(logged["id"], user["id"]);
    assert_eq!(app.get("/api/me").await.0, StatusCode::OK);
}

#[tokio::test]
async fn duplicate_signup_conflicts() {
    let mut app = TestClient::new().await;
    app.signup("ana@example.com").await;

    let mut other = app.anonymous();
    let (status, body) = other
        .post(
            "/api/signup",
            json!({ "name": "Ana", "email": "ana@example.com", "password": "docinho123" }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "DUPLICATE");
}

#[tokio::test]
async fn plan_can_be_changed() {
    let mut app = TestClient::new().await;
    app.signup("ana@example.com").await;

    let (status, user) = app.put("/api/me/plan", json!({ "plan": "Pro" })).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(user["plan"], "Pro");

    let (status, _) = app.put("/api/me/plan", json!({ "plan": "  " })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

// =============================================================================
// Clients, Products, Feedbacks
// =============================================================================

#[tokio::test]
async fn client_crud_and_status_summary() {
    let mut app = TestClient::new().await;
    app.signup("ana@example.com").await;

    let maria = app.client("Maria", Some("Satisfied")).await;
    app.client("Joao", None).await;
    app.client("Bia", Some("Needs improvement")).await;

    let (status, summary) = app.get("/api/clients/status-summary").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        summary,
        json!({ "Satisfied": 1, "Unsatisfied": 0, "Needs improvement": 2 })
    );

    let (status, updated) = app
        .put(
            &format!("/api/clients/{maria}"),
            json!({ "name": "Maria S.", "email": "maria@example.com", "status": "Unsatisfied" }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["status"], "Unsatisfied");

    let (status, body) = app
        .post("/api/clients", json!({ "name": "X", "email": "x@example.com", "status": "Happy" }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    assert_eq!(app.delete(&format!("/api/clients/{maria}")).await.0, StatusCode::NO_CONTENT);
    assert_eq!(app.delete(&format!("/api/clients/{maria}")).await.0, StatusCode::NOT_FOUND);

    let (_, clients) = app.get("/api/clients").await;
    assert_eq!(clients.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn referenced_client_cannot_be_deleted() {
    let mut app = TestClient::new().await;
    app.signup("ana@example.com").await;
    let client = app.client("Maria", None).await;
    let product = app.product("Bolo", 4500, 5).await;

    app.post(
        "/api/orders/single",
        json!({ "client_id": client, "product_id": product, "quantity": 1 }),
    )
    .await;

    let (status, body) = app.delete(&format!("/api/clients/{client}")).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");
}

#[tokio::test]
async fn product_validation() {
    let mut app = TestClient::new().await;
    app.signup("ana@example.com").await;

    let (status, _) = app
        .post("/api/products", json!({ "name": "Bolo", "price_cents": -1, "stock": 5 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post("/api/products", json!({ "name": "Bolo", "price_cents": 100 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "stock is required");

    let (status, body) = app
        .post(
            "/api/products",
            json!({ "name": "Bolo", "price_cents": 100_000_001, "stock": 5 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let id = app.product("Bolo", 100, 5).await;
    let (status, product) = app
        .put(
            &format!("/api/products/{id}"),
            json!({ "name": "Bolo", "price_cents": 100, "stock": 40 }),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(product["stock"], 40);
}

#[tokio::test]
async fn feedbacks_are_scoped_to_owner() {
    let mut ana = TestClient::new().await;
    ana.signup("ana@example.com").await;
    let maria = ana.client("Maria", None).await;

    let (status, feedback) = ana
        .post(
            "/api/feedbacks",
            json!({ "client_id": maria, "rating": 5, "comment": "  Perfeito  " }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(feedback["comment"], "Perfeito");

    let (status, _) = ana
        .post("/api/feedbacks", json!({ "client_id": maria, "rating": 6 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, list) = ana.get(&format!("/api/feedbacks/{maria}")).await;
    assert_eq!(list.as_array().unwrap().len(), 1);
    assert_eq!(list[0]["client_name"], "Maria");

    let mut bia = ana.anonymous();
    bia.signup("bia@example.com").await;
    let (status, _) = bia
        .post("/api/feedbacks", json!({ "client_id": maria, "rating": 1 }))
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, list) = bia.get(&format!("/api/feedbacks/{maria}")).await;
    assert_eq!(list, json!([]));
    let (_, list) = bia.get("/api/feedbacks").await;
    assert_eq!(list, json!([]));
}

// =============================================================================
// Orders
// =============================================================================

#[tokio::test]
async fn single_item_order_decrements_then_rejects() {
    let mut app = TestClient::new().await;
    app.signup("ana@example.com").await;
    let client = app.client("Maria", None).await;
    let product = app.product("Bolo", 4500, 5).await;

    let order = json!({ "client_id": client, "product_id": product, "quantity": 3 });

    let (status, placed) = app.post("/api/orders/single", order.clone()).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(placed["remaining_stock"], 2);
    assert!(placed["order_id"].as_i64().is_some());

    let (status, body) = app.post("/api/orders/single", order).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INSUFFICIENT_STOCK");

    assert_eq!(app.stock(product).await, 2);
}

#[tokio::test]
async fn order_request_validation() {
    let mut app = TestClient::new().await;
    app.signup("ana@example.com").await;
    let client = app.client("Maria", None).await;
    let product = app.product("Bolo", 4500, 5).await;

    let (status, body) = app
        .post(
            "/api/orders/single",
            json!({ "client_id": client, "product_id": product, "quantity": 0 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = app
        .post("/api/orders/single", json!({ "product_id": product, "quantity": 1 }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "client_id is required");

    let (status, _) = app
        .post(
            "/api/orders/single",
            json!({ "client_id": client, "product_id": product, "quantity": "three" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = app
        .post(
            "/api/orders/single",
            json!({ "client_id": client, "product_id": product, "quantity": 1, "status": "Lost" }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = app
        .post("/api/orders/multi", json!({ "client_id": client, "items": [] }))
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "items is required");

    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/orders/single")
        .header(header::CONTENT_TYPE, "application/json")
        .header(header::COOKIE, app.cookie.clone().unwrap())
        .body(Body::from("{not json"))
        .unwrap();
    let response = app.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    assert_eq!(app.stock(product).await, 5);
}

#[tokio::test]
async fn unknown_product_is_not_found() {
    let mut app = TestClient::new().await;
    app.signup("ana@example.com").await;
    let client = app.client("Maria", None).await;

    let (status, body) = app
        .post(
            "/api/orders/single",
            json!({ "client_id": client, "product_id": 999, "quantity": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    assert_eq!(app.get("/api/orders/999").await.0, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn non_numeric_ids_are_json_validation_errors() {
    let mut app = TestClient::new().await;
    app.signup("ana@example.com").await;

    let (status, body) = app.get("/api/orders/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
    assert!(body["message"].is_string());

    let (status, body) = app.delete("/api/clients/abc").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = app
        .put(
            "/api/products/1.5",
            json!({ "name": "Bolo", "price_cents": 100, "stock": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = app.get("/api/orders/client/maria").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");

    let (status, body) = app.get("/api/feedbacks/maria").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn multi_item_order_is_atomic() {
    let mut app = TestClient::new().await;
    app.signup("ana@example.com").await;
    let client = app.client("Maria", None).await;
    let bolo = app.product("Bolo", 4500, 5).await;
    let doce = app.product("Doce", 250, 3).await;

    let (status, body) = app
        .post(
            "/api/orders/multi",
            json!({
                "client_id": client,
                "items": [
                    { "product_id": bolo, "quantity": 2 },
                    { "product_id": doce, "quantity": 999999 }
                ]
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "INSUFFICIENT_STOCK");
    assert_eq!(app.stock(bolo).await, 5);
    assert_eq!(app.stock(doce).await, 3);
    assert_eq!(app.get("/api/orders").await.1, json!([]));

    let (status, placed) = app
        .post(
            "/api/orders/multi",
            json!({
                "client_id": client,
                "items": [
                    { "product_id": bolo, "quantity": 2 },
                    { "product_id": doce, "quantity": 1 }
                ],
                "status": "Confirmed"
            }),
        )
        .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(
        placed["remaining_stock"],
        json!([
            { "product_id": bolo, "stock": 3 },
            { "product_id": doce, "stock": 2 }
        ])
    );

    let order_id = placed["order_id"].as_i64().unwrap();
    let (status, detail) = app.get(&format!("/api/orders/{order_id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(detail["status"], "Confirmed");
    assert_eq!(detail["lines"].as_array().unwrap().len(), 2);
    assert_eq!(detail["total_cents"], 2 * 4500 + 250);
}

#[tokio::test]
async fn order_listing_is_stable_and_filtered() {
    let mut app = TestClient::new().await;
    app.signup("ana@example.com").await;
    let maria = app.client("Maria", None).await;
    let joao = app.client("Joao", None).await;
    let bolo = app.product("Bolo", 4500, 10).await;

    for client in [maria, joao, maria] {
        let (status, _) = app
            .post(
                "/api/orders/single",
                json!({ "client_id": client, "product_id": bolo, "quantity": 1 }),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, first) = app.get("/api/orders").await;
    assert_eq!(status, StatusCode::OK);
    let (_, second) = app.get("/api/orders").await;
    assert_eq!(first, second);

    let lines = first.as_array().unwrap();
    assert_eq!(lines.len(), 3);
    assert!(lines[0]["order_id"].as_i64() > lines[2]["order_id"].as_i64());
    assert_eq!(lines[0]["total_cents"], 4500);
    assert_eq!(lines[0]["product_name"], "Bolo");

    let (_, for_maria) = app.get(&format!("/api/orders/client/{maria}")).await;
    let for_maria = for_maria.as_array().unwrap();
    assert_eq!(for_maria.len(), 2);
    assert!(for_maria.iter().all(|l| l["client_id"] == json!(maria)));
}

#[tokio::test]
async fn accounts_cannot_touch_each_other() {
    let mut ana = TestClient::new().await;
    ana.signup("ana@example.com").await;
    let maria = ana.client("Maria", None).await;
    let bolo = ana.product("Bolo", 4500, 5).await;
    let (_, placed) = ana
        .post(
            "/api/orders/single",
            json!({ "client_id": maria, "product_id": bolo, "quantity": 1 }),
        )
        .await;
    let order_id = placed["order_id"].as_i64().unwrap();

    let mut bia = ana.anonymous();
    bia.signup("bia@example.com").await;
    let bia_client = bia.client("Carla", None).await;

    let (status, _) = bia
        .post(
            "/api/orders/single",
            json!({ "client_id": bia_client, "product_id": bolo, "quantity": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = bia
        .post(
            "/api/orders/single",
            json!({ "client_id": maria, "product_id": bolo, "quantity": 1 }),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    assert_eq!(bia.get(&format!("/api/orders/{order_id}")).await.0, StatusCode::NOT_FOUND);
    assert_eq!(bia.get("/api/orders").await.1, json!([]));
    assert_eq!(bia.get("/api/products").await.1, json!([]));
    assert_eq!(
        bia.delete(&format!("/api/products/{bolo}")).await.0,
        StatusCode::NOT_FOUND
    );

    assert_eq!(ana.stock(bolo).await, 4);
}

// =============================================================================
// Reports
// =============================================================================

#[tokio::test]
async fn sales_report_groups_by_status() {
    let mut app = TestClient::new().await;
    app.signup("ana@example.com").await;
    let client = app.client("Maria", None).await;
    let bolo = app.product("Bolo", 4500, 10).await;
    let doce = app.product("Doce", 250, 100).await;

    app.post(
        "/api/orders/single",
        json!({ "client_id": client, "product_id": bolo, "quantity": 2, "status": "Delivered" }),
    )
    .await;
    app.post(
        "/api/orders/multi",
        json!({
            "client_id": client,
            "items": [
                { "product_id": bolo, "quantity": 1 },
                { "product_id": doce, "quantity": 4 }
            ]
        }),
    )
    .await;
    app.post(
        "/api/orders/single",
        json!({ "client_id": client, "product_id": doce, "quantity": 10 }),
    )
    .await;

    let (status, report) = app.get("/api/reports/sales").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        report,
        json!([
            { "status": "Delivered", "total_orders": 1, "total_value_cents": 9000 },
            { "status": "Pending", "total_orders": 2, "total_value_cents": 4500 + 1000 + 2500 }
        ])
    );
}
