#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::{self, Body},
    http::{Method, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use smarthub::{app_router, config::AppConfig, db, AppState};
use tower::ServiceExt;

/// Helper harness for spinning up the API service backed by an in-memory SQLite database.
pub struct TestApp {
    router: Router,
    pub state: AppState,
}

impl TestApp {
    /// Construct a new test application with a fresh, migrated database.
    pub async fn new() -> Self {
        let mut cfg = AppConfig::new(
            "sqlite::memory:".to_string(),
            "127.0.0.1".to_string(),
            0,
            "test".to_string(),
        );
        // One pinned connection keeps the in-memory database alive for the whole test.
        cfg.db_max_connections = 1;
        cfg.db_min_connections = 1;

        let pool = db::establish_connection_from_app_config(&cfg)
            .await
            .expect("failed to create test database");
        db::run_migrations(&pool)
            .await
            .expect("failed to run migrations in tests");

        let state = AppState::new(Arc::new(pool), cfg);
        let router = app_router(state.clone());

        Self { router, state }
    }

    /// Send a request against the router.
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> axum::response::Response {
        let mut builder = Request::builder().method(method).uri(uri);

        let body = if let Some(json) = body {
            builder = builder.header("content-type", "application/json");
            Body::from(serde_json::to_vec(&json).expect("failed to serialize json request body"))
        } else {
            Body::empty()
        };

        let request = builder.body(body).expect("failed to build request");
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router error during test request")
    }

    /// Send a request and decode the JSON body, returning the status alongside it.
    /// An empty body decodes as `Value::Null`.
    pub async fn request_json(
        &self,
        method: Method,
        uri: &str,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let response = self.request(method, uri, body).await;
        let status = response.status();
        let bytes = body::to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("read response body");
        let value = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).expect("parse response body")
        };
        (status, value)
    }

    /// Serves the router on an ephemeral local port and returns its base URL.
    pub async fn spawn_http(&self) -> String {
        let listener = tokio::net::TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0)))
            .await
            .expect("bind test listener");
        let addr = listener.local_addr().expect("listener address");
        let router = self.router.clone();
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("test server");
        });
        format!("http://{}/", addr)
    }

    /// Creates an order through the API and returns the response body.
    pub async fn create_order(&self, customer_name: &str, order_number: &str) -> Value {
        let (status, body) = self
            .request_json(
                Method::POST,
                "/api/Order",
                Some(order_payload(customer_name, order_number)),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create order failed: {}", body);
        body
    }

    /// Adds a line to `order_id` through the API and returns the response body.
    pub async fn create_order_line(&self, order_id: &str, product_code: &str) -> Value {
        let (status, body) = self
            .request_json(
                Method::POST,
                &format!("/api/OrderLine/{}", order_id),
                Some(order_line_payload(product_code)),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "create order line failed: {}", body);
        body
    }
}

pub fn order_payload(customer_name: &str, order_number: &str) -> Value {
    json!({
        "customerName": customer_name,
        "orderNumber": order_number,
        "orderType": "Normal",
        "orderStatus": "New",
        "orderDate": "2024-05-01T09:30:00Z"
    })
}

pub fn order_line_payload(product_code: &str) -> Value {
    json!({
        "lineNumber": 1,
        "productCode": product_code,
        "productType": "Parts",
        "productCostPrice": 12.5,
        "productSalesPrice": 20.0,
        "quantity": 3
    })
}
