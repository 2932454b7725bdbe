mod common;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};
use uuid::Uuid;

use common::{order_payload, TestApp};

#[tokio::test]
async fn list_orders_on_empty_store_returns_empty_array() {
    let app = TestApp::new().await;

    let (status, body) = app.request_json(Method::GET, "/api/Order", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn created_order_reads_back_with_same_fields() {
    let app = TestApp::new().await;

    let created = app.create_order("Acme", "ACME-001").await;
    let id = created["orderId"].as_str().expect("server assigned id");
    assert!(Uuid::parse_str(id).is_ok());
    assert!(created["orderCreatedDate"].is_string());

    let (status, fetched) = app
        .request_json(Method::GET, &format!("/api/Order/{}", id), None)
        .await;

    assert_eq!(status, StatusCode::OK);
    for field in ["customerName", "orderNumber", "orderType", "orderStatus", "orderDate"] {
        assert_eq!(fetched[field], created[field], "field {} differs", field);
    }
    assert_eq!(fetched["customerName"], "Acme");
    assert_eq!(fetched["orderLines"], json!([]));
}

#[tokio::test]
async fn omitted_order_date_defaults_to_creation_time() {
    let app = TestApp::new().await;

    let mut payload = order_payload("Acme", "ACME-002");
    payload.as_object_mut().unwrap().remove("orderDate");

    let (status, created) = app
        .request_json(Method::POST, "/api/Order", Some(payload))
        .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(created["orderDate"], created["orderCreatedDate"]);
}

#[tokio::test]
async fn get_unknown_order_is_not_found() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request_json(Method::GET, &format!("/api/Order/{}", Uuid::new_v4()), None)
        .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Not Found");
}

#[tokio::test]
async fn deleted_order_is_gone() {
    let app = TestApp::new().await;
    let created = app.create_order("Acme", "ACME-003").await;
    let uri = format!("/api/Order/{}", created["orderId"].as_str().unwrap());

    let response = app.request(Method::DELETE, &uri, None).await;
    assert_eq!(response.status(), StatusCode::OK);

    let (status, _) = app.request_json(Method::GET, &uri, None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn deleting_unknown_order_still_succeeds() {
    let app = TestApp::new().await;

    let response = app
        .request(
            Method::DELETE,
            &format!("/api/Order/{}", Uuid::new_v4()),
            None,
        )
        .await;

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn update_replaces_fields_and_echoes_payload() {
    let app = TestApp::new().await;
    let created = app.create_order("Acme", "ACME-004").await;
    let id = created["orderId"].as_str().unwrap().to_string();

    let mut update = created.clone();
    update["customerName"] = json!("Acme Holdings");
    update["orderStatus"] = json!("Processing");

    let (status, echoed) = app
        .request_json(
            Method::PUT,
            &format!("/api/Order/{}", id),
            Some(update.clone()),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(echoed["customerName"], "Acme Holdings");

    let (_, fetched) = app
        .request_json(Method::GET, &format!("/api/Order/{}", id), None)
        .await;
    assert_eq!(fetched["customerName"], "Acme Holdings");
    assert_eq!(fetched["orderStatus"], "Processing");
}

#[tokio::test]
async fn update_with_mismatched_id_is_rejected() {
    let app = TestApp::new().await;
    let created = app.create_order("Acme", "ACME-005").await;

    let mut update = created.clone();
    update["customerName"] = json!("Someone Else");

    let (status, _) = app
        .request_json(
            Method::PUT,
            &format!("/api/Order/{}", Uuid::new_v4()),
            Some(update),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, fetched) = app
        .request_json(
            Method::GET,
            &format!("/api/Order/{}", created["orderId"].as_str().unwrap()),
            None,
        )
        .await;
    assert_eq!(fetched["customerName"], "Acme");
}

#[tokio::test]
async fn blank_customer_name_is_a_validation_error() {
    let app = TestApp::new().await;

    let (status, body) = app
        .request_json(Method::POST, "/api/Order", Some(order_payload(" ", "ACME-006")))
        .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["message"]
        .as_str()
        .unwrap_or_default()
        .contains("customer_name"));

    let (_, list) = app.request_json(Method::GET, "/api/Order", None).await;
    assert_eq!(list, json!([]));
}

#[tokio::test]
async fn unknown_enum_value_is_rejected_by_the_extractor() {
    let app = TestApp::new().await;

    let mut payload = order_payload("Acme", "ACME-007");
    payload["orderType"] = json!("Express");

    let response = app
        .request(Method::POST, "/api/Order", Some(payload))
        .await;

    assert!(response.status().is_client_error());
}

#[tokio::test]
async fn acme_order_with_one_line_end_to_end() {
    let app = TestApp::new().await;

    let order = app.create_order("Acme", "ACME-100").await;
    let order_id = order["orderId"].as_str().unwrap();
    let line = app.create_order_line(order_id, "WIDGET-1").await;
    assert_eq!(line["orderId"], order["orderId"]);

    let (status, fetched) = app
        .request_json(Method::GET, &format!("/api/Order/{}", order_id), None)
        .await;
    assert_eq!(status, StatusCode::OK);

    let lines = fetched["orderLines"].as_array().expect("order lines array");
    assert_eq!(lines.len(), 1);
    assert_eq!(lines[0]["productCode"], "WIDGET-1");
    assert_eq!(lines[0]["productType"], "Parts");
    assert_eq!(lines[0]["productCostPrice"], json!(12.5));
    assert_eq!(lines[0]["quantity"], 3);

    let (_, all) = app.request_json(Method::GET, "/api/Order", None).await;
    let all: Vec<Value> = serde_json::from_value(all).unwrap();
    assert_eq!(all.len(), 1);
    assert_eq!(all[0]["orderLines"].as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn deleting_an_order_removes_its_lines() {
    let app = TestApp::new().await;
    let order = app.create_order("Acme", "ACME-101").await;
    let order_id = order["orderId"].as_str().unwrap();
    let line = app.create_order_line(order_id, "WIDGET-2").await;

    app.request(Method::DELETE, &format!("/api/Order/{}", order_id), None)
        .await;

    let (status, _) = app
        .request_json(
            Method::GET,
            &format!("/api/OrderLine/{}", line["orderLineId"].as_str().unwrap()),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = TestApp::new().await;

    let response = app.request(Method::GET, "/api/Order", None).await;

    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn health_endpoints_report_up() {
    let app = TestApp::new().await;

    let (status, body) = app.request_json(Method::GET, "/health", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "up");

    let (status, body) = app.request_json(Method::GET, "/health/ready", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "up");
}
