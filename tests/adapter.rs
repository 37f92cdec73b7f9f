//! Tests for the axum adapter, with wiremock standing in for the API.

#![cfg(feature = "axum")]

use async_trait::async_trait;
use autumn::adapter::{router, AdapterError, Identify, Identity};
use autumn::models::CustomerData;
use autumn::retry::BackoffConfig;
use autumn::Client;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tower::ServiceExt;
use wiremock::matchers::{body_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

struct HeaderIdentity;

#[async_trait]
impl Identify for HeaderIdentity {
    async fn identify(&self, headers: &HeaderMap) -> Result<Identity, AdapterError> {
        let user = headers
            .get("x-user-id")
            .and_then(|value| value.to_str().ok())
            .ok_or_else(|| AdapterError::Identify("Not signed in".to_string()))?;

        Ok(Identity::new(user).with_customer_data(CustomerData {
            name: Some("Jane".to_string()),
            email: Some("jane@example.com".to_string()),
            fingerprint: None,
        }))
    }
}

fn app(server: &MockServer) -> Router {
    let client = Client::builder("am_sk_test")
        .base_url(server.uri())
        .unwrap()
        .max_retries(1)
        .backoff(BackoffConfig {
            unit: Duration::from_millis(1),
            max_delay: Duration::from_millis(10),
        })
        .build()
        .unwrap();

    router(Arc::new(client), Arc::new(HeaderIdentity))
}

async fn call(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    (status, serde_json::from_slice(&bytes).unwrap())
}

fn post(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("x-user-id", "user_123")
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_attach_accepts_camel_case_and_injects_identity() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/attach"))
        .and(body_json(json!({
            "customer_id": "user_123",
            "product_id": "pro",
            "success_url": "https://example.com/done",
            "force_checkout": true,
            "customer_data": {"name": "Jane", "email": "jane@example.com"},
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "customer_id": "user_123",
            "code": "checkout_created",
            "message": "Checkout session created",
            "checkout_url": "https://checkout.stripe.com/c/pay/cs_test",
            "product_ids": ["pro"],
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (status, body) = call(
        app(&mock_server),
        post(
            "/attach",
            r#"{"productId": "pro", "successUrl": "https://example.com/done", "forceCheckout": true, "customerId": "someone_else"}"#,
        ),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["checkout_url"], "https://checkout.stripe.com/c/pay/cs_test");
    assert_eq!(body["customer_id"], "user_123");
}

#[tokio::test]
async fn test_precondition_becomes_400_detail() {
    let mock_server = MockServer::start().await;

    let (status, body) = call(app(&mock_server), post("/check", "")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .contains("Either product_id or feature_id must be provided"));
    assert!(mock_server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_api_error_becomes_400_detail() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/products/cancel"))
        .respond_with(ResponseTemplate::new(404).set_body_json(json!({
            "message": "Product not attached",
            "code": "product_not_found",
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (status, body) = call(
        app(&mock_server),
        post("/cancel", r#"{"product_id": "pro"}"#),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .contains("Product not attached"));
}

#[tokio::test]
async fn test_unidentified_caller_is_rejected() {
    let mock_server = MockServer::start().await;

    let request = Request::builder()
        .method("POST")
        .uri("/track")
        .body(Body::from(r#"{"feature_id": "messages"}"#))
        .unwrap();
    let (status, body) = call(app(&mock_server), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body, json!({"detail": "Not signed in"}));
}

#[tokio::test]
async fn test_invalid_json_is_rejected() {
    let mock_server = MockServer::start().await;

    let (status, body) = call(app(&mock_server), post("/track", "{not json")).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["detail"]
        .as_str()
        .unwrap()
        .starts_with("Invalid request body"));
}

#[tokio::test]
async fn test_pricing_table_for_caller() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/components/pricing_table"))
        .and(query_param("customer_id", "user_123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"list": []})))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .uri("/pricing_table")
        .header("x-user-id", "user_123")
        .body(Body::empty())
        .unwrap();
    let (status, body) = call(app(&mock_server), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({"list": []}));
}

#[tokio::test]
async fn test_get_entity_splits_expand() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/v1/customers/user_123/entities/seat_1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "seat_1",
            "name": null,
            "customer_id": "user_123",
            "created_at": 1_700_000_000_000i64,
            "env": "sandbox",
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let request = Request::builder()
        .uri("/entities/seat_1?expand=invoices,trials_used")
        .header("x-user-id", "user_123")
        .body(Body::empty())
        .unwrap();
    let (status, body) = call(app(&mock_server), request).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["id"], "seat_1");

    let requests = mock_server.received_requests().await.unwrap();
    assert_eq!(
        requests[0].url.query(),
        Some("expand=invoices&expand=trials_used")
    );
}

#[tokio::test]
async fn test_create_customer_from_identity() {
    let mock_server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/v1/customers"))
        .and(body_json(json!({
            "id": "user_123",
            "email": "jane@example.com",
            "name": "Jane",
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "id": "user_123",
            "created_at": 1_700_000_000_000i64,
            "name": "Jane",
            "email": "jane@example.com",
            "env": "sandbox",
            "products": [],
            "features": {},
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let (status, body) = call(app(&mock_server), post("/customers", "")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["email"], "jane@example.com");
}
