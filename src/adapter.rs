//! An axum router that forwards browser-facing calls to the async client.
//!
//! Each route resolves the caller through an [`Identify`] implementation,
//! reads an optional JSON body (camelCase keys are accepted), injects the
//! caller's customer id and calls the matching client method. Responses are
//! the client's typed results as JSON; every failure becomes
//! `400 {"detail": "..."}`.
//!
//! # Examples
//!
//! ```no_run
//! use async_trait::async_trait;
//! use autumn::adapter::{router, AdapterError, Identify, Identity};
//! use http::HeaderMap;
//! use std::sync::Arc;
//!
//! struct HeaderIdentity;
//!
//! #[async_trait]
//! impl Identify for HeaderIdentity {
//!     async fn identify(&self, headers: &HeaderMap) -> Result<Identity, AdapterError> {
//!         let user = headers
//!             .get("x-user-id")
//!             .and_then(|value| value.to_str().ok())
//!             .ok_or_else(|| AdapterError::Identify("missing x-user-id".to_string()))?;
//!         Ok(Identity::new(user))
//!     }
//! }
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Arc::new(autumn::Client::new("am_sk_test_123")?);
//! let app = axum::Router::new().nest("/api/autumn", router(client, Arc::new(HeaderIdentity)));
//!
//! let listener = tokio::net::TcpListener::bind("0.0.0.0:3000").await?;
//! axum::serve(listener, app).await?;
//! # Ok(())
//! # }
//! ```

use crate::models::{
    AttachParams, AttachResponse, BillingPortalParams, BillingPortalResponse, CancelProductParams,
    CheckParams, CheckResponse, CheckoutParams, CheckoutResponse, CreateCustomerParams,
    CreateEntityParams, Customer, CustomerData, Empty, Entity, ListProductResponse,
    PricingTableResponse, ProductCancelResponse, TrackParams, TrackResponse,
};
use crate::payload::{OperationParams, Payload};
use crate::Client;
use async_trait::async_trait;
use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;

/// The caller a request acts for.
#[derive(Debug, Clone, PartialEq)]
pub struct Identity {
    /// Customer id injected into every forwarded call.
    pub customer_id: String,
    /// Properties used when the customer is created on the fly.
    pub customer_data: Option<CustomerData>,
}

impl Identity {
    /// Identifies a customer by id only.
    pub fn new(customer_id: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
            customer_data: None,
        }
    }

    /// Attaches customer properties.
    pub fn with_customer_data(mut self, customer_data: CustomerData) -> Self {
        self.customer_data = Some(customer_data);
        self
    }
}

/// Resolves the caller of an inbound request, typically from a session
/// cookie or bearer token.
#[async_trait]
pub trait Identify: Send + Sync + 'static {
    /// Returns the identity behind `headers`, or an error to reject the call.
    async fn identify(&self, headers: &HeaderMap) -> Result<Identity, AdapterError>;
}

/// Failure of a forwarded call.
#[derive(Debug, thiserror::Error)]
pub enum AdapterError {
    /// The caller could not be identified.
    #[error("{0}")]
    Identify(String),

    /// The inbound body is not a JSON object of the expected shape.
    #[error("Invalid request body: {0}")]
    Body(String),

    /// The API call failed.
    #[error(transparent)]
    Api(#[from] crate::Error),
}

impl IntoResponse for AdapterError {
    fn into_response(self) -> Response {
        tracing::warn!(error = %self, "Adapter call failed");
        (
            StatusCode::BAD_REQUEST,
            Json(json!({ "detail": self.to_string() })),
        )
            .into_response()
    }
}

#[derive(Clone)]
struct AdapterState {
    client: Arc<Client>,
    identify: Arc<dyn Identify>,
}

impl AdapterState {
    async fn identify(&self, headers: &HeaderMap) -> Result<Identity, AdapterError> {
        self.identify.identify(headers).await
    }
}

type Reply<T> = Result<Json<T>, AdapterError>;

/// Builds the router.
///
/// # Routes
///
/// - `POST /attach`, `/check`, `/track`, `/checkout` - core operations
/// - `POST /cancel` - cancel a product
/// - `POST /billing_portal` - open a billing portal session
/// - `POST /customers` - create the caller as a customer
/// - `GET /pricing_table` - pricing table for the caller
/// - `GET /products` - products with scenarios for the caller
/// - `POST /entities` - create an entity
/// - `GET /entities/{entity_id}?expand=a,b` - fetch an entity
/// - `DELETE /entities/{entity_id}` - delete an entity
pub fn router(client: Arc<Client>, identify: Arc<dyn Identify>) -> Router {
    let state = AdapterState { client, identify };

    Router::new()
        .route("/attach", post(attach))
        .route("/check", post(check))
        .route("/track", post(track))
        .route("/checkout", post(checkout))
        .route("/cancel", post(cancel))
        .route("/billing_portal", post(billing_portal))
        .route("/customers", post(create_customer))
        .route("/pricing_table", get(pricing_table))
        .route("/products", get(list_products))
        .route("/entities", post(create_entity))
        .route("/entities/{entity_id}", get(get_entity).delete(delete_entity))
        .with_state(state)
}

/// Turns an inbound body into params for `P`, with the caller's customer id.
fn inbound<P: OperationParams>(body: &[u8], identity: &Identity) -> Result<P, AdapterError> {
    let scope: Payload = if body.iter().all(u8::is_ascii_whitespace) {
        Payload::new()
    } else {
        serde_json::from_slice(body).map_err(|e| AdapterError::Body(e.to_string()))?
    };

    let operation = P::operation();
    let mut payload = operation.build_lenient(&scope, &["customer_id"]);
    if operation.declares("customer_id") {
        payload.insert(
            "customer_id".to_string(),
            Value::String(identity.customer_id.clone()),
        );
    }

    serde_json::from_value(Value::Object(payload)).map_err(|e| AdapterError::Body(e.to_string()))
}

async fn attach(
    State(state): State<AdapterState>,
    headers: HeaderMap,
    body: Bytes,
) -> Reply<AttachResponse> {
    let identity = state.identify(&headers).await?;
    let mut params: AttachParams = inbound(&body, &identity)?;
    params.customer_data = params.customer_data.or(identity.customer_data);
    Ok(Json(state.client.attach(&params).await?))
}

async fn check(
    State(state): State<AdapterState>,
    headers: HeaderMap,
    body: Bytes,
) -> Reply<CheckResponse> {
    let identity = state.identify(&headers).await?;
    let params: CheckParams = inbound(&body, &identity)?;
    Ok(Json(state.client.check(&params).await?))
}

async fn track(
    State(state): State<AdapterState>,
    headers: HeaderMap,
    body: Bytes,
) -> Reply<TrackResponse> {
    let identity = state.identify(&headers).await?;
    let params: TrackParams = inbound(&body, &identity)?;
    Ok(Json(state.client.track(&params).await?))
}

async fn checkout(
    State(state): State<AdapterState>,
    headers: HeaderMap,
    body: Bytes,
) -> Reply<CheckoutResponse> {
    let identity = state.identify(&headers).await?;
    let mut params: CheckoutParams = inbound(&body, &identity)?;
    params.customer_data = params.customer_data.or(identity.customer_data);
    Ok(Json(state.client.checkout(&params).await?))
}

async fn cancel(
    State(state): State<AdapterState>,
    headers: HeaderMap,
    body: Bytes,
) -> Reply<ProductCancelResponse> {
    let identity = state.identify(&headers).await?;
    let params: CancelProductParams = inbound(&body, &identity)?;
    Ok(Json(state.client.products().cancel(&params).await?))
}

async fn billing_portal(
    State(state): State<AdapterState>,
    headers: HeaderMap,
    body: Bytes,
) -> Reply<BillingPortalResponse> {
    let identity = state.identify(&headers).await?;
    let params: BillingPortalParams = inbound(&body, &identity)?;
    Ok(Json(state.client.customers().billing_portal(&params).await?))
}

async fn create_customer(
    State(state): State<AdapterState>,
    headers: HeaderMap,
) -> Reply<Customer> {
    let identity = state.identify(&headers).await?;
    let data = identity.customer_data.unwrap_or_default();
    let params = CreateCustomerParams {
        id: identity.customer_id,
        email: data.email,
        name: data.name,
        fingerprint: data.fingerprint,
        metadata: None,
    };
    Ok(Json(state.client.customers().create(&params).await?))
}

async fn pricing_table(
    State(state): State<AdapterState>,
    headers: HeaderMap,
) -> Reply<PricingTableResponse> {
    let identity = state.identify(&headers).await?;
    let table = state
        .client
        .customers()
        .pricing_table(&identity.customer_id)
        .await?;
    Ok(Json(table))
}

async fn list_products(
    State(state): State<AdapterState>,
    headers: HeaderMap,
) -> Reply<ListProductResponse> {
    let identity = state.identify(&headers).await?;
    let products = state
        .client
        .products()
        .list(Some(&identity.customer_id))
        .await?;
    Ok(Json(products))
}

async fn create_entity(
    State(state): State<AdapterState>,
    headers: HeaderMap,
    body: Bytes,
) -> Reply<Entity> {
    let identity = state.identify(&headers).await?;
    let params: CreateEntityParams = inbound(&body, &identity)?;
    Ok(Json(state.client.entities().create(&params).await?))
}

#[derive(Debug, Deserialize)]
struct ExpandQuery {
    expand: Option<String>,
}

async fn get_entity(
    State(state): State<AdapterState>,
    Path(entity_id): Path<String>,
    Query(query): Query<ExpandQuery>,
    headers: HeaderMap,
) -> Reply<Entity> {
    let identity = state.identify(&headers).await?;
    let expand: Vec<&str> = query
        .expand
        .as_deref()
        .map(|expand| expand.split(',').filter(|field| !field.is_empty()).collect())
        .unwrap_or_default();

    let entity = state
        .client
        .entities()
        .get(&identity.customer_id, &entity_id, &expand)
        .await?;
    Ok(Json(entity))
}

async fn delete_entity(
    State(state): State<AdapterState>,
    Path(entity_id): Path<String>,
    headers: HeaderMap,
) -> Reply<Empty> {
    let identity = state.identify(&headers).await?;
    let deleted = state
        .client
        .entities()
        .delete(&identity.customer_id, &entity_id)
        .await?;
    Ok(Json(deleted))
}
