//! # autumn - A typed client for the Autumn billing API
//!
//! `autumn` talks to [Autumn](https://useautumn.com), a subscription billing
//! and metering service. It turns typed parameters into JSON payloads, sends
//! them with retries and exponential backoff, and validates every response
//! into a typed model or a typed [`Error`].
//!
//! ## Quick Start
//!
//! ```no_run
//! use autumn::models::{AttachParams, CheckParams, TrackParams};
//! use autumn::Client;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), autumn::Error> {
//!     let client = Client::new(std::env::var("AUTUMN_SECRET_KEY").unwrap_or_default())?;
//!
//!     // Subscribe a customer. A checkout URL comes back when payment is needed.
//!     let attached = client.attach(&AttachParams::product("user_123", "pro")).await?;
//!     println!("{}: {:?}", attached.code, attached.checkout_url);
//!
//!     // Gate a feature, then record the usage.
//!     let check = client.check(&CheckParams::feature("user_123", "messages")).await?;
//!     if check.allowed {
//!         client.track(&TrackParams::feature("user_123", "messages")).await?;
//!     }
//!
//!     // Resource endpoints hang off the client.
//!     let customer = client.customers().get("user_123").await?;
//!     println!("{} features", customer.features.len());
//!
//!     client.close().await?;
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Typed parameters and responses** - serde records for every operation
//! - **Retries** - statuses 500-504 and network failures are retried with jittered exponential backoff
//! - **Typed errors** - precondition, HTTP and validation failures keep the raw body
//! - **Field paths** - a response that does not match its model names the offending field
//! - **Blocking client** - the same API without an async runtime (`blocking` feature, on by default)
//! - **axum adapter** - browser-facing routes that forward to the client (`axum` feature)
//! - **Logging** - structured `tracing` events for every attempt
//!
//! ## Configuration
//!
//! ```no_run
//! use autumn::{retry::BackoffConfig, Client};
//! use std::time::Duration;
//!
//! # fn example() -> Result<(), autumn::Error> {
//! let client = Client::builder("am_sk_test_123")
//!     .base_url("https://autumn.internal.example.com")?
//!     .max_retries(3)
//!     .timeout(Duration::from_secs(10))
//!     .backoff(BackoffConfig {
//!         unit: Duration::from_millis(500),
//!         max_delay: Duration::from_secs(20),
//!     })
//!     .build()?;
//! # Ok(())
//! # }
//! ```
//!
//! [`ClientBuilder::from_env`] reads the token from `AUTUMN_SECRET_KEY` and an
//! optional base URL from `AUTUMN_BASE_URL`.

mod client;
mod config;
mod error;
pub mod models;
pub mod payload;
pub mod request;
pub mod resources;
pub mod response;
pub mod retry;
pub mod transport;

#[cfg(feature = "blocking")]
pub mod blocking;

#[cfg(feature = "axum")]
pub mod adapter;

pub use client::Client;
pub use config::{
    default_user_agent, ClientBuilder, TransportConfig, API_VERSION_SEGMENT, BASE_URL_ENV_VAR,
    DEFAULT_BASE_URL, DEFAULT_TIMEOUT, PINNED_API_VERSION, TOKEN_ENV_VAR,
};
pub use error::{Error, Result, DEFAULT_ERROR_CODE, DEFAULT_ERROR_MESSAGE};
pub use transport::{AsyncTransport, PreparedRequest, RawResponse, Session, Transport};
