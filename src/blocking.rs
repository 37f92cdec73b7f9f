//! A blocking client for callers without an async runtime.
//!
//! The blocking client exposes the same resource and facade methods as the
//! async one; calls return their result directly and the thread sleeps
//! between attempts.
//!
//! Do not call it from inside an async runtime; `reqwest`'s blocking client
//! panics there.
//!
//! # Examples
//!
//! ```no_run
//! use autumn::models::CheckParams;
//!
//! # fn example() -> Result<(), autumn::Error> {
//! let client = autumn::ClientBuilder::new("am_sk_test_123").build_blocking()?;
//!
//! let check = client.check(&CheckParams::feature("user_123", "messages"))?;
//! if check.allowed {
//!     println!("go ahead");
//! }
//! # Ok(())
//! # }
//! ```

use crate::config::TransportConfig;
use crate::request::ApiRequest;
use crate::transport::{classify, finish, Outcome, PreparedRequest, RawResponse, Transport};
use crate::{Error, Result};
use serde::de::DeserializeOwned;
use std::fmt;
use std::sync::{Mutex, PoisonError};
use std::time::Instant;

/// The blocking client.
pub type Client = crate::Client<BlockingTransport>;

/// Blocking counterpart of [`crate::transport::Session`].
pub trait BlockingSession: Send + Sync {
    /// Sends `request` once and returns the status and body.
    fn send(&self, request: &PreparedRequest) -> Result<RawResponse>;

    /// Releases pooled connections. Must be idempotent.
    fn close(&self);
}

/// The default [`BlockingSession`], backed by a lazily created
/// `reqwest::blocking::Client`. An injected client is reused when the session
/// reopens after a close.
#[derive(Debug, Default)]
pub struct HttpSession {
    template: Option<reqwest::blocking::Client>,
    client: Mutex<Option<reqwest::blocking::Client>>,
}

impl HttpSession {
    /// Creates a session that opens its connection pool on first use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session around an existing blocking client.
    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        Self {
            template: Some(client.clone()),
            client: Mutex::new(Some(client)),
        }
    }

    /// Returns `true` while a connection pool is held.
    pub fn is_open(&self) -> bool {
        self.client
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    fn client(&self) -> Result<reqwest::blocking::Client> {
        let mut slot = self.client.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(client) = slot.as_ref() {
            return Ok(client.clone());
        }

        let client = match &self.template {
            Some(template) => template.clone(),
            None => reqwest::blocking::Client::builder().build().map_err(|e| {
                Error::Configuration(format!("Failed to build HTTP client: {}", e))
            })?,
        };
        *slot = Some(client.clone());
        Ok(client)
    }
}

impl BlockingSession for HttpSession {
    fn send(&self, request: &PreparedRequest) -> Result<RawResponse> {
        let mut builder = self
            .client()?
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone());

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().map_err(Error::from_reqwest)?;
        let status = response.status();
        let body = response.text().map_err(Error::from_reqwest)?;

        Ok(RawResponse { status, body })
    }

    fn close(&self) {
        let client = self
            .client
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if client.is_some() {
            tracing::debug!("Closed blocking HTTP session");
        }
    }
}

/// The blocking transport: same attempt loop as
/// [`AsyncTransport`](crate::transport::AsyncTransport), with thread sleeps.
pub struct BlockingTransport {
    config: TransportConfig,
    session: Box<dyn BlockingSession>,
}

impl BlockingTransport {
    /// Creates a transport that sends through `session`.
    pub fn new(config: TransportConfig, session: impl BlockingSession + 'static) -> Self {
        Self {
            config,
            session: Box::new(session),
        }
    }

    /// Returns the transport configuration.
    pub fn config(&self) -> &TransportConfig {
        &self.config
    }

    /// Runs the attempt loop for `request`.
    pub fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let prepared = self.config.prepare(&request)?;
        let attempts = self.config.retry().attempts();
        let mut backoff = self.config.retry().backoff();
        let start_time = Instant::now();

        for attempt in 1..=attempts {
            tracing::debug!(
                method = %prepared.method,
                url = %prepared.url,
                attempt = attempt,
                "Executing HTTP request"
            );

            match classify(self.session.send(&prepared)) {
                Outcome::Complete(raw) => {
                    return finish(&request, raw, attempt, start_time.elapsed())
                }
                Outcome::Fatal(error) => return Err(error),
                Outcome::Transient(error) => {
                    tracing::warn!(
                        error = %error,
                        attempt = attempt,
                        method = %request.method,
                        path = %request.path,
                        "Request failed"
                    );

                    if attempt == attempts {
                        return Err(error);
                    }

                    let delay = backoff.next_delay();
                    tracing::info!(
                        delay_ms = delay.as_millis(),
                        attempt = attempt,
                        "Retrying request after delay"
                    );
                    std::thread::sleep(delay);
                }
            }
        }

        Err(Error::max_retries_reached(&request.method, &request.path))
    }
}

impl fmt::Debug for BlockingTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BlockingTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Transport for BlockingTransport {
    type Output<'a, T>
        = Result<T>
    where
        Self: 'a,
        T: 'a;

    fn request<'a, T>(&'a self, request: ApiRequest) -> Self::Output<'a, T>
    where
        T: DeserializeOwned + Send + 'a,
    {
        self.execute(request)
    }

    fn reject<'a, T>(&'a self, error: Error) -> Self::Output<'a, T>
    where
        T: Send + 'a,
    {
        Err(error)
    }

    fn close(&self) -> Self::Output<'_, ()> {
        self.session.close();
        Ok(())
    }
}
