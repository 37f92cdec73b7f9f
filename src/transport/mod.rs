//! Request execution with retries.
//!
//! A [`Transport`] runs one logical request as a sequential attempt loop:
//! send through its session, classify the outcome, then either retry after a
//! backoff delay or hand the exchange to [`crate::response::validate`].
//!
//! Two implementations share that contract: [`AsyncTransport`] here and
//! `blocking::BlockingTransport` behind the `blocking` feature. Both sit on a
//! one-attempt session trait so a scripted session can stand in for the
//! network.

mod session;

pub use session::{HttpSession, Session};

use crate::config::TransportConfig;
use crate::payload::Payload;
use crate::request::ApiRequest;
use crate::{response, retry, Error, Result};
use futures::future::BoxFuture;
use http::{HeaderMap, Method, StatusCode};
use serde::de::DeserializeOwned;
use std::fmt;
use std::time::{Duration, Instant};
use url::Url;

/// The capability every client flavor is built on.
///
/// `Output` is what a call hands back: a future for the async transport, the
/// finished result for the blocking one.
pub trait Transport: Send + Sync {
    /// The result type of a call.
    type Output<'a, T>
    where
        Self: 'a,
        T: 'a;

    /// Executes `request` with retries and validates the response as `T`.
    fn request<'a, T>(&'a self, request: ApiRequest) -> Self::Output<'a, T>
    where
        T: DeserializeOwned + Send + 'a;

    /// Completes a call with `error` without touching the network.
    fn reject<'a, T>(&'a self, error: Error) -> Self::Output<'a, T>
    where
        T: Send + 'a;

    /// Releases the session. Closing twice is a no-op; the next request opens
    /// a fresh session.
    fn close(&self) -> Self::Output<'_, ()>;
}

/// A request resolved against the client configuration, ready to be sent on
/// each attempt.
#[derive(Debug, Clone)]
pub struct PreparedRequest {
    /// The HTTP method.
    pub method: Method,
    /// Full URL, including query parameters.
    pub url: Url,
    /// Auth, content and version headers.
    pub headers: HeaderMap,
    /// JSON body for write operations.
    pub body: Option<Payload>,
    /// Per-attempt timeout.
    pub timeout: Option<Duration>,
}

/// Status and body of one completed exchange.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    /// The HTTP status code.
    pub status: StatusCode,
    /// The raw response body.
    pub body: String,
}

impl RawResponse {
    /// Creates a response from a status and body.
    pub fn new(status: StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }
}

/// What one attempt produced.
#[derive(Debug)]
pub(crate) enum Outcome {
    /// A response that goes straight to validation.
    Complete(RawResponse),
    /// A transient failure worth another attempt.
    Transient(Error),
    /// A failure retrying will not fix.
    Fatal(Error),
}

/// Classifies the result of one attempt.
///
/// Statuses 500-504 and network failures are transient; every other response,
/// including 4xx, completes the request.
pub(crate) fn classify(result: Result<RawResponse>) -> Outcome {
    match result {
        Ok(raw) if retry::is_transient_status(raw.status) => {
            let body = response::parse_body(&raw.body).unwrap_or_default();
            Outcome::Transient(response::http_error(raw.status, &body, &raw.body))
        }
        Ok(raw) => Outcome::Complete(raw),
        Err(error) if error.is_retryable() => Outcome::Transient(error),
        Err(error) => Outcome::Fatal(error),
    }
}

/// Logs the final exchange and runs it through the validator.
pub(crate) fn finish<T: DeserializeOwned>(
    request: &ApiRequest,
    raw: RawResponse,
    attempts: usize,
    latency: Duration,
) -> Result<T> {
    tracing::info!(
        status = raw.status.as_u16(),
        latency_ms = latency.as_millis(),
        attempts = attempts,
        method = %request.method,
        path = %request.path,
        "Received HTTP response"
    );

    if raw.status.is_client_error() {
        tracing::error!(
            status = raw.status.as_u16(),
            response = %raw.body,
            "Client error (4xx)"
        );
    }

    response::validate(raw.status, &raw.body)
}

/// The async transport. Suspends only while waiting on the network and while
/// sleeping between attempts.
pub struct AsyncTransport {
    config: TransportConfig,
    session: Box<dyn Session>,
}

impl AsyncTransport {
    /// Creates a transport that sends through `session`.
    pub fn new(config: TransportConfig, session: impl Session + 'static) -> Self {
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
    pub async fn execute<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
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

            match classify(self.session.send(&prepared).await) {
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
                    tokio::time::sleep(delay).await;
                }
            }
        }

        Err(Error::max_retries_reached(&request.method, &request.path))
    }
}

impl fmt::Debug for AsyncTransport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl Transport for AsyncTransport {
    type Output<'a, T>
        = BoxFuture<'a, Result<T>>
    where
        Self: 'a,
        T: 'a;

    fn request<'a, T>(&'a self, request: ApiRequest) -> Self::Output<'a, T>
    where
        T: DeserializeOwned + Send + 'a,
    {
        Box::pin(self.execute(request))
    }

    fn reject<'a, T>(&'a self, error: Error) -> Self::Output<'a, T>
    where
        T: Send + 'a,
    {
        Box::pin(futures::future::ready(Err(error)))
    }

    fn close(&self) -> Self::Output<'_, ()> {
        Box::pin(async move {
            self.session.close().await;
            Ok(())
        })
    }
}
