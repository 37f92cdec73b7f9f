use super::{PreparedRequest, RawResponse};
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Mutex, PoisonError};

/// Performs exactly one HTTP attempt. Retries are the transport's job.
///
/// Implement this to route requests through something other than `reqwest`,
/// or to script responses in tests.
#[async_trait]
pub trait Session: Send + Sync {
    /// Sends `request` once and returns the status and body.
    async fn send(&self, request: &PreparedRequest) -> Result<RawResponse>;

    /// Releases pooled connections. Must be idempotent.
    async fn close(&self);
}

/// The default [`Session`], backed by a lazily created `reqwest::Client`.
///
/// After [`close`](Session::close) the next request opens a new connection
/// pool. A session built with [`with_client`](HttpSession::with_client)
/// reopens with a clone of the injected client, so its proxy, TLS and
/// timeout settings survive a close.
#[derive(Debug, Default)]
pub struct HttpSession {
    template: Option<reqwest::Client>,
    client: Mutex<Option<reqwest::Client>>,
}

impl HttpSession {
    /// Creates a session that opens its connection pool on first use.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a session around an existing `reqwest::Client`.
    pub fn with_client(client: reqwest::Client) -> Self {
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

    fn client(&self) -> Result<reqwest::Client> {
        let mut slot = self.client.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(client) = slot.as_ref() {
            return Ok(client.clone());
        }

        let client = match &self.template {
            Some(template) => template.clone(),
            None => reqwest::Client::builder().build().map_err(|e| {
                Error::Configuration(format!("Failed to build HTTP client: {}", e))
            })?,
        };
        *slot = Some(client.clone());
        Ok(client)
    }
}

#[async_trait]
impl Session for HttpSession {
    async fn send(&self, request: &PreparedRequest) -> Result<RawResponse> {
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

        let response = builder.send().await.map_err(Error::from_reqwest)?;
        let status = response.status();
        let body = response.text().await.map_err(Error::from_reqwest)?;

        Ok(RawResponse { status, body })
    }

    async fn close(&self) {
        let client = self
            .client
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();

        if client.is_some() {
            tracing::debug!("Closed HTTP session");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::{HeaderMap, Method};
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_close_is_idempotent_and_reopens() {
        let session = HttpSession::new();
        assert!(!session.is_open());

        session.client().unwrap();
        assert!(session.is_open());

        session.close().await;
        session.close().await;
        assert!(!session.is_open());

        session.client().unwrap();
        assert!(session.is_open());
    }

    #[tokio::test]
    async fn test_injected_client_survives_close() {
        let mock_server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/v1/products"))
            .and(header("x-tenant", "acme"))
            .respond_with(ResponseTemplate::new(200).set_body_string("{}"))
            .expect(2)
            .mount(&mock_server)
            .await;

        let mut default_headers = HeaderMap::new();
        default_headers.insert("x-tenant", "acme".parse().unwrap());
        let injected = reqwest::Client::builder()
            .default_headers(default_headers)
            .build()
            .unwrap();
        let session = HttpSession::with_client(injected);

        let request = PreparedRequest {
            method: Method::GET,
            url: format!("{}/v1/products", mock_server.uri()).parse().unwrap(),
            headers: HeaderMap::new(),
            body: None,
            timeout: None,
        };

        assert_eq!(session.send(&request).await.unwrap().status, 200);
        session.close().await;
        assert!(!session.is_open());
        assert_eq!(session.send(&request).await.unwrap().status, 200);
    }
}
