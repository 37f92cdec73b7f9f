//! Client configuration.
//!
//! [`ClientBuilder`] collects construction parameters and produces a
//! [`TransportConfig`], which the transports use to build URLs and headers.

use crate::retry::{BackoffConfig, RetryPolicy};
use crate::transport::{AsyncTransport, HttpSession, PreparedRequest, Session};
use crate::{request::ApiRequest, Client, Error, Result};
use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use http::{HeaderMap, HeaderName, HeaderValue};
use std::time::Duration;
use url::Url;

/// Production API endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.useautumn.com";

/// Path segment placed between the base URL and every endpoint path.
pub const API_VERSION_SEGMENT: &str = "v1";

/// Wire contract pinned by this client build, sent as `X-Api-Version`.
pub const PINNED_API_VERSION: &str = "1.4";

/// Per-attempt timeout applied unless overridden.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Environment variable read by [`ClientBuilder::from_env`] for the token.
pub const TOKEN_ENV_VAR: &str = "AUTUMN_SECRET_KEY";

/// Environment variable read by [`ClientBuilder::from_env`] for the base URL.
pub const BASE_URL_ENV_VAR: &str = "AUTUMN_BASE_URL";

const API_VERSION_HEADER: HeaderName = HeaderName::from_static("x-api-version");

/// Returns the `User-Agent` sent by this build, e.g. `autumn-rs/0.1.0 (Rust; linux)`.
pub fn default_user_agent() -> String {
    format!(
        "autumn-rs/{} (Rust; {})",
        env!("CARGO_PKG_VERSION"),
        std::env::consts::OS
    )
}

/// Resolved settings shared by every request of one client.
#[derive(Debug, Clone)]
pub struct TransportConfig {
    base_url: String,
    version: String,
    headers: HeaderMap,
    retry: RetryPolicy,
    timeout: Option<Duration>,
}

impl TransportConfig {
    /// Returns the base URL, without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the default headers attached to every request.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the retry policy.
    pub fn retry(&self) -> &RetryPolicy {
        &self.retry
    }

    /// Returns the per-attempt timeout.
    pub fn timeout(&self) -> Option<Duration> {
        self.timeout
    }

    /// Builds the full URL for `path`: `{base_url}/{version}{path}`.
    pub fn url_for(&self, path: &str) -> Result<Url> {
        Ok(Url::parse(&format!(
            "{}/{}{}",
            self.base_url, self.version, path
        ))?)
    }

    /// Resolves a logical request into what a session sends on every attempt.
    pub fn prepare(&self, request: &ApiRequest) -> Result<PreparedRequest> {
        let mut url = self.url_for(&request.path)?;
        if !request.query.is_empty() {
            url.query_pairs_mut().extend_pairs(request.query.iter());
        }

        Ok(PreparedRequest {
            method: request.method.clone(),
            url,
            headers: self.headers.clone(),
            body: request.body.clone(),
            timeout: self.timeout,
        })
    }
}

/// Builder for configuring and creating a [`Client`].
///
/// # Examples
///
/// ```no_run
/// use autumn::{retry::BackoffConfig, ClientBuilder};
/// use std::time::Duration;
///
/// # fn example() -> Result<(), autumn::Error> {
/// let client = ClientBuilder::new("am_sk_test_123")
///     .base_url("https://autumn.internal.example.com")?
///     .max_retries(3)
///     .backoff(BackoffConfig {
///         unit: Duration::from_millis(250),
///         max_delay: Duration::from_secs(10),
///     })
///     .timeout(Duration::from_secs(10))
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    token: String,
    base_url: String,
    version: String,
    api_version: String,
    user_agent: String,
    retry: RetryPolicy,
    timeout: Option<Duration>,
    http_client: Option<reqwest::Client>,
    #[cfg(feature = "blocking")]
    blocking_http_client: Option<reqwest::blocking::Client>,
}

impl ClientBuilder {
    /// Creates a builder for the given API token with default settings.
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            version: API_VERSION_SEGMENT.to_string(),
            api_version: PINNED_API_VERSION.to_string(),
            user_agent: default_user_agent(),
            retry: RetryPolicy::default(),
            timeout: Some(DEFAULT_TIMEOUT),
            http_client: None,
            #[cfg(feature = "blocking")]
            blocking_http_client: None,
        }
    }

    /// Creates a builder from `AUTUMN_SECRET_KEY` and, when set,
    /// `AUTUMN_BASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns an error if the token variable is missing or the base URL is
    /// invalid.
    pub fn from_env() -> Result<Self> {
        let token = std::env::var(TOKEN_ENV_VAR)
            .map_err(|_| Error::Configuration(format!("{TOKEN_ENV_VAR} is not set")))?;
        let builder = Self::new(token);

        match std::env::var(BASE_URL_ENV_VAR) {
            Ok(url) if !url.trim().is_empty() => builder.base_url(url),
            _ => Ok(builder),
        }
    }

    /// Points the client at another deployment, e.g. a self-hosted instance.
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        let url = url.as_ref().trim_end_matches('/');
        Url::parse(url)?;
        self.base_url = url.to_string();
        Ok(self)
    }

    /// Overrides the `X-Api-Version` header.
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Overrides the `User-Agent` header.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Sets how many times a transient failure is retried. Defaults to 5.
    pub fn max_retries(mut self, max_retries: usize) -> Self {
        self.retry.max_retries = max_retries;
        self
    }

    /// Sets the backoff tuning between retries.
    pub fn backoff(mut self, backoff: BackoffConfig) -> Self {
        self.retry.backoff = backoff;
        self
    }

    /// Sets the per-attempt timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Leaves attempts bounded only by the HTTP library's own defaults.
    pub fn no_timeout(mut self) -> Self {
        self.timeout = None;
        self
    }

    /// Uses a pre-built connection pool for the async client.
    pub fn http_client(mut self, client: reqwest::Client) -> Self {
        self.http_client = Some(client);
        self
    }

    /// Uses a pre-built connection pool for the blocking client.
    #[cfg(feature = "blocking")]
    pub fn blocking_http_client(mut self, client: reqwest::blocking::Client) -> Self {
        self.blocking_http_client = Some(client);
        self
    }

    /// Resolves the settings into a [`TransportConfig`].
    ///
    /// # Errors
    ///
    /// Returns an error if the token is empty or a header value is invalid.
    pub fn transport_config(&self) -> Result<TransportConfig> {
        if self.token.trim().is_empty() {
            return Err(Error::Configuration("API token is required".to_string()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("application/json"));
        headers.insert(USER_AGENT, header_value(&self.user_agent)?);
        headers.insert(API_VERSION_HEADER, header_value(&self.api_version)?);

        let mut authorization = header_value(&format!("Bearer {}", self.token))?;
        authorization.set_sensitive(true);
        headers.insert(AUTHORIZATION, authorization);

        Ok(TransportConfig {
            base_url: self.base_url.clone(),
            version: self.version.clone(),
            headers,
            retry: self.retry,
            timeout: self.timeout,
        })
    }

    /// Builds the async [`Client`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> Result<Client> {
        let config = self.transport_config()?;
        let session = match self.http_client {
            Some(client) => HttpSession::with_client(client),
            None => HttpSession::new(),
        };
        Ok(Client::from_transport(AsyncTransport::new(config, session)))
    }

    /// Builds an async [`Client`] on top of a custom [`Session`].
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build_with_session(self, session: impl Session + 'static) -> Result<Client> {
        let config = self.transport_config()?;
        Ok(Client::from_transport(AsyncTransport::new(config, session)))
    }

    /// Builds the blocking client.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    #[cfg(feature = "blocking")]
    pub fn build_blocking(self) -> Result<crate::blocking::Client> {
        let config = self.transport_config()?;
        let session = match self.blocking_http_client {
            Some(client) => crate::blocking::HttpSession::with_client(client),
            None => crate::blocking::HttpSession::new(),
        };
        Ok(Client::from_transport(crate::blocking::BlockingTransport::new(
            config, session,
        )))
    }

    /// Builds a blocking client on top of a custom blocking session.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    #[cfg(feature = "blocking")]
    pub fn build_blocking_with_session(
        self,
        session: impl crate::blocking::BlockingSession + 'static,
    ) -> Result<crate::blocking::Client> {
        let config = self.transport_config()?;
        Ok(Client::from_transport(crate::blocking::BlockingTransport::new(
            config, session,
        )))
    }
}

fn header_value(value: &str) -> Result<HeaderValue> {
    HeaderValue::try_from(value)
        .map_err(|e| Error::Configuration(format!("Invalid header value: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::Method;

    #[test]
    fn test_default_headers() {
        let config = ClientBuilder::new("am_sk_test").transport_config().unwrap();
        let headers = config.headers();

        assert_eq!(headers[CONTENT_TYPE], "application/json");
        assert_eq!(headers[ACCEPT], "application/json");
        assert_eq!(headers[AUTHORIZATION], "Bearer am_sk_test");
        assert!(headers[AUTHORIZATION].is_sensitive());
        assert_eq!(headers["x-api-version"], PINNED_API_VERSION);
        assert!(headers[USER_AGENT]
            .to_str()
            .unwrap()
            .starts_with("autumn-rs/"));
    }

    #[test]
    fn test_empty_token_is_rejected() {
        let err = ClientBuilder::new("  ").transport_config().unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_url_includes_version_segment() {
        let config = ClientBuilder::new("t")
            .base_url("http://localhost:8080/")
            .unwrap()
            .transport_config()
            .unwrap();

        assert_eq!(config.base_url(), "http://localhost:8080");
        assert_eq!(
            config.url_for("/attach").unwrap().as_str(),
            "http://localhost:8080/v1/attach"
        );
    }

    #[test]
    fn test_prepare_appends_query() {
        let config = ClientBuilder::new("t").transport_config().unwrap();
        let request = ApiRequest::get("/components/pricing_table")
            .with_query_param("customer_id", "user 1");

        let prepared = config.prepare(&request).unwrap();
        assert_eq!(prepared.method, Method::GET);
        assert_eq!(
            prepared.url.as_str(),
            "https://api.useautumn.com/v1/components/pricing_table?customer_id=user+1"
        );
        assert_eq!(prepared.timeout, Some(DEFAULT_TIMEOUT));
    }

    #[test]
    fn test_invalid_base_url() {
        assert!(matches!(
            ClientBuilder::new("t").base_url("not a url"),
            Err(Error::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_retry_settings() {
        let config = ClientBuilder::new("t")
            .max_retries(2)
            .no_timeout()
            .transport_config()
            .unwrap();
        assert_eq!(config.retry().attempts(), 3);
        assert_eq!(config.timeout(), None);
    }
}
