//! Error types for Autumn API calls.
//!
//! Every failure surfaces to the immediate caller as an [`Error`]. Errors that
//! came back from the API keep the raw response body so they can be logged or
//! inspected without re-running the request.

use http::StatusCode;

/// Message used when an error response carries no `message` field.
pub const DEFAULT_ERROR_MESSAGE: &str = "No error message provided.";

/// Code used when an error response carries no `code` field.
pub const DEFAULT_ERROR_CODE: &str = "unknown_error";

/// The main error type for Autumn API calls.
///
/// # Examples
///
/// ```no_run
/// use autumn::{models::AttachParams, Client, Error};
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::new("am_sk_test_123")?;
///
/// match client.attach(&AttachParams::product("user_123", "pro")).await {
///     Ok(response) => println!("checkout: {:?}", response.checkout_url),
///     Err(Error::Http { status, code, message, .. }) => {
///         eprintln!("HTTP {status} [{code}]: {message}");
///     }
///     Err(Error::Validation { message, raw_response, .. }) => {
///         eprintln!("unexpected response shape: {message}");
///         eprintln!("  body: {raw_response}");
///     }
///     Err(e) => eprintln!("other error: {e}"),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The call-site arguments broke a contract of the remote operation, such
    /// as passing both `product_id` and `product_ids` to attach.
    ///
    /// Raised before anything is sent over the wire.
    #[error("Precondition failed: {0}")]
    Precondition(String),

    /// A network-level error occurred (connection refused or reset, DNS
    /// failure, broken body stream).
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The request attempt exceeded the configured timeout.
    #[error("Request timed out")]
    Timeout,

    /// A successful response did not have the shape of the expected model.
    ///
    /// # Fields
    ///
    /// * `message` - First failure, its field path and its kind
    /// * `code` - Always `validation_error`
    /// * `raw_response` - The body that failed to validate
    #[error("{code}: {message}")]
    Validation {
        /// Failure description including the offending field path.
        message: String,
        /// Machine-readable code.
        code: String,
        /// The raw response body.
        raw_response: String,
    },

    /// The API answered with a status outside `200..300`.
    ///
    /// `message` and `code` are taken from the response body, falling back to
    /// [`DEFAULT_ERROR_MESSAGE`] and [`DEFAULT_ERROR_CODE`].
    #[error("HTTP error {status} ({code}): {message}")]
    Http {
        /// Error message reported by the API.
        message: String,
        /// Machine-readable code reported by the API.
        code: String,
        /// The HTTP status code.
        status: StatusCode,
        /// The raw response body.
        raw_response: String,
    },

    /// Invalid client configuration, such as an empty token or a header value
    /// that cannot be sent.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Call-site arguments could not be turned into a JSON payload.
    #[error("Failed to serialize request: {0}")]
    Serialization(String),

    /// An invalid URL was provided or produced.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl Error {
    /// Wraps a `reqwest` failure, separating timeouts from other network errors.
    pub(crate) fn from_reqwest(error: reqwest::Error) -> Self {
        if error.is_timeout() {
            Error::Timeout
        } else {
            Error::Network(error)
        }
    }

    /// Returns the error the transport raises when its attempt loop ends
    /// without an outcome.
    pub(crate) fn max_retries_reached(method: &http::Method, path: &str) -> Self {
        Error::Http {
            message: format!("Max retries reached for {method} {path}"),
            code: "max_retries_reached".to_string(),
            status: StatusCode::INTERNAL_SERVER_ERROR,
            raw_response: String::new(),
        }
    }

    /// Returns `true` if this error is transient and the request may be
    /// attempted again.
    ///
    /// Network errors, timeouts and HTTP statuses 500 through 504 are
    /// transient. Everything else, including 429 and validation failures, is
    /// not.
    ///
    /// # Examples
    ///
    /// ```
    /// use autumn::Error;
    /// use http::StatusCode;
    ///
    /// let err = Error::Http {
    ///     message: "upstream unavailable".to_string(),
    ///     code: "unknown_error".to_string(),
    ///     status: StatusCode::SERVICE_UNAVAILABLE,
    ///     raw_response: String::new(),
    /// };
    /// assert!(err.is_retryable());
    ///
    /// let err = Error::Http {
    ///     message: "not found".to_string(),
    ///     code: "not_found".to_string(),
    ///     status: StatusCode::NOT_FOUND,
    ///     raw_response: String::new(),
    /// };
    /// assert!(!err.is_retryable());
    /// ```
    pub fn is_retryable(&self) -> bool {
        match self {
            Error::Network(_) => true,
            Error::Timeout => true,
            Error::Http { status, .. } => crate::retry::is_transient_status(*status),
            Error::Precondition(_) => false,
            Error::Validation { .. } => false,
            Error::Configuration(_) => false,
            Error::Serialization(_) => false,
            Error::InvalidUrl(_) => false,
        }
    }

    /// Returns the machine-readable code for this error.
    pub fn code(&self) -> &str {
        match self {
            Error::Precondition(_) => "precondition_failed",
            Error::Network(_) => "network_error",
            Error::Timeout => "timeout",
            Error::Validation { code, .. } => code,
            Error::Http { code, .. } => code,
            Error::Configuration(_) => "configuration_error",
            Error::Serialization(_) => "serialization_error",
            Error::InvalidUrl(_) => "invalid_url",
        }
    }

    /// Returns the HTTP status code for API errors.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Returns the raw response body if this error has one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::Http { raw_response, .. } => Some(raw_response),
            Error::Validation { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }
}

/// A specialized `Result` type for Autumn API calls.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    fn http_error(status: StatusCode) -> Error {
        Error::Http {
            message: "boom".to_string(),
            code: "boom".to_string(),
            status,
            raw_response: "{}".to_string(),
        }
    }

    #[test]
    fn test_only_500_to_504_are_retryable() {
        assert!(http_error(StatusCode::INTERNAL_SERVER_ERROR).is_retryable());
        assert!(http_error(StatusCode::GATEWAY_TIMEOUT).is_retryable());
        assert!(!http_error(StatusCode::HTTP_VERSION_NOT_SUPPORTED).is_retryable());
        assert!(!http_error(StatusCode::TOO_MANY_REQUESTS).is_retryable());
        assert!(!http_error(StatusCode::BAD_REQUEST).is_retryable());
        assert!(Error::Timeout.is_retryable());
        assert!(!Error::Precondition("x".to_string()).is_retryable());
    }

    #[test]
    fn test_max_retries_reached_shape() {
        let err = Error::max_retries_reached(&http::Method::POST, "/attach");
        assert_eq!(err.code(), "max_retries_reached");
        assert_eq!(err.status(), Some(StatusCode::INTERNAL_SERVER_ERROR));
        assert!(err.to_string().contains("POST /attach"));
    }

    #[test]
    fn test_codes() {
        assert_eq!(Error::Timeout.code(), "timeout");
        assert_eq!(
            Error::Configuration("x".to_string()).code(),
            "configuration_error"
        );
        assert_eq!(http_error(StatusCode::NOT_FOUND).raw_response(), Some("{}"));
    }
}
