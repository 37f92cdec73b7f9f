//! Description of one logical API request.

use crate::payload::Payload;
use http::Method;

/// One logical request to the Autumn API: method, versioned path, query
/// parameters and an optional JSON body.
///
/// Write operations carry a body; reads carry query parameters.
///
/// # Examples
///
/// ```
/// use autumn::request::ApiRequest;
/// use http::Method;
///
/// let request = ApiRequest::get("/components/pricing_table")
///     .with_query_param("customer_id", "user_123");
///
/// assert_eq!(request.method, Method::GET);
/// assert_eq!(request.query, vec![("customer_id".to_string(), "user_123".to_string())]);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    /// The HTTP method.
    pub method: Method,

    /// Path below the versioned base URL, starting with `/`.
    pub path: String,

    /// Query parameters, in order. A key may repeat.
    pub query: Vec<(String, String)>,

    /// JSON body for write operations.
    pub body: Option<Payload>,
}

impl ApiRequest {
    /// Creates a request with the given method and path.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// Creates a `GET` request.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Creates a `POST` request carrying `payload`.
    pub fn post(path: impl Into<String>, payload: Payload) -> Self {
        Self::new(Method::POST, path).with_body(payload)
    }

    /// Creates a `DELETE` request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Sets the JSON body.
    pub fn with_body(mut self, payload: Payload) -> Self {
        self.body = Some(payload);
        self
    }

    /// Appends a query parameter.
    pub fn with_query_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Appends one query parameter per value, all under `key`.
    pub fn with_query_values<I, V>(mut self, key: &str, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.query
            .extend(values.into_iter().map(|value| (key.to_string(), value.into())));
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_repeated_query_values() {
        let request = ApiRequest::get("/customers/c1/entities/e1")
            .with_query_values("expand", ["invoices", "trials_used"]);

        assert_eq!(
            request.query,
            vec![
                ("expand".to_string(), "invoices".to_string()),
                ("expand".to_string(), "trials_used".to_string()),
            ]
        );
        assert!(request.body.is_none());
    }

    #[test]
    fn test_post_carries_body() {
        let payload = json!({"customer_id": "c1"}).as_object().cloned().unwrap();
        let request = ApiRequest::post("/attach", payload.clone());

        assert_eq!(request.method, Method::POST);
        assert_eq!(request.body, Some(payload));
        assert!(request.query.is_empty());
    }
}
