//! Response validation.
//!
//! Every completed exchange goes through two checks, in order: the status code
//! ([`check_response`]) and then the shape of the body ([`build_model`]). A
//! 4xx or 5xx with a well-formed error body therefore surfaces as
//! [`Error::Http`], never as [`Error::Validation`].

use crate::error::{DEFAULT_ERROR_CODE, DEFAULT_ERROR_MESSAGE};
use crate::{Error, Result};
use http::StatusCode;
use serde::de::DeserializeOwned;
use serde_json::{error::Category, Value};

/// Code carried by every [`Error::Validation`].
pub const VALIDATION_ERROR_CODE: &str = "validation_error";

/// Validates a completed exchange and builds the expected model.
///
/// # Examples
///
/// ```
/// use autumn::response::validate;
/// use http::StatusCode;
/// use serde::Deserialize;
///
/// #[derive(Debug, Deserialize)]
/// struct Portal { url: String }
///
/// let portal: Portal = validate(StatusCode::OK, r#"{"url": "https://x"}"#).unwrap();
/// assert_eq!(portal.url, "https://x");
///
/// let err = validate::<Portal>(StatusCode::NOT_FOUND, r#"{"message": "nope"}"#).unwrap_err();
/// assert_eq!(err.status(), Some(StatusCode::NOT_FOUND));
/// ```
pub fn validate<T: DeserializeOwned>(status: StatusCode, raw: &str) -> Result<T> {
    let body = parse_body(raw).unwrap_or(Value::Null);
    check_response(status, &body, raw)?;
    build_model(raw)
}

/// Parses a raw body as JSON. An empty body reads as an empty object.
pub fn parse_body(raw: &str) -> Option<Value> {
    if raw.trim().is_empty() {
        return Some(Value::Object(Default::default()));
    }
    serde_json::from_str(raw).ok()
}

/// Returns an [`Error::Http`] for any status outside `200..300`.
///
/// `message` and `code` come from the body when present, otherwise
/// [`DEFAULT_ERROR_MESSAGE`] and [`DEFAULT_ERROR_CODE`].
pub fn check_response(status: StatusCode, body: &Value, raw: &str) -> Result<()> {
    if status.is_success() {
        return Ok(());
    }
    Err(http_error(status, body, raw))
}

/// Builds the [`Error::Http`] describing an error response.
pub fn http_error(status: StatusCode, body: &Value, raw: &str) -> Error {
    let field = |name: &str, default: &str| {
        body.get(name)
            .and_then(Value::as_str)
            .unwrap_or(default)
            .to_string()
    };

    Error::Http {
        message: field("message", DEFAULT_ERROR_MESSAGE),
        code: field("code", DEFAULT_ERROR_CODE),
        status,
        raw_response: raw.to_string(),
    }
}

/// Deserializes `raw` into `T`.
///
/// # Errors
///
/// Returns [`Error::Validation`] naming the first failure, the field path it
/// occurred at and its kind; the raw body is attached for diagnostics.
pub fn build_model<T: DeserializeOwned>(raw: &str) -> Result<T> {
    let text = if raw.trim().is_empty() { "{}" } else { raw };
    let mut deserializer = serde_json::Deserializer::from_str(text);

    let model = serde_path_to_error::deserialize(&mut deserializer).map_err(|e| {
        let path = e.path().to_string();
        validation_error(&e.into_inner(), &path, raw)
    })?;
    deserializer
        .end()
        .map_err(|e| validation_error(&e, ".", raw))?;

    Ok(model)
}

fn validation_error(error: &serde_json::Error, path: &str, raw: &str) -> Error {
    let message = format!("{} at {} with code {}", error, path, category_code(error));

    tracing::error!(
        error = %message,
        raw_response = %raw,
        "Failed to validate response"
    );

    Error::Validation {
        message,
        code: VALIDATION_ERROR_CODE.to_string(),
        raw_response: raw.to_string(),
    }
}

fn category_code(error: &serde_json::Error) -> &'static str {
    match error.classify() {
        Category::Io => "io",
        Category::Syntax => "syntax",
        Category::Data => "data",
        Category::Eof => "eof",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Feature {
        id: String,
        name: String,
        unlimited: Option<bool>,
        interval: Option<Interval>,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    #[serde(rename_all = "snake_case")]
    enum Interval {
        Hour,
        Day,
    }

    #[derive(Debug, Deserialize)]
    struct Wrapper {
        #[allow(dead_code)]
        features: Vec<Feature>,
    }

    #[test]
    fn test_success_statuses_never_raise() {
        let body = json!({"mock": "data"});
        for code in 200..300u16 {
            let status = StatusCode::from_u16(code).unwrap();
            assert!(check_response(status, &body, "").is_ok(), "status {code}");
        }
    }

    #[test]
    fn test_non_success_statuses_raise() {
        let body = json!({"mock": "data"});
        for code in [300u16, 301, 400, 404, 422, 500, 503] {
            let status = StatusCode::from_u16(code).unwrap();
            let err = check_response(status, &body, "{}").unwrap_err();
            assert_eq!(err.status(), Some(status));
            assert_eq!(err.code(), "unknown_error");
            assert!(err.to_string().contains("No error message provided."));
        }
    }

    #[test]
    fn test_http_error_uses_body_fields() {
        let body = json!({"message": "not found", "code": "not_found"});
        let raw = body.to_string();
        let err = check_response(StatusCode::NOT_FOUND, &body, &raw).unwrap_err();

        match err {
            Error::Http {
                message,
                code,
                status,
                raw_response,
            } => {
                assert_eq!(message, "not found");
                assert_eq!(code, "not_found");
                assert_eq!(status, StatusCode::NOT_FOUND);
                assert_eq!(raw_response, raw);
            }
            other => panic!("Expected Http, got {:?}", other),
        }
    }

    #[test]
    fn test_missing_field_names_its_path() {
        let raw = r#"{"features": [{"id": "f1", "name": "Seats"}, {"id": "f2"}]}"#;
        let err = build_model::<Wrapper>(raw).unwrap_err();

        match err {
            Error::Validation {
                message,
                code,
                raw_response,
            } => {
                assert!(message.contains("missing field `name`"), "{message}");
                assert!(message.contains("features[1]"), "{message}");
                assert!(message.contains("with code data"), "{message}");
                assert_eq!(code, "validation_error");
                assert_eq!(raw_response, raw);
            }
            other => panic!("Expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_trailing_bytes_after_body_are_rejected() {
        let raw = r#"{"id": "f1", "name": "Seats"} <html>garbage"#;
        let err = validate::<Feature>(StatusCode::OK, raw).unwrap_err();

        match err {
            Error::Validation {
                message,
                code,
                raw_response,
            } => {
                assert!(message.contains("trailing characters"), "{message}");
                assert!(message.contains("with code syntax"), "{message}");
                assert_eq!(code, "validation_error");
                assert_eq!(raw_response, raw);
            }
            other => panic!("Expected Validation, got {:?}", other),
        }

        assert!(build_model::<Feature>(r#"{"id": "f1", "name": "Seats"}{"id": "f2"}"#).is_err());
        assert!(build_model::<Feature>("{\"id\": \"f1\", \"name\": \"Seats\"}\n").is_ok());
    }

    #[test]
    fn test_bad_enum_value_is_validation_error() {
        let raw = r#"{"id": "mock_id", "name": "John Doe", "unlimited": false, "interval": "chocolate"}"#;
        let err = build_model::<Feature>(raw).unwrap_err();
        assert_eq!(err.code(), "validation_error");
        assert!(err.to_string().contains("interval"));
    }

    #[test]
    fn test_error_status_wins_over_shape() {
        let raw = r#"{"message": "bad product", "code": "invalid_product"}"#;
        let err = validate::<Feature>(StatusCode::BAD_REQUEST, raw).unwrap_err();
        assert_eq!(err.code(), "invalid_product");
        assert_eq!(err.status(), Some(StatusCode::BAD_REQUEST));
    }

    #[test]
    fn test_non_json_error_body_gets_defaults() {
        let err = validate::<Feature>(StatusCode::BAD_GATEWAY, "<html>oops</html>").unwrap_err();
        assert_eq!(err.code(), "unknown_error");
        assert_eq!(err.raw_response(), Some("<html>oops</html>"));
    }

    #[test]
    fn test_empty_success_body_reads_as_object() {
        #[derive(Deserialize)]
        struct Empty {}

        assert!(validate::<Empty>(StatusCode::OK, "").is_ok());
        assert!(validate::<Empty>(StatusCode::OK, r#"{"success": true}"#).is_ok());
    }

    #[test]
    fn test_valid_body_builds_model() {
        let raw = r#"{"id": "f1", "name": "Seats", "interval": "hour"}"#;
        let feature: Feature = validate(StatusCode::OK, raw).unwrap();
        assert_eq!(
            feature,
            Feature {
                id: "f1".to_string(),
                name: "Seats".to_string(),
                unlimited: None,
                interval: Some(Interval::Hour),
            }
        );
    }
}
