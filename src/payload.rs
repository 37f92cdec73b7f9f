//! Payload construction for remote operations.
//!
//! Every remote operation declares the parameter names it accepts as an
//! [`Operation`]. Building a payload keeps only declared parameters that carry
//! a non-null value and are not on the caller's ignore list, so optional
//! server-side fields are never overwritten with `null`.

use crate::{Error, Result};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

/// JSON object sent as a request body. Keys keep insertion order.
pub type Payload = Map<String, Value>;

/// Converts a snake_case name to camelCase.
///
/// # Examples
///
/// ```
/// use autumn::payload::to_camel_case;
///
/// assert_eq!(to_camel_case("product_ids"), "productIds");
/// assert_eq!(to_camel_case("customer_data"), "customerData");
/// assert_eq!(to_camel_case("range"), "range");
/// ```
pub fn to_camel_case(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut upper_next = false;
    for ch in name.chars() {
        if ch == '_' {
            upper_next = !out.is_empty();
        } else if upper_next {
            out.extend(ch.to_uppercase());
            upper_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}

/// Turns a typed value into plain JSON.
///
/// Records become objects (recursively), sequences become arrays of
/// decomposed elements and scalars pass through unchanged.
pub fn decompose<T: Serialize + ?Sized>(value: &T) -> Result<Value> {
    serde_json::to_value(value).map_err(|e| Error::Serialization(e.to_string()))
}

/// The declared parameter list of one remote operation.
///
/// The camelCase alias of every parameter is computed once, when the
/// operation is defined.
///
/// # Examples
///
/// ```
/// use autumn::payload::Operation;
/// use serde_json::json;
///
/// let op = Operation::new("attach", &["customer_id", "product_id", "product_ids"]);
/// let scope = json!({
///     "customer_id": "user_123",
///     "product_id": "pro",
///     "product_ids": null,
///     "open_in_new_tab": true,
/// });
///
/// let payload = op.build(scope.as_object().unwrap(), &[]);
/// assert_eq!(
///     serde_json::Value::Object(payload),
///     json!({"customer_id": "user_123", "product_id": "pro"}),
/// );
/// ```
#[derive(Debug, Clone)]
pub struct Operation {
    name: &'static str,
    params: Vec<(&'static str, String)>,
}

impl Operation {
    /// Declares an operation and its parameter names, in wire order.
    pub fn new(name: &'static str, params: &[&'static str]) -> Self {
        Self {
            name,
            params: params
                .iter()
                .map(|param| (*param, to_camel_case(param)))
                .collect(),
        }
    }

    /// Returns the operation name, used in logs.
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Returns the declared parameter names.
    pub fn params(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.params.iter().map(|(param, _)| *param)
    }

    /// Returns `true` if `key` is a declared parameter name.
    pub fn declares(&self, key: &str) -> bool {
        self.params.iter().any(|(param, _)| *param == key)
    }

    /// Builds a payload from `scope`, matching declared names exactly.
    ///
    /// Keys that are not declared, listed in `ignore`, or null are dropped.
    /// The result follows declaration order.
    pub fn build(&self, scope: &Map<String, Value>, ignore: &[&str]) -> Payload {
        self.collect(ignore, |param, _| present(scope.get(param)))
    }

    /// Builds a payload from inbound `scope` whose keys may be camelCase.
    ///
    /// A camelCase key is normalized to the declared snake_case name. When both
    /// forms of the same parameter carry a value, the exact declared name wins.
    pub fn build_lenient(&self, scope: &Map<String, Value>, ignore: &[&str]) -> Payload {
        self.collect(ignore, |param, camel| {
            present(scope.get(param)).or_else(|| present(scope.get(camel)))
        })
    }

    /// Serializes `params` and builds a payload from the resulting object.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] if `params` does not serialize to a
    /// JSON object.
    pub fn payload_of<P: Serialize>(&self, params: &P, ignore: &[&str]) -> Result<Payload> {
        match decompose(params)? {
            Value::Object(scope) => Ok(self.build(&scope, ignore)),
            other => Err(Error::Serialization(format!(
                "{} parameters must serialize to an object, got {}",
                self.name,
                kind_of(&other)
            ))),
        }
    }

    fn collect<'s, F>(&self, ignore: &[&str], mut lookup: F) -> Payload
    where
        F: FnMut(&str, &str) -> Option<&'s Value>,
    {
        let mut payload = Payload::new();
        for (param, camel) in &self.params {
            if ignore.contains(param) {
                continue;
            }
            if let Some(value) = lookup(param, camel.as_str()) {
                payload.insert((*param).to_string(), value.clone());
            }
        }
        payload
    }
}

/// A parameter record bound to the remote operation it feeds.
pub trait OperationParams: Serialize + DeserializeOwned {
    /// Returns the operation these parameters are declared for.
    fn operation() -> &'static Operation;

    /// Builds the request payload, leaving out the `ignore`d parameters.
    fn to_payload(&self, ignore: &[&str]) -> Result<Payload> {
        Self::operation().payload_of(self, ignore)
    }
}

fn present(value: Option<&Value>) -> Option<&Value> {
    value.filter(|value| !value.is_null())
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
