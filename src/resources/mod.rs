//! Resource clients grouping the non-core endpoints.
//!
//! Each resource borrows the facade's transport, so the same methods serve
//! the async and the blocking client. Path parameters are taken from the
//! params record and kept out of the body.

mod customers;
mod entities;
mod features;
mod products;

pub use customers::Customers;
pub use entities::Entities;
pub use features::Features;
pub use products::Products;

use crate::payload::OperationParams;
use crate::request::ApiRequest;
use crate::transport::Transport;
use http::Method;
use serde::de::DeserializeOwned;

/// Builds the payload for `params` and sends it, or rejects the call if the
/// payload cannot be built.
pub(crate) fn send<'a, T, P, R>(
    transport: &'a T,
    method: Method,
    path: String,
    params: &P,
    ignore: &[&str],
) -> T::Output<'a, R>
where
    T: Transport,
    P: OperationParams,
    R: DeserializeOwned + Send + 'a,
{
    match params.to_payload(ignore) {
        Ok(payload) => transport.request(ApiRequest::new(method, path).with_body(payload)),
        Err(error) => transport.reject(error),
    }
}

/// Percent-encodes one path segment.
pub(crate) fn segment(value: &str) -> String {
    url::form_urlencoded::byte_serialize(value.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}
