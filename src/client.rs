use crate::config::ClientBuilder;
use crate::models::{
    AttachParams, AttachResponse, CheckParams, CheckResponse, CheckoutParams, CheckoutResponse,
    QueryParams, QueryResponse, TrackParams, TrackResponse,
};
use crate::payload::OperationParams;
use crate::resources::{self, Customers, Entities, Features, Products};
use crate::transport::{AsyncTransport, Transport};
use crate::Result;
use http::Method;

/// The Autumn API client.
///
/// `Client` (the default) is async; [`crate::blocking::Client`] exposes the
/// same methods with blocking calls. A client owns one HTTP session and may
/// be shared across tasks behind an `Arc`.
///
/// # Examples
///
/// ```no_run
/// use autumn::models::{AttachParams, CheckParams, TrackParams};
/// use autumn::Client;
///
/// # async fn example() -> Result<(), autumn::Error> {
/// let client = Client::new("am_sk_test_123")?;
///
/// let attached = client.attach(&AttachParams::product("user_123", "pro")).await?;
/// if let Some(url) = attached.checkout_url {
///     println!("Send the customer to {url}");
/// }
///
/// let check = client.check(&CheckParams::feature("user_123", "messages")).await?;
/// if check.allowed {
///     client.track(&TrackParams::feature("user_123", "messages")).await?;
/// }
///
/// client.close().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Client<T = AsyncTransport> {
    transport: T,
}

impl Client {
    /// Creates an async client with default settings.
    ///
    /// # Errors
    ///
    /// Returns an error if `token` is empty.
    pub fn new(token: impl Into<String>) -> Result<Self> {
        ClientBuilder::new(token).build()
    }

    /// Creates a builder for configuring a client.
    pub fn builder(token: impl Into<String>) -> ClientBuilder {
        ClientBuilder::new(token)
    }
}

impl<T: Transport> Client<T> {
    /// Wraps an existing transport.
    pub fn from_transport(transport: T) -> Self {
        Self { transport }
    }

    /// Returns the underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Customer endpoints.
    pub fn customers(&self) -> Customers<'_, T> {
        Customers::new(&self.transport)
    }

    /// Product, cancellation and referral endpoints.
    pub fn products(&self) -> Products<'_, T> {
        Products::new(&self.transport)
    }

    /// Balance endpoints.
    pub fn features(&self) -> Features<'_, T> {
        Features::new(&self.transport)
    }

    /// Entity endpoints.
    pub fn entities(&self) -> Entities<'_, T> {
        Entities::new(&self.transport)
    }

    /// Attaches one or more products to a customer.
    ///
    /// Fails with [`crate::Error::Precondition`] before any request is made
    /// unless exactly one of `product_id` and `product_ids` is set.
    pub fn attach(&self, params: &AttachParams) -> T::Output<'_, AttachResponse> {
        self.core(Method::POST, "/attach", params, AttachParams::validate)
    }

    /// Checks whether a customer may use a feature or product.
    ///
    /// Fails with [`crate::Error::Precondition`] unless `product_id` or
    /// `feature_id` is set.
    pub fn check(&self, params: &CheckParams) -> T::Output<'_, CheckResponse> {
        self.core(Method::POST, "/check", params, CheckParams::validate)
    }

    /// Records usage of a feature or a named event.
    ///
    /// Fails with [`crate::Error::Precondition`] unless `feature_id` or
    /// `event_name` is non-empty.
    pub fn track(&self, params: &TrackParams) -> T::Output<'_, TrackResponse> {
        self.core(Method::POST, "/track", params, TrackParams::validate)
    }

    /// Creates a checkout session for a product.
    pub fn checkout(&self, params: &CheckoutParams) -> T::Output<'_, CheckoutResponse> {
        self.core(Method::POST, "/checkout", params, |_| Ok(()))
    }

    /// Queries usage analytics for one or more features.
    pub fn query(&self, params: &QueryParams) -> T::Output<'_, QueryResponse> {
        self.core(Method::POST, "/query", params, |_| Ok(()))
    }

    /// Closes the HTTP session. Closing twice is a no-op; a later call opens
    /// a new session.
    pub fn close(&self) -> T::Output<'_, ()> {
        self.transport.close()
    }

    fn core<'a, P, R>(
        &'a self,
        method: Method,
        path: &str,
        params: &P,
        validate: impl FnOnce(&P) -> Result<()>,
    ) -> T::Output<'a, R>
    where
        P: OperationParams,
        R: serde::de::DeserializeOwned + Send + 'a,
    {
        if let Err(error) = validate(params) {
            tracing::debug!(
                operation = P::operation().name(),
                error = %error,
                "Rejected call before sending"
            );
            return self.transport.reject(error);
        }
        resources::send(&self.transport, method, path.to_string(), params, &[])
    }
}
