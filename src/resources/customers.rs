use super::{segment, send};
use crate::models::{
    BillingPortalParams, BillingPortalResponse, CreateCustomerParams, Customer, Empty,
    PricingTableResponse, UpdateCustomerParams,
};
use crate::request::ApiRequest;
use crate::transport::Transport;
use http::Method;

/// Customer endpoints.
///
/// # Examples
///
/// ```no_run
/// use autumn::models::{BillingPortalParams, CreateCustomerParams};
///
/// # async fn example() -> Result<(), autumn::Error> {
/// let client = autumn::Client::new("am_sk_test_123")?;
///
/// let customer = client
///     .customers()
///     .create(&CreateCustomerParams {
///         id: "user_123".to_string(),
///         email: Some("jane@example.com".to_string()),
///         ..Default::default()
///     })
///     .await?;
///
/// let portal = client
///     .customers()
///     .billing_portal(&BillingPortalParams {
///         customer_id: "user_123".to_string(),
///         return_url: Some("https://example.com/account".to_string()),
///     })
///     .await?;
/// println!("{:?} -> {}", customer.id, portal.url);
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct Customers<'a, T> {
    transport: &'a T,
}

impl<'a, T: Transport> Customers<'a, T> {
    pub(crate) fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    /// Fetches a customer by id.
    pub fn get(&self, customer_id: &str) -> T::Output<'a, Customer> {
        self.transport
            .request(ApiRequest::get(format!("/customers/{}", segment(customer_id))))
    }

    /// Creates a customer.
    pub fn create(&self, params: &CreateCustomerParams) -> T::Output<'a, Customer> {
        send(
            self.transport,
            Method::POST,
            "/customers".to_string(),
            params,
            &[],
        )
    }

    /// Updates a customer's properties.
    pub fn update(&self, params: &UpdateCustomerParams) -> T::Output<'a, Customer> {
        send(
            self.transport,
            Method::POST,
            format!("/customers/{}", segment(&params.customer_id)),
            params,
            &["customer_id"],
        )
    }

    /// Deletes a customer.
    pub fn delete(&self, customer_id: &str) -> T::Output<'a, Empty> {
        self.transport
            .request(ApiRequest::delete(format!("/customers/{}", segment(customer_id))))
    }

    /// Opens a billing portal session.
    pub fn billing_portal(
        &self,
        params: &BillingPortalParams,
    ) -> T::Output<'a, BillingPortalResponse> {
        send(
            self.transport,
            Method::POST,
            format!("/customers/{}/billing_portal", segment(&params.customer_id)),
            params,
            &["customer_id"],
        )
    }

    /// Fetches the pricing table component as seen by `customer_id`.
    pub fn pricing_table(&self, customer_id: &str) -> T::Output<'a, PricingTableResponse> {
        self.transport.request(
            ApiRequest::get("/components/pricing_table")
                .with_query_param("customer_id", customer_id),
        )
    }
}
