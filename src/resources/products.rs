use super::{segment, send};
use crate::models::{
    CancelProductParams, CreateProductParams, CreateProductResponse, Empty, GetProductResponse,
    ListProductResponse, ProductCancelResponse, RedeemReferralParams, ReferralCodeParams,
    ReferralCodeResponse, ReferralRedeemResponse, UpdateProductParams,
};
use crate::request::ApiRequest;
use crate::transport::Transport;
use http::Method;

/// Product, cancellation and referral endpoints.
#[derive(Debug)]
pub struct Products<'a, T> {
    transport: &'a T,
}

impl<'a, T: Transport> Products<'a, T> {
    pub(crate) fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    /// Creates a product definition.
    pub fn create(&self, params: &CreateProductParams) -> T::Output<'a, CreateProductResponse> {
        send(
            self.transport,
            Method::POST,
            "/products".to_string(),
            params,
            &[],
        )
    }

    /// Fetches a product by id.
    pub fn get(&self, product_id: &str) -> T::Output<'a, GetProductResponse> {
        self.transport
            .request(ApiRequest::get(format!("/products/{}", segment(product_id))))
    }

    /// Updates a product definition.
    pub fn update(&self, params: &UpdateProductParams) -> T::Output<'a, GetProductResponse> {
        send(
            self.transport,
            Method::POST,
            format!("/products/{}", segment(&params.id)),
            params,
            &["id"],
        )
    }

    /// Deletes a product definition.
    pub fn delete(&self, product_id: &str) -> T::Output<'a, Empty> {
        self.transport
            .request(ApiRequest::delete(format!("/products/{}", segment(product_id))))
    }

    /// Lists products, with scenarios relative to `customer_id` when given.
    pub fn list(&self, customer_id: Option<&str>) -> T::Output<'a, ListProductResponse> {
        let mut request = ApiRequest::get("/products");
        if let Some(customer_id) = customer_id {
            request = request.with_query_param("customer_id", customer_id);
        }
        self.transport.request(request)
    }

    /// Cancels a customer's product.
    pub fn cancel(&self, params: &CancelProductParams) -> T::Output<'a, ProductCancelResponse> {
        send(
            self.transport,
            Method::POST,
            "/products/cancel".to_string(),
            params,
            &[],
        )
    }

    /// Creates or fetches the customer's code for a referral program.
    pub fn referral_code(
        &self,
        params: &ReferralCodeParams,
    ) -> T::Output<'a, ReferralCodeResponse> {
        send(
            self.transport,
            Method::POST,
            "/referrals/code".to_string(),
            params,
            &[],
        )
    }

    /// Redeems a referral code for a customer.
    pub fn redeem_referral_code(
        &self,
        params: &RedeemReferralParams,
    ) -> T::Output<'a, ReferralRedeemResponse> {
        send(
            self.transport,
            Method::POST,
            "/referrals/redeem".to_string(),
            params,
            &[],
        )
    }
}
