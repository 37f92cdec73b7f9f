use super::{segment, send};
use crate::models::{Empty, SetBalancesParams, SetUsageParams};
use crate::transport::Transport;
use http::Method;

/// Balance endpoints.
#[derive(Debug)]
pub struct Features<'a, T> {
    transport: &'a T,
}

impl<'a, T: Transport> Features<'a, T> {
    pub(crate) fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    /// Sets the absolute usage of one feature.
    pub fn set_usage(&self, params: &SetUsageParams) -> T::Output<'a, Empty> {
        send(
            self.transport,
            Method::POST,
            balances_path(&params.customer_id),
            params,
            &["customer_id"],
        )
    }

    /// Sets the balances of several features at once.
    pub fn set_balances(&self, params: &SetBalancesParams) -> T::Output<'a, Empty> {
        send(
            self.transport,
            Method::POST,
            balances_path(&params.customer_id),
            params,
            &["customer_id"],
        )
    }
}

fn balances_path(customer_id: &str) -> String {
    format!("/customers/{}/balances", segment(customer_id))
}
