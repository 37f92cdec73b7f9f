use super::{segment, send};
use crate::models::{CreateEntityParams, Empty, Entity, TransferParams, TransferProductResponse};
use crate::request::ApiRequest;
use crate::transport::Transport;
use http::Method;

/// Entity endpoints. Entities are scoped to a customer.
#[derive(Debug)]
pub struct Entities<'a, T> {
    transport: &'a T,
}

impl<'a, T: Transport> Entities<'a, T> {
    pub(crate) fn new(transport: &'a T) -> Self {
        Self { transport }
    }

    /// Fetches an entity. Each `expand` value is sent as its own `expand`
    /// query parameter.
    pub fn get(
        &self,
        customer_id: &str,
        entity_id: &str,
        expand: &[&str],
    ) -> T::Output<'a, Entity> {
        let request = ApiRequest::get(entity_path(customer_id, entity_id))
            .with_query_values("expand", expand.iter().copied());
        self.transport.request(request)
    }

    /// Creates an entity under a customer.
    pub fn create(&self, params: &CreateEntityParams) -> T::Output<'a, Entity> {
        send(
            self.transport,
            Method::POST,
            format!("/customers/{}/entities", segment(&params.customer_id)),
            params,
            &["customer_id"],
        )
    }

    /// Deletes an entity.
    pub fn delete(&self, customer_id: &str, entity_id: &str) -> T::Output<'a, Empty> {
        self.transport
            .request(ApiRequest::delete(entity_path(customer_id, entity_id)))
    }

    /// Transfers a product to an entity.
    pub fn transfer(&self, params: &TransferParams) -> T::Output<'a, TransferProductResponse> {
        send(
            self.transport,
            Method::POST,
            format!("/customers/{}/transfer", segment(&params.customer_id)),
            params,
            &["customer_id"],
        )
    }
}

fn entity_path(customer_id: &str, entity_id: &str) -> String {
    format!(
        "/customers/{}/entities/{}",
        segment(customer_id),
        segment(entity_id)
    )
}
