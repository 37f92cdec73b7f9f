use super::customers::{CustomerFeature, CustomerInvoice, CustomerProduct};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A sub-unit of a customer, such as a seat or workspace, with its own
/// products and balances.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Entity {
    pub id: String,
    pub name: Option<String>,
    pub customer_id: String,
    pub created_at: i64,
    pub env: String,
    #[serde(default)]
    pub products: Vec<CustomerProduct>,
    #[serde(default)]
    pub features: BTreeMap<String, CustomerFeature>,
    pub invoices: Option<Vec<CustomerInvoice>>,
}
