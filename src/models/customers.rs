use super::meta::AppEnv;
use super::products::ProductItemInterval;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProductStatus {
    Active,
    Expired,
    Trialing,
    Scheduled,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FeatureType {
    Static,
    ContinuousUse,
    SingleUse,
    Boolean,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CustomerInvoice {
    pub product_ids: Vec<String>,
    pub stripe_id: String,
    pub status: String,
    pub total: f64,
    pub currency: String,
    pub created_at: i64,
    pub hosted_invoice_url: String,
}

/// A customer's balance and usage for one feature.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CustomerFeature {
    pub id: String,
    pub name: String,
    pub unlimited: Option<bool>,
    #[serde(rename = "type")]
    pub kind: Option<FeatureType>,
    pub interval: Option<ProductItemInterval>,
    pub balance: Option<f64>,
    pub usage: Option<f64>,
    pub included_usage: Option<f64>,
    pub next_reset_at: Option<i64>,
    pub breakdown: Option<Vec<Map<String, Value>>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ReferredCustomer {
    pub id: String,
    pub name: Option<String>,
    pub email: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CustomerReferral {
    pub program_id: String,
    pub customer: ReferredCustomer,
    pub reward_applied: bool,
    pub created_at: i64,
}

/// A product attached to a customer.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CustomerProduct {
    pub id: String,
    pub name: Option<String>,
    pub group: Option<String>,
    pub status: ProductStatus,
    pub started_at: i64,
    pub canceled_at: Option<i64>,
    pub subscription_ids: Option<Vec<String>>,
    pub current_period_start: Option<i64>,
    pub current_period_end: Option<i64>,
    pub quantity: Option<i64>,
}

/// A customer with their products and feature balances.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Customer {
    pub id: Option<String>,
    pub created_at: i64,
    pub name: Option<String>,
    pub email: Option<String>,
    pub fingerprint: Option<String>,
    pub stripe_id: Option<String>,
    pub env: AppEnv,
    #[serde(default)]
    pub metadata: Map<String, Value>,
    pub products: Vec<CustomerProduct>,
    pub features: BTreeMap<String, CustomerFeature>,
    pub invoices: Option<Vec<CustomerInvoice>>,
    pub payment_method: Option<Value>,
    pub referrals: Option<Vec<CustomerReferral>>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PriceInfo {
    #[serde(rename = "primaryText")]
    pub primary_text: String,
    #[serde(rename = "secondaryText")]
    pub secondary_text: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ItemInfo {
    #[serde(rename = "primaryText")]
    pub primary_text: String,
    #[serde(rename = "secondaryText")]
    pub secondary_text: Option<String>,
}

/// One column of a pricing table component.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PricingTableProduct {
    pub id: String,
    pub name: String,
    #[serde(rename = "buttonText")]
    pub button_text: String,
    pub price: PriceInfo,
    pub items: Vec<ItemInfo>,
}
