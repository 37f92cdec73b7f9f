use super::meta::AppEnv;
use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FreeTrialDuration {
    Day,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum UsageModel {
    Prepaid,
    PayPerUse,
}

/// How often a product item resets or bills.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProductItemInterval {
    Minute,
    Hour,
    Day,
    Week,
    Month,
    Quarter,
    SemiAnnual,
    Year,
    Multiple,
    Lifetime,
}

/// What attaching a product would do for a given customer.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ProductScenario {
    Scheduled,
    Active,
    New,
    Renew,
    Upgrade,
    Downgrade,
    Cancel,
}

/// A usage amount that is either a number or a marker string such as `"inf"`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum UsageAmount {
    Number(f64),
    Text(String),
}

impl UsageAmount {
    /// Returns `true` for the unlimited marker.
    pub fn is_unlimited(&self) -> bool {
        matches!(self, UsageAmount::Text(text) if text == "inf")
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PriceCurrencyPair {
    pub price: f64,
    pub currency: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PriceTier {
    pub to: f64,
    pub amount: UsageAmount,
}

/// A feature grant or price line inside a product.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ProductItem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub included_usage: Option<UsageAmount>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub interval: Option<ProductItemInterval>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub usage_model: Option<UsageModel>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub billing_units: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_feature_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_usage_on_billing: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reset_usage_when_enabled: Option<bool>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FreeTrial {
    pub duration: FreeTrialDuration,
    pub length: f64,
    pub unique_fingerprint: bool,
}

/// A product as defined in the Autumn dashboard.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Product {
    pub created_at: f64,
    pub id: String,
    pub name: Option<String>,
    pub env: AppEnv,
    pub is_add_on: bool,
    pub is_default: bool,
    pub group: Option<String>,
    pub version: f64,
    pub items: Vec<ProductItem>,
    pub free_trial: Option<FreeTrial>,
    pub scenario: Option<ProductScenario>,
    pub base_variant_id: Option<String>,
}

/// Paywall or upgrade information returned by `check` with `with_preview`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProductPreview {
    pub title: String,
    pub message: String,
    pub scenario: ProductScenario,
    pub product_id: String,
    pub product_name: String,
    pub recurring: bool,
    pub next_cycle_at: i64,
    pub current_product_name: String,
    pub items: Vec<ProductItem>,
    pub options: Vec<String>,
    pub due_today: PriceCurrencyPair,
    pub due_next_cycle: PriceCurrencyPair,
}
