use super::products::Product;
use serde::{Deserialize, Serialize};

/// A feature quantity granted on attach.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Feature {
    pub feature_id: String,
    pub quantity: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FeaturePreviewScenario {
    UsageLimit,
    FeatureFlag,
}

/// Paywall information returned by `check` with `with_preview`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct FeaturePreview {
    pub title: String,
    pub message: String,
    pub scenario: FeaturePreviewScenario,
    pub feature_id: String,
    pub feature_name: String,
    pub upgrade_product_id: String,
    #[serde(default)]
    pub products: Vec<Product>,
}

/// A balance to set for one feature.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Balance {
    pub feature_id: String,
    pub balance: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub required_balance: Option<i64>,
}
