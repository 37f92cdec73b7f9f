use super::products::ProductItem;
use serde::{Deserialize, Serialize};

/// Placeholder for endpoints whose response carries nothing of interest.
///
/// Any JSON object validates as `Empty`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct Empty {}

/// Deployment an object lives in.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum AppEnv {
    Production,
    Sandbox,
    Live,
}

/// Quantity chosen for a prepaid feature at attach or checkout time.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AttachOption {
    pub feature_id: String,
    pub quantity: i64,
}

/// Customer properties applied when the customer does not have them yet.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CustomerData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

/// One line of a checkout preview.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CheckoutLine {
    pub description: String,
    pub amount: f64,
    pub item: ProductItem,
}

/// The billing cycle that follows a checkout.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Cycle {
    pub starts_at: i64,
    pub total: f64,
}
