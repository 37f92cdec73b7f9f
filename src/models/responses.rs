use super::customers::PricingTableProduct;
use super::features::FeaturePreview;
use super::meta::{AppEnv, AttachOption, CheckoutLine, Cycle};
use super::products::{FreeTrial, Product, ProductItem, ProductPreview};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

fn no_code_returned() -> String {
    "No code returned.".to_string()
}

/// Result of attaching products to a customer.
///
/// `checkout_url` is set when the customer must complete a payment first.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct AttachResponse {
    pub customer_id: String,
    #[serde(default = "no_code_returned")]
    pub code: String,
    pub message: String,
    pub checkout_url: Option<String>,
    pub product_ids: Vec<String>,
    pub success: Option<bool>,
}

/// Whether a customer may use a feature or product.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CheckResponse {
    pub allowed: bool,
    pub customer_id: String,
    pub code: String,
    pub balance: Option<f64>,
    pub feature_id: Option<String>,
    pub product_id: Option<String>,
    pub status: Option<String>,
    pub feature_preview: Option<FeaturePreview>,
    pub product_preview: Option<ProductPreview>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TrackResponse {
    pub id: String,
    pub code: String,
    pub customer_id: String,
    pub feature_id: Option<String>,
    pub event_name: Option<String>,
}

/// A checkout session or, when no payment is needed, a price preview.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CheckoutResponse {
    pub url: Option<String>,
    pub customer_id: String,
    pub has_prorations: bool,
    pub total: f64,
    pub currency: String,
    pub lines: Vec<CheckoutLine>,
    pub options: Vec<AttachOption>,
    pub product: Product,
    pub current_product: Option<Product>,
    pub next_cycle: Option<Cycle>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct BillingPortalResponse {
    pub url: String,
    pub customer_id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CreateProductResponse {
    pub created_at: i64,
    pub id: String,
    pub name: String,
    pub env: AppEnv,
    pub version: i64,
    pub is_add_on: bool,
    pub is_default: bool,
    pub items: Vec<ProductItem>,
    pub free_trial: Option<FreeTrial>,
}

pub type GetProductResponse = CreateProductResponse;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ReferralCodeResponse {
    pub code: String,
    pub customer_id: String,
    pub created_at: i64,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ReferralRedeemResponse {
    pub id: String,
    pub customer_id: String,
    pub reward_id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ProductCancelResponse {
    pub success: bool,
    pub message: String,
    pub customer_id: String,
    pub product_id: String,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct PricingTableResponse {
    pub list: Vec<PricingTableProduct>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ListProductResponse {
    pub list: Vec<Product>,
}

/// Usage analytics. Each row holds a period plus one value per feature.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct QueryResponse {
    pub list: Vec<Map<String, Value>>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TransferProductResponse {
    pub success: Option<bool>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_attach_code_defaults() {
        let response: AttachResponse = serde_json::from_value(json!({
            "customer_id": "user_123",
            "message": "Attached",
            "product_ids": ["pro"],
        }))
        .unwrap();

        assert_eq!(response.code, "No code returned.");
        assert_eq!(response.checkout_url, None);
    }

    #[test]
    fn test_query_keeps_unknown_fields() {
        let response: QueryResponse = serde_json::from_value(json!({
            "list": [{"period": 1_700_000_000, "messages": 3}],
            "total": {"messages": 3},
        }))
        .unwrap();

        assert_eq!(response.list.len(), 1);
        assert_eq!(response.extra["total"], json!({"messages": 3}));
    }
}
