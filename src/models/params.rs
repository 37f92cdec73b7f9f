//! Call-site arguments for each remote operation.
//!
//! Every params record is bound to its [`Operation`] through
//! [`OperationParams`]: the declared parameter names, in wire order. Fields
//! that are `None` never reach the wire.

use super::features::{Balance, Feature};
use super::meta::{AttachOption, CustomerData};
use super::products::{FreeTrial, ProductItem};
use crate::payload::{Operation, OperationParams};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::sync::LazyLock;

macro_rules! declare_operation {
    ($params:ty, $name:literal, [$($param:literal),* $(,)?]) => {
        impl OperationParams for $params {
            fn operation() -> &'static Operation {
                static OPERATION: LazyLock<Operation> =
                    LazyLock::new(|| Operation::new($name, &[$($param),*]));
                &OPERATION
            }
        }
    };
}

fn precondition(message: &str) -> Error {
    Error::Precondition(message.to_string())
}

/// Arguments for `attach`. Exactly one of `product_id` and `product_ids` must
/// be set.
///
/// # Examples
///
/// ```
/// use autumn::models::AttachParams;
///
/// let params = AttachParams {
///     force_checkout: true,
///     success_url: Some("https://example.com/done".to_string()),
///     ..AttachParams::product("user_123", "pro")
/// };
/// assert!(params.validate().is_ok());
///
/// let both = AttachParams {
///     product_ids: Some(vec!["addon".to_string()]),
///     ..params
/// };
/// assert!(both.validate().is_err());
/// ```
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct AttachParams {
    pub customer_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_ids: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_url: Option<String>,
    #[serde(default)]
    pub force_checkout: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub features: Option<Vec<Feature>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_data: Option<CustomerData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_trial: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<AttachOption>>,
}

impl AttachParams {
    /// Attaches a single product.
    pub fn product(customer_id: impl Into<String>, product_id: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
            product_id: Some(product_id.into()),
            ..Self::default()
        }
    }

    /// Attaches several products at once.
    pub fn products<I, S>(customer_id: impl Into<String>, product_ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            customer_id: customer_id.into(),
            product_ids: Some(product_ids.into_iter().map(Into::into).collect()),
            ..Self::default()
        }
    }

    /// Checks the call-site contract.
    pub fn validate(&self) -> Result<()> {
        match (&self.product_id, &self.product_ids) {
            (None, None) => Err(precondition(
                "Either product_id or product_ids must be provided",
            )),
            (Some(_), Some(_)) => Err(precondition(
                "Only one of product_id or product_ids must be provided",
            )),
            _ => Ok(()),
        }
    }
}

declare_operation!(
    AttachParams,
    "attach",
    [
        "customer_id",
        "product_id",
        "product_ids",
        "success_url",
        "force_checkout",
        "features",
        "entity_id",
        "customer_data",
        "free_trial",
        "options",
    ]
);

fn default_required_balance() -> Option<i64> {
    Some(1)
}

/// Arguments for `check`. At least one of `product_id` and `feature_id` must
/// be set; `required_balance` defaults to 1.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct CheckParams {
    pub customer_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_id: Option<String>,
    #[serde(
        default = "default_required_balance",
        skip_serializing_if = "Option::is_none"
    )]
    pub required_balance: Option<i64>,
    #[serde(default)]
    pub send_event: bool,
    #[serde(default)]
    pub with_preview: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_data: Option<CustomerData>,
}

impl Default for CheckParams {
    fn default() -> Self {
        Self {
            customer_id: String::new(),
            product_id: None,
            feature_id: None,
            required_balance: default_required_balance(),
            send_event: false,
            with_preview: false,
            entity_id: None,
            customer_data: None,
        }
    }
}

impl CheckParams {
    /// Checks access to a feature.
    pub fn feature(customer_id: impl Into<String>, feature_id: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
            feature_id: Some(feature_id.into()),
            ..Self::default()
        }
    }

    /// Checks access to a product.
    pub fn product(customer_id: impl Into<String>, product_id: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
            product_id: Some(product_id.into()),
            ..Self::default()
        }
    }

    /// Checks the call-site contract.
    pub fn validate(&self) -> Result<()> {
        if self.product_id.is_none() && self.feature_id.is_none() {
            return Err(precondition(
                "Either product_id or feature_id must be provided",
            ));
        }
        Ok(())
    }
}

declare_operation!(
    CheckParams,
    "check",
    [
        "customer_id",
        "product_id",
        "feature_id",
        "required_balance",
        "send_event",
        "with_preview",
        "entity_id",
        "customer_data",
    ]
);

fn default_track_value() -> i64 {
    1
}

/// Arguments for `track`. A non-empty `feature_id` or `event_name` is
/// required; `value` defaults to 1.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct TrackParams {
    pub customer_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub feature_id: Option<String>,
    #[serde(default = "default_track_value")]
    pub value: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub event_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub idempotency_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_data: Option<CustomerData>,
}

impl Default for TrackParams {
    fn default() -> Self {
        Self {
            customer_id: String::new(),
            feature_id: None,
            value: default_track_value(),
            entity_id: None,
            event_name: None,
            idempotency_key: None,
            properties: None,
            customer_data: None,
        }
    }
}

impl TrackParams {
    /// Records usage of a feature.
    pub fn feature(customer_id: impl Into<String>, feature_id: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
            feature_id: Some(feature_id.into()),
            ..Self::default()
        }
    }

    /// Records a named event.
    pub fn event(customer_id: impl Into<String>, event_name: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
            event_name: Some(event_name.into()),
            ..Self::default()
        }
    }

    /// Checks the call-site contract.
    pub fn validate(&self) -> Result<()> {
        let present = |value: &Option<String>| value.as_deref().is_some_and(|v| !v.is_empty());
        if !present(&self.feature_id) && !present(&self.event_name) {
            return Err(precondition(
                "Either feature_id or event_name must be provided",
            ));
        }
        Ok(())
    }
}

declare_operation!(
    TrackParams,
    "track",
    [
        "customer_id",
        "feature_id",
        "value",
        "entity_id",
        "event_name",
        "idempotency_key",
        "properties",
        "customer_data",
    ]
);

/// Arguments for `checkout`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CheckoutParams {
    pub customer_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub success_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<AttachOption>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_data: Option<CustomerData>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub checkout_session_params: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reward: Option<String>,
}

impl CheckoutParams {
    /// Starts a checkout for `product_id`.
    pub fn product(customer_id: impl Into<String>, product_id: impl Into<String>) -> Self {
        Self {
            customer_id: customer_id.into(),
            product_id: Some(product_id.into()),
            ..Self::default()
        }
    }
}

declare_operation!(
    CheckoutParams,
    "checkout",
    [
        "customer_id",
        "product_id",
        "success_url",
        "options",
        "entity_id",
        "customer_data",
        "checkout_session_params",
        "reward",
    ]
);

/// One feature id or several.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(untagged)]
pub enum FeatureSelector {
    One(String),
    Many(Vec<String>),
}

impl Default for FeatureSelector {
    fn default() -> Self {
        FeatureSelector::Many(Vec::new())
    }
}

impl From<&str> for FeatureSelector {
    fn from(id: &str) -> Self {
        FeatureSelector::One(id.to_string())
    }
}

impl From<String> for FeatureSelector {
    fn from(id: String) -> Self {
        FeatureSelector::One(id)
    }
}

impl From<Vec<String>> for FeatureSelector {
    fn from(ids: Vec<String>) -> Self {
        FeatureSelector::Many(ids)
    }
}

impl From<&[&str]> for FeatureSelector {
    fn from(ids: &[&str]) -> Self {
        FeatureSelector::Many(ids.iter().map(|id| id.to_string()).collect())
    }
}

/// Analytics time period.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum QueryRange {
    #[serde(rename = "24h")]
    Day,
    #[serde(rename = "7d")]
    Week,
    #[default]
    #[serde(rename = "30d")]
    Month,
    #[serde(rename = "90d")]
    Quarter,
    #[serde(rename = "last_cycle")]
    LastCycle,
}

/// Arguments for `query`.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    pub customer_id: String,
    pub feature_id: FeatureSelector,
    #[serde(default)]
    pub range: QueryRange,
}

impl QueryParams {
    /// Queries the last 30 days of usage.
    pub fn new(customer_id: impl Into<String>, feature_id: impl Into<FeatureSelector>) -> Self {
        Self {
            customer_id: customer_id.into(),
            feature_id: feature_id.into(),
            range: QueryRange::default(),
        }
    }
}

declare_operation!(QueryParams, "query", ["customer_id", "feature_id", "range"]);

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CreateCustomerParams {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<Map<String, Value>>,
}

declare_operation!(
    CreateCustomerParams,
    "customers.create",
    ["id", "email", "name", "fingerprint", "metadata"]
);

/// New values for a customer's properties. The id goes in the path.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct UpdateCustomerParams {
    pub customer_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,
}

declare_operation!(
    UpdateCustomerParams,
    "customers.update",
    ["customer_id", "name", "email", "fingerprint"]
);

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct BillingPortalParams {
    pub customer_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_url: Option<String>,
}

declare_operation!(
    BillingPortalParams,
    "customers.billing_portal",
    ["customer_id", "return_url"]
);

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CreateProductParams {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub is_add_on: bool,
    #[serde(default)]
    pub is_default: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<ProductItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_trial: Option<FreeTrial>,
}

declare_operation!(
    CreateProductParams,
    "products.create",
    ["id", "name", "is_add_on", "is_default", "items", "free_trial"]
);

/// New values for a product definition. The id goes in the path.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct UpdateProductParams {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub group: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_add_on: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_default: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<ProductItem>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub free_trial: Option<FreeTrial>,
}

declare_operation!(
    UpdateProductParams,
    "products.update",
    ["id", "name", "group", "is_add_on", "is_default", "items", "free_trial"]
);

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CancelProductParams {
    pub customer_id: String,
    pub product_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub entity_id: Option<String>,
}

declare_operation!(
    CancelProductParams,
    "products.cancel",
    ["customer_id", "product_id", "entity_id"]
);

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct ReferralCodeParams {
    pub customer_id: String,
    pub program_id: String,
}

declare_operation!(
    ReferralCodeParams,
    "products.referral_code",
    ["customer_id", "program_id"]
);

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct RedeemReferralParams {
    pub code: String,
    pub customer_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reward_id: Option<String>,
}

declare_operation!(
    RedeemReferralParams,
    "products.redeem_referral_code",
    ["code", "customer_id", "reward_id"]
);

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SetUsageParams {
    pub customer_id: String,
    pub feature_id: String,
    pub value: i64,
}

declare_operation!(
    SetUsageParams,
    "features.set_usage",
    ["customer_id", "feature_id", "value"]
);

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct SetBalancesParams {
    pub customer_id: String,
    pub balances: Vec<Balance>,
}

declare_operation!(
    SetBalancesParams,
    "features.set_balances",
    ["customer_id", "balances"]
);

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct CreateEntityParams {
    pub customer_id: String,
    pub id: String,
    pub feature_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

declare_operation!(
    CreateEntityParams,
    "entities.create",
    ["customer_id", "id", "feature_id", "name"]
);

/// Moves a product between entities of one customer. Without
/// `from_entity_id` the product comes from the customer itself.
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq)]
pub struct TransferParams {
    pub customer_id: String,
    pub to_entity_id: String,
    pub product_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from_entity_id: Option<String>,
}

declare_operation!(
    TransferParams,
    "entities.transfer",
    ["customer_id", "to_entity_id", "product_id", "from_entity_id"]
);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_attach_contract() {
        let err = AttachParams {
            customer_id: "c1".to_string(),
            ..Default::default()
        }
        .validate()
        .unwrap_err();
        assert!(err.to_string().contains("Either product_id or product_ids"));

        assert!(AttachParams::products("c1", ["a", "b"]).validate().is_ok());
    }

    #[test]
    fn test_check_contract() {
        let params = CheckParams {
            customer_id: "c1".to_string(),
            ..Default::default()
        };
        assert!(matches!(params.validate(), Err(Error::Precondition(_))));
        assert!(CheckParams::product("c1", "pro").validate().is_ok());
    }

    #[test]
    fn test_track_requires_non_empty_name() {
        assert!(TrackParams::feature("c1", "").validate().is_err());
        assert!(TrackParams::event("c1", "signup").validate().is_ok());
    }

    #[test]
    fn test_attach_payload_shape() {
        let params = AttachParams {
            customer_data: Some(CustomerData {
                name: Some("John".to_string()),
                ..Default::default()
            }),
            ..AttachParams::product("c1", "pro")
        };

        let payload = params.to_payload(&[]).unwrap();
        assert_eq!(
            Value::Object(payload),
            json!({
                "customer_id": "c1",
                "product_id": "pro",
                "force_checkout": false,
                "customer_data": {"name": "John"},
            })
        );
    }

    #[test]
    fn test_check_defaults() {
        let payload = CheckParams::feature("c1", "messages").to_payload(&[]).unwrap();
        assert_eq!(payload["required_balance"], json!(1));
        assert_eq!(payload["send_event"], json!(false));

        let parsed: CheckParams =
            serde_json::from_value(json!({"customer_id": "c1", "feature_id": "f"})).unwrap();
        assert_eq!(parsed.required_balance, Some(1));
    }

    #[test]
    fn test_query_payload() {
        let payload = QueryParams::new("c1", "messages").to_payload(&[]).unwrap();
        assert_eq!(
            Value::Object(payload),
            json!({"customer_id": "c1", "feature_id": "messages", "range": "30d"})
        );

        let many = QueryParams {
            range: QueryRange::Day,
            ..QueryParams::new("c1", vec!["a".to_string(), "b".to_string()])
        };
        let payload = many.to_payload(&[]).unwrap();
        assert_eq!(payload["feature_id"], json!(["a", "b"]));
        assert_eq!(payload["range"], json!("24h"));
    }

    #[test]
    fn test_path_params_are_ignored() {
        let params = SetUsageParams {
            customer_id: "c1".to_string(),
            feature_id: "seats".to_string(),
            value: 4,
        };
        let payload = params.to_payload(&["customer_id"]).unwrap();
        assert_eq!(Value::Object(payload), json!({"feature_id": "seats", "value": 4}));
    }
}
