use super::entities::{QualityMetrics, StepStatus, TransactionStatus, TransactionType};
use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;
use utoipa::ToSchema;

/// Distinguishes an absent field (`None`) from an explicit `null` (`Some(None)`).
fn double_option<'de, T, D>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Deserialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub password: String,
    #[serde(default)]
    pub wallet_address: Option<String>,
}

#[derive(Deserialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewProduct {
    pub name: String,
    pub product_type: String,
    pub quantity: i64,
    pub farm_location: String,
    #[serde(default)]
    pub certifications: Option<Vec<String>>,
    #[serde(default)]
    pub blockchain_id: Option<String>,
    #[serde(default)]
    pub transaction_hash: Option<String>,
    #[serde(default)]
    pub farmer_id: Option<String>,
}

impl NewProduct {
    pub fn validate(&self) -> Result<(), String> {
        if self.quantity <= 0 {
            return Err("Quantity must be greater than 0".to_string());
        }
        Ok(())
    }
}

/// Partial update for a product. Unknown keys (client-side status or ownership
/// fields) are ignored.
#[derive(Deserialize, Debug, Clone, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductPatch {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub product_type: Option<String>,
    #[serde(default)]
    pub quantity: Option<i64>,
    #[serde(default)]
    pub farm_location: Option<String>,
    #[serde(default)]
    pub certifications: Option<Vec<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub blockchain_id: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub transaction_hash: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub farmer_id: Option<Option<String>>,
}

impl ProductPatch {
    pub fn validate(&self) -> Result<(), String> {
        match self.quantity {
            Some(q) if q <= 0 => Err("Quantity must be greater than 0".to_string()),
            _ => Ok(()),
        }
    }
}

/// Any client-supplied `timestamp` is ignored; the store stamps steps itself.
#[derive(Deserialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewSupplyChainStep {
    pub product_id: String,
    pub stage: String,
    pub location: String,
    pub company: String,
    pub status: StepStatus,
    #[serde(default)]
    pub transaction_hash: Option<String>,
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub quality_metrics: Option<QualityMetrics>,
}

#[derive(Deserialize, Debug, Clone, Default, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupplyChainStepPatch {
    #[serde(default)]
    pub stage: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub status: Option<StepStatus>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<String>)]
    pub transaction_hash: Option<Option<String>>,
    #[serde(default, deserialize_with = "double_option")]
    #[schema(value_type = Option<Object>)]
    pub quality_metrics: Option<Option<QualityMetrics>>,
}

#[derive(Deserialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewQualityVerification {
    pub product_id: String,
    pub verifier_id: String,
    pub certification_type: String,
    pub verified: bool,
    #[serde(default)]
    #[schema(value_type = Option<Object>)]
    pub verification_data: Option<JsonValue>,
    #[serde(default)]
    pub blockchain_proof: Option<String>,
}

#[derive(Deserialize, Debug, Clone, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewBlockchainTransaction {
    pub transaction_hash: String,
    #[serde(default)]
    pub block_height: Option<i64>,
    #[serde(default)]
    pub gas_used: Option<String>,
    pub status: TransactionStatus,
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    #[serde(default)]
    pub related_id: Option<String>,
}
