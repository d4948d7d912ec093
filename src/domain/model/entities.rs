use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value as JsonValue};
use std::fmt;
use utoipa::ToSchema;

/// Stages the dashboard knows how to render. Any other stage string is still accepted.
pub const KNOWN_STAGES: &[&str] = &["farm", "processing", "distribution", "retail"];

pub fn is_known_stage(stage: &str) -> bool {
    KNOWN_STAGES.contains(&stage)
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    /// Opaque password hash. Never leaves the process.
    #[serde(skip_serializing, default)]
    pub password: String,
    pub wallet_address: Option<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub product_type: String,
    pub quantity: i64,
    pub farm_location: String,
    pub certifications: Vec<String>,
    pub blockchain_id: Option<String>,
    pub transaction_hash: Option<String>,
    pub farmer_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StepStatus {
    Completed,
    InProgress,
    Pending,
}

/// Environmental readings captured at a supply-chain step.
///
/// The three common readings are typed; anything else a sensor reports is kept
/// verbatim in `extra`.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Default)]
pub struct QualityMetrics {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub humidity: Option<f64>,
    #[serde(rename = "pH", default, skip_serializing_if = "Option::is_none")]
    pub ph: Option<f64>,
    #[serde(flatten)]
    pub extra: Map<String, JsonValue>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SupplyChainStep {
    pub id: String,
    pub product_id: String,
    pub stage: String,
    pub location: String,
    pub company: String,
    pub status: StepStatus,
    pub timestamp: DateTime<Utc>,
    pub transaction_hash: Option<String>,
    #[schema(value_type = Option<Object>)]
    pub quality_metrics: Option<QualityMetrics>,
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct QualityVerification {
    pub id: String,
    pub product_id: String,
    pub verifier_id: String,
    pub certification_type: String,
    pub verified: bool,
    #[schema(value_type = Option<Object>)]
    pub verification_data: Option<JsonValue>,
    pub blockchain_proof: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Confirmed,
    Failed,
}

/// What a transaction record is about, which also fixes how `related_id` is read:
///
/// - `ProductRegistration`: product id
/// - `QualityVerification`: quality verification id (or product id)
/// - `SupplyChainUpdate`: supply-chain step id (or product id)
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum TransactionType {
    ProductRegistration,
    QualityVerification,
    SupplyChainUpdate,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::ProductRegistration => "product_registration",
            TransactionType::QualityVerification => "quality_verification",
            TransactionType::SupplyChainUpdate => "supply_chain_update",
        }
    }
}

impl fmt::Display for TransactionType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BlockchainTransaction {
    pub id: String,
    pub transaction_hash: String,
    pub block_height: Option<i64>,
    pub gas_used: Option<String>,
    pub status: TransactionStatus,
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    pub related_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_stages_are_matched_exactly() {
        assert!(is_known_stage("farm"));
        assert!(is_known_stage("retail"));
        assert!(!is_known_stage("Farm"));
        assert!(!is_known_stage("cold-storage"));
    }
}
