use crate::app::registration_service::RegistrationService;
use crate::domain::model::TransactionType;
use crate::infra::stacks::ChainInfo;
use crate::storage::Storage;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::ToSchema;

/// Transactions returned by `GET /api/transactions/recent`.
pub const RECENT_TRANSACTIONS_LIMIT: usize = 10;

#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<dyn Storage>,
    pub registration: Arc<RegistrationService>,
    pub chain_info: Arc<ChainInfo>,
}

/// Body of every non-2xx response.
#[derive(Serialize, Debug, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    /// Registration failure class (`validation`, `cancelled`, `network`, `in_progress`, `internal`).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
}

#[derive(Serialize, Debug, ToSchema)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Deserialize, Debug, Default)]
#[serde(rename_all = "camelCase")]
pub struct ProductListQuery {
    #[serde(default)]
    pub farmer_id: Option<String>,
}

#[derive(Deserialize, Debug)]
pub struct TransactionListQuery {
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
}

#[derive(Deserialize, Debug, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct WalletUpdateRequest {
    #[serde(default)]
    pub wallet_address: Option<String>,
}
