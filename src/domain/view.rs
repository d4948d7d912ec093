//! Client-facing shapes assembled from stored records.

use crate::domain::model::{BlockchainTransaction, Product, SupplyChainStep};
use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

/// Farmer id of the seeded sample product.
pub const SEED_FARMER_ID: &str = "user-1";

/// `farmerId` values longer than this are treated as wallet addresses.
const WALLET_ADDRESS_MIN_LEN: usize = 20;

/// Status reported for every product until product lifecycle state is stored server-side.
pub const PRODUCT_STATUS_ACTIVE: &str = "active";

/// Turns the `farmerId` query parameter into the filter actually applied to the store.
///
/// Returns `None` (list everything) when the parameter is missing or empty, names
/// the seed farmer, or looks like a wallet address. The dashboard queries by
/// wallet address while stored products carry user ids, so filtering on those
/// values would hide the sample data.
pub fn effective_farmer_filter(farmer_id: Option<&str>) -> Option<&str> {
    match farmer_id {
        None | Some("") | Some(SEED_FARMER_ID) => None,
        Some(id) if id.chars().count() > WALLET_ADDRESS_MIN_LEN => None,
        Some(id) => Some(id),
    }
}

/// How a search string is looked up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchTarget<'a> {
    TransactionHash(&'a str),
    Product(&'a str),
}

/// Anything starting with `0x` is a transaction hash, well-formed or not.
pub fn classify_search(query: &str) -> SearchTarget<'_> {
    if query.starts_with("0x") {
        SearchTarget::TransactionHash(query)
    } else {
        SearchTarget::Product(query)
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductView {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub product_type: String,
    pub quantity: i64,
    pub origin: String,
    pub certifications: Vec<String>,
    pub blockchain_id: Option<String>,
    pub transaction_hash: Option<String>,
    pub farmer: Option<String>,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub supply_chain_steps: Vec<SupplyChainStep>,
}

impl ProductView {
    /// `steps` must already be in timestamp order.
    pub fn assemble(product: Product, steps: Vec<SupplyChainStep>) -> Self {
        Self {
            id: product.id,
            name: product.name,
            product_type: product.product_type,
            quantity: product.quantity,
            origin: product.farm_location,
            certifications: product.certifications,
            blockchain_id: product.blockchain_id,
            transaction_hash: product.transaction_hash,
            farmer: product.farmer_id,
            status: PRODUCT_STATUS_ACTIVE.to_string(),
            created_at: product.created_at,
            updated_at: product.updated_at,
            supply_chain_steps: steps,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecentTransaction {
    #[serde(flatten)]
    pub transaction: BlockchainTransaction,
    pub related_name: Option<String>,
}

/// Serialized as `{"type": "transaction" | "product", "data": ...}`.
#[derive(Serialize, Debug, Clone, PartialEq)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum SearchResult {
    Transaction(BlockchainTransaction),
    Product(ProductView),
}
