//! The Data Store contract.
//!
//! Every route talks to storage through the `Storage` trait so the in-memory
//! store can be swapped for a persistent backend without touching handlers.
//! "Not found" is always `Ok(None)`; errors are reserved for uniqueness
//! violations and backend failures.

use crate::domain::model::{
    BlockchainTransaction, NewBlockchainTransaction, NewProduct, NewQualityVerification,
    NewSupplyChainStep, NewUser, Product, ProductPatch, QualityVerification, SupplyChainStep,
    SupplyChainStepPatch, TransactionType, User,
};
use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use utoipa::ToSchema;

pub mod memory;
pub mod seed;

pub use memory::MemStorage;

#[derive(Debug, Error)]
pub enum StorageError {
    /// A unique field (`username`, `blockchainId`, `transactionHash`) is already taken.
    #[error("{field} '{value}' already exists")]
    Conflict { field: &'static str, value: String },
    #[error("storage backend unavailable: {0}")]
    Unavailable(String),
}

pub type StorageResult<T> = Result<T, StorageError>;

#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Stats {
    pub total_products: usize,
    /// Distinct non-null `farmerId` values across products.
    pub active_farms: usize,
    /// Transactions with status `confirmed`.
    pub verified_transactions: usize,
    pub supply_chain_steps: usize,
}

#[async_trait]
pub trait Storage: Send + Sync {
    // Users
    async fn get_user(&self, id: &str) -> StorageResult<Option<User>>;
    async fn get_user_by_username(&self, username: &str) -> StorageResult<Option<User>>;
    async fn create_user(&self, user: NewUser) -> StorageResult<User>;
    async fn update_user_wallet(
        &self,
        id: &str,
        wallet_address: &str,
    ) -> StorageResult<Option<User>>;

    // Products
    async fn get_product(&self, id: &str) -> StorageResult<Option<Product>>;
    async fn get_product_by_blockchain_id(
        &self,
        blockchain_id: &str,
    ) -> StorageResult<Option<Product>>;
    /// All products in insertion order, or only those owned by `farmer_id`.
    async fn get_products(&self, farmer_id: Option<&str>) -> StorageResult<Vec<Product>>;
    async fn create_product(&self, product: NewProduct) -> StorageResult<Product>;
    /// Stores a product together with the transaction that registered it, with
    /// the transaction's `related_id` pointing at the new product. Either both
    /// records are stored or neither is.
    async fn create_registered_product(
        &self,
        product: NewProduct,
        transaction: NewBlockchainTransaction,
    ) -> StorageResult<(Product, BlockchainTransaction)>;
    async fn update_product(&self, id: &str, patch: ProductPatch)
        -> StorageResult<Option<Product>>;

    // Supply chain
    /// Steps for a product, ascending by timestamp; ties keep insertion order.
    async fn get_supply_chain_steps(&self, product_id: &str)
        -> StorageResult<Vec<SupplyChainStep>>;
    async fn get_supply_chain_step(&self, id: &str) -> StorageResult<Option<SupplyChainStep>>;
    async fn create_supply_chain_step(
        &self,
        step: NewSupplyChainStep,
    ) -> StorageResult<SupplyChainStep>;
    async fn update_supply_chain_step(
        &self,
        id: &str,
        patch: SupplyChainStepPatch,
    ) -> StorageResult<Option<SupplyChainStep>>;

    // Quality verifications
    async fn get_quality_verifications(
        &self,
        product_id: &str,
    ) -> StorageResult<Vec<QualityVerification>>;
    async fn get_quality_verification(&self, id: &str)
        -> StorageResult<Option<QualityVerification>>;
    async fn create_quality_verification(
        &self,
        verification: NewQualityVerification,
    ) -> StorageResult<QualityVerification>;

    // Blockchain transactions
    async fn get_blockchain_transaction(
        &self,
        hash: &str,
    ) -> StorageResult<Option<BlockchainTransaction>>;
    async fn create_blockchain_transaction(
        &self,
        transaction: NewBlockchainTransaction,
    ) -> StorageResult<BlockchainTransaction>;
    async fn get_transactions_by_type(
        &self,
        tx_type: TransactionType,
    ) -> StorageResult<Vec<BlockchainTransaction>>;
    /// Newest first, at most `limit` records.
    async fn get_recent_transactions(&self, limit: usize)
        -> StorageResult<Vec<BlockchainTransaction>>;

    // Analytics (always recomputed)
    async fn get_stats(&self) -> StorageResult<Stats>;
}
