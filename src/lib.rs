pub mod app;
pub mod crypto;
pub mod domain;
pub mod infra;
pub mod storage;
pub mod transport;

// Convenience re-exports (keeps call-sites clean)
pub use app::registration_service::{RegistrationError, RegistrationService};
pub use crypto::hashing::{canonical_json, fabricate_transaction_hash};
pub use domain::model::{
    BlockchainTransaction, Product, QualityVerification, SupplyChainStep, User,
};
pub use infra::stacks;
pub use storage::{MemStorage, Storage, StorageError};
