//! Entity records and the payloads used to create or patch them.
//!
//! Records are what the store owns and returns. Insertion payloads (`New*`) are
//! what request bodies deserialize into; the store assigns ids and timestamps.
//! Patches carry only the fields a caller wants to change.

pub mod entities;
pub mod inserts;

pub use entities::{
    BlockchainTransaction, Product, QualityMetrics, QualityVerification, StepStatus,
    SupplyChainStep, TransactionStatus, TransactionType, User, is_known_stage, KNOWN_STAGES,
};
pub use inserts::{
    NewBlockchainTransaction, NewProduct, NewQualityVerification, NewSupplyChainStep, NewUser,
    ProductPatch, SupplyChainStepPatch,
};
