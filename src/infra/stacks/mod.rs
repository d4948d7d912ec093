pub mod client;
pub mod submitter;

pub use client::{ChainInfo, StacksClient, TransactionStatus};
pub use submitter::{
    derive_product_id, ChainSubmitter, OfflineSubmitter, SubmissionError, SubmissionReceipt,
};
