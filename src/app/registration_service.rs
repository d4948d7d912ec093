//! Server-side product registration.
//!
//! A registration runs as: take the in-flight latch -> validate against the
//! contract rules -> submit under a hard timeout -> persist the product and a
//! pending `product_registration` transaction record in one store write. The
//! latch admits one registration at a time; a second caller is rejected
//! immediately, never queued.
//!
//! The latch belongs to the service instance, i.e. to one `AppState`. The
//! dashboard is single-user, so one latch per server process matches "one
//! in-flight transaction per session".

use crate::domain::model::{
    BlockchainTransaction, NewBlockchainTransaction, NewProduct, Product, TransactionStatus,
    TransactionType,
};
use crate::domain::validation::{ProductRegistration, ValidationError};
use crate::infra::stacks::{ChainSubmitter, SubmissionError};
use crate::storage::{Storage, StorageError};
use serde::Serialize;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};
use utoipa::ToSchema;

/// Single-slot mutual exclusion flag.
#[derive(Debug, Default)]
pub struct SubmissionLatch {
    in_flight: AtomicBool,
}

/// Releases the latch when dropped, whichever way the registration ends.
#[derive(Debug)]
pub struct LatchGuard<'a> {
    latch: &'a SubmissionLatch,
}

impl SubmissionLatch {
    pub fn try_acquire(&self) -> Option<LatchGuard<'_>> {
        self.in_flight
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| LatchGuard { latch: self })
    }

    pub fn is_held(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }
}

impl Drop for LatchGuard<'_> {
    fn drop(&mut self) {
        self.latch.in_flight.store(false, Ordering::Release);
    }
}

/// Coarse failure classes the dashboard shows different messages for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureCategory {
    Validation,
    Cancelled,
    Network,
    InProgress,
    Internal,
}

impl FailureCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureCategory::Validation => "validation",
            FailureCategory::Cancelled => "cancelled",
            FailureCategory::Network => "network",
            FailureCategory::InProgress => "in_progress",
            FailureCategory::Internal => "internal",
        }
    }
}

#[derive(Debug, Error)]
pub enum RegistrationError {
    #[error("Another transaction is already in progress. Please wait.")]
    InProgress,
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("User cancelled transaction")]
    Cancelled,
    #[error("Transaction timeout - no response after {}s", .0.as_secs())]
    Timeout(Duration),
    #[error("Failed to call contract: {0}")]
    Network(String),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

impl RegistrationError {
    pub fn category(&self) -> FailureCategory {
        match self {
            RegistrationError::InProgress => FailureCategory::InProgress,
            RegistrationError::Validation(_) => FailureCategory::Validation,
            RegistrationError::Cancelled => FailureCategory::Cancelled,
            RegistrationError::Timeout(_) | RegistrationError::Network(_) => {
                FailureCategory::Network
            }
            RegistrationError::Storage(_) => FailureCategory::Internal,
        }
    }
}

#[derive(Serialize, Debug, Clone, PartialEq, ToSchema)]
pub struct RegistrationOutcome {
    pub product: Product,
    pub transaction: BlockchainTransaction,
}

pub struct RegistrationService {
    storage: Arc<dyn Storage>,
    submitter: Arc<dyn ChainSubmitter>,
    latch: SubmissionLatch,
    timeout: Duration,
}

impl RegistrationService {
    pub fn new(
        storage: Arc<dyn Storage>,
        submitter: Arc<dyn ChainSubmitter>,
        timeout: Duration,
    ) -> Self {
        Self {
            storage,
            submitter,
            latch: SubmissionLatch::default(),
            timeout,
        }
    }

    /// True while a registration is between latch acquisition and completion.
    pub fn is_busy(&self) -> bool {
        self.latch.is_held()
    }

    pub async fn register(
        &self,
        registration: ProductRegistration,
    ) -> Result<RegistrationOutcome, RegistrationError> {
        let _guard = self.latch.try_acquire().ok_or_else(|| {
            warn!(name = %registration.name, "registration rejected: another one is in flight");
            RegistrationError::InProgress
        })?;

        if let Err(e) = registration.validate() {
            warn!(error = %e, "registration failed validation");
            return Err(e.into());
        }

        let receipt =
            match tokio::time::timeout(self.timeout, self.submitter.submit(&registration)).await {
                Ok(Ok(receipt)) => receipt,
                Ok(Err(SubmissionError::Cancelled)) => return Err(RegistrationError::Cancelled),
                Ok(Err(SubmissionError::Network(msg))) => {
                    warn!(error = %msg, "chain submission failed");
                    return Err(RegistrationError::Network(msg));
                }
                Err(_) => {
                    warn!(timeout_secs = self.timeout.as_secs(), "chain submission timed out");
                    return Err(RegistrationError::Timeout(self.timeout));
                }
            };

        let (product, transaction) = self
            .storage
            .create_registered_product(
                NewProduct {
                    name: registration.name,
                    product_type: registration.product_type,
                    quantity: registration.quantity,
                    farm_location: registration.farm_location,
                    certifications: registration.certifications,
                    blockchain_id: Some(receipt.product_id),
                    transaction_hash: Some(receipt.transaction_hash.clone()),
                    farmer_id: registration.farmer_id,
                },
                NewBlockchainTransaction {
                    transaction_hash: receipt.transaction_hash,
                    block_height: receipt.block_height,
                    gas_used: None,
                    status: TransactionStatus::Pending,
                    tx_type: TransactionType::ProductRegistration,
                    related_id: None,
                },
            )
            .await?;

        info!(
            product_id = %product.id,
            blockchain_id = product.blockchain_id.as_deref().unwrap_or_default(),
            tx = %transaction.transaction_hash,
            "product registered"
        );
        Ok(RegistrationOutcome {
            product,
            transaction,
        })
    }
}
