//! The seam between a validated registration and whatever records it on-chain.

use crate::crypto::hashing::fabricate_transaction_hash;
use crate::domain::validation::ProductRegistration;
use async_trait::async_trait;
use chrono::Utc;
use rand::Rng;
use serde_json::json;
use std::sync::atomic::{AtomicI64, Ordering};
use thiserror::Error;

/// Last timestamp handed to `derive_product_id` by this process.
static LAST_ISSUED_MS: AtomicI64 = AtomicI64::new(0);

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionReceipt {
    /// Id the product is known by on-chain: `{PRODUCT_TYPE}_{unix_millis}`.
    pub product_id: String,
    pub transaction_hash: String,
    pub block_height: Option<i64>,
}

#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("User cancelled transaction")]
    Cancelled,
    #[error("Failed to call contract: {0}")]
    Network(String),
}

#[async_trait]
pub trait ChainSubmitter: Send + Sync {
    async fn submit(
        &self,
        registration: &ProductRegistration,
    ) -> Result<SubmissionReceipt, SubmissionError>;
}

pub fn derive_product_id(product_type: &str, timestamp_ms: i64) -> String {
    format!("{}_{}", product_type.to_uppercase(), timestamp_ms)
}

/// Wall-clock millis, strictly greater than any value returned before, so two
/// registrations of one product type never derive the same id.
pub fn unique_timestamp_ms() -> i64 {
    let now = Utc::now().timestamp_millis();
    let mut last = LAST_ISSUED_MS.load(Ordering::Relaxed);
    loop {
        let next = now.max(last + 1);
        match LAST_ISSUED_MS.compare_exchange_weak(last, next, Ordering::SeqCst, Ordering::Relaxed)
        {
            Ok(_) => return next,
            Err(actual) => last = actual,
        }
    }
}

/// Server-side submitter: fabricates a receipt and never touches the network.
///
/// Real submissions are signed by the farmer's wallet in the browser; doing it
/// here as well would record every product twice.
#[derive(Debug, Default, Clone, Copy)]
pub struct OfflineSubmitter;

#[async_trait]
impl ChainSubmitter for OfflineSubmitter {
    async fn submit(
        &self,
        registration: &ProductRegistration,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        let timestamp_ms = unique_timestamp_ms();
        let nonce: u64 = rand::thread_rng().gen();
        let payload = json!({
            "name": registration.name,
            "productType": registration.product_type,
            "quantity": registration.quantity,
            "farmLocation": registration.farm_location,
            "certifications": registration.certifications.clone().unwrap_or_default(),
        });
        Ok(SubmissionReceipt {
            product_id: derive_product_id(&registration.product_type, timestamp_ms),
            transaction_hash: fabricate_transaction_hash(&payload, timestamp_ms, nonce),
            block_height: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn offline_receipt_shape() {
        let registration = ProductRegistration {
            name: "Fresh Lettuce".to_string(),
            product_type: "Leafy greens".to_string(),
            quantity: 20,
            farm_location: "Salinas".to_string(),
            certifications: None,
            farmer_id: None,
        };
        let receipt = OfflineSubmitter.submit(&registration).await.unwrap();
        assert!(receipt.product_id.starts_with("LEAFY GREENS_"));
        assert!(receipt.product_id["LEAFY GREENS_".len()..]
            .chars()
            .all(|c| c.is_ascii_digit()));
        assert!(receipt.transaction_hash.starts_with("0x"));
        assert_eq!(receipt.transaction_hash.len(), 66);
        assert_eq!(receipt.block_height, None);
    }

    #[tokio::test]
    async fn same_type_in_a_burst_gets_distinct_ids() {
        let registration = ProductRegistration {
            name: "Carrots".to_string(),
            product_type: "Vegetables".to_string(),
            quantity: 5,
            farm_location: "Salinas".to_string(),
            certifications: None,
            farmer_id: None,
        };
        let mut ids = std::collections::HashSet::new();
        for _ in 0..500 {
            let receipt = OfflineSubmitter.submit(&registration).await.unwrap();
            assert!(ids.insert(receipt.product_id));
        }
    }

    #[test]
    fn issued_timestamps_increase_and_track_the_clock() {
        let before = Utc::now().timestamp_millis();
        let a = unique_timestamp_ms();
        let b = unique_timestamp_ms();
        assert!(b > a);
        assert!(a >= before);
    }
}
