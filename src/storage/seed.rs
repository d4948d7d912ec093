//! Demo records inserted at startup so the dashboard has something to show.

use super::memory::Collections;
use crate::crypto::hashing::hash_password;
use crate::domain::model::{Product, QualityMetrics, StepStatus, SupplyChainStep, User};
use crate::domain::view::SEED_FARMER_ID;
use chrono::{Duration, Utc};

pub const SEED_PRODUCT_ID: &str = "product-1";
pub const SEED_BLOCKCHAIN_ID: &str = "TOM001";
/// Plaintext behind the seeded user's stored digest.
pub const SEED_PASSWORD: &str = "greenfarm-demo";
pub const SEED_TRANSACTION_HASH: &str = "0x1a2b3c4d5e6f7890abcdef1234567890abcdef12";

pub(crate) fn sample_collections() -> Collections {
    let mut c = Collections::default();
    let now = Utc::now();

    // Fixed ids never collide in an empty store, so the inserts below cannot fail.
    let _ = c.insert_user(User {
        id: SEED_FARMER_ID.to_string(),
        username: "greenfarm".to_string(),
        password: hash_password(SEED_PASSWORD),
        wallet_address: Some("ST1PQHQKV0RJXZFY1DGX8MNSNYVE3VGZJSRTPGZGM.principal".to_string()),
    });

    let _ = c.insert_product(Product {
        id: SEED_PRODUCT_ID.to_string(),
        name: "Organic Tomatoes".to_string(),
        product_type: "Vegetables".to_string(),
        quantity: 100,
        farm_location: "Green Valley Farms, California".to_string(),
        certifications: vec!["Organic".to_string(), "Non-GMO".to_string()],
        blockchain_id: Some(SEED_BLOCKCHAIN_ID.to_string()),
        transaction_hash: Some(SEED_TRANSACTION_HASH.to_string()),
        farmer_id: Some(SEED_FARMER_ID.to_string()),
        created_at: now,
        updated_at: now,
    });

    let steps = [
        ("step-1", "farm", "Green Valley Farms", StepStatus::Completed),
        ("step-2", "processing", "FreshPack Co.", StepStatus::InProgress),
        ("step-3", "distribution", "LogiCorp", StepStatus::Pending),
        ("step-4", "retail", "Fresh Market", StepStatus::Pending),
    ];
    for (id, stage, company, status) in steps {
        let harvested = id == "step-1";
        c.insert_step(SupplyChainStep {
            id: id.to_string(),
            product_id: SEED_PRODUCT_ID.to_string(),
            stage: stage.to_string(),
            location: company.to_string(),
            company: company.to_string(),
            status,
            timestamp: if harvested { now - Duration::days(1) } else { now },
            transaction_hash: harvested.then(|| SEED_TRANSACTION_HASH.to_string()),
            quality_metrics: harvested.then(|| QualityMetrics {
                temperature: Some(4.0),
                humidity: Some(65.0),
                ph: Some(6.2),
                ..Default::default()
            }),
        });
    }

    c
}
