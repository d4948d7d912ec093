//! `POST /api/blockchain/register`: validation, the single in-flight latch,
//! timeouts and the records a successful registration leaves behind.

mod common;

use agritrace::domain::validation::ProductRegistration;
use agritrace::infra::stacks::{ChainSubmitter, OfflineSubmitter, SubmissionError, SubmissionReceipt};
use async_trait::async_trait;
use common::{spawn_app, spawn_app_with};
use reqwest::StatusCode;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;

fn registration(name: &str) -> Value {
    json!({
        "name": name,
        "productType": "Grain",
        "quantity": 250,
        "farmLocation": "Prairie Fields, Kansas",
        "certifications": ["Organic"],
        "farmerId": "user-7"
    })
}

/// Parks every submission until `release` is notified.
#[derive(Default)]
struct GatedSubmitter {
    release: Notify,
}

#[async_trait]
impl ChainSubmitter for GatedSubmitter {
    async fn submit(
        &self,
        registration: &ProductRegistration,
    ) -> Result<SubmissionReceipt, SubmissionError> {
        self.release.notified().await;
        OfflineSubmitter.submit(registration).await
    }
}

struct HangingSubmitter;

#[async_trait]
impl ChainSubmitter for HangingSubmitter {
    async fn submit(&self, _: &ProductRegistration) -> Result<SubmissionReceipt, SubmissionError> {
        std::future::pending().await
    }
}

struct UnreachableNode;

#[async_trait]
impl ChainSubmitter for UnreachableNode {
    async fn submit(&self, _: &ProductRegistration) -> Result<SubmissionReceipt, SubmissionError> {
        Err(SubmissionError::Network("connection refused".to_string()))
    }
}

#[tokio::test]
async fn successful_registration_persists_product_and_pending_transaction() {
    let app = spawn_app().await;

    let resp = app
        .client
        .post(app.url("/api/blockchain/register"))
        .json(&registration("Winter Wheat"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);
    let outcome: Value = resp.json().await.unwrap();

    let product = &outcome["product"];
    let tx = &outcome["transaction"];
    let hash = tx["transactionHash"].as_str().unwrap();
    assert!(hash.starts_with("0x"));
    assert_eq!(hash.len(), 66);
    assert_eq!(product["transactionHash"], hash);
    assert!(product["blockchainId"].as_str().unwrap().starts_with("GRAIN_"));
    assert_eq!(tx["status"], "pending");
    assert_eq!(tx["type"], "product_registration");
    assert_eq!(tx["relatedId"], product["id"]);

    let blockchain_id = product["blockchainId"].as_str().unwrap();
    let by_chain = app
        .client
        .get(app.url(&format!("/api/products/blockchain/{}", blockchain_id)))
        .send()
        .await
        .unwrap();
    assert_eq!(by_chain.status(), StatusCode::OK);
    assert_eq!(by_chain.json::<Value>().await.unwrap()["farmer"], "user-7");

    let recent: Vec<Value> = app
        .client
        .get(app.url("/api/transactions/recent"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(recent[0]["transactionHash"], hash);
    assert_eq!(recent[0]["relatedName"], "Winter Wheat");

    let search: Value = app
        .client
        .get(app.url(&format!("/api/search/{}", hash)))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(search["type"], "transaction");
}

#[tokio::test]
async fn validation_failures_are_categorised() {
    let app = spawn_app().await;

    let long_name = "a".repeat(101);
    let resp = app
        .client
        .post(app.url("/api/blockchain/register"))
        .json(&registration(&long_name))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["category"], "validation");
    assert_eq!(body["error"], "Product name must be between 1 and 100 characters");

    let resp = app
        .client
        .post(app.url("/api/blockchain/register"))
        .json(&registration("Café Beans"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["category"], "validation");
    assert!(body["error"].as_str().unwrap().contains("non-ASCII"));

    let mut too_many = registration("Barley");
    too_many["certifications"] = json!((0..11).map(|i| format!("Cert{}", i)).collect::<Vec<_>>());
    let resp = app
        .client
        .post(app.url("/api/blockchain/register"))
        .json(&too_many)
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        resp.json::<Value>().await.unwrap()["error"],
        "Maximum 10 certifications allowed"
    );

    // Nothing was persisted.
    let stats: Value = app
        .client
        .get(app.url("/api/stats"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats["totalProducts"], 1);
}

#[tokio::test]
async fn second_registration_is_rejected_while_one_is_in_flight() {
    let submitter = Arc::new(GatedSubmitter::default());
    let app = spawn_app_with(submitter.clone(), Duration::from_secs(30)).await;

    let first = {
        let client = app.client.clone();
        let url = app.url("/api/blockchain/register");
        tokio::spawn(async move {
            client
                .post(url)
                .json(&registration("Rye"))
                .send()
                .await
                .unwrap()
        })
    };

    while !app.registration.is_busy() {
        tokio::time::sleep(Duration::from_millis(5)).await;
    }

    let second = app
        .client
        .post(app.url("/api/blockchain/register"))
        .json(&registration("Oats"))
        .send()
        .await
        .unwrap();
    assert_eq!(second.status(), StatusCode::CONFLICT);
    let body: Value = second.json().await.unwrap();
    assert_eq!(body["category"], "in_progress");
    assert_eq!(body["error"], "Another transaction is already in progress. Please wait.");

    submitter.release.notify_one();
    let first = first.await.unwrap();
    assert_eq!(first.status(), StatusCode::CREATED);
    assert!(!app.registration.is_busy());
}

#[tokio::test]
async fn hung_submission_times_out_and_releases_the_latch() {
    let app = spawn_app_with(Arc::new(HangingSubmitter), Duration::from_secs(1)).await;

    let resp = app
        .client
        .post(app.url("/api/blockchain/register"))
        .json(&registration("Millet"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::GATEWAY_TIMEOUT);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["category"], "network");
    assert_eq!(body["error"], "Transaction timeout - no response after 1s");
    assert!(!app.registration.is_busy());
}

#[tokio::test]
async fn network_failure_maps_to_bad_gateway() {
    let app = spawn_app_with(Arc::new(UnreachableNode), Duration::from_secs(30)).await;

    let resp = app
        .client
        .post(app.url("/api/blockchain/register"))
        .json(&registration("Sorghum"))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["category"], "network");
    assert_eq!(body["error"], "Failed to call contract: connection refused");
}

#[tokio::test]
async fn back_to_back_registrations_of_one_type_get_distinct_ids() {
    let app = spawn_app().await;

    let mut ids = std::collections::HashSet::new();
    for i in 0..25 {
        let resp = app
            .client
            .post(app.url("/api/blockchain/register"))
            .json(&registration(&format!("Grain Lot {}", i)))
            .send()
            .await
            .unwrap();
        assert_eq!(resp.status(), StatusCode::CREATED, "registration {}", i);
        let outcome: Value = resp.json().await.unwrap();
        let id = outcome["product"]["blockchainId"].as_str().unwrap().to_string();
        assert!(ids.insert(id));
    }

    let stats: Value = app
        .client
        .get(app.url("/api/stats"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(stats["totalProducts"], 26);
}
