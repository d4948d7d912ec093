//! Process-local store. Everything is lost on exit.
//!
//! All collections sit behind one `RwLock`, so each read-modify-write runs as a
//! single critical section and readers never observe a half-applied update.

use super::{Stats, Storage, StorageError, StorageResult};
use crate::domain::model::{
    BlockchainTransaction, NewBlockchainTransaction, NewProduct, NewQualityVerification,
    NewSupplyChainStep, NewUser, Product, ProductPatch, QualityVerification, SupplyChainStep,
    SupplyChainStepPatch, TransactionStatus, TransactionType, User,
};
use async_trait::async_trait;
use chrono::Utc;
use std::collections::{HashMap, HashSet};
use tokio::sync::RwLock;
use uuid::Uuid;

/// Append-only rows keyed by a string id; iteration follows insertion order.
#[derive(Debug)]
pub(crate) struct Table<T> {
    rows: Vec<T>,
    by_key: HashMap<String, usize>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            by_key: HashMap::new(),
        }
    }
}

impl<T> Table<T> {
    fn upsert(&mut self, key: String, row: T) {
        match self.by_key.get(&key) {
            Some(&idx) => self.rows[idx] = row,
            None => {
                self.by_key.insert(key, self.rows.len());
                self.rows.push(row);
            }
        }
    }

    fn get(&self, key: &str) -> Option<&T> {
        self.by_key.get(key).map(|&idx| &self.rows[idx])
    }

    fn get_mut(&mut self, key: &str) -> Option<&mut T> {
        self.by_key.get(key).map(|&idx| &mut self.rows[idx])
    }

    fn iter(&self) -> impl DoubleEndedIterator<Item = &T> {
        self.rows.iter()
    }

    fn len(&self) -> usize {
        self.rows.len()
    }
}

/// The store's collections plus the secondary indexes on unique fields.
#[derive(Debug, Default)]
pub(crate) struct Collections {
    users: Table<User>,
    /// username -> user id
    usernames: HashMap<String, String>,
    products: Table<Product>,
    /// blockchainId -> product id
    blockchain_ids: HashMap<String, String>,
    steps: Table<SupplyChainStep>,
    verifications: Table<QualityVerification>,
    /// Keyed by transaction hash.
    transactions: Table<BlockchainTransaction>,
}

impl Collections {
    pub(crate) fn insert_user(&mut self, user: User) -> StorageResult<User> {
        if self.usernames.contains_key(&user.username) {
            return Err(StorageError::Conflict {
                field: "username",
                value: user.username,
            });
        }
        self.usernames.insert(user.username.clone(), user.id.clone());
        self.users.upsert(user.id.clone(), user.clone());
        Ok(user)
    }

    pub(crate) fn insert_product(&mut self, product: Product) -> StorageResult<Product> {
        if let Some(bid) = &product.blockchain_id {
            if self.blockchain_ids.contains_key(bid) {
                return Err(StorageError::Conflict {
                    field: "blockchainId",
                    value: bid.clone(),
                });
            }
            self.blockchain_ids.insert(bid.clone(), product.id.clone());
        }
        self.products.upsert(product.id.clone(), product.clone());
        Ok(product)
    }

    pub(crate) fn insert_step(&mut self, step: SupplyChainStep) -> SupplyChainStep {
        self.steps.upsert(step.id.clone(), step.clone());
        step
    }

    pub(crate) fn insert_verification(
        &mut self,
        verification: QualityVerification,
    ) -> QualityVerification {
        self.verifications
            .upsert(verification.id.clone(), verification.clone());
        verification
    }

    pub(crate) fn insert_transaction(
        &mut self,
        transaction: BlockchainTransaction,
    ) -> StorageResult<BlockchainTransaction> {
        if self.transactions.get(&transaction.transaction_hash).is_some() {
            return Err(StorageError::Conflict {
                field: "transactionHash",
                value: transaction.transaction_hash,
            });
        }
        self.transactions
            .upsert(transaction.transaction_hash.clone(), transaction.clone());
        Ok(transaction)
    }

    /// Both uniqueness checks run before either insert.
    pub(crate) fn insert_registration(
        &mut self,
        product: Product,
        transaction: BlockchainTransaction,
    ) -> StorageResult<(Product, BlockchainTransaction)> {
        if self.transactions.get(&transaction.transaction_hash).is_some() {
            return Err(StorageError::Conflict {
                field: "transactionHash",
                value: transaction.transaction_hash,
            });
        }
        let product = self.insert_product(product)?;
        let transaction = self.insert_transaction(transaction)?;
        Ok((product, transaction))
    }

    fn steps_for(&self, product_id: &str) -> Vec<SupplyChainStep> {
        let mut steps: Vec<SupplyChainStep> = self
            .steps
            .iter()
            .filter(|s| s.product_id == product_id)
            .cloned()
            .collect();
        // Stable: equal timestamps stay in insertion order.
        steps.sort_by_key(|s| s.timestamp);
        steps
    }
}

fn fresh_id() -> String {
    Uuid::new_v4().to_string()
}

fn product_record(product: NewProduct) -> Product {
    let now = Utc::now();
    Product {
        id: fresh_id(),
        name: product.name,
        product_type: product.product_type,
        quantity: product.quantity,
        farm_location: product.farm_location,
        certifications: product.certifications.unwrap_or_default(),
        blockchain_id: product.blockchain_id,
        transaction_hash: product.transaction_hash,
        farmer_id: product.farmer_id,
        created_at: now,
        updated_at: now,
    }
}

fn transaction_record(transaction: NewBlockchainTransaction) -> BlockchainTransaction {
    BlockchainTransaction {
        id: fresh_id(),
        transaction_hash: transaction.transaction_hash,
        block_height: transaction.block_height,
        gas_used: transaction.gas_used,
        status: transaction.status,
        tx_type: transaction.tx_type,
        related_id: transaction.related_id,
        created_at: Utc::now(),
    }
}

pub struct MemStorage {
    inner: RwLock<Collections>,
}

impl MemStorage {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Collections::default()),
        }
    }

    /// Creates a store holding the demo user, product and its four supply-chain steps.
    pub fn with_sample_data() -> Self {
        Self {
            inner: RwLock::new(super::seed::sample_collections()),
        }
    }
}

impl Default for MemStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for MemStorage {
    async fn get_user(&self, id: &str) -> StorageResult<Option<User>> {
        Ok(self.inner.read().await.users.get(id).cloned())
    }

    async fn get_user_by_username(&self, username: &str) -> StorageResult<Option<User>> {
        let c = self.inner.read().await;
        Ok(c.usernames
            .get(username)
            .and_then(|id| c.users.get(id))
            .cloned())
    }

    async fn create_user(&self, user: NewUser) -> StorageResult<User> {
        let record = User {
            id: fresh_id(),
            username: user.username,
            password: user.password,
            wallet_address: user.wallet_address,
        };
        self.inner.write().await.insert_user(record)
    }

    async fn update_user_wallet(
        &self,
        id: &str,
        wallet_address: &str,
    ) -> StorageResult<Option<User>> {
        let mut c = self.inner.write().await;
        Ok(c.users.get_mut(id).map(|user| {
            user.wallet_address = Some(wallet_address.to_string());
            user.clone()
        }))
    }

    async fn get_product(&self, id: &str) -> StorageResult<Option<Product>> {
        Ok(self.inner.read().await.products.get(id).cloned())
    }

    async fn get_product_by_blockchain_id(
        &self,
        blockchain_id: &str,
    ) -> StorageResult<Option<Product>> {
        let c = self.inner.read().await;
        Ok(c.blockchain_ids
            .get(blockchain_id)
            .and_then(|id| c.products.get(id))
            .cloned())
    }

    async fn get_products(&self, farmer_id: Option<&str>) -> StorageResult<Vec<Product>> {
        let c = self.inner.read().await;
        Ok(c.products
            .iter()
            .filter(|p| match farmer_id {
                Some(farmer) => p.farmer_id.as_deref() == Some(farmer),
                None => true,
            })
            .cloned()
            .collect())
    }

    async fn create_product(&self, product: NewProduct) -> StorageResult<Product> {
        self.inner.write().await.insert_product(product_record(product))
    }

    async fn create_registered_product(
        &self,
        product: NewProduct,
        transaction: NewBlockchainTransaction,
    ) -> StorageResult<(Product, BlockchainTransaction)> {
        let product = product_record(product);
        let mut transaction = transaction_record(transaction);
        transaction.related_id = Some(product.id.clone());
        self.inner
            .write()
            .await
            .insert_registration(product, transaction)
    }

    async fn update_product(
        &self,
        id: &str,
        patch: ProductPatch,
    ) -> StorageResult<Option<Product>> {
        let mut c = self.inner.write().await;
        let Some(current) = c.products.get(id).cloned() else {
            return Ok(None);
        };

        if let Some(Some(bid)) = &patch.blockchain_id {
            if c.blockchain_ids.get(bid).is_some_and(|owner| owner != id) {
                return Err(StorageError::Conflict {
                    field: "blockchainId",
                    value: bid.clone(),
                });
            }
        }

        let mut updated = current.clone();
        if let Some(name) = patch.name {
            updated.name = name;
        }
        if let Some(product_type) = patch.product_type {
            updated.product_type = product_type;
        }
        if let Some(quantity) = patch.quantity {
            updated.quantity = quantity;
        }
        if let Some(farm_location) = patch.farm_location {
            updated.farm_location = farm_location;
        }
        if let Some(certifications) = patch.certifications {
            updated.certifications = certifications;
        }
        if let Some(blockchain_id) = patch.blockchain_id {
            updated.blockchain_id = blockchain_id;
        }
        if let Some(transaction_hash) = patch.transaction_hash {
            updated.transaction_hash = transaction_hash;
        }
        if let Some(farmer_id) = patch.farmer_id {
            updated.farmer_id = farmer_id;
        }
        updated.updated_at = Utc::now();

        if current.blockchain_id != updated.blockchain_id {
            if let Some(old) = &current.blockchain_id {
                c.blockchain_ids.remove(old);
            }
            if let Some(new) = &updated.blockchain_id {
                c.blockchain_ids.insert(new.clone(), id.to_string());
            }
        }
        if let Some(slot) = c.products.get_mut(id) {
            *slot = updated.clone();
        }
        Ok(Some(updated))
    }

    async fn get_supply_chain_steps(
        &self,
        product_id: &str,
    ) -> StorageResult<Vec<SupplyChainStep>> {
        Ok(self.inner.read().await.steps_for(product_id))
    }

    async fn get_supply_chain_step(&self, id: &str) -> StorageResult<Option<SupplyChainStep>> {
        Ok(self.inner.read().await.steps.get(id).cloned())
    }

    async fn create_supply_chain_step(
        &self,
        step: NewSupplyChainStep,
    ) -> StorageResult<SupplyChainStep> {
        let record = SupplyChainStep {
            id: fresh_id(),
            product_id: step.product_id,
            stage: step.stage,
            location: step.location,
            company: step.company,
            status: step.status,
            timestamp: Utc::now(),
            transaction_hash: step.transaction_hash,
            quality_metrics: step.quality_metrics,
        };
        Ok(self.inner.write().await.insert_step(record))
    }

    async fn update_supply_chain_step(
        &self,
        id: &str,
        patch: SupplyChainStepPatch,
    ) -> StorageResult<Option<SupplyChainStep>> {
        let mut c = self.inner.write().await;
        Ok(c.steps.get_mut(id).map(|step| {
            if let Some(stage) = patch.stage {
                step.stage = stage;
            }
            if let Some(location) = patch.location {
                step.location = location;
            }
            if let Some(company) = patch.company {
                step.company = company;
            }
            if let Some(status) = patch.status {
                step.status = status;
            }
            if let Some(transaction_hash) = patch.transaction_hash {
                step.transaction_hash = transaction_hash;
            }
            if let Some(quality_metrics) = patch.quality_metrics {
                step.quality_metrics = quality_metrics;
            }
            step.clone()
        }))
    }

    async fn get_quality_verifications(
        &self,
        product_id: &str,
    ) -> StorageResult<Vec<QualityVerification>> {
        let c = self.inner.read().await;
        Ok(c.verifications
            .iter()
            .filter(|v| v.product_id == product_id)
            .cloned()
            .collect())
    }

    async fn get_quality_verification(
        &self,
        id: &str,
    ) -> StorageResult<Option<QualityVerification>> {
        Ok(self.inner.read().await.verifications.get(id).cloned())
    }

    async fn create_quality_verification(
        &self,
        verification: NewQualityVerification,
    ) -> StorageResult<QualityVerification> {
        let record = QualityVerification {
            id: fresh_id(),
            product_id: verification.product_id,
            verifier_id: verification.verifier_id,
            certification_type: verification.certification_type,
            verified: verification.verified,
            verification_data: verification.verification_data,
            blockchain_proof: verification.blockchain_proof,
            created_at: Utc::now(),
        };
        Ok(self.inner.write().await.insert_verification(record))
    }

    async fn get_blockchain_transaction(
        &self,
        hash: &str,
    ) -> StorageResult<Option<BlockchainTransaction>> {
        Ok(self.inner.read().await.transactions.get(hash).cloned())
    }

    async fn create_blockchain_transaction(
        &self,
        transaction: NewBlockchainTransaction,
    ) -> StorageResult<BlockchainTransaction> {
        self.inner
            .write()
            .await
            .insert_transaction(transaction_record(transaction))
    }

    async fn get_transactions_by_type(
        &self,
        tx_type: TransactionType,
    ) -> StorageResult<Vec<BlockchainTransaction>> {
        let c = self.inner.read().await;
        Ok(c.transactions
            .iter()
            .filter(|tx| tx.tx_type == tx_type)
            .cloned()
            .collect())
    }

    async fn get_recent_transactions(
        &self,
        limit: usize,
    ) -> StorageResult<Vec<BlockchainTransaction>> {
        let c = self.inner.read().await;
        // Reverse insertion order first so equal timestamps list the later insert first.
        let mut txs: Vec<BlockchainTransaction> = c.transactions.iter().rev().cloned().collect();
        txs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        txs.truncate(limit);
        Ok(txs)
    }

    async fn get_stats(&self) -> StorageResult<Stats> {
        let c = self.inner.read().await;
        let farms: HashSet<&str> = c
            .products
            .iter()
            .filter_map(|p| p.farmer_id.as_deref())
            .collect();
        let verified = c
            .transactions
            .iter()
            .filter(|tx| tx.status == TransactionStatus::Confirmed)
            .count();
        Ok(Stats {
            total_products: c.products.len(),
            active_farms: farms.len(),
            verified_transactions: verified,
            supply_chain_steps: c.steps.len(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::model::StepStatus;

    fn new_product(name: &str, farmer: Option<&str>) -> NewProduct {
        NewProduct {
            name: name.to_string(),
            product_type: "Vegetables".to_string(),
            quantity: 10,
            farm_location: "Green Valley".to_string(),
            certifications: None,
            blockchain_id: None,
            transaction_hash: None,
            farmer_id: farmer.map(str::to_string),
        }
    }

    fn new_step(product_id: &str, stage: &str) -> NewSupplyChainStep {
        NewSupplyChainStep {
            product_id: product_id.to_string(),
            stage: stage.to_string(),
            location: "Somewhere".to_string(),
            company: "Acme".to_string(),
            status: StepStatus::Pending,
            transaction_hash: None,
            quality_metrics: None,
        }
    }

    fn new_tx(hash: &str, status: TransactionStatus, tx_type: TransactionType) -> NewBlockchainTransaction {
        NewBlockchainTransaction {
            transaction_hash: hash.to_string(),
            block_height: None,
            gas_used: None,
            status,
            tx_type,
            related_id: None,
        }
    }

    #[tokio::test]
    async fn create_product_applies_defaults() {
        let store = MemStorage::new();
        let created = store.create_product(new_product("Kale", None)).await.unwrap();

        assert_eq!(created.certifications, Vec::<String>::new());
        assert_eq!(created.blockchain_id, None);
        assert_eq!(created.transaction_hash, None);
        assert_eq!(created.farmer_id, None);
        assert_eq!(created.created_at, created.updated_at);

        let fetched = store.get_product(&created.id).await.unwrap();
        assert_eq!(fetched, Some(created));
    }

    #[tokio::test]
    async fn update_product_merges_and_bumps_updated_at() {
        let store = MemStorage::new();
        let created = store.create_product(new_product("Kale", None)).await.unwrap();

        let patch = ProductPatch {
            quantity: Some(42),
            blockchain_id: Some(Some("KALE001".to_string())),
            ..Default::default()
        };
        let updated = store.update_product(&created.id, patch).await.unwrap().unwrap();
        assert_eq!(updated.quantity, 42);
        assert_eq!(updated.name, "Kale");
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(updated.created_at, created.created_at);

        let by_chain = store.get_product_by_blockchain_id("KALE001").await.unwrap();
        assert_eq!(by_chain.map(|p| p.id), Some(created.id.clone()));

        let cleared = ProductPatch {
            blockchain_id: Some(None),
            ..Default::default()
        };
        store.update_product(&created.id, cleared).await.unwrap();
        assert!(store.get_product_by_blockchain_id("KALE001").await.unwrap().is_none());

        assert!(store
            .update_product("missing", ProductPatch::default())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn blockchain_id_is_unique() {
        let store = MemStorage::new();
        let mut first = new_product("Kale", None);
        first.blockchain_id = Some("DUP".to_string());
        store.create_product(first.clone()).await.unwrap();

        let err = store.create_product(first).await.unwrap_err();
        assert!(matches!(err, StorageError::Conflict { field: "blockchainId", .. }));

        let other = store.create_product(new_product("Chard", None)).await.unwrap();
        let patch = ProductPatch {
            blockchain_id: Some(Some("DUP".to_string())),
            ..Default::default()
        };
        assert!(store.update_product(&other.id, patch).await.is_err());
        assert_eq!(store.get_stats().await.unwrap().total_products, 2);
    }

    #[tokio::test]
    async fn get_products_filters_by_farmer() {
        let store = MemStorage::new();
        store.create_product(new_product("A", Some("f1"))).await.unwrap();
        store.create_product(new_product("B", Some("f2"))).await.unwrap();
        store.create_product(new_product("C", Some("f1"))).await.unwrap();

        let names: Vec<String> = store
            .get_products(Some("f1"))
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.name)
            .collect();
        assert_eq!(names, vec!["A", "C"]);
        assert_eq!(store.get_products(None).await.unwrap().len(), 3);
        assert!(store.get_products(Some("nobody")).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn steps_are_ordered_by_timestamp_then_insertion() {
        let store = MemStorage::new();
        for stage in ["farm", "processing", "distribution", "retail"] {
            store.create_supply_chain_step(new_step("p1", stage)).await.unwrap();
        }
        store.create_supply_chain_step(new_step("p2", "farm")).await.unwrap();

        let steps = store.get_supply_chain_steps("p1").await.unwrap();
        assert_eq!(steps.len(), 4);
        assert!(steps.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        let stages: Vec<&str> = steps.iter().map(|s| s.stage.as_str()).collect();
        assert_eq!(stages, vec!["farm", "processing", "distribution", "retail"]);
    }

    #[tokio::test]
    async fn update_step_merges_fields() {
        let store = MemStorage::new();
        let step = store.create_supply_chain_step(new_step("p1", "farm")).await.unwrap();
        let patch = SupplyChainStepPatch {
            status: Some(StepStatus::Completed),
            transaction_hash: Some(Some("0xfeed".to_string())),
            ..Default::default()
        };
        let updated = store
            .update_supply_chain_step(&step.id, patch)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.status, StepStatus::Completed);
        assert_eq!(updated.transaction_hash.as_deref(), Some("0xfeed"));
        assert_eq!(updated.timestamp, step.timestamp);
        assert!(store
            .update_supply_chain_step("missing", SupplyChainStepPatch::default())
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn transaction_round_trip_by_hash() {
        let store = MemStorage::new();
        let mut tx = new_tx("0xabc", TransactionStatus::Pending, TransactionType::ProductRegistration);
        tx.block_height = Some(824_567);
        tx.related_id = Some("product-1".to_string());
        let created = store.create_blockchain_transaction(tx.clone()).await.unwrap();

        let fetched = store.get_blockchain_transaction("0xabc").await.unwrap();
        assert_eq!(fetched, Some(created));

        let dup = store.create_blockchain_transaction(tx).await.unwrap_err();
        assert!(matches!(dup, StorageError::Conflict { field: "transactionHash", .. }));
    }

    #[tokio::test]
    async fn recent_transactions_newest_first_and_limited() {
        let store = MemStorage::new();
        for i in 0..12 {
            store
                .create_blockchain_transaction(new_tx(
                    &format!("0x{i:02}"),
                    TransactionStatus::Confirmed,
                    TransactionType::SupplyChainUpdate,
                ))
                .await
                .unwrap();
        }
        let recent = store.get_recent_transactions(10).await.unwrap();
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0].transaction_hash, "0x11");
        assert_eq!(recent[9].transaction_hash, "0x02");
    }

    #[tokio::test]
    async fn stats_are_always_fresh() {
        let store = MemStorage::new();
        for farmer in [Some("A"), Some("A"), Some("B"), None] {
            store.create_product(new_product("x", farmer)).await.unwrap();
        }
        store
            .create_blockchain_transaction(new_tx("0x1", TransactionStatus::Confirmed, TransactionType::ProductRegistration))
            .await
            .unwrap();
        store
            .create_blockchain_transaction(new_tx("0x2", TransactionStatus::Failed, TransactionType::ProductRegistration))
            .await
            .unwrap();
        store.create_supply_chain_step(new_step("p", "farm")).await.unwrap();

        let stats = store.get_stats().await.unwrap();
        assert_eq!(
            stats,
            Stats {
                total_products: 4,
                active_farms: 2,
                verified_transactions: 1,
                supply_chain_steps: 1,
            }
        );

        let ids: Vec<String> = store
            .get_products(None)
            .await
            .unwrap()
            .into_iter()
            .map(|p| p.id)
            .collect();
        store
            .update_product(
                &ids[3],
                ProductPatch {
                    farmer_id: Some(Some("C".to_string())),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        let stats = store.get_stats().await.unwrap();
        assert_eq!(stats.total_products, 4);
        assert_eq!(stats.active_farms, 3);

        let by_type = store
            .get_transactions_by_type(TransactionType::ProductRegistration)
            .await
            .unwrap();
        assert_eq!(by_type.len(), 2);
    }

    #[tokio::test]
    async fn users_and_wallets() {
        let store = MemStorage::new();
        let user = store
            .create_user(NewUser {
                username: "orchard".to_string(),
                password: "hash".to_string(),
                wallet_address: None,
            })
            .await
            .unwrap();
        assert_eq!(user.wallet_address, None);

        let dup = store
            .create_user(NewUser {
                username: "orchard".to_string(),
                password: "other".to_string(),
                wallet_address: None,
            })
            .await;
        assert!(dup.is_err());

        let updated = store
            .update_user_wallet(&user.id, "ST2WALLET")
            .await
            .unwrap()
            .unwrap();
        assert_eq!(updated.wallet_address.as_deref(), Some("ST2WALLET"));
        assert_eq!(
            store.get_user_by_username("orchard").await.unwrap(),
            Some(updated)
        );
        assert!(store.update_user_wallet("nobody", "x").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn verifications_filter_by_product() {
        let store = MemStorage::new();
        for product in ["p1", "p2", "p1"] {
            store
                .create_quality_verification(NewQualityVerification {
                    product_id: product.to_string(),
                    verifier_id: "user-1".to_string(),
                    certification_type: "Organic".to_string(),
                    verified: true,
                    verification_data: None,
                    blockchain_proof: None,
                })
                .await
                .unwrap();
        }
        let found = store.get_quality_verifications("p1").await.unwrap();
        assert_eq!(found.len(), 2);
        assert!(found.iter().all(|v| v.verification_data.is_none()));
        let one = store.get_quality_verification(&found[0].id).await.unwrap();
        assert_eq!(one.as_ref(), Some(&found[0]));
    }

    #[tokio::test]
    async fn registered_product_and_transaction_are_stored_together() {
        let store = MemStorage::new();
        let mut product = new_product("Rye", Some("user-7"));
        product.blockchain_id = Some("GRAIN_1".to_string());
        product.transaction_hash = Some("0xreg".to_string());

        let (product, tx) = store
            .create_registered_product(
                product,
                new_tx("0xreg", TransactionStatus::Pending, TransactionType::ProductRegistration),
            )
            .await
            .unwrap();
        assert_eq!(tx.related_id.as_deref(), Some(product.id.as_str()));
        assert_eq!(
            store.get_product_by_blockchain_id("GRAIN_1").await.unwrap(),
            Some(product)
        );
        assert_eq!(store.get_blockchain_transaction("0xreg").await.unwrap(), Some(tx));
    }

    #[tokio::test]
    async fn registration_conflict_leaves_no_orphan() {
        let store = MemStorage::new();
        store
            .create_blockchain_transaction(new_tx(
                "0xtaken",
                TransactionStatus::Confirmed,
                TransactionType::SupplyChainUpdate,
            ))
            .await
            .unwrap();

        let mut product = new_product("Oats", None);
        product.blockchain_id = Some("GRAIN_2".to_string());
        let err = store
            .create_registered_product(
                product,
                new_tx("0xtaken", TransactionStatus::Pending, TransactionType::ProductRegistration),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Conflict { field: "transactionHash", .. }));
        assert_eq!(store.get_stats().await.unwrap().total_products, 0);
        assert_eq!(store.get_product_by_blockchain_id("GRAIN_2").await.unwrap(), None);

        // A blockchainId clash likewise stores no transaction.
        let mut first = new_product("Barley", None);
        first.blockchain_id = Some("GRAIN_3".to_string());
        store.create_product(first).await.unwrap();
        let mut dup = new_product("Barley again", None);
        dup.blockchain_id = Some("GRAIN_3".to_string());
        let err = store
            .create_registered_product(
                dup,
                new_tx("0xfresh", TransactionStatus::Pending, TransactionType::ProductRegistration),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, StorageError::Conflict { field: "blockchainId", .. }));
        assert_eq!(store.get_blockchain_transaction("0xfresh").await.unwrap(), None);
        assert_eq!(store.get_stats().await.unwrap().total_products, 1);
    }
}
