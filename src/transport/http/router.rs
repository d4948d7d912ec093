use crate::app::registration_service::RegistrationOutcome;
use crate::domain::model::{
    BlockchainTransaction, NewBlockchainTransaction, NewProduct, NewQualityVerification,
    NewSupplyChainStep, NewUser, Product, ProductPatch, QualityVerification, StepStatus,
    SupplyChainStep, SupplyChainStepPatch, TransactionStatus, TransactionType, User,
};
use crate::domain::validation::ProductRegistration;
use crate::domain::view::{ProductView, RecentTransaction};
use crate::infra::stacks::ChainInfo;
use crate::storage::Stats;
use crate::transport::http::handlers::{
    blockchain, health, products, search, stats, supply_chain, transactions, users, verifications,
};
use crate::transport::http::types::{AppState, ErrorResponse, HealthResponse, WalletUpdateRequest};
use axum::routing::{get, patch, post};
use axum::Router;
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    paths(
        health::healthcheck_handler,
        users::create_user_handler,
        users::get_user_handler,
        users::update_wallet_handler,
        products::list_products_handler,
        products::get_product_handler,
        products::get_product_by_blockchain_id_handler,
        products::create_product_handler,
        products::update_product_handler,
        products::list_supply_chain_handler,
        products::list_verifications_handler,
        supply_chain::create_step_handler,
        supply_chain::update_step_handler,
        verifications::create_verification_handler,
        transactions::get_transaction_handler,
        transactions::recent_transactions_handler,
        transactions::list_transactions_by_type_handler,
        transactions::create_transaction_handler,
        search::search_handler,
        stats::stats_handler,
        blockchain::register_product_handler,
        blockchain::chain_info_handler
    ),
    components(schemas(
        ErrorResponse,
        HealthResponse,
        WalletUpdateRequest,
        User,
        NewUser,
        Product,
        NewProduct,
        ProductPatch,
        ProductView,
        StepStatus,
        SupplyChainStep,
        NewSupplyChainStep,
        SupplyChainStepPatch,
        QualityVerification,
        NewQualityVerification,
        TransactionStatus,
        TransactionType,
        BlockchainTransaction,
        NewBlockchainTransaction,
        RecentTransaction,
        Stats,
        ProductRegistration,
        RegistrationOutcome,
        ChainInfo
    ))
)]
pub struct ApiDoc;

pub fn create_router(app_state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::healthcheck_handler))
        .route("/api/users", post(users::create_user_handler))
        .route("/api/users/:id", get(users::get_user_handler))
        .route("/api/users/:id/wallet", post(users::update_wallet_handler))
        .route(
            "/api/products",
            get(products::list_products_handler).post(products::create_product_handler),
        )
        .route(
            "/api/products/blockchain/:id",
            get(products::get_product_by_blockchain_id_handler),
        )
        .route(
            "/api/products/:id",
            get(products::get_product_handler).patch(products::update_product_handler),
        )
        .route(
            "/api/products/:id/supply-chain",
            get(products::list_supply_chain_handler),
        )
        .route(
            "/api/products/:id/verifications",
            get(products::list_verifications_handler),
        )
        .route(
            "/api/supply-chain-steps",
            post(supply_chain::create_step_handler),
        )
        .route(
            "/api/supply-chain-steps/:id",
            patch(supply_chain::update_step_handler),
        )
        .route(
            "/api/quality-verifications",
            post(verifications::create_verification_handler),
        )
        .route(
            "/api/transactions",
            get(transactions::list_transactions_by_type_handler)
                .post(transactions::create_transaction_handler),
        )
        .route(
            "/api/transactions/recent",
            get(transactions::recent_transactions_handler),
        )
        .route(
            "/api/transactions/:hash",
            get(transactions::get_transaction_handler),
        )
        .route("/api/search/:query", get(search::search_handler))
        .route("/api/stats", get(stats::stats_handler))
        .route(
            "/api/blockchain/register",
            post(blockchain::register_product_handler),
        )
        .route("/api/blockchain-info", get(blockchain::chain_info_handler))
        .with_state(app_state)
}
