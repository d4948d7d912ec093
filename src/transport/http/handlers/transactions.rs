use crate::domain::model::{BlockchainTransaction, NewBlockchainTransaction};
use crate::domain::view::RecentTransaction;
use crate::transport::http::error::ApiError;
use crate::transport::http::handlers::common::{parse_body, related_product_name};
use crate::transport::http::types::{
    AppState, ErrorResponse, TransactionListQuery, RECENT_TRANSACTIONS_LIMIT,
};
use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::info;

#[utoipa::path(
    get,
    path = "/api/transactions/{hash}",
    params(("hash" = String, Path, description = "Transaction hash")),
    responses(
        (status = 200, description = "Transaction record", body = BlockchainTransaction),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn get_transaction_handler(
    State(state): State<AppState>,
    Path(hash): Path<String>,
) -> Result<Json<BlockchainTransaction>, ApiError> {
    let tx = state
        .storage
        .get_blockchain_transaction(&hash)
        .await
        .map_err(|e| ApiError::storage("Failed to fetch transaction", e))?
        .ok_or_else(|| ApiError::not_found("Transaction not found"))?;
    Ok(Json(tx))
}

#[utoipa::path(
    get,
    path = "/api/transactions/recent",
    responses(
        (status = 200, description = "Last 10 transactions, newest first", body = Vec<RecentTransaction>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn recent_transactions_handler(
    State(state): State<AppState>,
) -> Result<Json<Vec<RecentTransaction>>, ApiError> {
    let storage = state.storage.as_ref();
    let txs = storage
        .get_recent_transactions(RECENT_TRANSACTIONS_LIMIT)
        .await
        .map_err(|e| ApiError::storage("Failed to fetch recent transactions", e))?;

    let mut recent = Vec::with_capacity(txs.len());
    for tx in txs {
        let related_name = match tx.related_id.as_deref() {
            Some(related) => related_product_name(storage, related)
                .await
                .map_err(|e| ApiError::storage("Failed to fetch recent transactions", e))?,
            None => None,
        };
        recent.push(RecentTransaction {
            transaction: tx,
            related_name,
        });
    }
    Ok(Json(recent))
}

#[utoipa::path(
    get,
    path = "/api/transactions",
    params(("type" = String, Query, description = "product_registration | quality_verification | supply_chain_update")),
    responses(
        (status = 200, description = "Transactions of the given type", body = Vec<BlockchainTransaction>),
        (status = 400, description = "Missing or unknown type", body = ErrorResponse)
    )
)]
pub async fn list_transactions_by_type_handler(
    State(state): State<AppState>,
    query: Result<Query<TransactionListQuery>, QueryRejection>,
) -> Result<Json<Vec<BlockchainTransaction>>, ApiError> {
    let Query(query) = query.map_err(|_| {
        ApiError::BadRequest(
            "Query parameter 'type' must be one of product_registration, quality_verification, supply_chain_update"
                .to_string(),
        )
    })?;
    let txs = state
        .storage
        .get_transactions_by_type(query.tx_type)
        .await
        .map_err(|e| ApiError::storage("Failed to fetch transactions", e))?;
    Ok(Json(txs))
}

#[utoipa::path(
    post,
    path = "/api/transactions",
    request_body = NewBlockchainTransaction,
    responses(
        (status = 201, description = "Transaction recorded", body = BlockchainTransaction),
        (status = 400, description = "Invalid transaction data", body = ErrorResponse),
        (status = 409, description = "Hash already recorded", body = ErrorResponse)
    )
)]
pub async fn create_transaction_handler(
    State(state): State<AppState>,
    body: Result<Json<NewBlockchainTransaction>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let new_tx = parse_body(body, "Invalid transaction data")?;
    let tx = state
        .storage
        .create_blockchain_transaction(new_tx)
        .await
        .map_err(|e| ApiError::storage("Failed to create transaction", e))?;
    info!(tx = %tx.transaction_hash, tx_type = %tx.tx_type, "transaction recorded");
    Ok((StatusCode::CREATED, Json(tx)))
}
