use crate::domain::view::{classify_search, SearchResult, SearchTarget};
use crate::storage::StorageError;
use crate::transport::http::error::ApiError;
use crate::transport::http::handlers::common::product_view;
use crate::transport::http::types::{AppState, ErrorResponse};
use axum::extract::{Path, State};
use axum::Json;

const NO_RESULTS: &str = "No results found";

/// `0x…` queries only ever match transactions; anything else is tried as a
/// product id and then as a blockchain id.
#[utoipa::path(
    get,
    path = "/api/search/{query}",
    params(("query" = String, Path, description = "Transaction hash (0x…), product id or blockchain id")),
    responses(
        (status = 200, description = "`{\"type\": \"transaction\" | \"product\", \"data\": …}`", body = Object),
        (status = 404, description = "No results found", body = ErrorResponse)
    )
)]
pub async fn search_handler(
    State(state): State<AppState>,
    Path(query): Path<String>,
) -> Result<Json<SearchResult>, ApiError> {
    let storage = state.storage.as_ref();
    let failed = |e: StorageError| ApiError::storage("Search failed", e);

    match classify_search(&query) {
        SearchTarget::TransactionHash(hash) => {
            let tx = storage
                .get_blockchain_transaction(hash)
                .await
                .map_err(failed)?
                .ok_or_else(|| ApiError::not_found(NO_RESULTS))?;
            Ok(Json(SearchResult::Transaction(tx)))
        }
        SearchTarget::Product(id) => {
            let product = match storage.get_product(id).await.map_err(failed)? {
                Some(p) => p,
                None => storage
                    .get_product_by_blockchain_id(id)
                    .await
                    .map_err(failed)?
                    .ok_or_else(|| ApiError::not_found(NO_RESULTS))?,
            };
            let view = product_view(storage, product).await.map_err(failed)?;
            Ok(Json(SearchResult::Product(view)))
        }
    }
}
