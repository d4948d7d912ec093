use crate::domain::model::Product;
use crate::domain::view::ProductView;
use crate::storage::{Storage, StorageResult};
use crate::transport::http::error::ApiError;
use axum::extract::rejection::JsonRejection;
use axum::Json;
use tracing::debug;

/// Unwraps a JSON body, turning any rejection into a 400 with `message`.
pub fn parse_body<T>(body: Result<Json<T>, JsonRejection>, message: &str) -> Result<T, ApiError> {
    match body {
        Ok(Json(v)) => Ok(v),
        Err(e) => {
            debug!(error = %e, "rejected request body");
            Err(ApiError::BadRequest(message.to_string()))
        }
    }
}

/// Joins a product with its ordered supply-chain steps.
pub async fn product_view(storage: &dyn Storage, product: Product) -> StorageResult<ProductView> {
    let steps = storage.get_supply_chain_steps(&product.id).await?;
    Ok(ProductView::assemble(product, steps))
}

pub async fn product_views(
    storage: &dyn Storage,
    products: Vec<Product>,
) -> StorageResult<Vec<ProductView>> {
    let mut views = Vec::with_capacity(products.len());
    for product in products {
        views.push(product_view(storage, product).await?);
    }
    Ok(views)
}

/// Name of the product a transaction's `relatedId` points at, directly or
/// through a supply-chain step or quality verification.
pub async fn related_product_name(
    storage: &dyn Storage,
    related_id: &str,
) -> StorageResult<Option<String>> {
    if let Some(product) = storage.get_product(related_id).await? {
        return Ok(Some(product.name));
    }
    let product_id = match storage.get_supply_chain_step(related_id).await? {
        Some(step) => Some(step.product_id),
        None => storage
            .get_quality_verification(related_id)
            .await?
            .map(|v| v.product_id),
    };
    match product_id {
        Some(id) => Ok(storage.get_product(&id).await?.map(|p| p.name)),
        None => Ok(None),
    }
}
