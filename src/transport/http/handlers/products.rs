use crate::domain::model::{NewProduct, Product, ProductPatch, QualityVerification, SupplyChainStep};
use crate::domain::view::{effective_farmer_filter, ProductView};
use crate::transport::http::error::ApiError;
use crate::transport::http::handlers::common::{parse_body, product_view, product_views};
use crate::transport::http::types::{AppState, ErrorResponse, ProductListQuery};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::info;

#[utoipa::path(
    get,
    path = "/api/products",
    params(
        ("farmerId" = Option<String>, Query, description = "Owner filter. Ignored when empty, the seed farmer id, or longer than 20 characters (wallet address)")
    ),
    responses(
        (status = 200, description = "Products with their supply-chain steps", body = Vec<ProductView>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_products_handler(
    State(state): State<AppState>,
    Query(query): Query<ProductListQuery>,
) -> Result<Json<Vec<ProductView>>, ApiError> {
    let storage = state.storage.as_ref();
    let filter = effective_farmer_filter(query.farmer_id.as_deref());
    let products = storage
        .get_products(filter)
        .await
        .map_err(|e| ApiError::storage("Failed to fetch products", e))?;
    let views = product_views(storage, products)
        .await
        .map_err(|e| ApiError::storage("Failed to fetch products", e))?;
    Ok(Json(views))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = String, Path, description = "Internal product id")),
    responses(
        (status = 200, description = "Product", body = ProductView),
        (status = 404, description = "Not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_product_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ProductView>, ApiError> {
    let storage = state.storage.as_ref();
    let product = storage
        .get_product(&id)
        .await
        .map_err(|e| ApiError::storage("Failed to fetch product", e))?
        .ok_or_else(|| ApiError::not_found("Product not found"))?;
    let view = product_view(storage, product)
        .await
        .map_err(|e| ApiError::storage("Failed to fetch product", e))?;
    Ok(Json(view))
}

#[utoipa::path(
    get,
    path = "/api/products/blockchain/{blockchainId}",
    params(("blockchainId" = String, Path, description = "Chain-assigned product id")),
    responses(
        (status = 200, description = "Product", body = ProductView),
        (status = 404, description = "Not found", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn get_product_by_blockchain_id_handler(
    State(state): State<AppState>,
    Path(blockchain_id): Path<String>,
) -> Result<Json<ProductView>, ApiError> {
    let storage = state.storage.as_ref();
    let product = storage
        .get_product_by_blockchain_id(&blockchain_id)
        .await
        .map_err(|e| ApiError::storage("Failed to fetch product", e))?
        .ok_or_else(|| ApiError::not_found("Product not found"))?;
    let view = product_view(storage, product)
        .await
        .map_err(|e| ApiError::storage("Failed to fetch product", e))?;
    Ok(Json(view))
}

#[utoipa::path(
    post,
    path = "/api/products",
    request_body = NewProduct,
    responses(
        (status = 201, description = "Product created", body = Product),
        (status = 400, description = "Invalid product data", body = ErrorResponse),
        (status = 409, description = "blockchainId already registered", body = ErrorResponse)
    )
)]
pub async fn create_product_handler(
    State(state): State<AppState>,
    body: Result<Json<NewProduct>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let new_product = parse_body(body, "Invalid product data")?;
    new_product.validate().map_err(ApiError::BadRequest)?;

    let product = state
        .storage
        .create_product(new_product)
        .await
        .map_err(|e| ApiError::storage("Failed to create product", e))?;
    info!(product_id = %product.id, name = %product.name, "product created");
    Ok((StatusCode::CREATED, Json(product)))
}

#[utoipa::path(
    patch,
    path = "/api/products/{id}",
    params(("id" = String, Path, description = "Internal product id")),
    request_body = ProductPatch,
    responses(
        (status = 200, description = "Updated product", body = Product),
        (status = 400, description = "Invalid update", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse),
        (status = 409, description = "blockchainId already registered", body = ErrorResponse)
    )
)]
pub async fn update_product_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<ProductPatch>, JsonRejection>,
) -> Result<Json<Product>, ApiError> {
    let patch = parse_body(body, "Invalid product update")?;
    patch.validate().map_err(ApiError::BadRequest)?;

    let product = state
        .storage
        .update_product(&id, patch)
        .await
        .map_err(|e| ApiError::storage("Failed to update product", e))?
        .ok_or_else(|| ApiError::not_found("Product not found"))?;
    info!(product_id = %product.id, "product updated");
    Ok(Json(product))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}/supply-chain",
    params(("id" = String, Path, description = "Internal product id")),
    responses(
        (status = 200, description = "Steps in timestamp order", body = Vec<SupplyChainStep>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_supply_chain_handler(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<Vec<SupplyChainStep>>, ApiError> {
    let steps = state
        .storage
        .get_supply_chain_steps(&product_id)
        .await
        .map_err(|e| ApiError::storage("Failed to fetch supply chain steps", e))?;
    Ok(Json(steps))
}

#[utoipa::path(
    get,
    path = "/api/products/{id}/verifications",
    params(("id" = String, Path, description = "Internal product id")),
    responses(
        (status = 200, description = "Quality verifications", body = Vec<QualityVerification>),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn list_verifications_handler(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<Vec<QualityVerification>>, ApiError> {
    let verifications = state
        .storage
        .get_quality_verifications(&product_id)
        .await
        .map_err(|e| ApiError::storage("Failed to fetch quality verifications", e))?;
    Ok(Json(verifications))
}
