use crate::domain::model::{
    is_known_stage, NewSupplyChainStep, SupplyChainStep, SupplyChainStepPatch,
};
use crate::transport::http::error::ApiError;
use crate::transport::http::handlers::common::parse_body;
use crate::transport::http::types::{AppState, ErrorResponse};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::{debug, info};

#[utoipa::path(
    post,
    path = "/api/supply-chain-steps",
    request_body = NewSupplyChainStep,
    responses(
        (status = 201, description = "Step recorded (timestamp assigned by the server)", body = SupplyChainStep),
        (status = 400, description = "Invalid supply chain step data", body = ErrorResponse)
    )
)]
pub async fn create_step_handler(
    State(state): State<AppState>,
    body: Result<Json<NewSupplyChainStep>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let new_step = parse_body(body, "Invalid supply chain step data")?;
    let step = state
        .storage
        .create_supply_chain_step(new_step)
        .await
        .map_err(|e| ApiError::storage("Failed to create supply chain step", e))?;
    info!(step_id = %step.id, product_id = %step.product_id, stage = %step.stage, "supply chain step recorded");
    if !is_known_stage(&step.stage) {
        debug!(stage = %step.stage, "stage has no dashboard rendering");
    }
    Ok((StatusCode::CREATED, Json(step)))
}

#[utoipa::path(
    patch,
    path = "/api/supply-chain-steps/{id}",
    params(("id" = String, Path, description = "Step id")),
    request_body = SupplyChainStepPatch,
    responses(
        (status = 200, description = "Updated step", body = SupplyChainStep),
        (status = 400, description = "Invalid update", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn update_step_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<SupplyChainStepPatch>, JsonRejection>,
) -> Result<Json<SupplyChainStep>, ApiError> {
    let patch = parse_body(body, "Invalid supply chain step update")?;
    let step = state
        .storage
        .update_supply_chain_step(&id, patch)
        .await
        .map_err(|e| ApiError::storage("Failed to update supply chain step", e))?
        .ok_or_else(|| ApiError::not_found("Supply chain step not found"))?;
    info!(step_id = %step.id, "supply chain step updated");
    Ok(Json(step))
}
