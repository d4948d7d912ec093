use crate::app::registration_service::RegistrationOutcome;
use crate::domain::validation::ProductRegistration;
use crate::infra::stacks::ChainInfo;
use crate::transport::http::error::ApiError;
use crate::transport::http::handlers::common::parse_body;
use crate::transport::http::types::{AppState, ErrorResponse};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;

/// Validates the registration, submits it to the chain (bounded by the
/// configured timeout) and persists the product plus a pending
/// `product_registration` transaction. Only one registration may be in flight.
#[utoipa::path(
    post,
    path = "/api/blockchain/register",
    request_body = ProductRegistration,
    responses(
        (status = 201, description = "Product and its pending registration transaction", body = RegistrationOutcome),
        (status = 400, description = "Validation failed or submission cancelled", body = ErrorResponse),
        (status = 409, description = "A registration is already in progress", body = ErrorResponse),
        (status = 502, description = "Network failure", body = ErrorResponse),
        (status = 504, description = "Submission timed out", body = ErrorResponse)
    )
)]
pub async fn register_product_handler(
    State(state): State<AppState>,
    body: Result<Json<ProductRegistration>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let registration = parse_body(body, "Invalid registration data")?;
    let outcome = state.registration.register(registration).await?;
    Ok((StatusCode::CREATED, Json(outcome)))
}

#[utoipa::path(
    get,
    path = "/api/blockchain-info",
    responses(
        (status = 200, description = "Network and contract the dashboard talks to", body = ChainInfo)
    )
)]
pub async fn chain_info_handler(State(state): State<AppState>) -> Json<ChainInfo> {
    Json(state.chain_info.as_ref().clone())
}
