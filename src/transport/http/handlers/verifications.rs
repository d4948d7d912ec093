use crate::domain::model::{NewQualityVerification, QualityVerification};
use crate::transport::http::error::ApiError;
use crate::transport::http::handlers::common::parse_body;
use crate::transport::http::types::{AppState, ErrorResponse};
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::info;

#[utoipa::path(
    post,
    path = "/api/quality-verifications",
    request_body = NewQualityVerification,
    responses(
        (status = 201, description = "Verification recorded", body = QualityVerification),
        (status = 400, description = "Invalid quality verification data", body = ErrorResponse)
    )
)]
pub async fn create_verification_handler(
    State(state): State<AppState>,
    body: Result<Json<NewQualityVerification>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let new_verification = parse_body(body, "Invalid quality verification data")?;
    let verification = state
        .storage
        .create_quality_verification(new_verification)
        .await
        .map_err(|e| ApiError::storage("Failed to create quality verification", e))?;
    info!(
        verification_id = %verification.id,
        product_id = %verification.product_id,
        verified = verification.verified,
        "quality verification recorded"
    );
    Ok((StatusCode::CREATED, Json(verification)))
}
