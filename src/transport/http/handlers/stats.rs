use crate::storage::Stats;
use crate::transport::http::error::ApiError;
use crate::transport::http::types::{AppState, ErrorResponse};
use axum::extract::State;
use axum::Json;

#[utoipa::path(
    get,
    path = "/api/stats",
    responses(
        (status = 200, description = "Dashboard counters", body = Stats),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
pub async fn stats_handler(State(state): State<AppState>) -> Result<Json<Stats>, ApiError> {
    let stats = state
        .storage
        .get_stats()
        .await
        .map_err(|e| ApiError::storage("Failed to fetch stats", e))?;
    Ok(Json(stats))
}
