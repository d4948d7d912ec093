use crate::crypto::hashing::hash_password;
use crate::domain::model::{NewUser, User};
use crate::transport::http::error::ApiError;
use crate::transport::http::handlers::common::parse_body;
use crate::transport::http::types::{AppState, ErrorResponse, WalletUpdateRequest};
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use tracing::info;

#[utoipa::path(
    post,
    path = "/api/users",
    request_body = NewUser,
    responses(
        (status = 201, description = "User created (password is never returned)", body = User),
        (status = 400, description = "Invalid user data", body = ErrorResponse),
        (status = 409, description = "Username taken", body = ErrorResponse)
    )
)]
pub async fn create_user_handler(
    State(state): State<AppState>,
    body: Result<Json<NewUser>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    let mut new_user = parse_body(body, "Invalid user data")?;
    if new_user.username.trim().is_empty() || new_user.password.is_empty() {
        return Err(ApiError::BadRequest(
            "Username and password are required".to_string(),
        ));
    }
    new_user.password = hash_password(&new_user.password);

    let user = state
        .storage
        .create_user(new_user)
        .await
        .map_err(|e| ApiError::storage("Failed to create user", e))?;
    info!(user_id = %user.id, username = %user.username, "user created");
    Ok((StatusCode::CREATED, Json(user)))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User id")),
    responses(
        (status = 200, description = "User", body = User),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn get_user_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<User>, ApiError> {
    let user = state
        .storage
        .get_user(&id)
        .await
        .map_err(|e| ApiError::storage("Failed to fetch user", e))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    Ok(Json(user))
}

#[utoipa::path(
    post,
    path = "/api/users/{id}/wallet",
    params(("id" = String, Path, description = "User id")),
    request_body = WalletUpdateRequest,
    responses(
        (status = 200, description = "User with the new wallet address", body = User),
        (status = 400, description = "Wallet address is required", body = ErrorResponse),
        (status = 404, description = "User not found", body = ErrorResponse)
    )
)]
pub async fn update_wallet_handler(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<WalletUpdateRequest>, JsonRejection>,
) -> Result<Json<User>, ApiError> {
    let request = parse_body(body, "Wallet address is required")?;
    let wallet_address = request
        .wallet_address
        .filter(|w| !w.trim().is_empty())
        .ok_or_else(|| ApiError::BadRequest("Wallet address is required".to_string()))?;

    let user = state
        .storage
        .update_user_wallet(&id, &wallet_address)
        .await
        .map_err(|e| ApiError::storage("Failed to update wallet address", e))?
        .ok_or_else(|| ApiError::not_found("User not found"))?;
    info!(user_id = %user.id, wallet = %wallet_address, "wallet connected");
    Ok(Json(user))
}
