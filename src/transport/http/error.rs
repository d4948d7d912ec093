use crate::app::registration_service::RegistrationError;
use crate::storage::StorageError;
use crate::transport::http::types::ErrorResponse;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::fmt::Display;
use thiserror::Error;
use tracing::error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),
    #[error("{0}")]
    NotFound(String),
    #[error("{0}")]
    Conflict(String),
    #[error(transparent)]
    Registration(#[from] RegistrationError),
    /// Carries the client-facing message only; details are logged where the error is built.
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    pub fn not_found(message: &str) -> Self {
        ApiError::NotFound(message.to_string())
    }

    /// Logs `err` and hides it behind `message`.
    pub fn internal(message: &str, err: impl Display) -> Self {
        error!(error = %err, "{}", message);
        ApiError::Internal(message.to_string())
    }

    /// Uniqueness violations surface as 409; anything else is an internal error.
    pub fn storage(message: &str, err: StorageError) -> Self {
        match err {
            StorageError::Conflict { .. } => ApiError::Conflict(err.to_string()),
            StorageError::Unavailable(_) => ApiError::internal(message, err),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Registration(e) => match e {
                RegistrationError::Validation(_) | RegistrationError::Cancelled => {
                    StatusCode::BAD_REQUEST
                }
                RegistrationError::InProgress => StatusCode::CONFLICT,
                RegistrationError::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
                RegistrationError::Network(_) => StatusCode::BAD_GATEWAY,
                RegistrationError::Storage(StorageError::Conflict { .. }) => StatusCode::CONFLICT,
                RegistrationError::Storage(StorageError::Unavailable(_)) => {
                    StatusCode::INTERNAL_SERVER_ERROR
                }
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::Registration(e) => {
                let message = match e {
                    RegistrationError::Storage(StorageError::Unavailable(inner)) => {
                        error!(error = %inner, "registration could not be persisted");
                        "Failed to register product".to_string()
                    }
                    other => other.to_string(),
                };
                ErrorResponse {
                    error: message,
                    category: Some(e.category().as_str().to_string()),
                }
            }
            other => ErrorResponse {
                error: other.to_string(),
                category: None,
            },
        };
        (status, Json(body)).into_response()
    }
}
