//! API error taxonomy and response mapping.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

use clientdesk_store::StoreError;

use crate::validate::FieldErrors;

/// Message reported when a client email is already in use.
pub const EMAIL_TAKEN_MESSAGE: &str = "The email has already been taken.";

/// Everything a handler can fail with, in response-status terms.
#[derive(Debug, Error)]
pub enum ApiError {
    /// No token, or the token resolved to no user.
    #[error("unauthenticated")]
    Unauthenticated,

    /// Authenticated, but the policy denied the action.
    #[error("forbidden")]
    Forbidden,

    /// The addressed record does not exist.
    #[error("client not found")]
    NotFound,

    /// The payload failed field validation.
    #[error("validation failed")]
    Validation(FieldErrors),

    /// The storage backend failed.
    #[error("storage failure: {0}")]
    Store(StoreError),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => Self::NotFound,
            // Uniqueness races surface as a field error, same as the
            // pre-flight check.
            StoreError::DuplicateEmail { .. } => {
                Self::Validation(FieldErrors::single("email", EMAIL_TAKEN_MESSAGE))
            }
            other => Self::Store(other),
        }
    }
}

impl From<FieldErrors> for ApiError {
    fn from(errors: FieldErrors) -> Self {
        Self::Validation(errors)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            Self::Unauthenticated => (
                StatusCode::UNAUTHORIZED,
                Json(json!({ "message": "Unauthenticated." })),
            )
                .into_response(),
            Self::Forbidden => (
                StatusCode::FORBIDDEN,
                Json(json!({ "message": "This action is unauthorized." })),
            )
                .into_response(),
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                Json(json!({ "message": "Not found." })),
            )
                .into_response(),
            Self::Validation(errors) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({
                    "message": "The given data was invalid.",
                    "errors": errors,
                })),
            )
                .into_response(),
            Self::Store(err) => {
                tracing::error!(error = %err, "storage failure");
                server_error()
            }
            Self::Internal(err) => {
                tracing::error!(error = %err, "internal error");
                server_error()
            }
        }
    }
}

fn server_error() -> Response {
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(json!({ "message": "Server error." })),
    )
        .into_response()
}
