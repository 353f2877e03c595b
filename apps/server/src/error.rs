use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

use crate::auth::AuthError;
use pocketpilot_ai::AiError;
use pocketpilot_core::errors::{DatabaseError, Error as CoreError, FlattenedErrors};

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("{0}")]
    Core(#[from] CoreError),
    #[error("{0}")]
    Ai(#[from] AiError),
    #[error("{0}")]
    Auth(#[from] AuthError),
    #[error("{0}")]
    Anyhow(#[from] anyhow::Error),
}

#[derive(Serialize)]
struct ErrorBody {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<FlattenedErrors>,
}

/// `{ code, message, details? }` with the given status.
pub(crate) fn error_response(
    status: StatusCode,
    code: &'static str,
    message: String,
    details: Option<FlattenedErrors>,
) -> Response {
    (
        status,
        Json(ErrorBody {
            code,
            message,
            details,
        }),
    )
        .into_response()
}

fn internal(message: String) -> Response {
    tracing::error!("Request failed: {}", message);
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        "An unexpected error occurred".to_string(),
        None,
    )
}

fn core_response(err: CoreError) -> Response {
    match &err {
        CoreError::Validation(validation) => error_response(
            StatusCode::BAD_REQUEST,
            "VALIDATION_ERROR",
            err.to_string(),
            Some(validation.flatten()),
        ),
        CoreError::NotFound(_) | CoreError::Database(DatabaseError::NotFound(_)) => {
            error_response(StatusCode::NOT_FOUND, "NOT_FOUND", err.to_string(), None)
        }
        CoreError::ConstraintViolation(_) | CoreError::Database(DatabaseError::UniqueViolation(_)) => {
            error_response(StatusCode::CONFLICT, "CONFLICT", err.to_string(), None)
        }
        _ => internal(err.to_string()),
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::Core(err) => core_response(err),
            ApiError::Ai(AiError::Core(err)) => core_response(err),
            ApiError::Ai(err) => match &err {
                AiError::MissingApiKey(_) | AiError::InvalidInput(_) => {
                    error_response(StatusCode::BAD_REQUEST, err.code(), err.to_string(), None)
                }
                AiError::Provider(_) => {
                    tracing::warn!("LLM provider error: {}", err);
                    error_response(StatusCode::BAD_GATEWAY, err.code(), err.to_string(), None)
                }
                _ => internal(err.to_string()),
            },
            ApiError::Auth(err) => err.into_response(),
            ApiError::Anyhow(err) => internal(format!("{:#}", err)),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
