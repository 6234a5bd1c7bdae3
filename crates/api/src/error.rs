use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use greenlight_core::decode::DecodeError;
use greenlight_core::envelope::{EncodeError, Envelope};
use greenlight_core::error::CoreError;
use serde_json::Value;

use crate::response::encode_json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] for domain errors and adds HTTP-specific variants.
/// Implements [`IntoResponse`] to produce consistent JSON error responses of
/// the form `{"code": "...", "error": ...}`.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `greenlight_core`.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// A database error from sqlx.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The request body could not be decoded.
    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A response payload could not be encoded.
    #[error(transparent)]
    Encode(#[from] EncodeError),

    /// No route or resource matches the request.
    #[error("Not found: {0}")]
    NotFound(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

const INTERNAL_MESSAGE: &str =
    "the server encountered a problem and could not process your request";
const EDIT_CONFLICT_MESSAGE: &str =
    "unable to update the record due to an edit conflict, please try again";

impl AppError {
    /// Status, machine-readable code and client-facing `error` value.
    ///
    /// Server-side failures are logged here and reduced to a fixed message.
    fn parts(&self) -> (StatusCode, &'static str, Value) {
        match self {
            AppError::Core(CoreError::NotFound { entity, id }) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                Value::from(format!("{entity} with id {id} not found")),
            ),
            AppError::Core(CoreError::Validation(errors)) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                "VALIDATION_ERROR",
                errors
                    .iter()
                    .map(|(field, msg)| (field.as_str(), msg.as_str()))
                    .collect(),
            ),
            AppError::Core(CoreError::EditConflict { entity, id }) => {
                tracing::info!(entity, id, "Edit conflict");
                (
                    StatusCode::CONFLICT,
                    "EDIT_CONFLICT",
                    Value::from(EDIT_CONFLICT_MESSAGE),
                )
            }
            AppError::Decode(err) => (
                StatusCode::BAD_REQUEST,
                "BAD_REQUEST",
                Value::from(err.to_string()),
            ),
            AppError::NotFound(msg) => {
                (StatusCode::NOT_FOUND, "NOT_FOUND", Value::from(msg.as_str()))
            }
            AppError::Database(sqlx::Error::RowNotFound) => (
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                Value::from("the requested resource could not be found"),
            ),
            AppError::Core(CoreError::Internal(_))
            | AppError::Database(_)
            | AppError::Encode(_)
            | AppError::InternalError(_) => {
                tracing::error!(error = %self, "Request failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    Value::from(INTERNAL_MESSAGE),
                )
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = self.parts();
        error_response(status, code, &message)
    }
}

/// Render `{"code": code, "error": message}` through the envelope encoder.
///
/// Strings and string maps always encode, but a bare 500 is returned rather
/// than panicking if that ever changes.
fn error_response(status: StatusCode, code: &str, message: &Value) -> Response {
    let encoded = Envelope::new()
        .with("code", code)
        .and_then(|env| env.with("error", message))
        .and_then(|env| encode_json(status, &env, None));

    match encoded {
        Ok(response) => response.into_response(),
        Err(err) => {
            tracing::error!(error = %err, "Failed to encode error response");
            StatusCode::INTERNAL_SERVER_ERROR.into_response()
        }
    }
}
