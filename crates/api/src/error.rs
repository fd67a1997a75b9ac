//! HTTP error mapping.
//!
//! Every handler returns [`AppResult`]; failures become JSON bodies of the
//! shape `{"error": "...", "code": "..."}` with a matching status. Domain
//! errors carry their own status semantics, database errors are classified
//! here, and anything unexpected collapses to an opaque 500 so internals
//! never leak to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use atelier_core::error::CoreError;

/// What a 500 says to the outside world, regardless of cause.
const INTERNAL_MESSAGE: &str = "An internal error occurred";

/// Error type returned by every handler.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Domain-level failure (validation, not-found, conflicts, auth).
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Anything sqlx reports.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Malformed input that never reached domain validation.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Server-side failure with a message kept out of the response.
    #[error("Internal error: {0}")]
    InternalError(String),
}

pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => core_response(core),
            AppError::Database(err) => database_response(err),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    INTERNAL_MESSAGE.to_string(),
                )
            }
        };

        let body = json!({ "error": message, "code": code });
        (status, axum::Json(body)).into_response()
    }
}

fn core_response(core: &CoreError) -> (StatusCode, &'static str, String) {
    match core {
        CoreError::NotFound { entity, id } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} {id} not found"),
        ),
        CoreError::NotFoundKey { entity, key } => (
            StatusCode::NOT_FOUND,
            "NOT_FOUND",
            format!("{entity} '{key}' not found"),
        ),
        CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
        CoreError::Conflict(msg) => (StatusCode::CONFLICT, "CONFLICT", msg.clone()),
        CoreError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED", msg.clone()),
        CoreError::Forbidden(msg) => (StatusCode::FORBIDDEN, "FORBIDDEN", msg.clone()),
        CoreError::Internal(msg) => {
            tracing::error!(error = %msg, "Internal core error");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                "INTERNAL_ERROR",
                INTERNAL_MESSAGE.to_string(),
            )
        }
    }
}

/// Turn a sqlx error into a response triple.
///
/// `RowNotFound` is a plain 404. A Postgres 23505 on one of our `uq_`
/// constraints is a 409 -- that covers duplicate slugs per art type as well
/// as duplicate usernames and emails. Everything else logs and answers 500.
fn database_response(err: &sqlx::Error) -> (StatusCode, &'static str, String) {
    if matches!(err, sqlx::Error::RowNotFound) {
        return (StatusCode::NOT_FOUND, "NOT_FOUND", "Not found".to_string());
    }

    if let sqlx::Error::Database(db_err) = err {
        if db_err.code().as_deref() == Some("23505") {
            let constraint = db_err.constraint().unwrap_or("unknown");
            if constraint.starts_with("uq_") {
                return (
                    StatusCode::CONFLICT,
                    "CONFLICT",
                    format!("Value already taken ({constraint})"),
                );
            }
        }
    }

    tracing::error!(error = %err, "Database error");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        "INTERNAL_ERROR",
        INTERNAL_MESSAGE.to_string(),
    )
}
