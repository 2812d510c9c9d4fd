//! Application error type and HTTP error responses.
//!
//! [`AppError`] is shared by the repositories, the link service and the HTTP
//! handlers. Cache failures have their own type
//! ([`crate::infrastructure::cache::CacheError`]) and never reach this one.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;

#[derive(Serialize)]
struct ErrorBody {
    error: ErrorInfo,
}

/// Error payload returned to API clients.
#[derive(Debug, Serialize)]
pub struct ErrorInfo {
    pub code: &'static str,
    pub message: String,
    pub details: Value,
}

/// Errors surfaced by the link service and its collaborators.
#[derive(Debug, Error)]
pub enum AppError {
    /// Request input failed validation.
    #[error("{message}")]
    Validation { message: String, details: Value },

    /// No short link exists for the requested code.
    #[error("{message}")]
    NotFound { message: String, details: Value },

    /// The durable store failed: connectivity, timeout, constraint or
    /// decoding. `retryable` marks failures a client may simply repeat.
    #[error("{message}")]
    Storage {
        message: String,
        details: Value,
        retryable: bool,
    },

    #[error("{message}")]
    Internal { message: String, details: Value },
}

impl AppError {
    pub fn bad_request(message: impl Into<String>, details: Value) -> Self {
        Self::Validation {
            message: message.into(),
            details,
        }
    }

    pub fn not_found(message: impl Into<String>, details: Value) -> Self {
        Self::NotFound {
            message: message.into(),
            details,
        }
    }

    pub fn storage(message: impl Into<String>, details: Value) -> Self {
        Self::Storage {
            message: message.into(),
            details,
            retryable: false,
        }
    }

    pub fn retryable_storage(message: impl Into<String>, details: Value) -> Self {
        Self::Storage {
            message: message.into(),
            details,
            retryable: true,
        }
    }

    pub fn internal(message: impl Into<String>, details: Value) -> Self {
        Self::Internal {
            message: message.into(),
            details,
        }
    }

    /// Returns true if this error means the short link does not exist.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } => StatusCode::BAD_REQUEST,
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Storage {
                retryable: true, ..
            } => StatusCode::SERVICE_UNAVAILABLE,
            Self::Storage { .. } | Self::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converts the error into the serializable payload used in responses.
    pub fn to_error_info(&self) -> ErrorInfo {
        let (code, message, details) = match self {
            Self::Validation { message, details } => ("validation_error", message, details),
            Self::NotFound { message, details } => ("not_found", message, details),
            Self::Storage {
                message, details, ..
            } => ("storage_error", message, details),
            Self::Internal { message, details } => ("internal_error", message, details),
        };

        ErrorInfo {
            code,
            message: message.clone(),
            details: details.clone(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }

        let body = ErrorBody {
            error: self.to_error_info(),
        };

        (status, Json(body)).into_response()
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        map_sqlx_error(e)
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(e: validator::ValidationErrors) -> Self {
        let details = serde_json::to_value(e.field_errors()).unwrap_or_else(|_| json!({}));
        AppError::bad_request("Validation failed", details)
    }
}

/// Maps a SQLx error onto the storage error taxonomy.
///
/// Unique violations (a short code collision) and pool timeouts are
/// retryable; everything else is a plain storage failure. No variant maps to
/// [`AppError::NotFound`].
pub fn map_sqlx_error(e: sqlx::Error) -> AppError {
    if let Some(db) = e.as_database_error()
        && db.is_unique_violation()
    {
        return AppError::retryable_storage(
            "Unique constraint violation",
            json!({ "constraint": db.constraint() }),
        );
    }

    if matches!(e, sqlx::Error::PoolTimedOut) {
        return AppError::retryable_storage(
            "Timed out waiting for a database connection",
            json!({}),
        );
    }

    tracing::error!(error = %e, "Database error");
    AppError::storage("Database error", json!({}))
}
