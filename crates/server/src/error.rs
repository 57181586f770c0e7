use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use omdb::OmdbError;
use serde::Serialize;
use thiserror::Error;

use crate::services::{ExportError, SeriesError, UserError};

/// Unified application error type
#[derive(Debug, Error)]
pub enum AppError {
    /// No or unknown identity cookie
    #[error("Not logged in")]
    NotAuthenticated,

    /// Identity lacks the required privilege
    #[error("{0}")]
    NotAuthorized(String),

    /// Malformed or invalid input
    #[error("{0}")]
    Validation(String),

    /// Series already tracked
    #[error("{0}")]
    DuplicateEntry(String),

    #[error("{0}")]
    NotFound(String),

    /// Metadata service unreachable or misconfigured
    #[error("Metadata service unavailable: {0}")]
    UpstreamUnavailable(String),

    /// Metadata service answered but found no usable match
    #[error("{0}")]
    UpstreamRejected(String),

    #[error(transparent)]
    Export(#[from] ExportError),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// API error response body
#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotAuthenticated => StatusCode::UNAUTHORIZED,
            AppError::NotAuthorized(_) => StatusCode::FORBIDDEN,
            AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::DuplicateEntry(_) => StatusCode::CONFLICT,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::UpstreamUnavailable(_) => StatusCode::BAD_GATEWAY,
            AppError::UpstreamRejected(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Export(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let (error_message, details) = match &self {
            AppError::UpstreamUnavailable(msg) => {
                tracing::error!("Metadata service error: {}", msg);
                ("Metadata service unavailable".to_string(), Some(msg.clone()))
            }
            AppError::Export(e) => {
                tracing::error!("Export error: {}", e);
                ("Export failed".to_string(), Some(e.to_string()))
            }
            AppError::Internal(msg) => {
                tracing::error!("Internal error: {}", msg);
                ("Internal error".to_string(), Some(msg.clone()))
            }
            other => {
                tracing::debug!("Request rejected with {}: {}", status, other);
                (other.to_string(), None)
            }
        };

        let body = ErrorResponse {
            error: error_message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Convenience alias
pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    pub fn not_authorized(msg: impl Into<String>) -> Self {
        Self::NotAuthorized(msg.into())
    }

    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }

    pub fn not_found(msg: impl Into<String>) -> Self {
        Self::NotFound(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::Internal(msg.into())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<OmdbError> for AppError {
    fn from(e: OmdbError) -> Self {
        if e.is_unavailable() {
            AppError::UpstreamUnavailable(e.to_string())
        } else {
            AppError::UpstreamRejected(e.to_string())
        }
    }
}

impl From<SeriesError> for AppError {
    fn from(e: SeriesError) -> Self {
        match e {
            SeriesError::Duplicate { .. } => AppError::DuplicateEntry(e.to_string()),
        }
    }
}

impl From<UserError> for AppError {
    fn from(e: UserError) -> Self {
        match e {
            UserError::NotFound(_) => AppError::NotFound(e.to_string()),
            UserError::Protected(_) => AppError::NotAuthorized(e.to_string()),
            UserError::EmptyName => AppError::Validation(e.to_string()),
        }
    }
}
