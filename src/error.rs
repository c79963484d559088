use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, error, warn};

/// Failures surfaced to HTTP callers. Every variant is terminal for the
/// request; none of them are retried.
#[derive(Debug, Error)]
pub enum AppError {
    /// Unknown email or wrong password. Both cases share this variant so the
    /// response cannot be used to enumerate accounts.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Missing, invalid or expired access token, or a token whose user is gone.
    #[error("{0}")]
    Unauthorized(&'static str),

    /// Any failure while refreshing. The underlying cause is kept for logs only.
    #[error("Could not refresh access token")]
    RefreshFailed(#[source] anyhow::Error),

    #[error("{0}")]
    Forbidden(String),

    #[error("{0}")]
    Validation(String),

    #[error("Internal server error")]
    Internal(#[from] anyhow::Error),
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub detail: String,
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::InvalidCredentials
            | AppError::Unauthorized(_)
            | AppError::RefreshFailed(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn log(&self) {
        match self {
            AppError::Internal(e) => error!(error = %format!("{e:#}"), "internal error"),
            AppError::RefreshFailed(cause) => {
                warn!(cause = %format!("{cause:#}"), "token refresh rejected")
            }
            AppError::InvalidCredentials => warn!("invalid login attempt"),
            other => debug!(error = %other, "request rejected"),
        }
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

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();
        let body = ErrorBody {
            detail: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
