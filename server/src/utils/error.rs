use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;
use tracing::{error, warn};

use crate::utils::response::error as error_response;

/// A `time` value that cannot be read as `H[:MM] [AM|PM]`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed time string '{input}': {reason}")]
pub struct MalformedTimeString {
    pub input: String,
    pub reason: &'static str,
}

impl MalformedTimeString {
    pub fn new(input: &str, reason: &'static str) -> Self {
        Self {
            input: input.to_string(),
            reason,
        }
    }
}

/// A selection whose price arithmetic exceeds the decimal range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("selection total is too large")]
pub struct TotalOverflow;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog snapshot: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse catalog snapshot: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid catalog snapshot: {0}")]
    Invalid(String),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value '{value}' for {key}")]
    InvalidValue { key: &'static str, value: String },
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Catalog error")]
    CatalogError(#[from] CatalogError),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::CatalogError(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::CatalogError(_) => "CATALOG_ERROR",
        }
    }

    fn log(&self) {
        match self {
            AppError::ValidationError(msg) | AppError::NotFound(msg) => {
                warn!(code = self.code(), message = %msg, "Request rejected");
            }
            AppError::CatalogError(e) => {
                error!(error = ?e, "Catalog error");
            }
        }
    }
}

impl From<TotalOverflow> for AppError {
    fn from(err: TotalOverflow) -> Self {
        AppError::ValidationError(err.to_string())
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::ValidationError(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::ValidationError(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::ValidationError(rejection.body_text())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let code = self.code();

        self.log();

        let public_message = match &self {
            AppError::ValidationError(msg) | AppError::NotFound(msg) => msg.clone(),
            AppError::CatalogError(_) => "The event catalog is unavailable".to_string(),
        };

        error_response(code, public_message, None, status)
    }
}
