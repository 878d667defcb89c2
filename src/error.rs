//! Error handling module
//!
//! Centralized error types and HTTP response conversion. The wire
//! shape keeps the legacy `{success: false, message}` envelope and adds
//! a machine-readable `error_code` plus the offending field when one is
//! known.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

use crate::domain::DomainError;
use crate::store::StoreError;

/// Application-wide Result type
pub type AppResult<T> = Result<T, AppError>;

/// Application error types
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    // Client errors (4xx)
    /// Login failure. Deliberately one message for "no such user",
    /// "wrong password" and "not a bank employee", to avoid account
    /// enumeration.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Email already exists")]
    EmailTaken,

    #[error("KYC already exists for this user")]
    KycAlreadySubmitted { kyc_number: String },

    #[error("{resource} not found: {key}")]
    NotFound { resource: &'static str, key: String },

    #[error("Invalid value for {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    // Domain errors
    #[error(transparent)]
    Domain(#[from] DomainError),

    // Server errors (5xx)
    #[error("Storage error: {0}")]
    Store(StoreError),
}

impl AppError {
    pub fn not_found(resource: &'static str, key: impl Into<String>) -> Self {
        Self::NotFound {
            resource,
            key: key.into(),
        }
    }

    pub fn validation(field: &'static str, message: impl Into<String>) -> Self {
        Self::Validation {
            field,
            message: message.into(),
        }
    }
}

impl From<StoreError> for AppError {
    fn from(e: StoreError) -> Self {
        match e {
            // A duplicate that no handler intercepted is still a client
            // error: the submitted unique value is already taken.
            StoreError::Duplicate(field) => AppError::Validation {
                field,
                message: "value already exists".to_string(),
            },
            other => AppError::Store(other),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error_code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// The existing record's number, echoed on a duplicate KYC submission.
    #[serde(rename = "kycNumber", skip_serializing_if = "Option::is_none")]
    pub kyc_number: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_code, field) = match &self {
            // 400 Bad Request
            AppError::InvalidCredentials => {
                (StatusCode::BAD_REQUEST, "invalid_credentials", None)
            }
            AppError::EmailTaken => {
                (StatusCode::BAD_REQUEST, "email_exists", Some("email".to_string()))
            }
            AppError::KycAlreadySubmitted { .. } => {
                (StatusCode::BAD_REQUEST, "kyc_exists", Some("userId".to_string()))
            }
            AppError::Validation { field, .. } => (
                StatusCode::BAD_REQUEST,
                "validation_error",
                Some(field.to_string()),
            ),

            // 404 Not Found
            AppError::NotFound { resource, .. } => {
                (StatusCode::NOT_FOUND, "not_found", Some(resource.to_string()))
            }

            // Domain errors - the transition engine speaks 422
            AppError::Domain(domain_err) => match domain_err {
                DomainError::InvalidTransition { .. } => (
                    StatusCode::UNPROCESSABLE_ENTITY,
                    "invalid_status_transition",
                    None,
                ),
                DomainError::TerminalStatus { .. } => {
                    (StatusCode::UNPROCESSABLE_ENTITY, "terminal_status", None)
                }
            },

            // 500 Internal Server Error
            AppError::Store(e) => {
                tracing::error!("Storage error: {:?}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "storage_error", None)
            }
        };

        let kyc_number = match &self {
            AppError::KycAlreadySubmitted { kyc_number } => Some(kyc_number.clone()),
            _ => None,
        };

        // 5xx details are logged above, not leaked to the caller.
        let message = if status.is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        let body = ErrorResponse {
            success: false,
            error_code: error_code.to_string(),
            message,
            field,
            kyc_number,
        };

        (status, Json(body)).into_response()
    }
}
