//! Error handling utilities for API responses.
//!
//! Provides structured responses and conversion between service-layer errors
//! and HTTP responses.
//!
//! # Response Format
//! All errors return consistent JSON responses containing:
//! - `message`: Human-readable message
//! - `error.error_type`: Machine-readable error category
//! - `error.details`: Optional field-specific validation errors
//!
//! # Error Handling Flow
//! 1. Service layer returns a `ServiceError`
//! 2. `service_error_to_http` converts it to a status code and envelope
//! 3. Validation errors are formatted with field details

use crate::errors::ServiceError;
use axum::{Json, http::StatusCode};
use serde::{Deserialize, Serialize};

/// Standard API response wrapper for all endpoints
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Indicates if the request was successful
    pub success: bool,
    /// Response data (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable message
    pub message: String,
    /// Error details (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorDetails>,
    /// Response timestamp
    pub timestamp: String,
}

/// Error details for failed requests
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDetails {
    /// Machine-readable error type identifier
    pub error_type: String,
    /// Field-specific validation errors when applicable
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

/// Field-specific validation error details
#[derive(Debug, Serialize, Deserialize)]
pub struct FieldError {
    /// Name of the field with validation error
    pub field: String,
    /// Description of the validation failure
    pub message: String,
}

/// Error half of every handler's return type.
pub type ApiError = (StatusCode, Json<ApiResponse<()>>);

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn success(data: T, message: impl Into<String>) -> Self {
        Self {
            success: true,
            data: Some(data),
            message: message.into(),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Create a successful response with default message
    pub fn ok(data: T) -> Self {
        Self::success(data, "Request successful")
    }

    /// Create an error response
    pub fn error(
        message: impl Into<String>,
        error_type: impl Into<String>,
        details: Option<Vec<FieldError>>,
    ) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message: message.into(),
            error: Some(ErrorDetails {
                error_type: error_type.into(),
                details,
            }),
            timestamp: chrono::Utc::now().to_rfc3339(),
        }
    }
}

/// Converts ServiceError to appropriate HTTP response with standard format
pub fn service_error_to_http(error: ServiceError) -> ApiError {
    let (status, error_type) = match &error {
        ServiceError::Validation { .. } => (StatusCode::BAD_REQUEST, "validation_error"),
        ServiceError::DuplicateEmail => (StatusCode::CONFLICT, "duplicate_email"),
        ServiceError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "invalid_credentials"),
        ServiceError::InvalidRefreshToken => {
            (StatusCode::UNAUTHORIZED, "invalid_refresh_token")
        }
        ServiceError::ExpiredRefreshToken => {
            (StatusCode::UNAUTHORIZED, "expired_refresh_token")
        }
        ServiceError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid_token"),
        ServiceError::ExpiredToken => (StatusCode::UNAUTHORIZED, "expired_token"),
        ServiceError::MissingCredential => (StatusCode::UNAUTHORIZED, "missing_credential"),
        ServiceError::MalformedCredential => {
            (StatusCode::UNAUTHORIZED, "malformed_credential")
        }
        ServiceError::NotFound { .. } => (StatusCode::NOT_FOUND, "not_found"),
        ServiceError::Hashing { .. }
        | ServiceError::Signing { .. }
        | ServiceError::Configuration { .. }
        | ServiceError::Store { .. } => (StatusCode::INTERNAL_SERVER_ERROR, "internal_error"),
    };

    // Server faults are logged in full and reported to the client generically.
    let message = if error.is_internal() {
        tracing::error!("Internal error: {}", error);
        "Internal server error".to_string()
    } else {
        error.to_string()
    };

    (status, Json(ApiResponse::<()>::error(message, error_type, None)))
}

/// Formats validator::ValidationErrors into field-specific error details
pub fn validation_errors_to_field_errors(errors: validator::ValidationErrors) -> Vec<FieldError> {
    errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| FieldError {
                field: field.to_string(),
                message: error
                    .message
                    .as_ref()
                    .unwrap_or(&"Invalid value".into())
                    .to_string(),
            })
        })
        .collect()
}

/// Helper to create validation error response
pub fn validation_error_response(errors: validator::ValidationErrors) -> ApiError {
    let field_errors = validation_errors_to_field_errors(errors);
    let error_response =
        ApiResponse::<()>::error("Validation failed", "validation_error", Some(field_errors));
    (StatusCode::BAD_REQUEST, Json(error_response))
}
