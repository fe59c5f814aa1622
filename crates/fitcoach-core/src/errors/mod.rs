// ABOUTME: Unified error types, error codes, and HTTP error envelopes
// ABOUTME: Every layer returns AppError so handlers can map failures to status codes
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Fitcoach Analytics

//! # Unified Error Handling System
//!
//! Defines the standard error type, error codes, and the JSON error envelope
//! (`{success: false, error, code, details}`) returned by every endpoint.
//!
//! Server-side failures (5xx) never echo their internal message to the caller;
//! the message is logged and replaced by the generic code description.

use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Structured database errors with `sqlx` conversion
#[cfg(feature = "database-errors")]
pub mod database;

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorCode {
    // Authentication & Authorization
    /// No caller identity was supplied
    #[serde(rename = "AUTH_REQUIRED")]
    AuthRequired,
    /// Caller identity could not be verified
    #[serde(rename = "AUTH_INVALID")]
    AuthInvalid,
    /// Caller token has expired
    #[serde(rename = "AUTH_EXPIRED")]
    AuthExpired,
    /// Caller is authenticated but not allowed to perform the action
    #[serde(rename = "PERMISSION_DENIED")]
    PermissionDenied,

    // Validation
    /// Generic invalid input
    #[serde(rename = "INVALID_INPUT")]
    InvalidInput,

    // Resources
    /// Requested resource does not exist
    #[serde(rename = "RESOURCE_NOT_FOUND")]
    ResourceNotFound,

    // Limits
    /// Request did not finish within the configured budget
    #[serde(rename = "REQUEST_TIMEOUT")]
    RequestTimeout,

    // Internal
    /// Configuration problem
    #[serde(rename = "CONFIG_ERROR")]
    ConfigError,
    /// Unclassified internal failure
    #[serde(rename = "INTERNAL_ERROR")]
    InternalError,
    /// Datastore failure
    #[serde(rename = "DATABASE_ERROR")]
    DatabaseError,
    /// Serialization or deserialization failure
    #[serde(rename = "SERIALIZATION_ERROR")]
    SerializationError,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::InvalidInput => 400,

            Self::AuthRequired | Self::AuthInvalid | Self::AuthExpired => 401,

            Self::PermissionDenied => 403,

            Self::ResourceNotFound => 404,

            Self::RequestTimeout => 408,

            Self::ConfigError
            | Self::InternalError
            | Self::DatabaseError
            | Self::SerializationError => 500,
        }
    }

    /// Whether this code maps to a 5xx response
    #[must_use]
    pub const fn is_server_error(self) -> bool {
        self.http_status() >= 500
    }

    /// Get a user-friendly description of this error
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::AuthRequired => "Authentication is required to access this resource",
            Self::AuthInvalid => "The provided authentication credentials are invalid",
            Self::AuthExpired => "The authentication token has expired",
            Self::PermissionDenied => "You do not have permission to perform this action",
            Self::InvalidInput => "The provided input is invalid",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::RequestTimeout => "The request took too long to complete",
            Self::ConfigError => "Configuration error encountered",
            Self::InternalError => "An internal server error occurred",
            Self::DatabaseError => "Database operation failed",
            Self::SerializationError => "Data serialization/deserialization failed",
        }
    }
}

/// A single field-level validation problem
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Request field name as the caller sent it (camelCase)
    pub field: String,
    /// What is wrong with the field
    pub message: String,
}

impl FieldError {
    /// Create a field error
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Field-level problems for validation failures
    pub details: Vec<FieldError>,
    /// Source error for error chaining
    #[source]
    pub source: Option<Box<dyn StdError + Send + Sync>>,
}

impl AppError {
    /// Create a new `AppError` with the given code and message
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: Vec::new(),
            source: None,
        }
    }

    /// Attach field-level details
    #[must_use]
    pub fn with_details(mut self, details: Vec<FieldError>) -> Self {
        self.details = details;
        self
    }

    /// Add a source error for error chaining
    #[must_use]
    pub fn with_source(mut self, source: impl StdError + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(&self) -> u16 {
        self.code.http_status()
    }

    /// Authentication required
    #[must_use]
    pub fn auth_required() -> Self {
        Self::new(ErrorCode::AuthRequired, "Authentication required")
    }

    /// Invalid authentication
    pub fn auth_invalid(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::AuthInvalid, message)
    }

    /// Authentication expired
    #[must_use]
    pub fn auth_expired() -> Self {
        Self::new(ErrorCode::AuthExpired, "Authentication token has expired")
    }

    /// Permission denied
    pub fn permission_denied(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::PermissionDenied, message)
    }

    /// Resource not found
    pub fn not_found(resource: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ResourceNotFound,
            format!("{} not found", resource.into()),
        )
    }

    /// Invalid input
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InvalidInput, message)
    }

    /// Validation failure carrying every field problem found
    #[must_use]
    pub fn validation(details: Vec<FieldError>) -> Self {
        Self::new(ErrorCode::InvalidInput, "Invalid request").with_details(details)
    }

    /// Validation failure for a single field
    pub fn invalid_field(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::validation(vec![FieldError::new(field, message)])
    }

    /// Request exceeded its time budget
    pub fn request_timeout(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::RequestTimeout, message)
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, error.to_string()).with_source(error)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error envelope
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Always `false`
    pub success: bool,
    /// Caller-facing message (generic for server errors)
    pub error: String,
    /// Machine-readable code
    pub code: ErrorCode,
    /// Field-level validation problems
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<FieldError>,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        let message = if error.code.is_server_error() {
            error.code.description().to_owned()
        } else {
            error.message
        };
        Self {
            success: false,
            error: message,
            code: error.code,
            details: error.details,
        }
    }
}

#[cfg(feature = "http-response")]
mod http_response {
    use super::{AppError, ErrorResponse};
    use axum::http::StatusCode;
    use axum::response::{IntoResponse, Response};
    use axum::Json;
    use tracing::{debug, error};

    impl IntoResponse for AppError {
        fn into_response(self) -> Response {
            let status = StatusCode::from_u16(self.http_status())
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

            if self.code.is_server_error() {
                error!(
                    code = ?self.code,
                    error = %self.message,
                    source = ?self.source,
                    "Request failed with server error"
                );
            } else {
                debug!(code = ?self.code, error = %self.message, "Request rejected");
            }

            (status, Json(ErrorResponse::from(self))).into_response()
        }
    }
}
