// ABOUTME: Unified error handling with standard error codes and JSON HTTP responses
// ABOUTME: Every route returns AppError so clients always receive the same error envelope
//
// Licensed under either of Apache License, Version 2.0 or MIT License at your option.
// Copyright ©2025 Async-IO.org

//! # Unified Error Handling System
//!
//! This module provides a centralized error handling system for the service.
//! It defines standard error codes, maps them to HTTP status codes, and
//! renders them as a consistent JSON envelope.

use std::error::Error as StdError;
use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, error};

/// Standard error codes used throughout the application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Authentication & Authorization (1000-1999)
    /// No credentials were supplied
    AuthRequired = 1000,
    /// Credentials were supplied but rejected
    AuthInvalid = 1001,
    /// Token is past its expiry
    AuthExpired = 1002,
    /// Caller is authenticated but not allowed
    PermissionDenied = 1004,

    // Validation (3000-3999)
    /// Generic invalid input
    InvalidInput = 3000,
    /// A required form or body field is missing
    MissingRequiredField = 3001,
    /// A field could not be parsed
    InvalidFormat = 3002,
    /// A numeric field is outside its accepted range
    ValueOutOfRange = 3003,
    /// Request body exceeds the configured upload limit
    PayloadTooLarge = 3004,

    // Resource Management (4000-4999)
    /// Requested resource does not exist for this owner
    ResourceNotFound = 4000,

    // External Services (5000-5999)
    /// External service returned an error
    ExternalServiceError = 5000,
    /// External service is not configured or unreachable
    ExternalServiceUnavailable = 5001,

    // Configuration (6000-6999)
    /// Configuration could not be loaded
    ConfigError = 6000,
    /// Required configuration is missing
    ConfigMissing = 6001,

    // Internal Errors (9000-9999)
    /// Unexpected internal failure
    InternalError = 9000,
    /// Filesystem operation failed
    StorageError = 9002,
    /// Serialization or deserialization failed
    SerializationError = 9003,
}

impl ErrorCode {
    /// Get the HTTP status code for this error
    #[must_use]
    pub const fn http_status(self) -> u16 {
        match self {
            Self::InvalidInput
            | Self::MissingRequiredField
            | Self::InvalidFormat
            | Self::ValueOutOfRange => 400,

            Self::AuthRequired | Self::AuthInvalid | Self::AuthExpired => 401,

            Self::PermissionDenied => 403,

            Self::ResourceNotFound => 404,

            Self::PayloadTooLarge => 413,

            Self::ExternalServiceError => 502,

            Self::ExternalServiceUnavailable => 503,

            Self::InternalError
            | Self::StorageError
            | Self::SerializationError
            | Self::ConfigError
            | Self::ConfigMissing => 500,
        }
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
            Self::MissingRequiredField => "A required field is missing from the request",
            Self::InvalidFormat => "The data format is invalid",
            Self::ValueOutOfRange => "The provided value is outside the acceptable range",
            Self::PayloadTooLarge => "The uploaded payload is too large",
            Self::ResourceNotFound => "The requested resource was not found",
            Self::ExternalServiceError => "An external service encountered an error",
            Self::ExternalServiceUnavailable => "An external service is currently unavailable",
            Self::ConfigError => "Configuration error encountered",
            Self::ConfigMissing => "Required configuration is missing",
            Self::InternalError => "An internal server error occurred",
            Self::StorageError => "Storage operation failed",
            Self::SerializationError => "Data serialization/deserialization failed",
        }
    }
}

/// Additional context that can be attached to errors
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ErrorContext {
    /// Request ID for tracing
    pub request_id: Option<String>,
    /// Firebase UID of the caller, if known
    pub user_id: Option<String>,
    /// Resource ID if applicable
    pub resource_id: Option<String>,
    /// Additional key-value context
    pub details: serde_json::Value,
}

/// Unified error type for the application
#[derive(Debug, Error)]
pub struct AppError {
    /// Error code
    pub code: ErrorCode,
    /// Human-readable error message
    pub message: String,
    /// Additional context
    pub context: ErrorContext,
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
            context: ErrorContext::default(),
            source: None,
        }
    }

    /// Add a request ID to the error context
    #[must_use]
    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.context.request_id = Some(request_id.into());
        self
    }

    /// Add the caller's UID to the error context
    #[must_use]
    pub fn with_user_id(mut self, user_id: impl Into<String>) -> Self {
        self.context.user_id = Some(user_id.into());
        self
    }

    /// Add a resource ID to the error context
    #[must_use]
    pub fn with_resource_id(mut self, resource_id: impl Into<String>) -> Self {
        self.context.resource_id = Some(resource_id.into());
        self
    }

    /// Add details to the error context
    #[must_use]
    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.context.details = details;
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
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code.description(), self.message)
    }
}

/// Result type alias for convenience
pub type AppResult<T> = Result<T, AppError>;

/// HTTP error response format
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Error payload
    pub error: ErrorResponseDetails,
}

/// Body of an error response
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponseDetails {
    /// Machine-readable code
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Request ID, when the error was tagged with one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
    /// Structured details
    #[serde(default, skip_serializing_if = "serde_json::Value::is_null")]
    pub details: serde_json::Value,
}

impl From<AppError> for ErrorResponse {
    fn from(error: AppError) -> Self {
        Self {
            error: ErrorResponseDetails {
                code: error.code,
                message: error.message,
                request_id: error.context.request_id,
                details: error.context.details,
            },
        }
    }
}

/// Convenience functions for creating common errors
impl AppError {
    /// Authentication required
    #[must_use]
    pub fn auth_required() -> Self {
        Self::new(ErrorCode::AuthRequired, "Missing Authorization Header")
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

    /// Caller lacks the required permission or plan
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

    /// Required field missing from a form or body
    pub fn missing_field(field: &str) -> Self {
        Self::new(
            ErrorCode::MissingRequiredField,
            format!("Missing required field: {field}"),
        )
        .with_details(serde_json::json!({ "field": field }))
    }

    /// Field present but not parseable
    pub fn invalid_format(field: &str, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::InvalidFormat,
            format!("Invalid value for {field}: {}", message.into()),
        )
        .with_details(serde_json::json!({ "field": field }))
    }

    /// Numeric value outside its accepted range
    pub fn out_of_range(field: &str, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ValueOutOfRange,
            format!("{field} {}", message.into()),
        )
        .with_details(serde_json::json!({ "field": field }))
    }

    /// Internal server error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::InternalError, message)
    }

    /// Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageError, message)
    }

    /// Configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::ConfigError, message)
    }

    /// External service error
    pub fn external_service(service: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceError,
            format!("{}: {}", service.into(), message.into()),
        )
    }

    /// External service not configured or unreachable
    pub fn service_unavailable(service: impl Into<String>) -> Self {
        Self::new(
            ErrorCode::ExternalServiceUnavailable,
            format!("{} is not configured", service.into()),
        )
    }
}

impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        match error.source() {
            Some(source) => Self::new(ErrorCode::InternalError, error.to_string())
                .with_details(serde_json::json!({ "source": source.to_string() })),
            None => Self::new(ErrorCode::InternalError, error.to_string()),
        }
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::storage(error.to_string()).with_source(error)
    }
}

impl From<serde_json::Error> for AppError {
    fn from(error: serde_json::Error) -> Self {
        Self::new(ErrorCode::SerializationError, error.to_string()).with_source(error)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            error!(
                code = ?self.code,
                message = %self.message,
                user_id = self.context.user_id.as_deref().unwrap_or("anonymous"),
                "Request failed with server error"
            );
        } else {
            debug!(code = ?self.code, message = %self.message, "Request rejected");
        }

        (status, Json(ErrorResponse::from(self))).into_response()
    }
}
