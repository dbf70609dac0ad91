//! Typed error handling for patient-records
//!
//! This module provides the error hierarchy used by the validation core and
//! the HTTP surface, so callers can match on specific failures instead of
//! dealing with opaque `anyhow::Error` values.
//!
//! # Error Categories
//!
//! - [`ValidationError`]: Aggregate record validation failures
//! - [`FieldValidationError`]: A single field violation with its dotted path
//! - [`RequestError`]: Errors related to HTTP requests
//! - [`ConfigError`](crate::config::ConfigError): Configuration loading errors
//!
//! # Example
//!
//! ```rust,ignore
//! use patient::prelude::*;
//!
//! match Patient::construct(&raw) {
//!     Ok(patient) => println!("BMI: {}", patient.bmi()),
//!     Err(ValidationError::FieldErrors(errors)) => {
//!         for e in errors {
//!             println!("{}: {}", e.field, e.message);
//!         }
//!     }
//!     Err(e) => eprintln!("Other error: {}", e),
//! }
//! ```

use crate::config::ConfigError;
use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;
use serde::ser::SerializeStruct;
use std::fmt;

/// The main error type for the service
#[derive(Debug)]
pub enum ServiceError {
    /// Record validation errors
    Validation(ValidationError),

    /// Configuration errors
    Config(ConfigError),

    /// HTTP/Request errors
    Request(RequestError),

    /// Internal errors (should not happen in normal operation)
    Internal(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Validation(e) => write!(f, "{}", e),
            ServiceError::Config(e) => write!(f, "{}", e),
            ServiceError::Request(e) => write!(f, "{}", e),
            ServiceError::Internal(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ServiceError::Validation(e) => Some(e),
            ServiceError::Config(e) => Some(e),
            ServiceError::Request(e) => Some(e),
            ServiceError::Internal(_) => None,
        }
    }
}

/// Error response structure for HTTP responses
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Optional additional details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ServiceError {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            ServiceError::Validation(e) => e.status_code(),
            ServiceError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServiceError::Request(e) => e.status_code(),
            ServiceError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ServiceError::Validation(e) => e.error_code(),
            ServiceError::Config(_) => "CONFIG_ERROR",
            ServiceError::Request(e) => e.error_code(),
            ServiceError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Convert to an error response
    pub fn to_response(&self) -> ErrorResponse {
        ErrorResponse {
            code: self.error_code().to_string(),
            message: self.to_string(),
            details: self.details(),
        }
    }

    fn details(&self) -> Option<serde_json::Value> {
        match self {
            ServiceError::Validation(ValidationError::FieldErrors(errors)) => {
                Some(serde_json::json!({ "fields": errors }))
            }
            _ => None,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = Json(self.to_response());
        (status, body).into_response()
    }
}

// =============================================================================
// Validation Errors
// =============================================================================

/// The category of a single field violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IssueKind {
    /// Wrong shape or type for the field
    Type,
    /// Numeric value outside its declared bounds
    Range,
    /// String or sequence length outside its declared bounds
    Length,
    /// Malformed email, URL or pattern mismatch
    Format,
    /// Email domain not in the allow-list
    DomainRejected,
    /// Required field absent
    Missing,
    /// Failure inside a nested record; carries the inner cause
    Nested(Box<IssueKind>),
}

impl IssueKind {
    /// Stable machine-readable code
    pub fn code(&self) -> &'static str {
        match self {
            IssueKind::Type => "type_error",
            IssueKind::Range => "range_error",
            IssueKind::Length => "length_error",
            IssueKind::Format => "format_error",
            IssueKind::DomainRejected => "domain_rejected",
            IssueKind::Missing => "missing_field",
            IssueKind::Nested(_) => "nested_validation_error",
        }
    }

    /// The innermost cause, unwrapping any number of `Nested` layers
    pub fn root_cause(&self) -> &IssueKind {
        match self {
            IssueKind::Nested(inner) => inner.root_cause(),
            other => other,
        }
    }

    pub fn is_nested(&self) -> bool {
        matches!(self, IssueKind::Nested(_))
    }
}

/// A violation reported by a validator or hook, before it is bound to a path
#[derive(Debug, Clone, PartialEq)]
pub struct FieldIssue {
    pub kind: IssueKind,
    pub message: String,
}

impl FieldIssue {
    pub fn new(kind: IssueKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Bind this issue to a field path
    pub fn at(self, field: impl Into<String>) -> FieldValidationError {
        FieldValidationError {
            field: field.into(),
            kind: self.kind,
            message: self.message,
        }
    }
}

/// A single field validation error
#[derive(Debug, Clone, PartialEq)]
pub struct FieldValidationError {
    /// Dotted path of the offending field (e.g. `address.city`, `allergies.0`)
    pub field: String,
    pub kind: IssueKind,
    pub message: String,
}

impl FieldValidationError {
    /// Re-scope an error reported by a nested record under its parent field
    pub fn nested_under(self, parent: &str) -> Self {
        Self {
            field: format!("{}.{}", parent, self.field),
            kind: IssueKind::Nested(Box::new(self.kind)),
            message: self.message,
        }
    }
}

impl Serialize for FieldValidationError {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let nested = self.kind.is_nested();
        let mut state =
            serializer.serialize_struct("FieldValidationError", if nested { 4 } else { 3 })?;
        state.serialize_field("field", &self.field)?;
        state.serialize_field("code", self.kind.code())?;
        if nested {
            state.serialize_field("cause", self.kind.root_cause().code())?;
        }
        state.serialize_field("message", &self.message)?;
        state.end()
    }
}

/// Errors related to input validation
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// Every field violation found during one validation pass
    FieldErrors(Vec<FieldValidationError>),

    /// Invalid JSON format
    InvalidJson { message: String },
}

impl ValidationError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            ValidationError::FieldErrors(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ValidationError::InvalidJson { .. } => StatusCode::BAD_REQUEST,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            ValidationError::FieldErrors(_) => "VALIDATION_ERROR",
            ValidationError::InvalidJson { .. } => "INVALID_JSON",
        }
    }

    /// Field errors carried by this failure (empty for non-field failures)
    pub fn errors(&self) -> &[FieldValidationError] {
        match self {
            ValidationError::FieldErrors(errors) => errors,
            ValidationError::InvalidJson { .. } => &[],
        }
    }

    /// Find the first error reported for a given field path
    pub fn for_field(&self, field: &str) -> Option<&FieldValidationError> {
        self.errors().iter().find(|e| e.field == field)
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::FieldErrors(errors) => {
                let msgs: Vec<String> = errors
                    .iter()
                    .map(|e| format!("{}: {}", e.field, e.message))
                    .collect();
                write!(
                    f,
                    "{} validation error(s): {}",
                    errors.len(),
                    msgs.join(", ")
                )
            }
            ValidationError::InvalidJson { message } => {
                write!(f, "Invalid JSON: {}", message)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::Validation(err)
    }
}

impl IntoResponse for ValidationError {
    fn into_response(self) -> Response {
        ServiceError::from(self).into_response()
    }
}

// =============================================================================
// Configuration Errors
// =============================================================================

impl From<ConfigError> for ServiceError {
    fn from(err: ConfigError) -> Self {
        ServiceError::Config(err)
    }
}

// =============================================================================
// Request Errors
// =============================================================================

/// Errors related to HTTP requests
#[derive(Debug)]
pub enum RequestError {
    /// Invalid path parameter
    InvalidPathParam { name: String, message: String },

    /// Invalid query string
    InvalidQuery { message: String },
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::InvalidPathParam { name, message } => {
                write!(f, "Invalid path parameter '{}': {}", name, message)
            }
            RequestError::InvalidQuery { message } => {
                write!(f, "Invalid query string: {}", message)
            }
        }
    }
}

impl std::error::Error for RequestError {}

impl RequestError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            RequestError::InvalidPathParam { .. } => StatusCode::UNPROCESSABLE_ENTITY,
            RequestError::InvalidQuery { .. } => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    pub fn error_code(&self) -> &'static str {
        match self {
            RequestError::InvalidPathParam { .. } => "INVALID_PATH_PARAM",
            RequestError::InvalidQuery { .. } => "INVALID_QUERY",
        }
    }
}

impl From<RequestError> for ServiceError {
    fn from(err: RequestError) -> Self {
        ServiceError::Request(err)
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::Internal(format!("JSON serialization failed: {}", err))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_errors() -> ValidationError {
        ValidationError::FieldErrors(vec![
            FieldIssue::new(IssueKind::Range, "value must be > 0").at("height"),
            FieldIssue::new(IssueKind::Missing, "field required")
                .at("city")
                .nested_under("address"),
        ])
    }

    #[test]
    fn test_validation_errors_return_422() {
        let err = ServiceError::from(sample_errors());
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.error_code(), "VALIDATION_ERROR");
    }

    #[test]
    fn test_invalid_json_returns_400() {
        let err = ServiceError::from(ValidationError::InvalidJson {
            message: "EOF while parsing".to_string(),
        });
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert!(err.to_string().contains("EOF while parsing"));
    }

    #[test]
    fn test_nested_under_prefixes_path_and_wraps_kind() {
        let err = sample_errors();
        let nested = err.for_field("address.city").expect("nested error present");
        assert_eq!(nested.kind, IssueKind::Nested(Box::new(IssueKind::Missing)));
        assert_eq!(nested.kind.root_cause(), &IssueKind::Missing);
    }

    #[test]
    fn test_double_nesting_keeps_innermost_cause() {
        let err = FieldIssue::new(IssueKind::Type, "value must be a string")
            .at("street")
            .nested_under("address")
            .nested_under("home");
        assert_eq!(err.field, "home.address.street");
        assert_eq!(err.kind.root_cause(), &IssueKind::Type);
        assert_eq!(err.kind.code(), "nested_validation_error");
    }

    #[test]
    fn test_display_lists_every_field() {
        let msg = sample_errors().to_string();
        assert!(msg.starts_with("2 validation error(s)"));
        assert!(msg.contains("height: value must be > 0"));
        assert!(msg.contains("address.city: field required"));
    }

    #[test]
    fn test_field_error_serialization() {
        let err = sample_errors();
        let json = serde_json::to_value(err.errors()).unwrap();
        assert_eq!(json[0]["field"], "height");
        assert_eq!(json[0]["code"], "range_error");
        assert!(json[0].get("cause").is_none());
        assert_eq!(json[1]["code"], "nested_validation_error");
        assert_eq!(json[1]["cause"], "missing_field");
    }

    #[test]
    fn test_response_details_contain_fields() {
        let response = ServiceError::from(sample_errors()).to_response();
        let details = response.details.expect("details present");
        assert_eq!(details["fields"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_request_error_codes() {
        let err = ServiceError::from(RequestError::InvalidPathParam {
            name: "view_id".to_string(),
            message: "not an integer".to_string(),
        });
        assert_eq!(err.error_code(), "INVALID_PATH_PARAM");
        assert_eq!(err.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[test]
    fn test_error_source_chain() {
        use std::error::Error;
        let err = ServiceError::from(sample_errors());
        assert!(err.source().is_some());
        assert!(ServiceError::Internal("boom".into()).source().is_none());
    }
}
