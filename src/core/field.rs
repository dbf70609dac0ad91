//! Field kinds, formats and documentation metadata

use crate::core::error::{FieldIssue, IssueKind};
use crate::core::validation::schema::RecordSchema;
use regex::Regex;
use serde_json::Value;
use std::sync::Arc;
use validator::{ValidateEmail, ValidateUrl};

/// The base type a field is coerced to before constraints run
#[derive(Debug, Clone)]
pub enum FieldKind {
    String,
    Integer,
    Float,
    Boolean,
    /// Homogeneous sequence; each item is checked against the inner kind
    List(Box<FieldKind>),
    /// Nested record validated recursively against its own schema
    Record(Arc<RecordSchema>),
}

impl FieldKind {
    /// Name used in JSON schema output
    pub fn json_type(&self) -> &'static str {
        match self {
            FieldKind::String => "string",
            FieldKind::Integer => "integer",
            FieldKind::Float => "number",
            FieldKind::Boolean => "boolean",
            FieldKind::List(_) => "array",
            FieldKind::Record(_) => "object",
        }
    }
}

/// Field format validators applied to string values after coercion
#[derive(Debug, Clone)]
pub enum FieldFormat {
    Email,
    /// Absolute URL with a scheme
    Url,
    Custom(Regex),
}

impl FieldFormat {
    /// Validate a coerced value against this format
    pub fn validate(&self, value: &Value) -> Result<(), FieldIssue> {
        let Some(s) = value.as_str() else {
            return Err(FieldIssue::new(IssueKind::Type, "value must be a string"));
        };
        let s = s.to_string();

        match self {
            FieldFormat::Email if s.validate_email() => Ok(()),
            FieldFormat::Email => Err(FieldIssue::new(
                IssueKind::Format,
                "value is not a valid email address",
            )),
            FieldFormat::Url if s.validate_url() => Ok(()),
            FieldFormat::Url => Err(FieldIssue::new(IssueKind::Format, "value must be a URL")),
            FieldFormat::Custom(regex) if regex.is_match(&s) => Ok(()),
            FieldFormat::Custom(regex) => Err(FieldIssue::new(
                IssueKind::Format,
                format!("value must match pattern '{}'", regex.as_str()),
            )),
        }
    }

    /// Name used in JSON schema output
    pub fn json_format(&self) -> Option<&'static str> {
        match self {
            FieldFormat::Email => Some("email"),
            FieldFormat::Url => Some("uri"),
            FieldFormat::Custom(_) => None,
        }
    }
}

/// Documentation-only metadata; no runtime effect on validation
#[derive(Debug, Clone, Default)]
pub struct FieldMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub examples: Vec<Value>,
}

impl FieldMetadata {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.examples.is_empty()
    }
}
