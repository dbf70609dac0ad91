//! Core module containing the validation engine, record trait and errors

pub mod error;
pub mod field;
pub mod record;
pub mod validation;

pub use error::{
    FieldIssue, FieldValidationError, IssueKind, RequestError, ServiceError, ValidationError,
};
pub use field::{FieldFormat, FieldKind, FieldMetadata};
pub use record::{ExportOptions, Record};
