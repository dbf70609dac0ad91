//! Validation system
//!
//! This module provides a declarative approach to validating record data:
//! field descriptors carry types, constraints and hooks, and a generic walk
//! checks a raw JSON mapping against them before it becomes a typed record.

pub mod extractor;
pub mod filters;
pub mod schema;
pub mod validators;

pub use extractor::{RecordSchemaSource, Validated};
pub use filters::{EmailStorage, FieldHook};
pub use schema::{ComputedField, FieldDescriptor, Presence, RecordSchema};
pub use validators::Constraint;
