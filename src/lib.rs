//! # patient-records
//!
//! Declarative record validation with nested schemas, field constraints,
//! pluggable field hooks and computed attributes, plus a thin REST surface.
//!
//! ## Features
//!
//! - **Field Descriptors**: Types, bounds, formats and metadata drive one generic walk
//! - **Aggregate Errors**: Every violated field is reported, with dotted paths
//! - **Nested Records**: Sub-schemas validate recursively (`address.city`)
//! - **Hooks**: Per-field transforms such as the email domain allow-list
//! - **Computed Fields**: Derived values recomputed on every read (`bmi`)
//! - **Configuration-Based**: Allow-list and bind address via YAML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use patient::prelude::*;
//!
//! let patient = Patient::construct(&serde_json::json!({
//!     "name": "Sam",
//!     "age": 30,
//!     "email": "sam@hdfc.com",
//!     "address": { "street": "123 Main St", "city": "Springfield", "pin_code": "12345" },
//!     "height": 1.72,
//!     "weight": 60,
//!     "married": true,
//!     "allergies": ["peanuts", "pollen"]
//! }))?;
//!
//! assert_eq!(patient.bmi(), 20.28);
//! let snapshot = patient.export()?;
//! ```

pub mod config;
pub mod core;
pub mod models;
pub mod server;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        error::{
            FieldIssue, FieldValidationError, IssueKind, RequestError, ServiceError,
            ValidationError,
        },
        field::{FieldFormat, FieldKind, FieldMetadata},
        record::{ExportOptions, Record},
        validation::{
            ComputedField, Constraint, EmailStorage, FieldDescriptor, FieldHook, Presence,
            RecordSchema, RecordSchemaSource, Validated, filters,
        },
    };

    // === Models ===
    pub use crate::models::{Address, Patient, address_schema, bmi, patient_schema};

    // === Config ===
    pub use crate::config::{AppConfig, ConfigError, ServerConfig, ValidationRules};

    // === Server ===
    pub use crate::server::{AppState, ServerBuilder, build_router};

    // === External dependencies ===
    pub use serde::{Deserialize, Serialize};
}
