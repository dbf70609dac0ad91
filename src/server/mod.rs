//! HTTP surface: routes that validate and echo patient records

pub mod builder;
pub mod handlers;
pub mod router;

pub use builder::ServerBuilder;
pub use router::build_router;

use crate::config::AppConfig;
use crate::core::validation::{RecordSchema, RecordSchemaSource};
use crate::models::{Patient, patient_schema};
use std::sync::Arc;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub patient_schema: Arc<RecordSchema>,
}

impl AppState {
    /// Build the state, compiling the patient schema from the config's rules
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            patient_schema: Arc::new(patient_schema(&config.validation)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_state_schema_follows_config_rules() {
        let mut config = AppConfig::default();
        config.validation.allowed_email_domains = vec!["axis.com".to_string()];
        let state = AppState::from_config(&config);

        let schema = state.record_schema();
        let err = schema.validate(&json!({ "email": "sam@hdfc.com" })).unwrap_err();
        assert!(err.for_field("email").is_some());
    }
}

impl RecordSchemaSource<Patient> for AppState {
    fn record_schema(&self) -> Arc<RecordSchema> {
        self.patient_schema.clone()
    }
}
