//! Patient record

use super::address::Address;
use crate::config::ValidationRules;
use crate::core::field::{FieldFormat, FieldKind};
use crate::core::record::Record;
use crate::core::validation::{ComputedField, FieldDescriptor, RecordSchema, filters};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value, json};
use std::sync::{Arc, OnceLock};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Patient {
    pub name: String,
    pub age: i64,
    /// Domain part of the submitted address unless configured to keep it whole
    pub email: String,
    pub address: Address,
    /// Stored in normalized form (`https://example.com` becomes `https://example.com/`)
    pub url: Option<String>,
    /// Meters
    pub height: f64,
    /// Kilograms
    pub weight: f64,
    pub married: Option<bool>,
    pub allergies: Vec<String>,
}

/// Body mass index rounded to two decimals, halves to even
pub fn bmi(height: f64, weight: f64) -> f64 {
    (weight / height.powi(2) * 100.0).round_ties_even() / 100.0
}

impl Patient {
    /// Recomputed from the current height and weight on every call
    pub fn bmi(&self) -> f64 {
        bmi(self.height, self.weight)
    }
}

/// Build the patient schema with the given email rules
pub fn patient_schema(rules: &ValidationRules) -> RecordSchema {
    RecordSchema::new("Patient")
        .field(FieldDescriptor::string("name").max_length(50))
        .field(
            FieldDescriptor::integer("age")
                .title("Enter age")
                .description("Enter the age of the patient")
                .example(json!(30)),
        )
        .field(
            FieldDescriptor::string("email")
                .format(FieldFormat::Email)
                .hook(filters::email_domain_allowlist(
                    &rules.allowed_email_domains,
                    rules.email_storage,
                )),
        )
        .field(FieldDescriptor::record(
            "address",
            Arc::new(Address::schema().clone()),
        ))
        .field(
            FieldDescriptor::string("url")
                .format(FieldFormat::Url)
                .hook(filters::normalize_url())
                .optional(),
        )
        .field(FieldDescriptor::float("height").gt(0.0).lt(2.0))
        .field(FieldDescriptor::float("weight").gt(0.0).lt(120.0))
        .field(FieldDescriptor::boolean("married").optional())
        .field(FieldDescriptor::list("allergies", FieldKind::String))
        .computed(
            ComputedField::new("bmi", FieldKind::Float)
                .description("weight / height², rounded to two decimals"),
        )
}

impl Record for Patient {
    fn schema() -> &'static RecordSchema {
        static SCHEMA: OnceLock<RecordSchema> = OnceLock::new();
        SCHEMA.get_or_init(|| patient_schema(&ValidationRules::default()))
    }

    fn computed_fields(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("bmi".into(), json!(self.bmi()));
        map
    }
}
