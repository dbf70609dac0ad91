//! Record trait: schema-backed construction and export

use crate::core::error::ValidationError;
use crate::core::validation::schema::RecordSchema;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::HashSet;

/// Options controlling [`Record::export_with`]
#[derive(Debug, Clone)]
pub struct ExportOptions {
    /// Append computed fields after stored fields
    pub include_computed: bool,
    /// When set, only these top-level keys are kept
    pub include: Option<HashSet<String>>,
    /// Top-level keys to drop
    pub exclude: HashSet<String>,
    /// Drop keys whose value is `null`, at every nesting level
    pub exclude_none: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            include_computed: true,
            include: None,
            exclude: HashSet::new(),
            exclude_none: false,
        }
    }
}

impl ExportOptions {
    /// Stored fields only
    pub fn stored_only() -> Self {
        Self {
            include_computed: false,
            ..Self::default()
        }
    }

    pub fn include<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.include = Some(keys.into_iter().map(Into::into).collect());
        self
    }

    pub fn exclude<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude.extend(keys.into_iter().map(Into::into));
        self
    }

    pub fn exclude_none(mut self) -> Self {
        self.exclude_none = true;
        self
    }

    fn keeps(&self, key: &str) -> bool {
        !self.exclude.contains(key) && self.include.as_ref().is_none_or(|keys| keys.contains(key))
    }
}

/// A typed value that can only be built from input that passes its schema
///
/// Construction is all-or-nothing: the raw mapping is first validated against
/// the schema (collecting every violation), and only the cleaned mapping is
/// deserialized into `Self`.
pub trait Record: Serialize + DeserializeOwned {
    /// Schema used by [`Record::construct`]
    fn schema() -> &'static RecordSchema;

    /// Derived attributes, recomputed on every call
    fn computed_fields(&self) -> Map<String, Value> {
        Map::new()
    }

    /// Validate `raw` against the default schema and build the record
    fn construct(raw: &Value) -> Result<Self, ValidationError> {
        Self::construct_with(Self::schema(), raw)
    }

    /// Validate `raw` against an explicit schema and build the record
    fn construct_with(schema: &RecordSchema, raw: &Value) -> Result<Self, ValidationError> {
        let cleaned = schema.validate(raw)?;
        serde_json::from_value(Value::Object(cleaned)).map_err(|e| ValidationError::InvalidJson {
            message: format!("{} does not match its schema: {}", schema.name(), e),
        })
    }

    /// Plain mapping snapshot, computed fields included
    fn export(&self) -> serde_json::Result<Map<String, Value>> {
        self.export_with(&ExportOptions::default())
    }

    fn export_with(&self, options: &ExportOptions) -> serde_json::Result<Map<String, Value>> {
        let mut map = match serde_json::to_value(self)? {
            Value::Object(map) => map,
            other => {
                return Err(serde::ser::Error::custom(format!(
                    "record serialized to a non-object value: {}",
                    other
                )));
            }
        };

        if options.include_computed {
            map.extend(self.computed_fields());
        }

        map.retain(|key, value| {
            if options.exclude_none {
                strip_nulls(value);
            }
            options.keeps(key) && !(options.exclude_none && value.is_null())
        });

        Ok(map)
    }
}

fn strip_nulls(value: &mut Value) {
    match value {
        Value::Object(map) => {
            map.retain(|_, v| !v.is_null());
            map.values_mut().for_each(strip_nulls);
        }
        Value::Array(items) => items.iter_mut().for_each(strip_nulls),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::validation::schema::FieldDescriptor;
    use serde::Deserialize;
    use serde_json::json;
    use std::sync::OnceLock;

    #[derive(Debug, Serialize, Deserialize)]
    struct Rectangle {
        width: f64,
        height: f64,
        label: Option<String>,
    }

    impl Record for Rectangle {
        fn schema() -> &'static RecordSchema {
            static SCHEMA: OnceLock<RecordSchema> = OnceLock::new();
            SCHEMA.get_or_init(|| {
                RecordSchema::new("Rectangle")
                    .field(FieldDescriptor::float("width").gt(0.0))
                    .field(FieldDescriptor::float("height").gt(0.0))
                    .field(FieldDescriptor::string("label").optional())
            })
        }

        fn computed_fields(&self) -> Map<String, Value> {
            let mut map = Map::new();
            map.insert("area".into(), json!(self.width * self.height));
            map
        }
    }

    fn rect() -> Rectangle {
        Rectangle::construct(&json!({ "width": 2, "height": 3 })).unwrap()
    }

    #[test]
    fn test_construct_success() {
        let r = rect();
        assert_eq!(r.width, 2.0);
        assert!(r.label.is_none());
    }

    #[test]
    fn test_construct_failure_is_all_or_nothing() {
        let err = Rectangle::construct(&json!({ "width": -1, "height": 0 })).unwrap_err();
        assert_eq!(err.errors().len(), 2);
    }

    #[test]
    fn test_export_includes_computed_by_default() {
        let map = rect().export().unwrap();
        let keys: Vec<&str> = map.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["width", "height", "label", "area"]);
        assert_eq!(map["area"], json!(6.0));
    }

    #[test]
    fn test_export_stored_only() {
        let map = rect().export_with(&ExportOptions::stored_only()).unwrap();
        assert!(!map.contains_key("area"));
    }

    #[test]
    fn test_export_include_exclude() {
        let r = rect();
        let map = r
            .export_with(&ExportOptions::default().include(["width", "area"]))
            .unwrap();
        assert_eq!(map.len(), 2);

        let map = r
            .export_with(&ExportOptions::default().exclude(["width"]))
            .unwrap();
        assert!(!map.contains_key("width"));
        assert!(map.contains_key("height"));
    }

    #[test]
    fn test_export_exclude_none() {
        let map = rect()
            .export_with(&ExportOptions::default().exclude_none())
            .unwrap();
        assert!(!map.contains_key("label"));
    }

    #[test]
    fn test_strip_nulls_recurses() {
        let mut value = json!({ "a": null, "b": { "c": null, "d": 1 }, "e": [{ "f": null }] });
        strip_nulls(&mut value);
        assert_eq!(value, json!({ "b": { "d": 1 }, "e": [{}] }));
    }
}
