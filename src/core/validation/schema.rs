//! Field descriptors and the generic record validation walk
//!
//! A [`RecordSchema`] is an ordered set of [`FieldDescriptor`]s. Validation
//! walks every descriptor, collects every violation, and only returns a
//! cleaned mapping when no field failed.

use super::filters::FieldHook;
use super::validators::{self, Constraint};
use crate::core::error::{FieldIssue, FieldValidationError, IssueKind, ValidationError};
use crate::core::field::{FieldFormat, FieldKind, FieldMetadata};
use indexmap::IndexMap;
use serde_json::{Map, Value, json};
use std::fmt;
use std::sync::Arc;

/// Whether a field must be present in the input
#[derive(Debug, Clone, PartialEq)]
pub enum Presence {
    Required,
    /// Absent keys are filled with the default
    Optional { default: Value },
}

/// Metadata describing one field's type, constraints and hooks
#[derive(Clone)]
pub struct FieldDescriptor {
    name: String,
    kind: FieldKind,
    presence: Presence,
    nullable: bool,
    format: Option<FieldFormat>,
    constraints: Vec<Constraint>,
    hooks: Vec<FieldHook>,
    metadata: FieldMetadata,
}

impl FieldDescriptor {
    /// Create a required, non-nullable field
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            presence: Presence::Required,
            nullable: false,
            format: None,
            constraints: Vec::new(),
            hooks: Vec::new(),
            metadata: FieldMetadata::default(),
        }
    }

    pub fn string(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::String)
    }

    pub fn integer(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Integer)
    }

    pub fn float(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Float)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    pub fn list(name: impl Into<String>, item: FieldKind) -> Self {
        Self::new(name, FieldKind::List(Box::new(item)))
    }

    pub fn record(name: impl Into<String>, schema: Arc<RecordSchema>) -> Self {
        Self::new(name, FieldKind::Record(schema))
    }

    /// Field may be absent or `null`; both yield `null`
    pub fn optional(mut self) -> Self {
        self.presence = Presence::Optional {
            default: Value::Null,
        };
        self.nullable = true;
        self
    }

    /// Field may be absent; absent yields `default`
    pub fn with_default(mut self, default: Value) -> Self {
        self.presence = Presence::Optional { default };
        self
    }

    /// Field must be present but may be `null`
    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn format(mut self, format: FieldFormat) -> Self {
        self.format = Some(format);
        self
    }

    pub fn constraint(mut self, constraint: Constraint) -> Self {
        self.constraints.push(constraint);
        self
    }

    pub fn max_length(self, max: usize) -> Self {
        self.constraint(Constraint::MaxLength(max))
    }

    pub fn min_length(self, min: usize) -> Self {
        self.constraint(Constraint::MinLength(min))
    }

    pub fn gt(self, bound: f64) -> Self {
        self.constraint(Constraint::Gt(bound))
    }

    pub fn lt(self, bound: f64) -> Self {
        self.constraint(Constraint::Lt(bound))
    }

    pub fn hook(mut self, hook: FieldHook) -> Self {
        self.hooks.push(hook);
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.metadata.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.metadata.description = Some(description.into());
        self
    }

    pub fn example(mut self, example: Value) -> Self {
        self.metadata.examples.push(example);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn presence(&self) -> &Presence {
        &self.presence
    }

    pub fn is_required(&self) -> bool {
        self.presence == Presence::Required
    }

    pub fn metadata(&self) -> &FieldMetadata {
        &self.metadata
    }

    /// Validate one raw value (or its absence) for this field
    ///
    /// Errors are pushed into `errors` with paths relative to the record.
    fn validate(
        &self,
        raw: Option<&Value>,
        errors: &mut Vec<FieldValidationError>,
    ) -> Option<Value> {
        let raw = match (raw, &self.presence) {
            (None, Presence::Required) => {
                errors.push(FieldIssue::new(IssueKind::Missing, "field required").at(&self.name));
                return None;
            }
            (None, Presence::Optional { default }) => return Some(default.clone()),
            (Some(Value::Null), _) if self.nullable => return Some(Value::Null),
            (Some(value), _) => value,
        };

        let before = errors.len();
        let coerced = coerce(&self.kind, raw, &self.name, errors)?;
        if errors.len() > before {
            return None;
        }

        let checked = self
            .format
            .iter()
            .try_for_each(|format| format.validate(&coerced))
            .and_then(|_| self.constraints.iter().try_for_each(|c| c.check(&coerced)))
            .and_then(|_| {
                self.hooks
                    .iter()
                    .try_fold(coerced, |value, hook| hook(value))
            });

        match checked {
            Ok(value) => Some(value),
            Err(issue) => {
                errors.push(issue.at(&self.name));
                None
            }
        }
    }

    fn json_schema(&self) -> Value {
        let mut schema = kind_schema(&self.kind);
        if let Value::Object(obj) = &mut schema {
            self.annotate(obj);
        }

        if self.nullable {
            json!({ "anyOf": [schema, { "type": "null" }] })
        } else {
            schema
        }
    }

    fn annotate(&self, obj: &mut Map<String, Value>) {
        if let Some(format) = self.format.as_ref().and_then(FieldFormat::json_format) {
            obj.insert("format".into(), json!(format));
        }
        if let Some(FieldFormat::Custom(regex)) = &self.format {
            obj.insert("pattern".into(), json!(regex.as_str()));
        }
        for constraint in &self.constraints {
            let (key, value) = match (constraint, &self.kind) {
                (Constraint::MinLength(n), FieldKind::List(_)) => ("minItems", json!(n)),
                (Constraint::MaxLength(n), FieldKind::List(_)) => ("maxItems", json!(n)),
                (Constraint::MinLength(n), _) => ("minLength", json!(n)),
                (Constraint::MaxLength(n), _) => ("maxLength", json!(n)),
                (Constraint::Gt(b), _) => ("exclusiveMinimum", json!(b)),
                (Constraint::Ge(b), _) => ("minimum", json!(b)),
                (Constraint::Lt(b), _) => ("exclusiveMaximum", json!(b)),
                (Constraint::Le(b), _) => ("maximum", json!(b)),
            };
            obj.insert(key.into(), value);
        }

        if let Some(title) = &self.metadata.title {
            obj.insert("title".into(), json!(title));
        }
        if let Some(description) = &self.metadata.description {
            obj.insert("description".into(), json!(description));
        }
        if !self.metadata.examples.is_empty() {
            obj.insert("examples".into(), json!(self.metadata.examples));
        }
        if let Presence::Optional { default } = &self.presence {
            obj.insert("default".into(), default.clone());
        }
    }
}

impl fmt::Debug for FieldDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FieldDescriptor")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("presence", &self.presence)
            .field("nullable", &self.nullable)
            .field("format", &self.format)
            .field("constraints", &self.constraints)
            .field("hooks", &self.hooks.len())
            .finish()
    }
}

fn coerce(
    kind: &FieldKind,
    raw: &Value,
    path: &str,
    errors: &mut Vec<FieldValidationError>,
) -> Option<Value> {
    let scalar = match kind {
        FieldKind::String => validators::coerce_string(raw),
        FieldKind::Integer => validators::coerce_integer(raw),
        FieldKind::Float => validators::coerce_float(raw),
        FieldKind::Boolean => validators::coerce_boolean(raw),
        FieldKind::List(item) => {
            let Value::Array(items) = raw else {
                errors.push(FieldIssue::new(IssueKind::Type, "value must be a list").at(path));
                return None;
            };
            let coerced: Vec<Value> = items
                .iter()
                .enumerate()
                .filter_map(|(i, v)| coerce(item, v, &format!("{}.{}", path, i), errors))
                .collect();
            return Some(Value::Array(coerced));
        }
        FieldKind::Record(schema) => {
            if !raw.is_object() {
                errors.push(FieldIssue::new(IssueKind::Type, "value must be an object").at(path));
                return None;
            }
            return match schema.validate(raw) {
                Ok(map) => Some(Value::Object(map)),
                Err(err) => {
                    errors.extend(err.errors().iter().cloned().map(|e| e.nested_under(path)));
                    None
                }
            };
        }
    };

    match scalar {
        Ok(value) => Some(value),
        Err(issue) => {
            errors.push(issue.at(path));
            None
        }
    }
}

fn kind_schema(kind: &FieldKind) -> Value {
    match kind {
        FieldKind::List(item) => json!({ "type": "array", "items": kind_schema(item) }),
        FieldKind::Record(schema) => schema.json_schema(),
        other => json!({ "type": other.json_type() }),
    }
}

/// A derived attribute exposed by a record; computed on read, never stored
#[derive(Debug, Clone)]
pub struct ComputedField {
    pub name: String,
    pub kind: FieldKind,
    pub description: Option<String>,
}

impl ComputedField {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            description: None,
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// An ordered set of field descriptors for one record type
#[derive(Debug, Clone)]
pub struct RecordSchema {
    name: String,
    fields: IndexMap<String, FieldDescriptor>,
    computed: Vec<ComputedField>,
}

impl RecordSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fields: IndexMap::new(),
            computed: Vec::new(),
        }
    }

    /// Add a field; a later field with the same name replaces the earlier one
    pub fn field(mut self, descriptor: FieldDescriptor) -> Self {
        self.fields.insert(descriptor.name.clone(), descriptor);
        self
    }

    pub fn computed(mut self, computed: ComputedField) -> Self {
        self.computed.push(computed);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> impl Iterator<Item = &FieldDescriptor> {
        self.fields.values()
    }

    pub fn get(&self, name: &str) -> Option<&FieldDescriptor> {
        self.fields.get(name)
    }

    pub fn computed_fields(&self) -> &[ComputedField] {
        &self.computed
    }

    /// Validate a raw mapping into a cleaned mapping in declared field order
    ///
    /// Every field is checked independently and every violation is reported.
    /// Keys not declared in the schema are dropped.
    pub fn validate(&self, raw: &Value) -> Result<Map<String, Value>, ValidationError> {
        let Some(input) = raw.as_object() else {
            return Err(ValidationError::FieldErrors(vec![
                FieldIssue::new(IssueKind::Type, "input must be an object").at(""),
            ]));
        };

        let mut errors = Vec::new();
        let mut cleaned = Map::new();

        for descriptor in self.fields.values() {
            if let Some(value) = descriptor.validate(input.get(&descriptor.name), &mut errors) {
                cleaned.insert(descriptor.name.clone(), value);
            }
        }

        if errors.is_empty() {
            tracing::debug!(record = %self.name, fields = cleaned.len(), "record validated");
            Ok(cleaned)
        } else {
            tracing::debug!(record = %self.name, errors = errors.len(), "record validation failed");
            Err(ValidationError::FieldErrors(errors))
        }
    }

    /// JSON-Schema document describing this record
    pub fn json_schema(&self) -> Value {
        let mut properties = Map::new();
        let mut required = Vec::new();

        for descriptor in self.fields.values() {
            properties.insert(descriptor.name.clone(), descriptor.json_schema());
            if descriptor.is_required() {
                required.push(json!(descriptor.name));
            }
        }

        for computed in &self.computed {
            let mut schema = kind_schema(&computed.kind);
            if let Value::Object(obj) = &mut schema {
                obj.insert("readOnly".into(), json!(true));
                if let Some(description) = &computed.description {
                    obj.insert("description".into(), json!(description));
                }
            }
            properties.insert(computed.name.clone(), schema);
        }

        json!({
            "title": self.name,
            "type": "object",
            "properties": properties,
            "required": required,
        })
    }
}
