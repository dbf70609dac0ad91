//! Reusable field validators
//!
//! Coercion functions turn a raw JSON value into the field's base type, and
//! [`Constraint`]s check the coerced value against declared bounds.

use crate::core::error::{FieldIssue, IssueKind};
use serde_json::{Number, Value};

/// A declared bound on a field value
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    /// Minimum length in characters (strings) or items (lists)
    MinLength(usize),
    /// Maximum length in characters (strings) or items (lists)
    MaxLength(usize),
    /// Strictly greater than
    Gt(f64),
    /// Greater than or equal
    Ge(f64),
    /// Strictly less than
    Lt(f64),
    /// Less than or equal
    Le(f64),
}

impl Constraint {
    /// Check a coerced value; values the constraint does not apply to pass through
    pub fn check(&self, value: &Value) -> Result<(), FieldIssue> {
        match self {
            Constraint::MinLength(min) => match length_of(value) {
                Some((len, unit)) if len < *min => Err(FieldIssue::new(
                    IssueKind::Length,
                    format!("value must have at least {} {}", min, unit),
                )),
                _ => Ok(()),
            },
            Constraint::MaxLength(max) => match length_of(value) {
                Some((len, unit)) if len > *max => Err(FieldIssue::new(
                    IssueKind::Length,
                    format!("value must have at most {} {}", max, unit),
                )),
                _ => Ok(()),
            },
            Constraint::Gt(bound) => check_bound(value, |n| n > *bound, ">", *bound),
            Constraint::Ge(bound) => check_bound(value, |n| n >= *bound, ">=", *bound),
            Constraint::Lt(bound) => check_bound(value, |n| n < *bound, "<", *bound),
            Constraint::Le(bound) => check_bound(value, |n| n <= *bound, "<=", *bound),
        }
    }
}

fn length_of(value: &Value) -> Option<(usize, &'static str)> {
    match value {
        Value::String(s) => Some((s.chars().count(), "characters")),
        Value::Array(items) => Some((items.len(), "items")),
        _ => None,
    }
}

fn check_bound(
    value: &Value,
    holds: impl Fn(f64) -> bool,
    op: &str,
    bound: f64,
) -> Result<(), FieldIssue> {
    match value.as_f64() {
        Some(n) if !holds(n) => Err(FieldIssue::new(
            IssueKind::Range,
            format!("value must be {} {}", op, bound),
        )),
        _ => Ok(()),
    }
}

/// Strings are strict: no conversion from numbers or booleans
pub fn coerce_string(value: &Value) -> Result<Value, FieldIssue> {
    match value {
        Value::String(_) => Ok(value.clone()),
        _ => Err(FieldIssue::new(IssueKind::Type, "value must be a string")),
    }
}

/// Integers accept integral floats (`30.0`) and numeric strings
pub fn coerce_integer(value: &Value) -> Result<Value, FieldIssue> {
    let invalid = || FieldIssue::new(IssueKind::Type, "value must be a valid integer");

    match value {
        Value::Number(n) if n.is_i64() => Ok(value.clone()),
        Value::Number(n) if n.is_u64() => Err(FieldIssue::new(
            IssueKind::Range,
            format!("value must be <= {}", i64::MAX),
        )),
        Value::Number(n) => n
            .as_f64()
            .and_then(integral_f64)
            .map(Value::from)
            .ok_or_else(invalid),
        Value::String(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                return Ok(Value::from(i));
            }
            s.parse::<f64>()
                .ok()
                .and_then(integral_f64)
                .map(Value::from)
                .ok_or_else(invalid)
        }
        _ => Err(invalid()),
    }
}

fn integral_f64(f: f64) -> Option<i64> {
    if f.is_finite() && f.fract() == 0.0 && f >= i64::MIN as f64 && f < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}

/// Floats accept integers and numeric strings
pub fn coerce_float(value: &Value) -> Result<Value, FieldIssue> {
    let invalid = || FieldIssue::new(IssueKind::Type, "value must be a valid number");

    let number = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };

    number
        .and_then(Number::from_f64)
        .map(Value::Number)
        .ok_or_else(invalid)
}

/// Booleans accept `0`/`1` and the usual yes/no spellings
pub fn coerce_boolean(value: &Value) -> Result<Value, FieldIssue> {
    let invalid = || FieldIssue::new(IssueKind::Type, "value must be a valid boolean");

    match value {
        Value::Bool(_) => Ok(value.clone()),
        Value::Number(n) => match n.as_i64() {
            Some(0) => Ok(Value::Bool(false)),
            Some(1) => Ok(Value::Bool(true)),
            _ => Err(invalid()),
        },
        Value::String(s) => match s.trim().to_ascii_lowercase().as_str() {
            "true" | "1" | "yes" | "on" | "t" | "y" => Ok(Value::Bool(true)),
            "false" | "0" | "no" | "off" | "f" | "n" => Ok(Value::Bool(false)),
            _ => Err(invalid()),
        },
        _ => Err(invalid()),
    }
}
