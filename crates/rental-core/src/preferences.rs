//! Coercion of external preference payloads
//!
//! Request bodies arrive as arbitrary JSON. This is the one place where they
//! are turned into a typed [`PreferenceRequest`]; the scoring code downstream
//! never sees raw JSON.
//!
//! | Field | Accepted | Ignored (no preference) |
//! |-------|----------|-------------------------|
//! | `Brand`, `Fuel_Type`, `Transmission`, `Body_Type` | string, number, bool | missing, null, blank |
//! | `min_mileage`, `max_engine_cc` | number, numeric string | missing, null, blank |
//! | `top_n` | non-negative integer, integer string | missing, null, blank |
//!
//! Arrays and objects in any of these fields, or a payload that is not an
//! object at all, are a [`PreferenceError`]. Unknown keys are ignored.

use crate::error::PreferenceError;
use crate::search::PreferenceRequest;
use serde_json::{Map, Value};

const CATEGORICAL_FIELDS: [&str; 4] = ["Brand", "Fuel_Type", "Transmission", "Body_Type"];

impl PreferenceRequest {
    /// Coerce a JSON payload into a preference request
    pub fn from_value(value: &Value) -> Result<Self, PreferenceError> {
        let object = match value {
            Value::Object(map) => map,
            Value::Null => return Ok(Self::default()),
            other => return Err(PreferenceError::NotAnObject(type_name(other).to_string())),
        };

        let mut categorical = CATEGORICAL_FIELDS
            .iter()
            .map(|field| text_field(object, field))
            .collect::<Result<Vec<_>, _>>()?
            .into_iter();

        Ok(Self {
            brand: categorical.next().flatten(),
            fuel_type: categorical.next().flatten(),
            transmission: categorical.next().flatten(),
            body_type: categorical.next().flatten(),
            min_mileage: number_field(object, "min_mileage")?,
            max_engine_cc: number_field(object, "max_engine_cc")?,
            top_n: count_field(object, "top_n")?,
        })
    }
}

fn text_field(object: &Map<String, Value>, field: &str) -> Result<Option<String>, PreferenceError> {
    let text = match object.get(field) {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        Some(other) => return Err(invalid_field(field, other)),
    };

    let trimmed = text.trim();
    if trimmed.is_empty() {
        Ok(None)
    } else {
        Ok(Some(trimmed.to_string()))
    }
}

fn number_field(object: &Map<String, Value>, field: &str) -> Result<Option<f64>, PreferenceError> {
    let number = match object.get(field) {
        None | Some(Value::Null) => None,
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) if s.trim().is_empty() => None,
        Some(Value::String(s)) => Some(s.trim().parse::<f64>().map_err(|_| {
            PreferenceError::InvalidNumber {
                field: field.to_string(),
                value: s.clone(),
            }
        })?),
        Some(other) => return Err(invalid_field(field, other)),
    };

    match number {
        Some(n) if !n.is_finite() => Err(PreferenceError::InvalidNumber {
            field: field.to_string(),
            value: n.to_string(),
        }),
        other => Ok(other),
    }
}

fn count_field(object: &Map<String, Value>, field: &str) -> Result<Option<usize>, PreferenceError> {
    let invalid = |value: String| PreferenceError::InvalidNumber {
        field: field.to_string(),
        value,
    };

    match object.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n
            .as_u64()
            .map(|n| Some(n as usize))
            .ok_or_else(|| invalid(n.to_string())),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s
            .trim()
            .parse::<usize>()
            .map(Some)
            .map_err(|_| invalid(s.clone())),
        Some(other) => Err(invalid_field(field, other)),
    }
}

fn invalid_field(field: &str, value: &Value) -> PreferenceError {
    PreferenceError::InvalidField {
        field: field.to_string(),
        value: value.to_string(),
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
