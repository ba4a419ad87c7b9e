//! Shared building blocks for API value objects.
//!
//! Value objects keep the full JSON object the API returned so that a model
//! re-serialises exactly as it arrived. The identifier is read leniently and
//! never rejects a payload.

use serde_json::{Map, Value};
use thiserror::Error;

/// Key holding a resource's identifier.
pub(crate) const ID_KEY: &str = "id";

/// Validation errors for resource identifiers.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum IdentifierError {
    /// Identifier is empty after trimming whitespace.
    #[error("identifier must not be empty")]
    Empty,
    /// Identifier has leading or trailing whitespace.
    #[error("identifier must not contain surrounding whitespace")]
    SurroundingWhitespace,
}

/// Errors raised when a model factory receives an unusable payload.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ModelError {
    /// The payload was not a JSON object.
    #[error("{model} payload must be a JSON object, found {found}")]
    NotAnObject {
        /// Model being constructed.
        model: &'static str,
        /// JSON type actually received.
        found: &'static str,
    },
}

pub(crate) fn validate_identifier(raw: String) -> Result<String, IdentifierError> {
    if raw.trim().is_empty() {
        return Err(IdentifierError::Empty);
    }
    if raw.trim() != raw {
        return Err(IdentifierError::SurroundingWhitespace);
    }
    Ok(raw)
}

/// Unwrap a payload into its object map, rejecting any other JSON type.
pub(crate) fn object_fields(
    model: &'static str,
    value: Value,
) -> Result<Map<String, Value>, ModelError> {
    match value {
        Value::Object(fields) => Ok(fields),
        other => Err(ModelError::NotAnObject {
            model,
            found: json_type_name(&other),
        }),
    }
}

/// Read the `id` field as text.
///
/// Strings are taken when they pass [`validate_identifier`]; numbers use
/// their JSON rendering. Anything else yields `None`.
pub(crate) fn lenient_id(fields: &Map<String, Value>) -> Option<String> {
    match fields.get(ID_KEY)? {
        Value::String(raw) => validate_identifier(raw.clone()).ok(),
        Value::Number(number) => Some(number.to_string()),
        _ => None,
    }
}

/// Borrow a top-level string field.
pub(crate) fn str_field<'a>(fields: &'a Map<String, Value>, key: &str) -> Option<&'a str> {
    fields.get(key).and_then(Value::as_str)
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
