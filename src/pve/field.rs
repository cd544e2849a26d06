//! Nullable API fields
//!
//! The Proxmox API omits keys it has no value for and is loose about types.
//! [`Field`] decodes one such key: a value of the expected type becomes
//! `Present`, anything else (missing key, `null`, wrong JSON type) becomes
//! `Absent`.

use serde::de::{DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize, Serializer};
use serde_json::Value;

/// A field that is either present with a typed value or absent
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Field<T> {
    Present(T),
    Absent,
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Absent
    }
}

impl<T> Field<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Field::Absent)
    }

    pub fn as_ref(&self) -> Field<&T> {
        match self {
            Field::Present(v) => Field::Present(v),
            Field::Absent => Field::Absent,
        }
    }

    pub fn into_option(self) -> Option<T> {
        match self {
            Field::Present(v) => Some(v),
            Field::Absent => None,
        }
    }
}

impl<T: DeserializeOwned> Field<T> {
    /// Decode a raw JSON value, falling back to `Absent` on a type mismatch
    pub fn from_value(value: Value) -> Self {
        if value.is_null() {
            return Field::Absent;
        }

        let kind = json_type_name(&value);
        match T::deserialize(value) {
            Ok(v) => Field::Present(v),
            Err(e) => {
                tracing::debug!("Ignoring {} value of unexpected type: {}", kind, e);
                Field::Absent
            }
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Field<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(Field::from_value(value))
    }
}

impl<T: Serialize> Serialize for Field<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Field::Present(v) => v.serialize(serializer),
            Field::Absent => serializer.serialize_none(),
        }
    }
}

/// Decode a JSON number as an integer, truncating toward zero
///
/// Used with `#[serde(deserialize_with = "...")]`; any non-number is `Absent`.
pub fn truncated_integer<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Field<i64>, D::Error> {
    let value = Value::deserialize(deserializer)?;
    match value.as_f64() {
        Some(n) => Ok(Field::Present(n.trunc() as i64)),
        None => {
            if !value.is_null() {
                tracing::debug!("Ignoring {} value where a number was expected", json_type_name(&value));
            }
            Ok(Field::Absent)
        }
    }
}

fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
