//! Value enum for dynamic field values

use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

use super::EntityReference;

/// A dynamic value held by a record field.
///
/// Grid pages arrive from the host as loosely typed rows, so every field is
/// stored as a `Value`. The hierarchy engine only cares about one thing a
/// value can do: turn itself into a key string (see [`Value::as_key`]).
///
/// # Example
///
/// ```
/// use gridtree_lib::model::Value;
///
/// let name = Value::from("Contoso");
/// let count = Value::from(42);
/// assert_eq!(count.as_key().as_deref(), Some("42"));
/// assert_eq!(Value::Null.as_key(), None);
/// # let _ = name;
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Null/empty value.
    Null,
    /// Boolean value.
    Bool(bool),
    /// 32-bit integer.
    Int(i32),
    /// 64-bit integer.
    Long(i64),
    /// 64-bit floating point.
    Float(f64),
    /// String value.
    String(String),
    /// GUID/UUID value.
    Guid(Uuid),
    /// Date and time with timezone.
    DateTime(DateTime<Utc>),
    /// Lookup to another record.
    EntityReference(EntityReference),
    /// Fallback for unrecognized JSON values.
    Json(serde_json::Value),
}

impl Value {
    /// Returns `true` if this is a null value.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Returns the type name of this value.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Null => "null",
            Value::Bool(_) => "bool",
            Value::Int(_) => "int",
            Value::Long(_) => "long",
            Value::Float(_) => "float",
            Value::String(_) => "string",
            Value::Guid(_) => "guid",
            Value::DateTime(_) => "datetime",
            Value::EntityReference(_) => "entity_reference",
            Value::Json(_) => "json",
        }
    }

    /// Stringifies the value for use as a node id or join key.
    ///
    /// Returns `None` for values that cannot identify a record: nulls,
    /// empty strings, booleans and structured JSON. Lookups resolve to the
    /// id of the record they point at.
    pub fn as_key(&self) -> Option<String> {
        match self {
            Value::String(s) if s.is_empty() => None,
            Value::String(s) => Some(s.clone()),
            Value::Int(v) => Some(v.to_string()),
            Value::Long(v) => Some(v.to_string()),
            Value::Float(v) => Some(v.to_string()),
            Value::Guid(id) => Some(id.hyphenated().to_string()),
            Value::DateTime(dt) => Some(dt.to_rfc3339()),
            Value::EntityReference(r) => Some(r.id.hyphenated().to_string()),
            Value::Json(serde_json::Value::String(s)) if !s.is_empty() => Some(s.clone()),
            Value::Json(serde_json::Value::Number(n)) => Some(n.to_string()),
            Value::Null | Value::Bool(_) | Value::Json(_) => None,
        }
    }
}

// =============================================================================
// From implementations
// =============================================================================

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Value::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Value::Int(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Value::Long(v)
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Value::Float(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Value::String(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Value::String(v)
    }
}

impl From<Uuid> for Value {
    fn from(v: Uuid) -> Self {
        Value::Guid(v)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(v: DateTime<Utc>) -> Self {
        Value::DateTime(v)
    }
}

impl From<EntityReference> for Value {
    fn from(v: EntityReference) -> Self {
        Value::EntityReference(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(v) => v.into(),
            None => Value::Null,
        }
    }
}
