//! Dynamic grid record

use std::collections::HashMap;
use std::sync::Arc;

use super::Value;

/// Read access to the fields of a source record.
///
/// The hierarchy engine makes no assumption about the shape of the rows it
/// is handed. Anything that can look up a field by name and list its field
/// names can be placed into a hierarchy.
pub trait FieldSource {
    /// Returns the value of `field`, or `None` if the record has no such field.
    fn get(&self, field: &str) -> Option<&Value>;

    /// Returns the record's field names in a stable order.
    ///
    /// Key auto-detection scans names in this order, so the first matching
    /// column wins.
    fn field_names(&self) -> Vec<&str>;

    /// Returns the stringified key stored in `field`, if any.
    fn key(&self, field: &str) -> Option<String> {
        self.get(field).and_then(Value::as_key)
    }
}

/// A row from one page of a grid dataset.
///
/// Fields are kept in insertion order (which is document order when the
/// record is deserialized from JSON). Formatted values are the host's display
/// text for a field and are only used for rendering.
///
/// # Example
///
/// ```
/// use gridtree_lib::model::{FieldSource, Record, Value};
///
/// let record = Record::new()
///     .set("ID", "P1")
///     .set("name", "Contoso");
///
/// assert_eq!(record.get("name"), Some(&Value::from("Contoso")));
/// assert_eq!(record.key("ID").as_deref(), Some("P1"));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    /// The field values.
    pub(crate) fields: HashMap<String, Value>,

    /// Field names in insertion order.
    pub(crate) order: Vec<String>,

    /// Formatted display values (from @OData.Community.Display.V1.FormattedValue).
    pub(crate) formatted_values: HashMap<String, String>,
}

impl Record {
    /// Creates a new empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Returns `true` if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Iterates over fields in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.order
            .iter()
            .filter_map(|name| self.fields.get(name).map(|v| (name.as_str(), v)))
    }

    /// Returns the formatted value for a field, if available.
    pub fn get_formatted(&self, field: &str) -> Option<&str> {
        self.formatted_values.get(field).map(|s| s.as_str())
    }

    /// Sets a field value (builder pattern).
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(field, value);
        self
    }

    /// Sets a field's formatted display value (builder pattern).
    pub fn with_formatted(mut self, field: impl Into<String>, text: impl Into<String>) -> Self {
        self.formatted_values.insert(field.into(), text.into());
        self
    }

    /// Inserts a field value. Replacing a field keeps its original position.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        let field = field.into();
        if self.fields.insert(field.clone(), value.into()).is_none() {
            self.order.push(field);
        }
    }
}

impl FieldSource for Record {
    fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    fn field_names(&self) -> Vec<&str> {
        self.order.iter().map(String::as_str).collect()
    }
}

impl<T: FieldSource + ?Sized> FieldSource for &T {
    fn get(&self, field: &str) -> Option<&Value> {
        (**self).get(field)
    }

    fn field_names(&self) -> Vec<&str> {
        (**self).field_names()
    }
}

impl<T: FieldSource + ?Sized> FieldSource for Arc<T> {
    fn get(&self, field: &str) -> Option<&Value> {
        (**self).get(field)
    }

    fn field_names(&self) -> Vec<&str> {
        (**self).field_names()
    }
}
