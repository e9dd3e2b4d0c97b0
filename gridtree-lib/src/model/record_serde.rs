//! Serde support for Record in the host's OData row format.
//!
//! ## Read Format (Deserialization)
//!
//! - Lookup fields come as: `"_parentaccountid_value": "guid"`
//! - Lookup metadata: `"_field_value@Microsoft.Dynamics.CRM.lookuplogicalname": "account"`
//! - Formatted values: `"field@OData.Community.Display.V1.FormattedValue": "Display Text"`
//! - Other annotations (`@odata.etag`, ...) are skipped
//!
//! Lookups are stored under their clean name (`parentaccountid`) as
//! [`Value::EntityReference`]. Every other string is kept verbatim, so a key
//! column's text is exactly the node id the host will ask for. Field order
//! follows the document.
//!
//! ## Write Format (Serialization)
//!
//! Fields serialize in order under their clean names; nulls are skipped.

use std::collections::HashMap;
use std::fmt;

use serde::Deserialize;
use serde::Deserializer;
use serde::Serialize;
use serde::Serializer;
use serde::de::MapAccess;
use serde::de::Visitor;
use serde::ser::SerializeMap;
use uuid::Uuid;

use super::EntityReference;
use super::Record;
use super::Value;

const FORMATTED_SUFFIX: &str = "@OData.Community.Display.V1.FormattedValue";
const LOOKUP_NAME_SUFFIX: &str = "@Microsoft.Dynamics.CRM.lookuplogicalname";

impl Serialize for Record {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(None)?;
        for (key, value) in self.iter() {
            if !value.is_null() {
                map.serialize_entry(key, value)?;
            }
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for Record {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(RecordVisitor)
    }
}

struct RecordVisitor;

impl<'de> Visitor<'de> for RecordVisitor {
    type Value = Record;

    fn expecting(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        formatter.write_str("a map representing a grid record")
    }

    fn visit_map<M>(self, mut map: M) -> Result<Record, M::Error>
    where
        M: MapAccess<'de>,
    {
        let mut record = Record::new();
        let mut formatted_values: HashMap<String, String> = HashMap::new();
        let mut lookup_logical_names: HashMap<String, String> = HashMap::new();
        let mut raw_fields: Vec<(String, serde_json::Value)> = Vec::new();

        // Annotations may come before or after the field they describe
        while let Some(key) = map.next_key::<String>()? {
            let value: serde_json::Value = map.next_value()?;

            if let Some(field_name) = key.strip_suffix(FORMATTED_SUFFIX) {
                if let serde_json::Value::String(s) = value {
                    formatted_values.insert(field_name.to_string(), s);
                }
            } else if let Some(field_name) = key.strip_suffix(LOOKUP_NAME_SUFFIX) {
                if let serde_json::Value::String(s) = value {
                    lookup_logical_names.insert(field_name.to_string(), s);
                }
            } else if key.starts_with('@') || key.contains("@odata.") || key.contains("@Microsoft.")
            {
                // Other OData annotations
            } else {
                raw_fields.push((key, value));
            }
        }

        for (key, json_value) in raw_fields {
            let value = match (lookup_name(&key), json_value) {
                (Some(_), serde_json::Value::String(guid_str)) => match Uuid::parse_str(&guid_str) {
                    Ok(id) => {
                        let logical_name = lookup_logical_names
                            .get(&key)
                            .cloned()
                            .unwrap_or_default();
                        let reference = match formatted_values.get(&key) {
                            Some(name) => EntityReference::with_name(logical_name, id, name),
                            None => EntityReference::new(logical_name, id),
                        };
                        Value::EntityReference(reference)
                    }
                    Err(_) => Value::String(guid_str),
                },
                (_, other) => json_value_to_value(other),
            };

            let clean_key = lookup_name(&key).map(str::to_string).unwrap_or(key);
            record.insert(clean_key, value);
        }

        for (key, value) in formatted_values {
            let clean = lookup_name(&key).map(str::to_string).unwrap_or(key);
            record.formatted_values.insert(clean, value);
        }

        Ok(record)
    }
}

/// Returns the clean field name for a `_name_value` lookup column.
fn lookup_name(key: &str) -> Option<&str> {
    key.strip_prefix('_')
        .and_then(|k| k.strip_suffix("_value"))
        .filter(|k| !k.is_empty())
}

/// Converts a plain (non-lookup) JSON value.
///
/// Strings are never reinterpreted. Integers outside the i64 range stay JSON
/// numbers so their key text is not rounded through f64.
fn json_value_to_value(json: serde_json::Value) -> Value {
    match json {
        serde_json::Value::Null => Value::Null,
        serde_json::Value::Bool(b) => Value::Bool(b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                match i32::try_from(i) {
                    Ok(small) => Value::Int(small),
                    Err(_) => Value::Long(i),
                }
            } else if n.is_f64()
                && let Some(f) = n.as_f64()
            {
                Value::Float(f)
            } else {
                Value::Json(serde_json::Value::Number(n))
            }
        }
        serde_json::Value::String(s) => Value::String(s),
        other => Value::Json(other),
    }
}
