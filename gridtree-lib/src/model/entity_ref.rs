//! Lookup references between records

use serde::Deserialize;
use serde::Serialize;
use uuid::Uuid;

/// A lookup value pointing at another record.
///
/// Child rows usually reference their parent through a lookup column. The
/// hierarchy only needs the `id`; the logical name and display name are kept
/// so the grid can render the lookup cell.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityReference {
    /// The unique identifier of the referenced record.
    pub id: Uuid,
    /// The logical name of the entity (e.g., "account").
    pub logical_name: String,
    /// The display name of the referenced record, if available.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl EntityReference {
    /// Creates a new entity reference.
    pub fn new(logical_name: impl Into<String>, id: Uuid) -> Self {
        Self {
            id,
            logical_name: logical_name.into(),
            name: None,
        }
    }

    /// Creates a new entity reference with a display name.
    pub fn with_name(logical_name: impl Into<String>, id: Uuid, name: impl Into<String>) -> Self {
        Self {
            id,
            logical_name: logical_name.into(),
            name: Some(name.into()),
        }
    }
}
