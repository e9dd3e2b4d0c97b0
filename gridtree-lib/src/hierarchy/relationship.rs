//! Parent/child relationship types

use serde::Deserialize;
use serde::Serialize;

use crate::error::DetectionWarning;

/// Confidence reported for every auto-detected relationship.
pub const AUTO_DETECT_CONFIDENCE: f64 = 0.85;

/// How child records point at their parent record.
///
/// `reference_column` names a field on child records whose value equals
/// some parent record's `parent_key` value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyRelationship {
    /// The primary key column on parent records.
    pub parent_key: String,

    /// The primary key column on child records.
    pub child_key: String,

    /// The column on child records holding the parent's key.
    pub reference_column: String,

    /// Whether the columns were inferred rather than configured.
    pub auto_detected: bool,

    /// Detection confidence, set for auto-detected relationships only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<f64>,
}

impl HierarchyRelationship {
    /// Creates a manually configured relationship.
    pub fn manual(
        parent_key: impl Into<String>,
        child_key: impl Into<String>,
        reference_column: impl Into<String>,
    ) -> Self {
        Self {
            parent_key: parent_key.into(),
            child_key: child_key.into(),
            reference_column: reference_column.into(),
            auto_detected: false,
            confidence: None,
        }
    }

    /// Creates an auto-detected relationship.
    pub fn detected(
        parent_key: impl Into<String>,
        child_key: impl Into<String>,
        reference_column: impl Into<String>,
    ) -> Self {
        Self {
            auto_detected: true,
            confidence: Some(AUTO_DETECT_CONFIDENCE),
            ..Self::manual(parent_key, child_key, reference_column)
        }
    }
}

/// Outcome of relationship detection.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectionResult {
    /// The validated relationship, if one could be established.
    pub relationship: Option<HierarchyRelationship>,

    /// Number of child sample records whose reference resolves to a parent.
    pub match_count: usize,

    /// Why detection failed, or anything odd noticed on the way.
    pub warnings: Vec<DetectionWarning>,
}

impl DetectionResult {
    /// A failed detection carrying a single warning.
    pub(crate) fn failed(warning: DetectionWarning) -> Self {
        Self {
            relationship: None,
            match_count: 0,
            warnings: vec![warning],
        }
    }

    /// Returns `true` if a relationship was established.
    pub fn can_establish(&self) -> bool {
        self.relationship.is_some()
    }
}
