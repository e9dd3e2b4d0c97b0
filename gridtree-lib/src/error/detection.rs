//! Reasons a parent/child relationship could not be established

/// A warning produced by relationship detection.
///
/// None of these are fatal. Empty pages in particular are the normal state
/// before the host has loaded either dataset.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DetectionWarning {
    #[error("parent dataset sample is empty")]
    EmptyParentSample,

    #[error("child dataset sample is empty")]
    EmptyChildSample,

    #[error("no primary key column found in parent records")]
    ParentKeyNotFound,

    #[error("no primary key column found in child records")]
    ChildKeyNotFound,

    #[error("no parent reference column found in child records")]
    ReferenceColumnNotFound,

    #[error("no manual mapping configured and auto-detection is disabled")]
    AutoDetectDisabled,

    #[error("no child '{reference_column}' value matches a parent '{parent_key}' value")]
    NoMatches {
        parent_key: String,
        reference_column: String,
    },
}
