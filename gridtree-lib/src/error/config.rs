//! Configuration validation errors

/// A problem with a [`HierarchyConfig`](crate::HierarchyConfig).
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    /// Recursive operations need at least one level to work with.
    #[error("max_depth must be at least 1")]
    ZeroMaxDepth,

    /// A column name was supplied but is empty or whitespace.
    #[error("{option} is set but blank")]
    BlankColumn { option: &'static str },

    /// Some, but not all, manual key columns were supplied while
    /// auto-detection is off, so no relationship can ever be established.
    #[error("manual mapping is incomplete ({missing} missing) and auto-detection is disabled")]
    IncompleteMapping { missing: &'static str },

    /// A key-name pattern could not be compiled.
    #[error("invalid key pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },
}
