//! Hierarchy configuration

use serde::Deserialize;
use serde::Serialize;

use crate::error::ConfigError;

/// What to expand right after a hierarchy is built.
///
/// Hosts configure this as a single integer: `-1` expands everything, `0`
/// leaves everything collapsed and `n > 0` expands every node above level
/// `n`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "i32", into = "i32")]
pub enum DefaultExpansion {
    /// Leave every node collapsed.
    #[default]
    Collapsed,
    /// Expand every node that has children.
    All,
    /// Expand nodes whose level is below the given value.
    Levels(u32),
}

impl From<i32> for DefaultExpansion {
    fn from(level: i32) -> Self {
        match level {
            0 => Self::Collapsed,
            n if n < 0 => Self::All,
            n => Self::Levels(n.unsigned_abs()),
        }
    }
}

impl From<DefaultExpansion> for i32 {
    fn from(expansion: DefaultExpansion) -> Self {
        match expansion {
            DefaultExpansion::Collapsed => 0,
            DefaultExpansion::All => -1,
            DefaultExpansion::Levels(n) => i32::try_from(n).unwrap_or(i32::MAX),
        }
    }
}

/// A complete, manually configured key mapping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ManualMapping<'a> {
    pub parent_key: &'a str,
    pub child_key: &'a str,
    pub reference_column: &'a str,
}

/// Configuration for grouping a grid into a parent/child hierarchy.
///
/// Deserializes from the host's property bag (camelCase keys); any key left
/// out takes its default.
///
/// # Example
///
/// ```
/// use gridtree_lib::{DefaultExpansion, HierarchyConfig};
///
/// let config = HierarchyConfig::default()
///     .with_default_expansion(DefaultExpansion::All)
///     .with_manual_mapping("accountid", "contactid", "parentcustomerid");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HierarchyConfig {
    /// Whether hierarchy grouping is on at all.
    ///
    /// Default: true
    pub enabled: bool,

    /// Primary key column of parent records.
    pub parent_key_column: Option<String>,

    /// Primary key column of child records.
    pub child_key_column: Option<String>,

    /// Column on child records that holds the parent's key.
    pub parent_reference_column: Option<String>,

    /// Infer the key columns when no complete manual mapping is configured.
    ///
    /// Default: true
    pub auto_detect_keys: bool,

    /// Expansion applied after every build.
    ///
    /// Default: collapsed
    #[serde(rename = "defaultExpandLevel")]
    pub default_expansion: DefaultExpansion,

    /// Row indentation per level, in pixels.
    ///
    /// Default: 20
    pub indent_size: u32,

    /// Whether the toolbar offers expand-all / collapse-all.
    ///
    /// Default: true
    pub show_expand_collapse_all: bool,

    /// Reserved for an incremental projection cache. Currently has no effect.
    ///
    /// Default: true
    pub enable_caching: bool,

    /// Depth bound for recursive expansion.
    ///
    /// Default: 5
    pub max_depth: usize,

    /// Accepted for compatibility; children are always attached at build time.
    ///
    /// Default: false
    pub lazy_load_children: bool,
}

impl Default for HierarchyConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            parent_key_column: None,
            child_key_column: None,
            parent_reference_column: None,
            auto_detect_keys: true,
            default_expansion: DefaultExpansion::Collapsed,
            indent_size: 20,
            show_expand_collapse_all: true,
            enable_caching: true,
            max_depth: 5,
            lazy_load_children: false,
        }
    }
}

impl HierarchyConfig {
    /// Creates a new config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables hierarchy grouping.
    pub fn with_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Sets all three key columns.
    pub fn with_manual_mapping(
        mut self,
        parent_key: impl Into<String>,
        child_key: impl Into<String>,
        reference_column: impl Into<String>,
    ) -> Self {
        self.parent_key_column = Some(parent_key.into());
        self.child_key_column = Some(child_key.into());
        self.parent_reference_column = Some(reference_column.into());
        self
    }

    /// Turns key auto-detection on or off.
    pub fn with_auto_detect(mut self, auto_detect: bool) -> Self {
        self.auto_detect_keys = auto_detect;
        self
    }

    /// Sets the post-build expansion policy.
    pub fn with_default_expansion(mut self, expansion: DefaultExpansion) -> Self {
        self.default_expansion = expansion;
        self
    }

    /// Sets the per-level indentation.
    pub fn with_indent_size(mut self, indent_size: u32) -> Self {
        self.indent_size = indent_size;
        self
    }

    /// Sets the depth bound for recursive expansion.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Returns the manual mapping if all three columns are configured.
    pub fn manual_mapping(&self) -> Option<ManualMapping<'_>> {
        Some(ManualMapping {
            parent_key: self.parent_key_column.as_deref()?,
            child_key: self.child_key_column.as_deref()?,
            reference_column: self.parent_reference_column.as_deref()?,
        })
    }

    /// Indentation for a row at `level`, in pixels.
    pub fn indent_for(&self, level: usize) -> u32 {
        let level = u32::try_from(level).unwrap_or(u32::MAX);
        level.saturating_mul(self.indent_size)
    }

    /// Checks the config for settings that can never work.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_depth == 0 {
            return Err(ConfigError::ZeroMaxDepth);
        }

        let columns = [
            ("parentKeyColumn", &self.parent_key_column),
            ("childKeyColumn", &self.child_key_column),
            ("parentReferenceColumn", &self.parent_reference_column),
        ];
        for (option, column) in columns {
            if column.as_deref().is_some_and(|c| c.trim().is_empty()) {
                return Err(ConfigError::BlankColumn { option });
            }
        }

        let any_set = columns.iter().any(|(_, c)| c.is_some());
        if any_set
            && !self.auto_detect_keys
            && let Some(&(missing, _)) = columns.iter().find(|(_, c)| c.is_none())
        {
            return Err(ConfigError::IncompleteMapping { missing });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expand_level_from_host_integer() {
        assert_eq!(DefaultExpansion::from(-1), DefaultExpansion::All);
        assert_eq!(DefaultExpansion::from(-7), DefaultExpansion::All);
        assert_eq!(DefaultExpansion::from(0), DefaultExpansion::Collapsed);
        assert_eq!(DefaultExpansion::from(2), DefaultExpansion::Levels(2));
        assert_eq!(i32::from(DefaultExpansion::All), -1);
    }

    #[test]
    fn test_deserialize_property_bag() {
        let json = r#"{"parentKeyColumn": "accountid", "defaultExpandLevel": -1, "indentSize": 16}"#;
        let config: HierarchyConfig = serde_json::from_str(json).unwrap();

        assert_eq!(config.parent_key_column.as_deref(), Some("accountid"));
        assert_eq!(config.default_expansion, DefaultExpansion::All);
        assert_eq!(config.indent_size, 16);
        assert!(config.enabled);
        assert_eq!(config.max_depth, 5);
    }

    #[test]
    fn test_manual_mapping_requires_all_columns() {
        let mut config = HierarchyConfig::default();
        config.parent_key_column = Some("ID".into());
        assert!(config.manual_mapping().is_none());

        let config = config.with_manual_mapping("ID", "CID", "ParentID");
        let mapping = config.manual_mapping().unwrap();
        assert_eq!(mapping.reference_column, "ParentID");
    }

    #[test]
    fn test_validate() {
        assert!(HierarchyConfig::default().validate().is_ok());
        assert_eq!(
            HierarchyConfig::default().with_max_depth(0).validate(),
            Err(ConfigError::ZeroMaxDepth)
        );

        let mut blank = HierarchyConfig::default();
        blank.child_key_column = Some("  ".into());
        assert_eq!(
            blank.validate(),
            Err(ConfigError::BlankColumn { option: "childKeyColumn" })
        );

        let mut partial = HierarchyConfig::default().with_auto_detect(false);
        partial.parent_key_column = Some("ID".into());
        assert_eq!(
            partial.validate(),
            Err(ConfigError::IncompleteMapping { missing: "childKeyColumn" })
        );
    }

    #[test]
    fn test_indent_for() {
        let config = HierarchyConfig::default().with_indent_size(12);
        assert_eq!(config.indent_for(0), 0);
        assert_eq!(config.indent_for(2), 24);
    }
}
