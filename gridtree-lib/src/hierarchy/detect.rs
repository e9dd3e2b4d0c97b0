//! Relationship detection
//!
//! Figures out which columns join a child page to a parent page, either by
//! validating a configured mapping or by matching column names against
//! ordered key-name patterns.

use std::collections::HashSet;

use log::debug;
use regex::Regex;

use super::relationship::DetectionResult;
use super::relationship::HierarchyRelationship;
use crate::config::ManualMapping;
use crate::error::ConfigError;
use crate::error::DetectionWarning;
use crate::model::FieldSource;

/// Default patterns for primary key columns, in priority order.
pub const DEFAULT_PRIMARY_KEY_PATTERNS: &[&str] = &["id", "*id", "key", "*key", "guid", "uuid"];

/// Default patterns for child-to-parent reference columns, in priority order.
pub const DEFAULT_PARENT_REFERENCE_PATTERNS: &[&str] = &["parent*id", "parentkey", "*parent*"];

/// A case-insensitive column-name pattern where `*` matches any run of
/// characters.
#[derive(Debug, Clone)]
pub struct KeyPattern {
    pattern: String,
    regex: Regex,
}

impl KeyPattern {
    /// Compiles a wildcard pattern.
    pub fn new(pattern: &str) -> Result<Self, ConfigError> {
        let body = pattern
            .split('*')
            .map(regex::escape)
            .collect::<Vec<_>>()
            .join(".*");
        let regex = Regex::new(&format!("(?i)^{body}$")).map_err(|e| ConfigError::InvalidPattern {
            pattern: pattern.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// Returns the pattern as written.
    pub fn as_str(&self) -> &str {
        &self.pattern
    }

    /// Returns `true` if `column` matches the pattern.
    pub fn matches(&self, column: &str) -> bool {
        self.regex.is_match(column)
    }
}

/// Infers or validates the parent/child relationship between two pages.
///
/// Detection is a pure function of its inputs: it reads the samples and
/// returns a [`DetectionResult`], nothing else.
#[derive(Debug, Clone)]
pub struct RelationshipDetector {
    primary_key: Vec<KeyPattern>,
    parent_reference: Vec<KeyPattern>,
}

impl Default for RelationshipDetector {
    fn default() -> Self {
        // The built-in patterns contain no regex syntax once escaped
        let compile = |patterns: &[&str]| -> Vec<KeyPattern> {
            patterns
                .iter()
                .filter_map(|p| KeyPattern::new(p).ok())
                .collect()
        };
        Self {
            primary_key: compile(DEFAULT_PRIMARY_KEY_PATTERNS),
            parent_reference: compile(DEFAULT_PARENT_REFERENCE_PATTERNS),
        }
    }
}

impl RelationshipDetector {
    /// Creates a detector with the default patterns.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a detector with custom pattern lists.
    pub fn with_patterns<P, Q>(primary_key: P, parent_reference: Q) -> Result<Self, ConfigError>
    where
        P: IntoIterator,
        P::Item: AsRef<str>,
        Q: IntoIterator,
        Q::Item: AsRef<str>,
    {
        Ok(Self {
            primary_key: primary_key
                .into_iter()
                .map(|p| KeyPattern::new(p.as_ref()))
                .collect::<Result<_, _>>()?,
            parent_reference: parent_reference
                .into_iter()
                .map(|p| KeyPattern::new(p.as_ref()))
                .collect::<Result<_, _>>()?,
        })
    }

    /// Detects the relationship between a parent and a child sample.
    ///
    /// A complete manual mapping wins whenever at least one child resolves
    /// through it. Otherwise, if `auto_detect` is set, column names are
    /// matched against the pattern lists and the result validated the same
    /// way.
    pub fn detect<P, C>(
        &self,
        parents: &[P],
        children: &[C],
        manual: Option<ManualMapping<'_>>,
        auto_detect: bool,
    ) -> DetectionResult
    where
        P: FieldSource,
        C: FieldSource,
    {
        if parents.is_empty() {
            return DetectionResult::failed(DetectionWarning::EmptyParentSample);
        }
        if children.is_empty() {
            return DetectionResult::failed(DetectionWarning::EmptyChildSample);
        }

        let mut warnings = Vec::new();

        if let Some(mapping) = manual {
            let match_count =
                count_matches(parents, children, mapping.parent_key, mapping.reference_column);
            if match_count > 0 {
                debug!(
                    "manual mapping {}.{} <- {} validated with {} matches",
                    mapping.parent_key, mapping.child_key, mapping.reference_column, match_count
                );
                return DetectionResult {
                    relationship: Some(HierarchyRelationship::manual(
                        mapping.parent_key,
                        mapping.child_key,
                        mapping.reference_column,
                    )),
                    match_count,
                    warnings,
                };
            }
            warnings.push(DetectionWarning::NoMatches {
                parent_key: mapping.parent_key.to_string(),
                reference_column: mapping.reference_column.to_string(),
            });
        }

        if !auto_detect {
            if manual.is_none() {
                warnings.push(DetectionWarning::AutoDetectDisabled);
            }
            return DetectionResult {
                relationship: None,
                match_count: 0,
                warnings,
            };
        }

        let parent_fields = sample_fields(parents);
        let child_fields = sample_fields(children);

        let parent_key = first_match(&self.primary_key, &parent_fields, None);
        let reference_column = first_match(&self.parent_reference, &child_fields, None);
        let child_key = first_match(&self.primary_key, &child_fields, reference_column);

        let (Some(parent_key), Some(child_key), Some(reference_column)) =
            (parent_key, child_key, reference_column)
        else {
            if parent_key.is_none() {
                warnings.push(DetectionWarning::ParentKeyNotFound);
            }
            if child_key.is_none() {
                warnings.push(DetectionWarning::ChildKeyNotFound);
            }
            if reference_column.is_none() {
                warnings.push(DetectionWarning::ReferenceColumnNotFound);
            }
            return DetectionResult {
                relationship: None,
                match_count: 0,
                warnings,
            };
        };

        let match_count = count_matches(parents, children, parent_key, reference_column);
        if match_count == 0 {
            warnings.push(DetectionWarning::NoMatches {
                parent_key: parent_key.to_string(),
                reference_column: reference_column.to_string(),
            });
            return DetectionResult {
                relationship: None,
                match_count: 0,
                warnings,
            };
        }

        debug!(
            "detected {parent_key}.{child_key} <- {reference_column} with {match_count} matches"
        );
        DetectionResult {
            relationship: Some(HierarchyRelationship::detected(
                parent_key,
                child_key,
                reference_column,
            )),
            match_count,
            warnings,
        }
    }
}

/// Union of field names across a sample, in first-seen order.
fn sample_fields<R: FieldSource>(sample: &[R]) -> Vec<&str> {
    let mut seen = HashSet::new();
    sample
        .iter()
        .flat_map(FieldSource::field_names)
        .filter(|name| seen.insert(*name))
        .collect()
}

/// First field matching the highest-priority pattern, skipping `exclude`.
fn first_match<'a>(
    patterns: &[KeyPattern],
    fields: &[&'a str],
    exclude: Option<&str>,
) -> Option<&'a str> {
    patterns.iter().find_map(|pattern| {
        fields
            .iter()
            .copied()
            .filter(|field| Some(*field) != exclude)
            .find(|field| pattern.matches(field))
    })
}

/// Number of children whose reference value equals some parent key value.
fn count_matches<P, C>(parents: &[P], children: &[C], parent_key: &str, reference: &str) -> usize
where
    P: FieldSource,
    C: FieldSource,
{
    let keys: HashSet<String> = parents.iter().filter_map(|p| p.key(parent_key)).collect();
    children
        .iter()
        .filter_map(|c| c.key(reference))
        .filter(|value| keys.contains(value))
        .count()
}
