//! Timing and size figures for diagnostics overlays.

use std::time::Duration;

use serde::Serialize;

/// Timings of the most recent operations.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyMetrics {
    /// Duration of the last `initialize`, detection and projection included.
    pub last_build_time: Duration,
    /// Duration of the last expand/collapse operation.
    pub last_expand_time: Duration,
    /// Duration of the last visible-list rebuild.
    pub last_render_time: Duration,
    /// Nodes in the current hierarchy.
    pub node_count: usize,
    /// Reserved for an incremental projection cache; always 0.
    pub cache_hit_rate: f64,
}

/// Counts over the current hierarchy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HierarchyStatistics {
    pub total_nodes: usize,
    pub root_count: usize,
    pub child_count: usize,
    pub expanded_count: usize,
    pub visible_count: usize,
    /// Deepest node level present.
    pub max_depth: usize,
    /// Child records dropped because their parent was not found.
    pub orphan_count: usize,
}
