//! The hierarchy engine owned by one grid instance.

use std::sync::Arc;
use std::time::Instant;

use log::debug;
use log::warn;

use super::build::build;
use super::detect::RelationshipDetector;
use super::events::EventBus;
use super::events::EventFilter;
use super::events::EventKind;
use super::events::HierarchyEvent;
use super::events::SubscriptionId;
use super::expansion::Changes;
use super::metrics::HierarchyMetrics;
use super::metrics::HierarchyStatistics;
use super::node::HierarchyNode;
use super::relationship::DetectionResult;
use super::relationship::HierarchyRelationship;
use super::state::HierarchyState;
use crate::config::HierarchyConfig;
use crate::model::FieldSource;
use crate::model::Record;

/// Options for [`HierarchyEngine::expand_node`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExpandOptions {
    /// Also expand every expandable descendant.
    pub recursive: bool,
    /// Depth bound for `recursive`; defaults to the config's `max_depth`.
    pub max_depth: Option<usize>,
}

impl ExpandOptions {
    /// Recursive expansion down to the configured depth.
    pub fn recursive() -> Self {
        Self {
            recursive: true,
            max_depth: None,
        }
    }
}

/// Groups two record pages into an expandable parent/child hierarchy.
///
/// The engine is the only writer of its state. `initialize` rebuilds it
/// wholesale; the expand/collapse methods mutate it and then recompute the
/// visible node list before returning. Nothing on this surface fails:
/// unknown ids are ignored and detection problems leave the hierarchy empty.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
/// use gridtree_lib::{HierarchyConfig, HierarchyEngine};
/// use gridtree_lib::model::Record;
///
/// let parents = vec![Arc::new(Record::new().set("ID", "P1"))];
/// let children = vec![Arc::new(Record::new().set("CID", "C1").set("ParentID", "P1"))];
///
/// let mut engine = HierarchyEngine::new(HierarchyConfig::default());
/// assert!(engine.initialize(&parents, &children));
///
/// engine.toggle_node("P1");
/// let rows: Vec<_> = engine.visible_nodes().iter().map(|n| n.id.as_str()).collect();
/// assert_eq!(rows, ["P1", "C1"]);
/// ```
#[derive(Debug)]
pub struct HierarchyEngine<R = Record> {
    config: HierarchyConfig,
    detector: RelationshipDetector,
    state: HierarchyState<R>,
    detection: Option<DetectionResult>,
    events: EventBus,
    metrics: HierarchyMetrics,
}

impl<R> HierarchyEngine<R> {
    /// Creates an empty engine.
    pub fn new(config: HierarchyConfig) -> Self {
        Self {
            config,
            detector: RelationshipDetector::default(),
            state: HierarchyState::default(),
            detection: None,
            events: EventBus::new(),
            metrics: HierarchyMetrics::default(),
        }
    }

    /// Replaces the relationship detector (e.g. to use custom key patterns).
    pub fn with_detector(mut self, detector: RelationshipDetector) -> Self {
        self.detector = detector;
        self
    }

    pub fn config(&self) -> &HierarchyConfig {
        &self.config
    }

    /// Result of the last relationship detection, if `initialize` got that far.
    pub fn detection(&self) -> Option<&DetectionResult> {
        self.detection.as_ref()
    }

    /// The relationship the current hierarchy was built from.
    pub fn relationship(&self) -> Option<&HierarchyRelationship> {
        self.detection.as_ref()?.relationship.as_ref()
    }

    /// Read access to the whole state.
    pub fn state(&self) -> &HierarchyState<R> {
        &self.state
    }

    // -------------------------------------------------------------------------
    // Queries
    // -------------------------------------------------------------------------

    /// Visible nodes in render order; one grid row per node.
    pub fn visible_nodes(&self) -> Vec<&HierarchyNode<R>> {
        self.state.visible_nodes()
    }

    pub fn visible_ids(&self) -> &[String] {
        self.state.visible_ids()
    }

    pub fn root_ids(&self) -> &[String] {
        self.state.root_ids()
    }

    pub fn node(&self, id: &str) -> Option<&HierarchyNode<R>> {
        self.state.node(id)
    }

    /// Direct children of `id`; empty for unknown ids.
    pub fn children(&self, id: &str) -> Vec<&HierarchyNode<R>> {
        self.state.children(id)
    }

    /// Cached child ids of a parent.
    pub fn children_cache(&self, parent_id: &str) -> Option<&[String]> {
        self.state.cached_children(parent_id)
    }

    pub fn parent(&self, id: &str) -> Option<&HierarchyNode<R>> {
        let parent_id = self.state.node(id)?.parent_id.as_deref()?;
        self.state.node(parent_id)
    }

    /// Nodes from the root down to and including `id`.
    pub fn path(&self, id: &str) -> Vec<&HierarchyNode<R>> {
        self.state.path(id)
    }

    pub fn is_expanded(&self, id: &str) -> bool {
        self.state.is_expanded(id)
    }

    pub fn metrics(&self) -> &HierarchyMetrics {
        &self.metrics
    }

    pub fn statistics(&self) -> HierarchyStatistics {
        self.state.statistics()
    }

    // -------------------------------------------------------------------------
    // Expand/Collapse
    // -------------------------------------------------------------------------

    /// Expands a node. Unknown ids are ignored.
    pub fn expand_node(&mut self, id: &str, options: ExpandOptions) {
        let started = Instant::now();
        let max_depth = options.max_depth.unwrap_or(self.config.max_depth);
        let changes = self.state.expand_node(id, options.recursive, max_depth);
        self.finish_operation(started, EventKind::Expand, changes);
    }

    /// Collapses a node and hides its subtree. Unknown ids are ignored.
    pub fn collapse_node(&mut self, id: &str) {
        let started = Instant::now();
        let changes = self.state.collapse_node(id);
        self.finish_operation(started, EventKind::Collapse, changes);
    }

    /// Expands a collapsed node or collapses an expanded one.
    pub fn toggle_node(&mut self, id: &str) {
        match self.state.node(id).map(|n| n.is_expanded) {
            Some(true) => self.collapse_node(id),
            Some(false) => self.expand_node(id, ExpandOptions::default()),
            None => debug!("toggle ignored for unknown node '{id}'"),
        }
    }

    /// Expands every ancestor of `id` so the node becomes visible.
    pub fn expand_to(&mut self, id: &str) {
        let started = Instant::now();
        let changes = self.state.expand_to(id);
        self.finish_operation(started, EventKind::Expand, changes);
    }

    pub fn expand_all(&mut self) {
        let started = Instant::now();
        let changes = self.state.expand_all();
        self.finish_operation(started, EventKind::ExpandAll, Some(changes));
    }

    pub fn collapse_all(&mut self) {
        let started = Instant::now();
        let changes = self.state.collapse_all();
        self.finish_operation(started, EventKind::CollapseAll, Some(changes));
    }

    // -------------------------------------------------------------------------
    // Events
    // -------------------------------------------------------------------------

    /// Subscribes to hierarchy events.
    pub fn on<F>(&mut self, filter: impl Into<EventFilter>, handler: F) -> SubscriptionId
    where
        F: FnMut(&HierarchyEvent) + Send + 'static,
    {
        self.events.subscribe(filter, handler)
    }

    /// Unsubscribes a handler. Returns `false` if it was already gone.
    pub fn off(&mut self, id: SubscriptionId) -> bool {
        self.events.unsubscribe(id)
    }

    /// Releases every node and record reference and every handler.
    ///
    /// Handlers receive a final `Dispose` event first.
    pub fn dispose(&mut self) {
        self.state = HierarchyState::default();
        self.detection = None;
        self.metrics.node_count = 0;
        self.events
            .publish(&HierarchyEvent::new(EventKind::Dispose, Vec::new()));
        self.events.clear();
    }

    // -------------------------------------------------------------------------
    // Internals
    // -------------------------------------------------------------------------

    fn finish_operation(&mut self, started: Instant, kind: EventKind, changes: Option<Changes>) {
        let Some(changes) = changes else {
            debug!("{kind:?} ignored: unknown node");
            return;
        };
        self.refresh_visible();
        self.metrics.last_expand_time = started.elapsed();
        self.events
            .publish(&HierarchyEvent::new(kind, changes.into_ids()));
    }

    fn refresh_visible(&mut self) {
        let started = Instant::now();
        self.state.rebuild_visible();
        self.metrics.last_render_time = started.elapsed();
    }
}

impl<R: FieldSource> HierarchyEngine<R> {
    /// Rebuilds the hierarchy from fresh parent and child pages.
    ///
    /// The previous state is discarded. Returns `false` if the hierarchy is
    /// disabled, the config is invalid or no relationship could be
    /// established; the state is then empty.
    pub fn initialize(&mut self, parents: &[Arc<R>], children: &[Arc<R>]) -> bool {
        let started = Instant::now();
        self.state = HierarchyState::default();
        self.detection = None;

        let built = self.rebuild(parents, children);

        self.refresh_visible();
        self.metrics.node_count = self.state.len();
        self.metrics.last_build_time = started.elapsed();
        self.events.publish(&HierarchyEvent::new(
            EventKind::Build,
            self.state.root_ids().to_vec(),
        ));
        built
    }

    fn rebuild(&mut self, parents: &[Arc<R>], children: &[Arc<R>]) -> bool {
        if !self.config.enabled {
            debug!("hierarchy disabled, skipping build");
            return false;
        }
        if let Err(e) = self.config.validate() {
            warn!("hierarchy config rejected: {e}");
            return false;
        }

        let detection = self.detector.detect(
            parents,
            children,
            self.config.manual_mapping(),
            self.config.auto_detect_keys,
        );
        let relationship = detection.relationship.clone();
        let warnings = detection
            .warnings
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("; ");
        self.detection = Some(detection);

        let Some(relationship) = relationship else {
            warn!("no parent/child relationship established: {warnings}");
            return false;
        };
        if !warnings.is_empty() {
            debug!("relationship established with warnings: {warnings}");
        }

        self.state = build(&relationship, parents, children);
        let changes = self
            .state
            .apply_default_expansion(self.config.default_expansion);
        debug!(
            "default expansion {:?} touched {} node(s)",
            self.config.default_expansion,
            changes.into_ids().len()
        );
        true
    }
}
