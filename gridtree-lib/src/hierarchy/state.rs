//! Hierarchy state: the node arena and its lookups.

use std::collections::HashMap;
use std::collections::HashSet;

use super::metrics::HierarchyStatistics;
use super::node::DatasetType;
use super::node::HierarchyNode;

/// Everything known about one built hierarchy.
///
/// A state is built wholesale from two record pages and thrown away on the
/// next rebuild; individual records are never patched in place.
#[derive(Debug)]
pub struct HierarchyState<R> {
    /// Node id → node.
    pub(crate) nodes: HashMap<String, HierarchyNode<R>>,
    /// Level-0 ids in parent-collection order.
    pub(crate) root_ids: Vec<String>,
    /// Ids of nodes currently expanded.
    pub(crate) expanded: HashSet<String>,
    /// Ids of nodes explicitly collapsed.
    pub(crate) collapsed: HashSet<String>,
    /// Visible node ids in render order (rebuilt on every change).
    pub(crate) visible: Vec<String>,
    /// Parent id → child ids, mirrors `HierarchyNode::child_ids`.
    pub(crate) children_cache: HashMap<String, Vec<String>>,
    /// Child records dropped because their parent is not on the page.
    pub(crate) orphan_count: usize,
}

impl<R> Default for HierarchyState<R> {
    fn default() -> Self {
        Self {
            nodes: HashMap::new(),
            root_ids: Vec::new(),
            expanded: HashSet::new(),
            collapsed: HashSet::new(),
            visible: Vec::new(),
            children_cache: HashMap::new(),
            orphan_count: 0,
        }
    }
}

impl<R> HierarchyState<R> {
    /// Returns the total number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Returns `true` if nothing has been built.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Looks up a node by id.
    pub fn node(&self, id: &str) -> Option<&HierarchyNode<R>> {
        self.nodes.get(id)
    }

    /// Level-0 ids in parent-collection order.
    pub fn root_ids(&self) -> &[String] {
        &self.root_ids
    }

    /// Visible ids in render order.
    pub fn visible_ids(&self) -> &[String] {
        &self.visible
    }

    /// Direct children of `id` in child-collection order.
    pub fn children(&self, id: &str) -> Vec<&HierarchyNode<R>> {
        self.nodes
            .get(id)
            .map(|node| {
                node.child_ids
                    .iter()
                    .filter_map(|child| self.nodes.get(child))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Cached child ids for a parent, `None` if it has no children.
    pub fn cached_children(&self, parent_id: &str) -> Option<&[String]> {
        self.children_cache.get(parent_id).map(Vec::as_slice)
    }

    /// Returns `true` if `id` is a known, expanded node.
    pub fn is_expanded(&self, id: &str) -> bool {
        self.expanded.contains(id)
    }

    /// Returns `true` if the user explicitly collapsed `id`.
    pub fn is_collapsed(&self, id: &str) -> bool {
        self.collapsed.contains(id)
    }

    /// Nodes from the root down to and including `id`.
    pub fn path(&self, id: &str) -> Vec<&HierarchyNode<R>> {
        self.nodes
            .get(id)
            .map(|node| {
                node.path
                    .iter()
                    .filter_map(|step| self.nodes.get(step))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Every node id in tree order, regardless of expansion.
    pub fn tree_order(&self) -> Vec<&str> {
        fn walk<'a, R>(
            nodes: &'a HashMap<String, HierarchyNode<R>>,
            id: &'a str,
            out: &mut Vec<&'a str>,
        ) {
            if let Some(node) = nodes.get(id) {
                out.push(&node.id);
                for child in &node.child_ids {
                    walk(nodes, child, out);
                }
            }
        }

        let mut out = Vec::with_capacity(self.nodes.len());
        for root in &self.root_ids {
            walk(&self.nodes, root, &mut out);
        }
        out
    }

    /// Summary counts over the current state.
    pub fn statistics(&self) -> HierarchyStatistics {
        let child_count = self
            .nodes
            .values()
            .filter(|n| n.dataset_type == DatasetType::Child)
            .count();
        HierarchyStatistics {
            total_nodes: self.nodes.len(),
            root_count: self.root_ids.len(),
            child_count,
            expanded_count: self.expanded.len(),
            visible_count: self.visible.len(),
            max_depth: self.nodes.values().map(|n| n.level).max().unwrap_or(0),
            orphan_count: self.orphan_count,
        }
    }
}
