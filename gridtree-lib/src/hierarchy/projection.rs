//! Visible projection: the flat, ordered list of rows the grid renders.

use std::collections::HashMap;

use super::node::HierarchyNode;
use super::state::HierarchyState;

impl<R> HierarchyState<R> {
    /// Rebuilds the visible id list from scratch.
    ///
    /// Pre-order walk from the roots: a node is emitted only if visible, and
    /// its children are walked only if it is expanded. A parent therefore
    /// always precedes its children, and nothing under a collapsed node is
    /// ever emitted.
    pub(crate) fn rebuild_visible(&mut self) {
        self.visible.clear();
        for root in &self.root_ids {
            collect_visible(&self.nodes, root, &mut self.visible);
        }
    }

    /// Visible nodes in render order.
    pub fn visible_nodes(&self) -> Vec<&HierarchyNode<R>> {
        self.visible
            .iter()
            .filter_map(|id| self.nodes.get(id))
            .collect()
    }
}

fn collect_visible<R>(
    nodes: &HashMap<String, HierarchyNode<R>>,
    id: &str,
    out: &mut Vec<String>,
) {
    let Some(node) = nodes.get(id) else {
        return;
    };
    if !node.is_visible {
        return;
    }
    out.push(node.id.clone());
    if node.is_expanded && node.has_children {
        for child in &node.child_ids {
            collect_visible(nodes, child, out);
        }
    }
}
