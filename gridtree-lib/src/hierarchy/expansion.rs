//! Expand/collapse state machine.
//!
//! Every node starts collapsed. A node's own `is_expanded` flag and the
//! `is_visible` flag of its descendants move independently: collapsing a
//! node hides its subtree but leaves nested expansion untouched, so expanding
//! it again brings the same rows back.
//!
//! None of these methods rebuild the visible list; the engine does that
//! once per operation.

use std::collections::HashSet;

use super::state::HierarchyState;
use crate::config::DefaultExpansion;

/// Ids whose expansion or visibility changed during one operation, in the
/// order they changed.
#[derive(Debug, Default)]
pub(crate) struct Changes {
    ids: Vec<String>,
    seen: HashSet<String>,
}

impl Changes {
    fn mark(&mut self, id: &str) {
        if self.seen.insert(id.to_string()) {
            self.ids.push(id.to_string());
        }
    }

    pub(crate) fn into_ids(self) -> Vec<String> {
        self.ids
    }
}

impl<R> HierarchyState<R> {
    /// Expands `id`, and with `recursive` every expandable descendant whose
    /// level is below `max_depth`. Returns `None` for an unknown id.
    pub(crate) fn expand_node(
        &mut self,
        id: &str,
        recursive: bool,
        max_depth: usize,
    ) -> Option<Changes> {
        if !self.nodes.contains_key(id) {
            return None;
        }
        let mut changes = Changes::default();
        self.expand_one(id, &mut changes);
        if recursive {
            self.expand_descendants(id, max_depth, &mut changes);
        }
        Some(changes)
    }

    /// Collapses `id` and hides its whole subtree. Returns `None` for an
    /// unknown id.
    pub(crate) fn collapse_node(&mut self, id: &str) -> Option<Changes> {
        let node = self.nodes.get_mut(id)?;
        let mut changes = Changes::default();
        if node.is_expanded {
            node.is_expanded = false;
            changes.mark(id);
        }
        self.expanded.remove(id);
        self.collapsed.insert(id.to_string());
        self.hide_descendants(id, &mut changes);
        Some(changes)
    }

    /// Expands every node that has children and shows every non-root node.
    pub(crate) fn expand_all(&mut self) -> Changes {
        let mut changes = Changes::default();
        for id in self.owned_tree_order() {
            let Some(node) = self.nodes.get_mut(&id) else {
                continue;
            };
            if node.has_children && !node.is_expanded {
                node.is_expanded = true;
                changes.mark(&id);
            }
            if node.level > 0 && !node.is_visible {
                node.is_visible = true;
                changes.mark(&id);
            }
            if node.has_children {
                self.collapsed.remove(&id);
                self.expanded.insert(id);
            }
        }
        changes
    }

    /// Collapses every node that has children and hides every non-root node.
    pub(crate) fn collapse_all(&mut self) -> Changes {
        let mut changes = Changes::default();
        for id in self.owned_tree_order() {
            let Some(node) = self.nodes.get_mut(&id) else {
                continue;
            };
            if node.has_children && node.is_expanded {
                node.is_expanded = false;
                changes.mark(&id);
            }
            if node.level > 0 && node.is_visible {
                node.is_visible = false;
                changes.mark(&id);
            }
            if node.has_children {
                self.expanded.remove(&id);
                self.collapsed.insert(id);
            }
        }
        changes
    }

    /// Expands every ancestor of `id` so that it becomes visible. Returns
    /// `None` for an unknown id.
    pub(crate) fn expand_to(&mut self, id: &str) -> Option<Changes> {
        let path = self.nodes.get(id)?.path.clone();
        let mut changes = Changes::default();
        for ancestor in path.iter().take(path.len().saturating_sub(1)) {
            self.expand_one(ancestor, &mut changes);
        }
        Some(changes)
    }

    /// Applies the post-build expansion policy.
    pub(crate) fn apply_default_expansion(&mut self, policy: DefaultExpansion) -> Changes {
        match policy {
            DefaultExpansion::Collapsed => Changes::default(),
            DefaultExpansion::All => self.expand_all(),
            DefaultExpansion::Levels(levels) => {
                let mut changes = Changes::default();
                let levels = usize::try_from(levels).unwrap_or(usize::MAX);
                for id in self.owned_tree_order() {
                    let expandable = self
                        .nodes
                        .get(&id)
                        .is_some_and(|n| n.has_children && n.level < levels);
                    if expandable {
                        self.expand_one(&id, &mut changes);
                    }
                }
                changes
            }
        }
    }

    fn expand_one(&mut self, id: &str, changes: &mut Changes) {
        let Some(node) = self.nodes.get_mut(id) else {
            return;
        };
        if !node.is_expanded {
            node.is_expanded = true;
            changes.mark(id);
        }
        self.collapsed.remove(id);
        self.expanded.insert(id.to_string());
        self.reveal_children(id, changes);
    }

    fn expand_descendants(&mut self, id: &str, max_depth: usize, changes: &mut Changes) {
        let child_ids = self.child_ids(id);
        for child_id in &child_ids {
            let expandable = self
                .nodes
                .get(child_id)
                .is_some_and(|n| n.has_children && n.level < max_depth);
            if expandable {
                self.expand_one(child_id, changes);
                self.expand_descendants(child_id, max_depth, changes);
            }
        }
    }

    /// Shows the children of `id`, and below them any subtree that is still
    /// expanded from before.
    fn reveal_children(&mut self, id: &str, changes: &mut Changes) {
        for child_id in self.child_ids(id) {
            let Some(child) = self.nodes.get_mut(&child_id) else {
                continue;
            };
            if !child.is_visible {
                child.is_visible = true;
                changes.mark(&child_id);
            }
            if child.is_expanded {
                self.reveal_children(&child_id, changes);
            }
        }
    }

    fn hide_descendants(&mut self, id: &str, changes: &mut Changes) {
        for child_id in self.child_ids(id) {
            let Some(child) = self.nodes.get_mut(&child_id) else {
                continue;
            };
            if child.is_visible {
                child.is_visible = false;
                changes.mark(&child_id);
            }
            self.hide_descendants(&child_id, changes);
        }
    }

    fn child_ids(&self, id: &str) -> Vec<String> {
        self.nodes
            .get(id)
            .map(|n| n.child_ids.clone())
            .unwrap_or_default()
    }

    fn owned_tree_order(&self) -> Vec<String> {
        self.tree_order().into_iter().map(str::to_string).collect()
    }
}
