//! Builds a node arena from a parent page and a child page.

use std::collections::HashMap;
use std::sync::Arc;

use log::debug;
use log::warn;

use super::node::DatasetType;
use super::node::HierarchyNode;
use super::relationship::HierarchyRelationship;
use super::state::HierarchyState;
use crate::model::FieldSource;

/// Builds a fresh [`HierarchyState`] from two record pages.
///
/// Every parent record becomes a visible level-0 node, every child record
/// whose reference resolves becomes a hidden level-1 node under it. Output
/// order follows input order. Children whose parent is not on the page are
/// dropped and only counted.
pub fn build<R: FieldSource>(
    relationship: &HierarchyRelationship,
    parents: &[Arc<R>],
    children: &[Arc<R>],
) -> HierarchyState<R> {
    let mut state = HierarchyState::default();

    for (index, record) in parents.iter().enumerate() {
        let id = record_id(record.as_ref(), &relationship.parent_key, DatasetType::Parent, index);
        if state.nodes.contains_key(&id) {
            warn!("duplicate parent id '{id}' at row {index}, keeping the first");
            continue;
        }
        state.root_ids.push(id.clone());
        state
            .nodes
            .insert(id.clone(), HierarchyNode::root(id, Arc::clone(record)));
    }

    // parent id -> (row index, record), in child-collection order
    let mut groups: HashMap<String, Vec<(usize, &Arc<R>)>> = HashMap::new();
    let mut group_order: Vec<String> = Vec::new();
    for (index, record) in children.iter().enumerate() {
        let Some(parent_id) = record.key(&relationship.reference_column) else {
            state.orphan_count += 1;
            continue;
        };
        groups
            .entry(parent_id)
            .or_insert_with_key(|key| {
                group_order.push(key.clone());
                Vec::new()
            })
            .push((index, record));
    }

    for parent_id in group_order {
        let Some(group) = groups.remove(&parent_id) else {
            continue;
        };
        let attached = match state.nodes.get(&parent_id) {
            Some(parent) if parent.dataset_type == DatasetType::Parent => {
                child_nodes(relationship, parent, &group)
            }
            _ => {
                debug!(
                    "dropping {} orphan child record(s) referencing '{parent_id}'",
                    group.len()
                );
                state.orphan_count += group.len();
                continue;
            }
        };

        let mut child_ids = Vec::with_capacity(attached.len());
        for node in attached {
            if state.nodes.contains_key(&node.id) {
                warn!("duplicate child id '{}' under '{parent_id}', keeping the first", node.id);
                continue;
            }
            child_ids.push(node.id.clone());
            state.nodes.insert(node.id.clone(), node);
        }

        if let Some(parent) = state.nodes.get_mut(&parent_id) {
            parent.has_children = !child_ids.is_empty();
            parent.child_count = child_ids.len();
            parent.descendant_count = child_ids.len();
            parent.child_ids = child_ids.clone();
        }
        if !child_ids.is_empty() {
            state.children_cache.insert(parent_id, child_ids);
        }
    }

    debug!(
        "built hierarchy: {} roots, {} nodes, {} orphans",
        state.root_ids.len(),
        state.nodes.len(),
        state.orphan_count
    );
    state
}

/// Creates the level-1 nodes for one parent.
fn child_nodes<R: FieldSource>(
    relationship: &HierarchyRelationship,
    parent: &HierarchyNode<R>,
    group: &[(usize, &Arc<R>)],
) -> Vec<HierarchyNode<R>> {
    group
        .iter()
        .map(|(index, record)| {
            let id = record_id(record.as_ref(), &relationship.child_key, DatasetType::Child, *index);
            HierarchyNode::child(id, Arc::clone(record), parent)
        })
        .collect()
}

/// The record's key, or a positional fallback if it has none.
fn record_id<R: FieldSource>(record: &R, key: &str, dataset: DatasetType, index: usize) -> String {
    record
        .key(key)
        .unwrap_or_else(|| format!("{}-{index}", dataset.fallback_prefix()))
}
