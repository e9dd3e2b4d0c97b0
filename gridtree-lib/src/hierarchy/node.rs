//! Hierarchy nodes

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

/// Which source collection produced a node.
///
/// Both collections share one id space in the arena, so the tag is the only
/// reliable way to tell a parent row from a child row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DatasetType {
    Parent,
    Child,
}

impl DatasetType {
    /// Prefix used for generated ids when a record has no key value.
    pub(crate) fn fallback_prefix(self) -> &'static str {
        match self {
            DatasetType::Parent => "parent",
            DatasetType::Child => "child",
        }
    }
}

impl fmt::Display for DatasetType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.fallback_prefix())
    }
}

/// One source record plus its place in the tree.
///
/// The record itself is shared with the host through an `Arc`; the node never
/// copies or mutates it.
#[derive(Debug)]
pub struct HierarchyNode<R> {
    /// Stable identity, the record's key value.
    pub id: String,
    /// The underlying record.
    pub data: Arc<R>,
    /// Owning node, `None` exactly for level-0 nodes.
    pub parent_id: Option<String>,
    /// Children in child-collection order.
    pub child_ids: Vec<String>,
    /// 0 for parent-dataset nodes, 1 for child-dataset nodes.
    pub level: usize,
    pub is_expanded: bool,
    /// Level-0 nodes are always visible; deeper nodes only while their
    /// parent is expanded.
    pub is_visible: bool,
    /// Reserved for lazily loaded children. Always `false`.
    pub is_loading: bool,
    pub has_children: bool,
    pub child_count: usize,
    pub descendant_count: usize,
    /// Ids from the root down to and including this node.
    pub path: Vec<String>,
    pub dataset_type: DatasetType,
}

impl<R> HierarchyNode<R> {
    /// Creates a visible, childless root node.
    pub(crate) fn root(id: String, data: Arc<R>) -> Self {
        Self {
            path: vec![id.clone()],
            id,
            data,
            parent_id: None,
            child_ids: Vec::new(),
            level: 0,
            is_expanded: false,
            is_visible: true,
            is_loading: false,
            has_children: false,
            child_count: 0,
            descendant_count: 0,
            dataset_type: DatasetType::Parent,
        }
    }

    /// Creates a hidden child node under `parent`.
    pub(crate) fn child(id: String, data: Arc<R>, parent: &HierarchyNode<R>) -> Self {
        let mut path = parent.path.clone();
        path.push(id.clone());
        Self {
            id,
            data,
            parent_id: Some(parent.id.clone()),
            child_ids: Vec::new(),
            level: parent.level + 1,
            is_expanded: false,
            is_visible: false,
            is_loading: false,
            has_children: false,
            child_count: 0,
            descendant_count: 0,
            path,
            dataset_type: DatasetType::Child,
        }
    }

    /// Returns `true` for level-0 nodes.
    pub fn is_root(&self) -> bool {
        self.parent_id.is_none()
    }

    /// Returns `true` if the row should show an expand/collapse affordance.
    pub fn is_expandable(&self) -> bool {
        self.has_children || self.is_loading
    }
}

impl<R> Clone for HierarchyNode<R> {
    fn clone(&self) -> Self {
        Self {
            id: self.id.clone(),
            data: Arc::clone(&self.data),
            parent_id: self.parent_id.clone(),
            child_ids: self.child_ids.clone(),
            level: self.level,
            is_expanded: self.is_expanded,
            is_visible: self.is_visible,
            is_loading: self.is_loading,
            has_children: self.has_children,
            child_count: self.child_count,
            descendant_count: self.descendant_count,
            path: self.path.clone(),
            dataset_type: self.dataset_type,
        }
    }
}
