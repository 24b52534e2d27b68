//! Layout tree data model.
//!
//! A [`LayoutTree`] is an immutable value. Children are held behind [`Arc`]
//! so that every edit (resize commit, move) allocates a new spine from the
//! root down to the edited node and shares every untouched subtree with the
//! previous tree.
//!
//! Nodes never point at their parents. Lookups that need ancestry resolve a
//! [`NodePath`] once and walk it from the root.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tessera_core::Axis;

use crate::LayoutError;

/// Axis along which a container lays out its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutDirection {
    /// Children side by side, left to right.
    Row,
    /// Children stacked, top to bottom.
    Column,
}

impl LayoutDirection {
    /// Geometric axis this direction distributes space along.
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Row => Axis::Horizontal,
            Self::Column => Axis::Vertical,
        }
    }
}

fn default_visible() -> bool {
    true
}

fn is_true(value: &bool) -> bool {
    *value
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// One pane or container in the layout tree.
///
/// Serialized in the camelCase shape hosts persist:
///
/// ```json
/// {"key": "root", "direction": "row", "children": [
///   {"key": "sidebar", "width": 200, "minWidth": 100, "resizableRight": true},
///   {"key": "main"}
/// ]}
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutNode {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub direction: Option<LayoutDirection>,
    /// `Some` marks a container (possibly empty), `None` a leaf.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<Arc<LayoutNode>>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_width: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_height: Option<u32>,
    #[serde(default, skip_serializing_if = "is_false")]
    pub resizable_right: bool,
    #[serde(default, skip_serializing_if = "is_false")]
    pub resizable_bottom: bool,
    #[serde(default = "default_visible", skip_serializing_if = "is_true")]
    pub visible: bool,
}

impl LayoutNode {
    /// Build a leaf pane.
    #[must_use]
    pub fn leaf(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            direction: None,
            children: None,
            width: None,
            height: None,
            min_width: None,
            min_height: None,
            resizable_right: false,
            resizable_bottom: false,
            visible: true,
        }
    }

    /// Build a container laying out `children` along `direction`.
    #[must_use]
    pub fn container(
        key: impl Into<String>,
        direction: LayoutDirection,
        children: impl IntoIterator<Item = LayoutNode>,
    ) -> Self {
        Self {
            direction: Some(direction),
            children: Some(children.into_iter().map(Arc::new).collect()),
            ..Self::leaf(key)
        }
    }

    #[must_use]
    pub fn with_width(mut self, width: u32) -> Self {
        self.width = Some(width);
        self
    }

    #[must_use]
    pub fn with_height(mut self, height: u32) -> Self {
        self.height = Some(height);
        self
    }

    #[must_use]
    pub fn with_min_width(mut self, min_width: u32) -> Self {
        self.min_width = Some(min_width);
        self
    }

    #[must_use]
    pub fn with_min_height(mut self, min_height: u32) -> Self {
        self.min_height = Some(min_height);
        self
    }

    #[must_use]
    pub fn resizable_right(mut self) -> Self {
        self.resizable_right = true;
        self
    }

    #[must_use]
    pub fn resizable_bottom(mut self) -> Self {
        self.resizable_bottom = true;
        self
    }

    #[must_use]
    pub fn hidden(mut self) -> Self {
        self.visible = false;
        self
    }

    /// Whether this node declares a children sequence.
    #[must_use]
    pub fn is_container(&self) -> bool {
        self.children.is_some()
    }

    /// Children in layout order; empty for leaves.
    #[must_use]
    pub fn children(&self) -> &[Arc<LayoutNode>] {
        self.children.as_deref().unwrap_or(&[])
    }

    /// Axis of a container's direction.
    #[must_use]
    pub fn axis(&self) -> Option<Axis> {
        self.direction.map(LayoutDirection::axis)
    }

    /// Explicit `width`/`height` along `axis`.
    #[must_use]
    pub const fn explicit_size(&self, axis: Axis) -> Option<u32> {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Replace the explicit size along `axis`.
    pub fn set_explicit_size(&mut self, axis: Axis, value: Option<u32>) {
        match axis {
            Axis::Horizontal => self.width = value,
            Axis::Vertical => self.height = value,
        }
    }

    /// Declared `minWidth`/`minHeight` along `axis`.
    #[must_use]
    pub const fn declared_min(&self, axis: Axis) -> Option<u32> {
        match axis {
            Axis::Horizontal => self.min_width,
            Axis::Vertical => self.min_height,
        }
    }

    /// Whether this node contributes geometry.
    ///
    /// Move mode shows everything so hidden panes can still be relocated.
    /// Outside of it, hidden nodes and empty containers are skipped.
    #[must_use]
    pub fn is_visible(&self, move_mode: bool) -> bool {
        if move_mode {
            return true;
        }
        if self.children.as_ref().is_some_and(Vec::is_empty) {
            return false;
        }
        self.visible
    }
}

/// Child indices leading from the root to a node. The root's path is empty.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath(Vec<usize>);

impl NodePath {
    /// Path of the root node.
    #[must_use]
    pub const fn root() -> Self {
        Self(Vec::new())
    }

    #[must_use]
    pub fn from_indices(indices: impl Into<Vec<usize>>) -> Self {
        Self(indices.into())
    }

    #[must_use]
    pub fn indices(&self) -> &[usize] {
        &self.0
    }

    /// Number of edges from the root.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0.is_empty()
    }

    /// Path of the parent and this node's index within it.
    #[must_use]
    pub fn split_last(&self) -> Option<(NodePath, usize)> {
        let (&last, rest) = self.0.split_last()?;
        Some((NodePath(rest.to_vec()), last))
    }

    /// Path of the `index`-th child of this node.
    #[must_use]
    pub fn child(&self, index: usize) -> Self {
        let mut indices = self.0.clone();
        indices.push(index);
        Self(indices)
    }
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("/")?;
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("/")?;
            }
            write!(f, "{index}")?;
        }
        Ok(())
    }
}

/// One node seen during [`LayoutTree::walk`].
#[derive(Debug, Clone, Copy)]
pub struct NodeVisit<'a> {
    pub node: &'a LayoutNode,
    pub parent: Option<&'a LayoutNode>,
    /// Index within the parent's children (0 for the root).
    pub index: usize,
    pub depth: usize,
    pub is_last_child: bool,
}

/// Immutable layout tree owned by the host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayoutTree {
    root: Arc<LayoutNode>,
}

impl LayoutTree {
    /// Wrap a root node. No validation is performed here.
    #[must_use]
    pub fn new(root: LayoutNode) -> Self {
        Self {
            root: Arc::new(root),
        }
    }

    /// Parse the persisted JSON shape.
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to the persisted JSON shape.
    pub fn to_json(&self) -> Result<String, LayoutError> {
        Ok(serde_json::to_string(self)?)
    }

    #[must_use]
    pub fn root(&self) -> &LayoutNode {
        &self.root
    }

    /// Whether both trees share the same root allocation.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.root, &other.root)
    }

    /// Resolve a path to a node.
    #[must_use]
    pub fn node_at(&self, path: &NodePath) -> Option<&LayoutNode> {
        let mut node: &LayoutNode = &self.root;
        for &index in path.indices() {
            let child: &LayoutNode = node.children().get(index)?;
            node = child;
        }
        Some(node)
    }

    /// Nodes from the root down to (excluding) the node at `path`.
    #[must_use]
    pub fn ancestors(&self, path: &NodePath) -> Option<Vec<&LayoutNode>> {
        let mut chain = Vec::with_capacity(path.depth());
        let mut node: &LayoutNode = &self.root;
        for &index in path.indices() {
            chain.push(node);
            let child: &LayoutNode = node.children().get(index)?;
            node = child;
        }
        Some(chain)
    }

    /// Depth-first search for `key`.
    #[must_use]
    pub fn path_to(&self, key: &str) -> Option<NodePath> {
        fn search(node: &LayoutNode, key: &str, path: &mut Vec<usize>) -> bool {
            if node.key == key {
                return true;
            }
            for (index, child) in node.children().iter().enumerate() {
                path.push(index);
                if search(child, key, path) {
                    return true;
                }
                let _ = path.pop();
            }
            false
        }

        let mut path = Vec::new();
        search(&self.root, key, &mut path).then(|| NodePath(path))
    }

    #[must_use]
    pub fn find(&self, key: &str) -> Option<&LayoutNode> {
        self.path_to(key).and_then(|path| self.node_at(&path))
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.path_to(key).is_some()
    }

    /// Visit every node in depth-first pre-order.
    pub fn walk<'a>(&'a self, mut visit: impl FnMut(NodeVisit<'a>)) {
        fn step<'a>(visit: &mut impl FnMut(NodeVisit<'a>), current: NodeVisit<'a>) {
            visit(current);
            let children = current.node.children();
            for (index, child) in children.iter().enumerate() {
                step(
                    visit,
                    NodeVisit {
                        node: child,
                        parent: Some(current.node),
                        index,
                        depth: current.depth + 1,
                        is_last_child: index + 1 == children.len(),
                    },
                );
            }
        }

        step(
            &mut visit,
            NodeVisit {
                node: &self.root,
                parent: None,
                index: 0,
                depth: 0,
                is_last_child: true,
            },
        );
    }

    /// Keys in depth-first pre-order.
    #[must_use]
    pub fn keys(&self) -> Vec<&str> {
        let mut keys = Vec::new();
        self.walk(|visit| keys.push(visit.node.key.as_str()));
        keys
    }

    #[must_use]
    pub fn node_count(&self) -> usize {
        let mut count = 0;
        self.walk(|_| count += 1);
        count
    }

    /// Copy-on-write edit of the node at `path`.
    ///
    /// Only the nodes on the root-to-target path are reallocated; every other
    /// subtree is shared with `self`. Returns `None` if `path` does not
    /// resolve.
    #[must_use]
    pub fn update_node(
        &self,
        path: &NodePath,
        edit: impl FnOnce(&mut LayoutNode),
    ) -> Option<LayoutTree> {
        fn rebuild<F: FnOnce(&mut LayoutNode)>(
            node: &Arc<LayoutNode>,
            path: &[usize],
            edit: F,
        ) -> Option<Arc<LayoutNode>> {
            let Some((&index, rest)) = path.split_first() else {
                let mut copy = LayoutNode::clone(node);
                edit(&mut copy);
                return Some(Arc::new(copy));
            };
            let replaced = rebuild(node.children().get(index)?, rest, edit)?;
            let mut copy = LayoutNode::clone(node);
            if let Some(children) = copy.children.as_mut() {
                children[index] = replaced;
            }
            Some(Arc::new(copy))
        }

        rebuild(&self.root, path.indices(), edit).map(|root| Self { root })
    }
}

impl From<LayoutNode> for LayoutTree {
    fn from(root: LayoutNode) -> Self {
        Self::new(root)
    }
}
