//! Structural validation of host-supplied layout trees.
//!
//! Validation runs once per structural change, never per frame. It rejects:
//!
//! - keys that are empty or repeated anywhere in the tree,
//! - a root that is not a container, or one without children,
//! - containers without a direction,
//! - containers where every child declares a size along the container's
//!   axis, leaving no child to absorb the remaining space.
//!
//! [`normalize`] repairs the last class deterministically by releasing the
//! offending container's last child. Moves normalize the whole tree; resize
//! updates repair only the edited node's parent with
//! [`normalize_container`].

use rustc_hash::FxHashSet;
use tessera_core::Axis;

use crate::LayoutError;
use crate::node::{LayoutNode, LayoutTree, NodePath};

/// Check every structural invariant, failing on the first violation.
pub fn validate(tree: &LayoutTree) -> Result<(), LayoutError> {
    let root = tree.root();
    if !root.is_container() {
        return Err(LayoutError::RootNotContainer {
            key: root.key.clone(),
        });
    }
    if root.children().is_empty() {
        return Err(LayoutError::EmptyRoot {
            key: root.key.clone(),
        });
    }

    let mut seen = FxHashSet::default();
    validate_node(root, None, &mut seen)
}

fn validate_node<'a>(
    node: &'a LayoutNode,
    parent: Option<&'a LayoutNode>,
    seen: &mut FxHashSet<&'a str>,
) -> Result<(), LayoutError> {
    if node.key.is_empty() {
        return Err(LayoutError::EmptyKey {
            parent: parent.map(|parent| parent.key.clone()),
        });
    }
    if !seen.insert(node.key.as_str()) {
        return Err(LayoutError::DuplicateKey {
            key: node.key.clone(),
        });
    }

    let Some(children) = node.children.as_deref() else {
        return Ok(());
    };
    let Some(axis) = node.axis() else {
        return Err(LayoutError::MissingDirection {
            key: node.key.clone(),
        });
    };

    if let Some(filler) = unfillable_child(node, axis) {
        return Err(LayoutError::AmbiguousSizing {
            key: filler.key.clone(),
            container: node.key.clone(),
            axis,
        });
    }

    for child in children {
        validate_node(child, Some(node), seen)?;
    }
    Ok(())
}

/// The child that must fill `container` but declares a size, if any.
fn unfillable_child(container: &LayoutNode, axis: Axis) -> Option<&LayoutNode> {
    let children = container.children();
    let last = children.last()?;
    children
        .iter()
        .all(|child| child.explicit_size(axis).is_some())
        .then_some(&**last)
}

/// Return a tree in which every non-empty container has a flexible child.
///
/// The last child of an offending container loses its explicit size along
/// the container's axis. Trees that need no repair are returned as-is
/// (same allocation).
#[must_use]
pub fn normalize(tree: &LayoutTree) -> LayoutTree {
    let mut containers = Vec::new();
    collect_unfillable(tree.root(), &mut Vec::new(), &mut containers);

    let mut normalized = tree.clone();
    for path in containers {
        normalized = normalize_container(&normalized, &path);
    }
    normalized
}

/// Repair only the container at `path`. Costs O(depth + children).
#[must_use]
pub fn normalize_container(tree: &LayoutTree, path: &NodePath) -> LayoutTree {
    let Some(container) = tree.node_at(path) else {
        return tree.clone();
    };
    let Some(axis) = container.axis() else {
        return tree.clone();
    };
    let Some(filler) = unfillable_child(container, axis) else {
        return tree.clone();
    };

    let filler_path = path.child(container.children().len() - 1);
    match tree.update_node(&filler_path, |node| node.set_explicit_size(axis, None)) {
        Some(repaired) => {
            tracing::debug!(
                message = "layout.normalize.clear_size",
                key = filler.key.as_str(),
                axis = axis.dimension(),
            );
            repaired
        }
        None => tree.clone(),
    }
}

fn collect_unfillable(node: &LayoutNode, path: &mut Vec<usize>, containers: &mut Vec<NodePath>) {
    if let Some(axis) = node.axis()
        && unfillable_child(node, axis).is_some()
    {
        containers.push(NodePath::from_indices(path.clone()));
    }
    for (index, child) in node.children().iter().enumerate() {
        path.push(index);
        collect_unfillable(child, path, containers);
        let _ = path.pop();
    }
}
