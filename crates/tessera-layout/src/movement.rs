//! Structural moves of panes within the tree.
//!
//! A move either swaps a node with its neighbour (when the parent lays out
//! along the move's axis) or promotes the node out of its parent into the
//! grandparent (when the grandparent does). Moves never create or delete
//! containers; a parent emptied by a promotion stays in the tree as an empty
//! container and is hidden outside of move mode.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tessera_core::Axis;

use crate::node::{LayoutNode, LayoutTree, NodePath};
use crate::validate;

/// Direction of a move-mode button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MoveDirection {
    Up,
    Down,
    Left,
    Right,
}

impl MoveDirection {
    /// Button order, also used to pick a fallback focus target.
    pub const ALL: [Self; 4] = [Self::Up, Self::Down, Self::Left, Self::Right];

    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Left | Self::Right => Axis::Horizontal,
            Self::Up | Self::Down => Axis::Vertical,
        }
    }

    /// Whether the move goes towards lower child indices.
    #[must_use]
    pub const fn is_backward(self) -> bool {
        matches!(self, Self::Up | Self::Left)
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    fn neighbour(self, index: usize, len: usize) -> Option<usize> {
        if self.is_backward() {
            index.checked_sub(1)
        } else {
            let next = index + 1;
            (next < len).then_some(next)
        }
    }
}

impl fmt::Display for MoveDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Legality of each move for one node.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MoveAvailability {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl MoveAvailability {
    #[must_use]
    pub const fn get(&self, direction: MoveDirection) -> bool {
        match direction {
            MoveDirection::Up => self.up,
            MoveDirection::Down => self.down,
            MoveDirection::Left => self.left,
            MoveDirection::Right => self.right,
        }
    }

    /// First legal direction in button order.
    #[must_use]
    pub fn first_enabled(&self) -> Option<MoveDirection> {
        MoveDirection::ALL
            .into_iter()
            .find(|&direction| self.get(direction))
    }

    #[must_use]
    pub fn any(&self) -> bool {
        self.first_enabled().is_some()
    }
}

/// Whether `key` can move one step in `direction`. Unknown keys cannot.
#[must_use]
pub fn can_move(tree: &LayoutTree, key: &str, direction: MoveDirection) -> bool {
    tree.path_to(key)
        .is_some_and(|path| can_move_at(tree, &path, direction))
}

/// Path-based form of [`can_move`].
#[must_use]
pub fn can_move_at(tree: &LayoutTree, path: &NodePath, direction: MoveDirection) -> bool {
    let Some((parent_path, index)) = path.split_last() else {
        return false;
    };
    let Some(parent) = tree.node_at(&parent_path) else {
        return false;
    };
    if parent.axis() == Some(direction.axis()) {
        return direction.neighbour(index, parent.children().len()).is_some();
    }

    let Some((grandparent_path, _)) = parent_path.split_last() else {
        return false;
    };
    tree.node_at(&grandparent_path)
        .is_some_and(|grandparent| grandparent.axis() == Some(direction.axis()))
}

/// Legality of all four moves for the node at `path`.
#[must_use]
pub fn available_moves_at(tree: &LayoutTree, path: &NodePath) -> MoveAvailability {
    MoveAvailability {
        up: can_move_at(tree, path, MoveDirection::Up),
        down: can_move_at(tree, path, MoveDirection::Down),
        left: can_move_at(tree, path, MoveDirection::Left),
        right: can_move_at(tree, path, MoveDirection::Right),
    }
}

#[must_use]
pub fn available_moves(tree: &LayoutTree, key: &str) -> MoveAvailability {
    tree.path_to(key)
        .map(|path| available_moves_at(tree, &path))
        .unwrap_or_default()
}

/// Move `key` one step in `direction`.
///
/// Illegal moves and unknown keys return `tree` unchanged. The result is
/// normalized so that it always passes validation when `tree` did.
#[must_use]
pub fn perform_move(tree: &LayoutTree, key: &str, direction: MoveDirection) -> LayoutTree {
    let Some(path) = tree.path_to(key) else {
        tracing::debug!(
            message = "layout.move.noop",
            key,
            direction = direction.as_str(),
            reason = "unknown_key",
        );
        return tree.clone();
    };
    if !can_move_at(tree, &path, direction) {
        tracing::debug!(
            message = "layout.move.noop",
            key,
            direction = direction.as_str(),
            reason = "illegal",
        );
        return tree.clone();
    }

    match relocate(tree, &path, direction) {
        Some(moved) => {
            tracing::debug!(
                message = "layout.move.apply",
                key,
                direction = direction.as_str(),
                from = %path,
            );
            validate::normalize(&moved)
        }
        None => tree.clone(),
    }
}

fn relocate(tree: &LayoutTree, path: &NodePath, direction: MoveDirection) -> Option<LayoutTree> {
    let (parent_path, index) = path.split_last()?;
    let parent = tree.node_at(&parent_path)?;

    if parent.axis() == Some(direction.axis()) {
        let target = direction.neighbour(index, parent.children().len())?;
        return tree.update_node(&parent_path, |parent| {
            if let Some(children) = parent.children.as_mut() {
                children.swap(index, target);
            }
        });
    }

    let (grandparent_path, parent_index) = parent_path.split_last()?;
    let moving = Arc::clone(parent.children().get(index)?);
    let insert_at = if direction.is_backward() {
        parent_index
    } else {
        parent_index + 1
    };

    tree.update_node(&grandparent_path, |grandparent| {
        let Some(children) = grandparent.children.as_mut() else {
            return;
        };
        let mut emptied = LayoutNode::clone(&children[parent_index]);
        if let Some(siblings) = emptied.children.as_mut() {
            let _ = siblings.remove(index);
        }
        children[parent_index] = Arc::new(emptied);
        children.insert(insert_at, moving);
    })
}
