//! Drag-to-resize session state.
//!
//! ```text
//! Idle -> Resizing -> Idle
//!    \------> Resizing (a new start supersedes the current session)
//! ```
//!
//! A session snapshots the dragged node's initial size and its bounds once,
//! at gesture start. Every update derives the new size from that snapshot
//! plus the total pointer delta, so replaying the same delta always commits
//! the same tree.

use tessera_core::{Axis, Delta, Size};

use crate::node::{LayoutTree, NodePath};
use crate::sizes::{SizeCalculator, SizeMap};
use crate::validate;

/// Edge being dragged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    /// Trailing vertical edge; changes the width.
    Right,
    /// Trailing horizontal edge; changes the height.
    Bottom,
}

impl ResizeHandle {
    #[must_use]
    pub const fn axis(self) -> Axis {
        match self {
            Self::Bottom => Axis::Vertical,
            Self::Right => Axis::Horizontal,
        }
    }
}

/// Snapshot taken when a drag starts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeSession {
    pub key: String,
    /// Where `key` lived when the session started.
    pub path: NodePath,
    pub initial: Size,
    pub min: Size,
    pub max: Size,
}

impl ResizeSession {
    /// Length along the handle's axis after applying `delta`.
    ///
    /// Clamped to `[min, max]`; when the bounds cross, `max` wins.
    #[must_use]
    pub fn target_length(&self, handle: ResizeHandle, delta: Delta) -> u32 {
        let axis = handle.axis();
        delta
            .apply(axis, self.initial.get(axis))
            .max(self.min.get(axis))
            .min(self.max.get(axis))
    }
}

/// Owner of the at-most-one active resize session.
#[derive(Debug, Clone, Default)]
pub struct ResizeController {
    session: Option<ResizeSession>,
}

impl ResizeController {
    #[must_use]
    pub const fn new() -> Self {
        Self { session: None }
    }

    #[must_use]
    pub const fn is_resizing(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub const fn session(&self) -> Option<&ResizeSession> {
        self.session.as_ref()
    }

    /// Begin a drag on `key`. Returns `false` (and stays idle) if the key is
    /// not in `tree`.
    pub fn on_resize_start(
        &mut self,
        tree: &LayoutTree,
        key: &str,
        sizes: &SizeMap,
        calc: &SizeCalculator,
        move_mode: bool,
    ) -> bool {
        let Some(path) = tree.path_to(key) else {
            tracing::debug!(message = "layout.resize.unknown_key", key);
            return false;
        };
        let Some(node) = tree.node_at(&path) else {
            return false;
        };

        let initial = sizes.get(key).unwrap_or_default();
        let min = calc.min_size(node);
        let max = calc
            .calculate_max_size_available_for_item(tree, &path, sizes, move_mode)
            .unwrap_or(initial);

        if let Some(previous) = self.session.take() {
            tracing::debug!(
                message = "layout.resize.superseded",
                previous = previous.key.as_str(),
                key
            );
        }
        tracing::debug!(
            message = "layout.resize.start",
            key,
            path = %path,
            width = initial.width,
            height = initial.height,
            max_width = max.width,
            max_height = max.height,
        );
        self.session = Some(ResizeSession {
            key: key.to_owned(),
            path,
            initial,
            min,
            max,
        });
        true
    }

    /// Apply the total drag `delta` to `tree`.
    ///
    /// Returns the updated tree, or `None` while idle or when the dragged
    /// node is no longer in `tree`. Only the root-to-node path is rebuilt.
    /// If the new size leaves the parent without a flexible child, the
    /// parent's last child gives up its size.
    pub fn on_resize(
        &mut self,
        tree: &LayoutTree,
        handle: ResizeHandle,
        delta: Delta,
    ) -> Option<LayoutTree> {
        let session = self.session.as_mut()?;
        let path = resolve(tree, session)?;
        let length = session.target_length(handle, delta);
        let axis = handle.axis();

        tracing::trace!(
            message = "layout.resize.update",
            key = session.key.as_str(),
            axis = axis.dimension(),
            length,
        );
        let updated = tree.update_node(&path, |node| node.set_explicit_size(axis, Some(length)))?;
        Some(match path.split_last() {
            Some((parent, _)) => validate::normalize_container(&updated, &parent),
            None => updated,
        })
    }

    /// Apply the final delta and end the session.
    pub fn on_resize_stop(
        &mut self,
        tree: &LayoutTree,
        handle: ResizeHandle,
        delta: Delta,
    ) -> Option<LayoutTree> {
        let committed = self.on_resize(tree, handle, delta);
        if let Some(session) = self.session.take() {
            tracing::debug!(
                message = "layout.resize.commit",
                key = session.key.as_str(),
                committed = committed.is_some(),
            );
        }
        committed
    }

    /// Drop the session without committing anything.
    pub fn abandon(&mut self) {
        if let Some(session) = self.session.take() {
            tracing::debug!(message = "layout.resize.abandon", key = session.key.as_str());
        }
    }
}

/// Path of the session's node in `tree`, re-resolving by key if it moved.
fn resolve(tree: &LayoutTree, session: &mut ResizeSession) -> Option<NodePath> {
    if tree
        .node_at(&session.path)
        .is_some_and(|node| node.key == session.key)
    {
        return Some(session.path.clone());
    }
    match tree.path_to(&session.key) {
        Some(path) => {
            session.path = path.clone();
            Some(path)
        }
        None => {
            tracing::debug!(
                message = "layout.resize.stale",
                key = session.key.as_str(),
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LayoutConfig;
    use crate::node::LayoutDirection::{Column, Row};
    use crate::node::LayoutNode;
    use tracing_test::traced_test;

    fn sidebar_layout() -> LayoutTree {
        LayoutTree::new(LayoutNode::container(
            "root",
            Row,
            [
                LayoutNode::leaf("sidebar")
                    .with_width(200)
                    .with_min_width(100)
                    .resizable_right(),
                LayoutNode::leaf("main"),
            ],
        ))
    }

    fn start(tree: &LayoutTree, key: &str) -> (ResizeController, SizeCalculator) {
        let calc = SizeCalculator::new(LayoutConfig::default());
        let sizes = calc.compute(tree, Size::new(1000, 600), None, false);
        let mut controller = ResizeController::new();
        assert!(controller.on_resize_start(tree, key, &sizes, &calc, false));
        (controller, calc)
    }

    #[test]
    fn drag_is_clamped_to_minimum() {
        let tree = sidebar_layout();
        let (mut controller, _) = start(&tree, "sidebar");
        let committed = controller
            .on_resize_stop(&tree, ResizeHandle::Right, Delta::new(-150, 0))
            .expect("commits");
        assert_eq!(committed.find("sidebar").and_then(|n| n.width), Some(100));
        assert!(!controller.is_resizing());
    }

    #[test]
    fn drag_is_clamped_to_available_space() {
        let tree = sidebar_layout();
        let (mut controller, _) = start(&tree, "sidebar");
        let updated = controller
            .on_resize(&tree, ResizeHandle::Right, Delta::new(5_000, 0))
            .expect("updates");
        assert_eq!(updated.find("sidebar").and_then(|n| n.width), Some(960));
        assert!(controller.is_resizing());
    }

    #[test]
    fn updates_are_relative_to_session_start() {
        let tree = sidebar_layout();
        let (mut controller, _) = start(&tree, "sidebar");
        let first = controller
            .on_resize(&tree, ResizeHandle::Right, Delta::new(30, 0))
            .expect("updates");
        let second = controller
            .on_resize(&first, ResizeHandle::Right, Delta::new(30, 0))
            .expect("updates");
        assert_eq!(first, second);
        assert_eq!(second.find("sidebar").and_then(|n| n.width), Some(230));
    }

    #[test]
    fn bottom_handle_changes_height_only() {
        let tree = LayoutTree::new(LayoutNode::container(
            "root",
            Column,
            [
                LayoutNode::leaf("top").with_height(100).resizable_bottom(),
                LayoutNode::leaf("rest"),
            ],
        ));
        let (mut controller, _) = start(&tree, "top");
        let updated = controller
            .on_resize(&tree, ResizeHandle::Bottom, Delta::new(70, 25))
            .expect("updates");
        let top = updated.find("top").expect("top");
        assert_eq!(top.height, Some(125));
        assert_eq!(top.width, None);
    }

    #[test]
    fn sizing_last_child_keeps_tree_valid() {
        let tree = sidebar_layout();
        let (mut controller, calc) = start(&tree, "main");
        let updated = controller
            .on_resize(&tree, ResizeHandle::Right, Delta::new(-100, 0))
            .expect("updates");
        validate::validate(&updated).expect("normalized");
        assert_eq!(updated.find("main").and_then(|n| n.width), None);
        let sizes = calc.compute(&updated, Size::new(1000, 600), None, false);
        assert_eq!(sizes.get("main").map(|s| s.width), Some(800));
    }

    #[test]
    fn max_wins_when_bounds_cross() {
        let session = ResizeSession {
            key: "a".into(),
            path: NodePath::from_indices([0]),
            initial: Size::new(50, 50),
            min: Size::new(80, 40),
            max: Size::new(60, 500),
        };
        assert_eq!(session.target_length(ResizeHandle::Right, Delta::new(0, 0)), 60);
        assert_eq!(session.target_length(ResizeHandle::Bottom, Delta::new(0, -20)), 40);
    }

    #[test]
    fn events_while_idle_are_ignored() {
        let tree = sidebar_layout();
        let mut controller = ResizeController::new();
        assert!(
            controller
                .on_resize(&tree, ResizeHandle::Right, Delta::new(10, 0))
                .is_none()
        );
        assert!(
            controller
                .on_resize_stop(&tree, ResizeHandle::Right, Delta::new(10, 0))
                .is_none()
        );
    }

    #[test]
    fn unknown_key_stays_idle() {
        let tree = sidebar_layout();
        let calc = SizeCalculator::default();
        let sizes = calc.compute(&tree, Size::new(1000, 600), None, false);
        let mut controller = ResizeController::new();
        assert!(!controller.on_resize_start(&tree, "ghost", &sizes, &calc, false));
        assert!(!controller.is_resizing());
    }

    #[test]
    fn moved_node_is_resolved_by_key() {
        let tree = sidebar_layout();
        let (mut controller, _) = start(&tree, "sidebar");
        let swapped = LayoutTree::new(LayoutNode::container(
            "root",
            Row,
            [
                LayoutNode::leaf("main"),
                LayoutNode::leaf("sidebar").with_width(200).with_min_width(100),
            ],
        ));
        let updated = controller
            .on_resize(&swapped, ResizeHandle::Right, Delta::new(-50, 0))
            .expect("re-resolved");
        assert_eq!(updated.find("sidebar").and_then(|n| n.width), Some(150));
        assert_eq!(
            controller.session().map(|s| s.path.indices().to_vec()),
            Some(vec![1])
        );
    }

    #[test]
    #[traced_test]
    fn removed_node_is_a_logged_noop() {
        let tree = sidebar_layout();
        let (mut controller, _) = start(&tree, "sidebar");
        let without = LayoutTree::new(LayoutNode::container(
            "root",
            Row,
            [LayoutNode::leaf("main")],
        ));
        assert!(
            controller
                .on_resize_stop(&without, ResizeHandle::Right, Delta::new(10, 0))
                .is_none()
        );
        assert!(!controller.is_resizing());
        assert!(logs_contain("layout.resize.stale"));
    }

    #[test]
    fn new_start_supersedes_session() {
        let tree = sidebar_layout();
        let (mut controller, calc) = start(&tree, "sidebar");
        let sizes = calc.compute(&tree, Size::new(1000, 600), None, false);
        assert!(controller.on_resize_start(&tree, "main", &sizes, &calc, false));
        assert_eq!(controller.session().map(|s| s.key.as_str()), Some("main"));
        controller.abandon();
        assert!(controller.session().is_none());
    }
}
