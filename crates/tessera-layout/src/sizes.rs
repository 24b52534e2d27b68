//! Top-down size computation.
//!
//! Every container splits its main-axis length among its children:
//!
//! 1. Children with an explicit size get exactly that size, raised to their
//!    minimum if needed.
//! 2. The remaining length is shared equally among the visible children that
//!    lack an explicit size. A child whose equal share is below its minimum
//!    is pinned to the minimum and the rest is shared again, so the children
//!    fill the container exactly whenever their minimums fit.
//! 3. If the flexible minimums alone exceed the remaining length, every
//!    flexible child gets exactly its minimum and the container overflows.
//!    Explicit sizes are never shrunk to compensate.
//!
//! The cross axis is inherited unchanged from the container.
//!
//! Hidden children (and empty containers) take no main-axis space outside of
//! move mode. Their entry is carried over from the previous [`SizeMap`] so
//! that showing them again starts from their last size.

use rustc_hash::FxHashMap;
use tessera_core::{Axis, Size};

use crate::config::LayoutConfig;
use crate::node::{LayoutNode, LayoutTree, NodePath};

/// Computed size of every node, keyed by node key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SizeMap {
    sizes: FxHashMap<String, Size>,
}

impl SizeMap {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<Size> {
        self.sizes.get(key).copied()
    }

    pub fn insert(&mut self, key: impl Into<String>, size: Size) {
        let _ = self.sizes.insert(key.into(), size);
    }

    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.sizes.contains_key(key)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.sizes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sizes.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, Size)> {
        self.sizes.iter().map(|(key, size)| (key.as_str(), *size))
    }
}

/// Geometry solver parameterized by the engine configuration.
#[derive(Debug, Clone, Copy, Default)]
pub struct SizeCalculator {
    config: LayoutConfig,
}

impl SizeCalculator {
    #[must_use]
    pub const fn new(config: LayoutConfig) -> Self {
        Self { config }
    }

    #[must_use]
    pub const fn config(&self) -> &LayoutConfig {
        &self.config
    }

    /// Floor for `node` along `axis`, falling back to the configured default.
    #[must_use]
    pub fn min_along(&self, node: &LayoutNode, axis: Axis) -> u32 {
        node.declared_min(axis)
            .unwrap_or_else(|| self.config.default_min_size().get(axis))
    }

    /// Floor for `node` on both axes.
    #[must_use]
    pub fn min_size(&self, node: &LayoutNode) -> Size {
        Size::new(
            self.min_along(node, Axis::Horizontal),
            self.min_along(node, Axis::Vertical),
        )
    }

    /// Compute sizes for the whole tree inside a container of `container`
    /// pixels.
    ///
    /// `previous` supplies retained entries for hidden nodes.
    #[must_use]
    pub fn compute(
        &self,
        tree: &LayoutTree,
        container: Size,
        previous: Option<&SizeMap>,
        move_mode: bool,
    ) -> SizeMap {
        let _span = tracing::debug_span!(
            "layout.sizes",
            width = container.width,
            height = container.height,
            move_mode
        )
        .entered();

        let root = tree.root();
        let mut sizes = SizeMap::new();
        sizes.insert(root.key.clone(), container);
        self.layout_children(root, container, previous, move_mode, &mut sizes);
        sizes
    }

    fn layout_children(
        &self,
        node: &LayoutNode,
        size: Size,
        previous: Option<&SizeMap>,
        move_mode: bool,
        sizes: &mut SizeMap,
    ) {
        let Some(axis) = node.axis() else {
            return;
        };
        let cross = size.get(axis.cross());
        let mains = self.distribute(node, axis, size.get(axis), move_mode);

        for (child, main) in node.children().iter().zip(mains) {
            let child_size = match main {
                Some(main) => Size::from_axes(axis, main, cross),
                None => previous
                    .and_then(|previous| previous.get(&child.key))
                    .unwrap_or_else(|| Size::from_axes(axis, self.resting_main(child, axis), cross)),
            };
            sizes.insert(child.key.clone(), child_size);
            self.layout_children(child, child_size, previous, move_mode, sizes);
        }
    }

    /// Main-axis length of every child; `None` for children that are hidden.
    fn distribute(
        &self,
        container: &LayoutNode,
        axis: Axis,
        available: u32,
        move_mode: bool,
    ) -> Vec<Option<u32>> {
        let children = container.children();
        let mut mains = vec![None; children.len()];
        let mut used: u32 = 0;
        let mut flexible = Vec::new();
        let mut flexible_mins = Vec::new();

        for (index, child) in children.iter().enumerate() {
            if !child.is_visible(move_mode) {
                continue;
            }
            let min = self.min_along(child, axis);
            match child.explicit_size(axis) {
                Some(explicit) => {
                    let main = explicit.max(min);
                    mains[index] = Some(main);
                    used = used.saturating_add(main);
                }
                None => {
                    flexible.push(index);
                    flexible_mins.push(min);
                }
            }
        }

        let remaining = available.saturating_sub(used);
        let required: u64 = flexible_mins.iter().map(|&min| u64::from(min)).sum();
        if used > available || required > u64::from(remaining) {
            tracing::debug!(
                message = "layout.sizes.overflow",
                key = container.key.as_str(),
                axis = axis.dimension(),
                available,
                explicit = used,
                required,
            );
        }

        for (index, main) in flexible.into_iter().zip(share_equally(remaining, &flexible_mins)) {
            mains[index] = Some(main);
        }
        mains
    }

    /// Main-axis space `node` keeps regardless of how the rest is shared:
    /// its explicit size raised to its minimum, or just the minimum.
    fn resting_main(&self, node: &LayoutNode, axis: Axis) -> u32 {
        let min = self.min_along(node, axis);
        node.explicit_size(axis).map_or(min, |explicit| explicit.max(min))
    }

    /// Size of `node` as rendered.
    ///
    /// With `apply_minimums` the result is the node's frame, raised to its
    /// minimum. Without it the result is the content area: the drag-bar
    /// gutter is removed from every trailing edge that carries a handle,
    /// either the node's own or its parent's.
    #[must_use]
    pub fn item_size(
        &self,
        node: &LayoutNode,
        parent: Option<&LayoutNode>,
        sizes: &SizeMap,
        apply_minimums: bool,
    ) -> Size {
        let size = sizes.get(&node.key).unwrap_or_default();
        if apply_minimums {
            return size.max(self.min_size(node));
        }

        let gutter = self.config.drag_bar_thickness;
        let right = node.resizable_right || parent.is_some_and(|parent| parent.resizable_right);
        let bottom = node.resizable_bottom || parent.is_some_and(|parent| parent.resizable_bottom);
        size.saturating_shrink(
            if right { gutter } else { 0 },
            if bottom { gutter } else { 0 },
        )
    }

    /// Largest size the node at `path` can grow to.
    ///
    /// Walks from the node to the root. At each level laid out along an axis,
    /// the bound on that axis is the parent's length minus the space the
    /// other visible siblings keep: their explicit size (raised to their
    /// minimum) or, for flexible siblings, their minimum. On the cross axis
    /// the bound is the parent's length. The smallest bound per axis wins.
    /// The root cannot grow past its own size.
    #[must_use]
    pub fn calculate_max_size_available_for_item(
        &self,
        tree: &LayoutTree,
        path: &NodePath,
        sizes: &SizeMap,
        move_mode: bool,
    ) -> Option<Size> {
        let node = tree.node_at(path)?;
        let ancestors = tree.ancestors(path)?;
        if ancestors.is_empty() {
            return Some(sizes.get(&node.key).unwrap_or_default());
        }

        let mut bound = Size::new(u32::MAX, u32::MAX);
        for (parent, &index) in ancestors.iter().zip(path.indices()).rev() {
            let parent_size = sizes.get(&parent.key).unwrap_or_default();
            for axis in [Axis::Horizontal, Axis::Vertical] {
                let limit = if parent.axis() == Some(axis) {
                    let reserved: u64 = parent
                        .children()
                        .iter()
                        .enumerate()
                        .filter(|(sibling, child)| *sibling != index && child.is_visible(move_mode))
                        .map(|(_, child)| u64::from(self.resting_main(child, axis)))
                        .sum();
                    let reserved = u32::try_from(reserved).unwrap_or(u32::MAX);
                    parent_size.get(axis).saturating_sub(reserved)
                } else {
                    parent_size.get(axis)
                };
                bound = bound.with(axis, bound.get(axis).min(limit));
            }
        }
        Some(bound)
    }
}

/// Share `remaining` among children with the given minimums.
///
/// Children whose equal share falls below their minimum are pinned to it and
/// the rest is shared again. Leftover pixels from integer division go to the
/// leading unpinned children, so the result sums to `remaining` whenever the
/// minimums fit. Otherwise every child gets exactly its minimum.
fn share_equally(remaining: u32, mins: &[u32]) -> Vec<u32> {
    let required: u64 = mins.iter().map(|&min| u64::from(min)).sum();
    if mins.is_empty() || required >= u64::from(remaining) {
        return mins.to_vec();
    }

    let mut pinned = vec![false; mins.len()];
    let mut free = remaining;
    let mut open = mins.len() as u32;
    loop {
        let share = free / open;
        let mut changed = false;
        for (min, pinned) in mins.iter().zip(pinned.iter_mut()) {
            if !*pinned && *min > share {
                *pinned = true;
                free -= *min;
                open -= 1;
                changed = true;
            }
        }
        if !changed {
            break;
        }
    }

    let base = free / open;
    let mut extra = free % open;
    mins.iter()
        .zip(pinned)
        .map(|(&min, pinned)| {
            if pinned {
                return min;
            }
            if extra > 0 {
                extra -= 1;
                base + 1
            } else {
                base
            }
        })
        .collect()
}
