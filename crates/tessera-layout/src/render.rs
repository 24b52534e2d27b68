//! Frame construction and the host integration contract.
//!
//! The engine never draws anything. A render pass walks the tree once,
//! positions every node from the current [`SizeMap`], asks the host for the
//! content of each visible leaf, and returns the result as a [`RenderFrame`]
//! the host turns into its own widgets.

use tessera_core::{Rect, Size};

use crate::movement::{self, MoveAvailability, MoveDirection};
use crate::node::{LayoutNode, LayoutTree, NodePath};
use crate::resize::ResizeSession;
use crate::sizes::{SizeCalculator, SizeMap};

/// Geometry handed to [`LayoutHost::render_item`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ItemRenderContext {
    /// Position and frame size of the pane.
    pub rect: Rect,
    /// Area left for content once drag-bar gutters are removed.
    pub size: Size,
    /// Whether the pane is shown. Hidden panes are not rendered, so this is
    /// always true today.
    pub visible: bool,
    pub depth: usize,
}

/// Emitted whenever a resize produces a new tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResizeEvent {
    pub layout: LayoutTree,
}

/// Emitted when the user activates a move-mode button.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveButtonClickEvent {
    pub direction: MoveDirection,
    pub item_key: String,
    /// Stable identity of the activated button, `"{item_key}-{direction}"`.
    pub button_key: String,
}

/// Host side of the engine.
///
/// The host owns the layout: it receives every new tree through
/// [`on_resize`](Self::on_resize) and decides whether to hand it back.
pub trait LayoutHost {
    type Content;

    /// Content for the leaf `key`. Called once per visible leaf per frame.
    fn render_item(&self, key: &str, ctx: &ItemRenderContext) -> Self::Content;

    /// Human-readable name shown on move controls.
    fn item_label(&self, key: &str) -> String {
        key.to_owned()
    }

    fn on_resize(&mut self, event: ResizeEvent);

    fn on_move_button_click(&mut self, event: MoveButtonClickEvent);
}

/// Identity of the move button for `item_key` in `direction`.
#[must_use]
pub fn button_key(item_key: &str, direction: MoveDirection) -> String {
    format!("{item_key}-{direction}")
}

fn button_direction(item_key: &str, button_key: &str) -> Option<MoveDirection> {
    let suffix = button_key.strip_prefix(item_key)?.strip_prefix('-')?;
    MoveDirection::ALL
        .into_iter()
        .find(|direction| direction.as_str() == suffix)
}

/// Drag bars shown on a node's trailing edges. None are shown in move mode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EnabledHandles {
    pub right: bool,
    pub bottom: bool,
}

/// Move-mode overlay for one leaf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveControls {
    pub label: String,
    pub moves: MoveAvailability,
    /// Button that should take focus, restoring the last-used one.
    pub auto_focus: Option<MoveDirection>,
}

impl MoveControls {
    fn new(label: String, moves: MoveAvailability, item_key: &str, last_button: Option<&str>) -> Self {
        let auto_focus = last_button
            .and_then(|last| button_direction(item_key, last))
            .and_then(|direction| {
                if moves.get(direction) {
                    Some(direction)
                } else {
                    moves.first_enabled()
                }
            });
        Self {
            label,
            moves,
            auto_focus,
        }
    }
}

/// One node of a rendered frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedItem<C> {
    pub key: String,
    pub depth: usize,
    pub parent: Option<String>,
    pub is_container: bool,
    /// Position and computed size.
    pub rect: Rect,
    /// Outer size with minimums applied.
    pub frame: Size,
    pub content_size: Size,
    /// False if the node or any ancestor is hidden.
    pub visible: bool,
    pub handles: EnabledHandles,
    /// Growth limit while this node is being dragged.
    pub max_size: Option<Size>,
    pub content: Option<C>,
    pub move_controls: Option<MoveControls>,
}

/// Output of one render pass, nodes in depth-first pre-order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderFrame<C> {
    pub container: Size,
    pub move_mode: bool,
    pub items: Vec<RenderedItem<C>>,
}

impl<C> RenderFrame<C> {
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&RenderedItem<C>> {
        self.items.iter().find(|item| item.key == key)
    }

    /// Visible leaves with their content.
    pub fn visible_leaves(&self) -> impl Iterator<Item = &RenderedItem<C>> {
        self.items
            .iter()
            .filter(|item| item.visible && !item.is_container)
    }
}

/// Borrowed view of the engine state needed for a render pass.
#[derive(Debug, Clone, Copy)]
pub struct LayoutRenderer<'a> {
    pub tree: &'a LayoutTree,
    pub sizes: &'a SizeMap,
    pub calc: &'a SizeCalculator,
    pub move_mode: bool,
    pub session: Option<&'a ResizeSession>,
    pub last_move_button: Option<&'a str>,
}

impl LayoutRenderer<'_> {
    pub fn render<H: LayoutHost>(&self, host: &H) -> RenderFrame<H::Content> {
        let root = self.tree.root();
        let container = self.sizes.get(&root.key).unwrap_or_default();
        let _span = tracing::debug_span!(
            "layout.render",
            width = container.width,
            height = container.height,
            move_mode = self.move_mode
        )
        .entered();

        let mut items = Vec::with_capacity(self.sizes.len());
        self.render_node(
            host,
            Placement {
                node: root,
                parent: None,
                path: NodePath::root(),
                rect: Rect::from_size(container),
                parent_visible: true,
                is_last_child: true,
            },
            &mut items,
        );
        tracing::debug!(message = "layout.render.frame", items = items.len());

        RenderFrame {
            container,
            move_mode: self.move_mode,
            items,
        }
    }

    fn render_node<H: LayoutHost>(
        &self,
        host: &H,
        at: Placement<'_>,
        items: &mut Vec<RenderedItem<H::Content>>,
    ) {
        let node = at.node;
        let visible = at.parent_visible && node.is_visible(self.move_mode);
        let content_size = self.calc.item_size(node, at.parent, self.sizes, false);
        let is_leaf = !node.is_container();

        let content = (is_leaf && visible).then(|| {
            host.render_item(
                &node.key,
                &ItemRenderContext {
                    rect: at.rect,
                    size: content_size,
                    visible,
                    depth: at.path.depth(),
                },
            )
        });
        let move_controls = (is_leaf && self.move_mode).then(|| {
            MoveControls::new(
                host.item_label(&node.key),
                movement::available_moves_at(self.tree, &at.path),
                &node.key,
                self.last_move_button,
            )
        });

        items.push(RenderedItem {
            key: node.key.clone(),
            depth: at.path.depth(),
            parent: at.parent.map(|parent| parent.key.clone()),
            is_container: !is_leaf,
            rect: at.rect,
            frame: self.calc.item_size(node, at.parent, self.sizes, true),
            content_size,
            visible,
            handles: if self.move_mode {
                EnabledHandles::default()
            } else {
                EnabledHandles {
                    right: node.resizable_right && !at.is_last_child,
                    bottom: node.resizable_bottom && !at.is_last_child,
                }
            },
            max_size: self
                .session
                .filter(|session| session.key == node.key)
                .map(|session| session.max),
            content,
            move_controls,
        });

        let Some(axis) = node.axis() else {
            return;
        };
        let children = node.children();
        let mut offset = at.rect.origin(axis);
        for (index, child) in children.iter().enumerate() {
            let size = self.sizes.get(&child.key).unwrap_or_default();
            let rect = Rect::at(at.rect.x, at.rect.y, size).with_origin(axis, offset);
            if child.is_visible(self.move_mode) {
                offset = offset.saturating_add(size.get(axis));
            }
            self.render_node(
                host,
                Placement {
                    node: child,
                    parent: Some(node),
                    path: at.path.child(index),
                    rect,
                    parent_visible: visible,
                    is_last_child: index + 1 == children.len(),
                },
                items,
            );
        }
    }
}

struct Placement<'a> {
    node: &'a LayoutNode,
    parent: Option<&'a LayoutNode>,
    path: NodePath,
    rect: Rect,
    parent_visible: bool,
    is_last_child: bool,
}
