//! Stateful facade tying the layout components together.
//!
//! # Design
//!
//! [`LayoutEngine`] holds the current tree, the container size, the computed
//! [`SizeMap`] and the interaction state (resize session, move mode, last
//! move button). Every state change that affects geometry recomputes sizes
//! eagerly so that [`LayoutEngine::render`] only reads.
//!
//! # Failure Modes
//!
//! - **Invalid tree**: [`LayoutEngine::set_layout`] rejects it and keeps the
//!   previous tree.
//! - **Stale interaction**: resize events for a node that no longer exists
//!   and illegal moves are logged no-ops.
//! - **Re-entrancy**: listeners get `&LayoutEvent` only, so they cannot
//!   mutate the engine while it notifies.

use std::fmt;

use tessera_core::{Delta, Size};

use crate::LayoutError;
use crate::config::LayoutConfig;
use crate::movement::{self, MoveAvailability, MoveDirection};
use crate::node::LayoutTree;
use crate::render::{
    self, LayoutHost, LayoutRenderer, MoveButtonClickEvent, RenderFrame, ResizeEvent,
};
use crate::resize::{ResizeController, ResizeHandle, ResizeSession};
use crate::sizes::{SizeCalculator, SizeMap};
use crate::validate;

/// Notification delivered to subscribers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LayoutEvent {
    /// A drag update produced a new tree; `size` is the node's computed size.
    Resizing { key: String, size: Size },
    /// A resize gesture committed; `size` is the node's new computed size.
    Resized { key: String, size: Size },
    ContainerResized { size: Size },
    Moved { key: String, direction: MoveDirection },
}

/// Handle returned by [`LayoutEngine::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn FnMut(&LayoutEvent)>;

pub struct LayoutEngine {
    calc: SizeCalculator,
    layout: LayoutTree,
    container: Size,
    sizes: SizeMap,
    move_mode: bool,
    resize: ResizeController,
    last_move_button: Option<String>,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
}

impl fmt::Debug for LayoutEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LayoutEngine")
            .field("container", &self.container)
            .field("move_mode", &self.move_mode)
            .field("resizing", &self.resize.is_resizing())
            .field("listeners", &self.listeners.len())
            .finish_non_exhaustive()
    }
}

impl LayoutEngine {
    /// Validate `tree` and compute its initial geometry.
    pub fn new(config: LayoutConfig, tree: LayoutTree, container: Size) -> Result<Self, LayoutError> {
        validate::validate(&tree)?;
        let calc = SizeCalculator::new(config);
        let sizes = calc.compute(&tree, container, None, false);
        tracing::debug!(
            message = "layout.engine.init",
            nodes = sizes.len(),
            width = container.width,
            height = container.height,
        );
        Ok(Self {
            calc,
            layout: tree,
            container,
            sizes,
            move_mode: false,
            resize: ResizeController::new(),
            last_move_button: None,
            listeners: Vec::new(),
            next_subscription: 0,
        })
    }

    /// Replace the tree.
    ///
    /// Handing back the tree the engine last produced is free: it is already
    /// current and known to be valid.
    pub fn set_layout(&mut self, tree: LayoutTree) -> Result<(), LayoutError> {
        if tree.ptr_eq(&self.layout) {
            return Ok(());
        }
        if let Err(err) = validate::validate(&tree) {
            tracing::warn!(
                message = "layout.engine.rejected",
                error = %err,
                key = err.key(),
            );
            return Err(err);
        }
        self.adopt(tree);
        Ok(())
    }

    #[must_use]
    pub const fn layout(&self) -> &LayoutTree {
        &self.layout
    }

    #[must_use]
    pub const fn sizes(&self) -> &SizeMap {
        &self.sizes
    }

    #[must_use]
    pub const fn config(&self) -> &LayoutConfig {
        self.calc.config()
    }

    #[must_use]
    pub const fn container_size(&self) -> Size {
        self.container
    }

    pub fn set_container_size(&mut self, size: Size) {
        if size == self.container {
            return;
        }
        self.container = size;
        self.recompute();
        self.emit(&LayoutEvent::ContainerResized { size });
    }

    /// Enter or leave move mode. An active resize is abandoned.
    pub fn set_move_mode(&mut self, move_mode: bool) {
        if move_mode == self.move_mode {
            return;
        }
        self.resize.abandon();
        self.move_mode = move_mode;
        tracing::debug!(message = "layout.engine.move_mode", enabled = move_mode);
        self.recompute();
    }

    #[must_use]
    pub const fn move_mode(&self) -> bool {
        self.move_mode
    }

    pub fn render<H: LayoutHost>(&self, host: &H) -> RenderFrame<H::Content> {
        LayoutRenderer {
            tree: &self.layout,
            sizes: &self.sizes,
            calc: &self.calc,
            move_mode: self.move_mode,
            session: self.resize.session(),
            last_move_button: self.last_move_button.as_deref(),
        }
        .render(host)
    }

    /// Start dragging `key`'s handle. Returns `false` for unknown keys and
    /// while in move mode, which shows no handles.
    pub fn begin_resize(&mut self, key: &str) -> bool {
        if self.move_mode {
            tracing::debug!(message = "layout.engine.resize_in_move_mode", key);
            return false;
        }
        self.resize
            .on_resize_start(&self.layout, key, &self.sizes, &self.calc, self.move_mode)
    }

    /// Apply the total drag delta and hand the new tree to the host.
    pub fn resize<H: LayoutHost>(&mut self, host: &mut H, handle: ResizeHandle, delta: Delta) -> bool {
        let Some(updated) = self.resize.on_resize(&self.layout, handle, delta) else {
            return false;
        };
        self.commit(host, updated);
        if let Some(key) = self.resize.session().map(|session| session.key.clone())
            && let Some(size) = self.sizes.get(&key)
        {
            self.emit(&LayoutEvent::Resizing { key, size });
        }
        true
    }

    /// Apply the final drag delta and end the session.
    pub fn end_resize<H: LayoutHost>(
        &mut self,
        host: &mut H,
        handle: ResizeHandle,
        delta: Delta,
    ) -> bool {
        let key = self.resize.session().map(|session| session.key.clone());
        let Some(updated) = self.resize.on_resize_stop(&self.layout, handle, delta) else {
            return false;
        };
        self.commit(host, updated);
        if let Some(key) = key
            && let Some(size) = self.sizes.get(&key)
        {
            self.emit(&LayoutEvent::Resized { key, size });
        }
        true
    }

    pub fn abandon_resize(&mut self) {
        self.resize.abandon();
    }

    #[must_use]
    pub const fn is_resizing(&self) -> bool {
        self.resize.is_resizing()
    }

    #[must_use]
    pub const fn resize_session(&self) -> Option<&ResizeSession> {
        self.resize.session()
    }

    /// Forward a move-button activation to the host and remember the button
    /// so the next frame can restore focus to it.
    pub fn click_move_button<H: LayoutHost>(
        &mut self,
        host: &mut H,
        key: &str,
        direction: MoveDirection,
    ) -> bool {
        if !self.layout.contains_key(key) {
            tracing::debug!(message = "layout.engine.unknown_button", key);
            return false;
        }
        let button_key = render::button_key(key, direction);
        self.last_move_button = Some(button_key.clone());
        host.on_move_button_click(MoveButtonClickEvent {
            direction,
            item_key: key.to_owned(),
            button_key,
        });
        true
    }

    #[must_use]
    pub fn can_move(&self, key: &str, direction: MoveDirection) -> bool {
        movement::can_move(&self.layout, key, direction)
    }

    #[must_use]
    pub fn available_moves(&self, key: &str) -> MoveAvailability {
        movement::available_moves(&self.layout, key)
    }

    /// Move `key` one step. Returns `false` if the move was not legal.
    pub fn perform_move(&mut self, key: &str, direction: MoveDirection) -> bool {
        let moved = movement::perform_move(&self.layout, key, direction);
        if moved.ptr_eq(&self.layout) {
            return false;
        }
        self.adopt(moved);
        self.emit(&LayoutEvent::Moved {
            key: key.to_owned(),
            direction,
        });
        true
    }

    pub fn subscribe(&mut self, listener: impl FnMut(&LayoutEvent) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if it was already gone.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(subscription, _)| *subscription != id);
        self.listeners.len() != before
    }

    fn commit<H: LayoutHost>(&mut self, host: &mut H, updated: LayoutTree) {
        self.adopt(updated.clone());
        host.on_resize(ResizeEvent { layout: updated });
    }

    fn adopt(&mut self, tree: LayoutTree) {
        self.layout = tree;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.sizes = self
            .calc
            .compute(&self.layout, self.container, Some(&self.sizes), self.move_mode);
    }

    fn emit(&mut self, event: &LayoutEvent) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }
}
