#![forbid(unsafe_code)]

//! Resizable, nestable pane layout engine.
//!
//! A [`LayoutTree`] describes panes as a tree of rows and columns. The
//! engine computes a pixel size for every node, lets the user drag pane
//! edges ([`ResizeController`]) and relocate panes one step at a time
//! ([`perform_move`]), and hands the host a positioned [`RenderFrame`] to
//! draw.
//!
//! # Example
//!
//! ```
//! use tessera_layout::{
//!     LayoutConfig, LayoutDirection, LayoutEngine, LayoutNode, LayoutTree, Size,
//! };
//!
//! let tree = LayoutTree::new(LayoutNode::container(
//!     "root",
//!     LayoutDirection::Row,
//!     [
//!         LayoutNode::leaf("sidebar").with_width(200).resizable_right(),
//!         LayoutNode::leaf("main"),
//!     ],
//! ));
//! let engine = LayoutEngine::new(LayoutConfig::default(), tree, Size::new(1000, 600))?;
//! assert_eq!(engine.sizes().get("main"), Some(Size::new(800, 600)));
//! # Ok::<(), tessera_layout::LayoutError>(())
//! ```

pub mod config;
pub mod engine;
pub mod error;
pub mod movement;
pub mod node;
pub mod render;
pub mod resize;
pub mod sizes;
pub mod validate;

pub use config::LayoutConfig;
pub use engine::{LayoutEngine, LayoutEvent, SubscriptionId};
pub use error::LayoutError;
pub use movement::{
    MoveAvailability, MoveDirection, available_moves, can_move, can_move_at, perform_move,
};
pub use node::{LayoutDirection, LayoutNode, LayoutTree, NodePath, NodeVisit};
pub use render::{
    EnabledHandles, ItemRenderContext, LayoutHost, LayoutRenderer, MoveButtonClickEvent,
    MoveControls, RenderFrame, RenderedItem, ResizeEvent, button_key,
};
pub use resize::{ResizeController, ResizeHandle, ResizeSession};
pub use sizes::{SizeCalculator, SizeMap};
pub use tessera_core::{Axis, Delta, Rect, Size};
pub use validate::{normalize, normalize_container, validate};
