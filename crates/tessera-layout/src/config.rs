//! Engine-wide tuning values.

use serde::{Deserialize, Serialize};
use tessera_core::Size;

use crate::LayoutError;

/// Default floor for nodes without `minWidth`.
pub const DEFAULT_MIN_WIDTH: u32 = 40;

/// Default floor for nodes without `minHeight`.
pub const DEFAULT_MIN_HEIGHT: u32 = 40;

/// Pixels reserved on an edge that carries a drag bar.
pub const DEFAULT_DRAG_BAR_THICKNESS: u32 = 5;

/// Process-wide layout configuration.
///
/// Every field is optional in serialized form; missing fields take the
/// defaults above.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct LayoutConfig {
    pub default_min_width: u32,
    pub default_min_height: u32,
    pub drag_bar_thickness: u32,
}

impl LayoutConfig {
    /// Parse a configuration from JSON.
    pub fn from_json(json: &str) -> Result<Self, LayoutError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Default minimum as a size.
    #[must_use]
    pub const fn default_min_size(&self) -> Size {
        Size::new(self.default_min_width, self.default_min_height)
    }
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            default_min_width: DEFAULT_MIN_WIDTH,
            default_min_height: DEFAULT_MIN_HEIGHT,
            drag_bar_thickness: DEFAULT_DRAG_BAR_THICKNESS,
        }
    }
}
