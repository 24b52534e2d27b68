//! Error types for layout construction and validation.

use tessera_core::Axis;

/// Structural and decoding failures.
///
/// Structural variants indicate a host-side configuration bug: the layout
/// cannot be displayed safely and the engine keeps the previous tree.
#[derive(Debug, thiserror::Error)]
pub enum LayoutError {
    #[error("layout node without a key (parent: {})", parent.as_deref().unwrap_or("<root>"))]
    EmptyKey { parent: Option<String> },

    #[error("duplicate layout key {key:?}")]
    DuplicateKey { key: String },

    #[error("layout root {key:?} must be a container")]
    RootNotContainer { key: String },

    #[error("layout root {key:?} has no children")]
    EmptyRoot { key: String },

    #[error("container {key:?} does not declare a direction")]
    MissingDirection { key: String },

    #[error(
        "node {key:?} declares a {} but is the item that must fill container {container:?}",
        axis.dimension()
    )]
    AmbiguousSizing {
        key: String,
        container: String,
        axis: Axis,
    },

    #[error("invalid layout json: {0}")]
    Json(#[from] serde_json::Error),
}

impl LayoutError {
    /// Key of the offending node, when the error names one.
    #[must_use]
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::DuplicateKey { key }
            | Self::RootNotContainer { key }
            | Self::EmptyRoot { key }
            | Self::MissingDirection { key }
            | Self::AmbiguousSizing { key, .. } => Some(key),
            Self::EmptyKey { .. } | Self::Json(_) => None,
        }
    }
}
