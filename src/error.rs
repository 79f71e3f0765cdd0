//! Crate-level error types.

#[cfg(feature = "viewer")]
use crate::gpu::render_context::RenderContextError;
use crate::scene::NodeId;

/// Errors produced by the vantage crate.
#[derive(Debug, thiserror::Error)]
pub enum ViewportError {
    /// A gizmo axis tag outside `posX`/`posY`/`posZ`/`negX`/`negY`/`negZ`.
    #[error("invalid gizmo axis: {0:?}")]
    InvalidGizmoAxis(String),
    /// A viewport region with no drawable area.
    #[error("degenerate viewport region {width}x{height}")]
    DegenerateViewport {
        /// Region width in logical pixels.
        width: f32,
        /// Region height in logical pixels.
        height: f32,
    },
    /// Fit requested on a subtree with no geometry.
    #[error("bounding volume is empty")]
    EmptyBoundingVolume,
    /// Fit requested on a volume whose diagonal is zero.
    #[error("bounding volume has zero size")]
    DegenerateBoundingVolume,
    /// A node id that is not part of the scene.
    #[error("unknown scene node {0:?}")]
    UnknownNode(NodeId),
    /// TOML options parsing/serialization failure.
    #[error("options parse error: {0}")]
    OptionsParse(String),
    /// Generic I/O failure.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Viewer event-loop failure.
    #[error("viewer error: {0}")]
    Viewer(String),
    /// GPU context initialization failure.
    #[cfg(feature = "viewer")]
    #[error("GPU error: {0}")]
    Gpu(#[from] RenderContextError),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, ViewportError>;
