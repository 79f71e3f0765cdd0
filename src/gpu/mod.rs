//! wgpu backend for the viewport (feature `viewer`).
//!
//! Provides device/surface initialization, growable upload buffers, the
//! depth target, and [`WgpuBackend`], which implements
//! [`RenderBackend`](crate::render::RenderBackend) for
//! [`Scene`](crate::scene::Scene).

/// Flat-colour scene, helper, and gizmo drawing.
pub mod backend;
/// Growable GPU buffers with automatic reallocation.
pub mod dynamic_buffer;
/// Pipeline and bind-group layout helpers.
pub mod pipeline_helpers;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
/// Depth attachment.
pub mod texture;

pub use backend::{ColorVertex, PixelRect, WgpuBackend};
pub use render_context::{RenderContext, RenderContextError};
