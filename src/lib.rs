// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![warn(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![warn(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! On-demand 3D viewport controller.
//!
//! Vantage draws a scene only when something changed, optionally splits the
//! surface into a full view plus a camera-helper picture-in-picture, frames
//! bounding volumes, and overlays an orientation gizmo whose axis proxies
//! swing the camera to look along the chosen axis.
//!
//! # Key entry points
//!
//! - [`viewport::ViewportController`] - owns cameras, controls, scheduler,
//!   compositor, gizmo and events, and is driven by platform callbacks
//! - [`render::RenderScheduler`] - coalesces render requests
//! - [`render::ViewportCompositor`] - single or dual-view composition
//! - [`camera::fit`] - auto-framing of a bounding box
//! - [`gizmo::GizmoNavigator`] - the orientation gizmo
//! - [`options::Options`] - TOML-backed configuration
//!
//! # Architecture
//!
//! The library core is free of any graphics API. It talks to the scene
//! through [`scene::SceneGraph`], to the GPU through
//! [`render::RenderBackend`], and to the platform's frame loop through
//! [`render::FrameRequester`]. The `viewer` feature adds a wgpu backend and
//! a winit window that implement those traits.

pub mod camera;
pub mod error;
pub mod event;
pub mod gizmo;
#[cfg(feature = "viewer")]
pub mod gpu;
pub mod input;
pub mod options;
pub mod render;
pub mod scene;
pub mod util;
#[cfg(feature = "viewer")]
pub mod viewer;
pub mod viewport;

#[cfg(test)]
mod testing;

pub use error::{Result, ViewportError};
pub use input::{InputEvent, KeyAction, MouseButton};
pub use options::Options;
#[cfg(feature = "viewer")]
pub use viewer::Viewer;
pub use viewport::{HostSurface, ViewportController};
