//! Camera system for 3D scene viewing.
//!
//! A perspective camera, an orbit-style input controller, frustum
//! extraction, and bounding-volume auto-framing.

/// Orbit input controller: rotate, pan, and zoom around a target.
pub mod controller;
/// Core camera struct and matrix helpers.
pub mod core;
/// Bounding-volume auto-framing.
pub mod fit;
/// View frustum extraction and containment tests.
pub mod frustum;

pub use self::controller::OrbitController;
pub use self::core::Camera;
pub use self::fit::{fit, Framing};
pub use self::frustum::Frustum;
