//! The viewport controller and the surface layout it works in.
//!
//! [`ViewportController`] ties the pieces together: it owns the primary and
//! camera-helper cameras with their orbit controllers, the render
//! scheduler, the compositor, the gizmo, and an event dispatcher, and it
//! drives them from platform callbacks (`animation_frame`, `handle_input`,
//! `resize`).

mod controller;
mod surface;

pub use controller::ViewportController;
pub use surface::{HostSurface, DEFAULT_GIZMO_DIM, DEFAULT_HELPER_FRACTION};
