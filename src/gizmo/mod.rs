//! Orientation gizmo: six axis proxies drawn in a corner of the primary
//! view. Clicking a proxy swings the primary camera around its orbit target
//! until it looks along that axis.
//!
//! The gizmo is a plain value. It draws through
//! [`RenderTarget`](crate::render::RenderTarget), answers picking through
//! [`Pickable`], and advances with the pure [`GizmoState::update`].

mod axis;
mod navigator;
mod proxy;
mod state;

pub use axis::GizmoAxis;
pub use navigator::{AxisBar, GizmoFrame, GizmoNavigator, HitTest};
pub use proxy::{AxisProxy, Pickable, Ray};
pub use state::{CameraTransform, GizmoState, Reorientation, CONVERGENCE_EPSILON};

/// Default turn rate of a reorientation, in radians per second.
pub const TURN_RATE: f32 = std::f32::consts::TAU;
