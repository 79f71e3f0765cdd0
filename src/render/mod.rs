//! When and where to draw: render coalescing, surface splitting, and the
//! backend boundary.

mod backend;
mod compositor;
mod region;
mod scheduler;

pub use backend::{CameraHelper, RenderBackend, RenderTarget, ScenePass};
pub use compositor::{CompositeReport, CompositeTargets, ViewportCompositor};
pub use region::{region_for, PhysicalRegion, ScreenRect, ViewportRegion};
pub use scheduler::{FrameRequester, RenderScheduler};
