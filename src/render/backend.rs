//! Render backend boundary: the drawing operations the compositor and the
//! gizmo issue, independent of the graphics API.

use glam::Vec3;

use super::region::ViewportRegion;
use crate::camera::Camera;
use crate::gizmo::GizmoFrame;
use crate::util::color::Rgba;

/// Drawing-surface state shared by every kind of pass.
pub trait RenderTarget {
    /// Current drawing-buffer size in device pixels.
    fn drawing_buffer_size(&self) -> (u32, u32);

    /// Resize the drawing buffer. `pixel_ratio` maps the logical regions
    /// passed to the other calls onto device pixels.
    fn set_drawing_buffer_size(&mut self, width: u32, height: u32, pixel_ratio: f32);

    /// Enable or disable scissor clipping for subsequent draws.
    fn set_scissor_test(&mut self, enabled: bool);

    /// Scissor rectangle, used while the scissor test is enabled.
    fn set_scissor(&mut self, region: ViewportRegion);

    /// Viewport rectangle for subsequent draws.
    fn set_viewport(&mut self, region: ViewportRegion);

    /// The viewport most recently set.
    fn viewport(&self) -> ViewportRegion;

    /// Clear depth so following draws appear on top.
    fn clear_depth(&mut self);

    /// Draw the orientation gizmo into the current viewport.
    fn render_gizmo(&mut self, frame: &GizmoFrame);
}

/// A [`RenderTarget`] that can draw a scene of type `S`.
pub trait RenderBackend<S: ?Sized>: RenderTarget {
    /// Clear the current viewport to `pass.background` and draw the scene
    /// from `pass.camera`, plus the camera helper when it is visible.
    fn render_scene(&mut self, scene: &S, pass: &ScenePass<'_>);
}

/// Parameters of one scene draw.
#[derive(Debug, Clone, Copy)]
pub struct ScenePass<'a> {
    /// Camera the scene is seen through.
    pub camera: &'a Camera,
    /// Clear colour for the pass.
    pub background: Rgba,
    /// Frustum outline of the primary camera.
    pub helper: &'a CameraHelper,
}

/// Line outline of the primary camera's frustum, shown only in the
/// secondary view.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraHelper {
    /// Near corners then far corners, see [`Camera::frustum_corners`].
    pub corners: [Vec3; 8],
    /// Eye position of the tracked camera.
    pub eye: Vec3,
    /// Whether the outline is drawn.
    pub visible: bool,
    /// Line colour.
    pub color: [f32; 3],
}

impl Default for CameraHelper {
    fn default() -> Self {
        Self {
            corners: [Vec3::ZERO; 8],
            eye: Vec3::ZERO,
            visible: false,
            color: [1.0, 0.67, 0.0],
        }
    }
}

impl CameraHelper {
    /// Re-derive the outline from `camera`'s current pose and projection.
    pub fn update(&mut self, camera: &Camera) {
        self.corners = camera.frustum_corners();
        self.eye = camera.position;
    }

    /// Line segments of the outline: near rectangle, far rectangle, the
    /// four side edges, then the four edges from the eye to the near plane.
    #[must_use]
    pub fn segments(&self) -> Vec<(Vec3, Vec3)> {
        let c = &self.corners;
        let mut segments = Vec::with_capacity(16);
        for i in 0..4 {
            let next = (i + 1) % 4;
            segments.push((c[i], c[next]));
            segments.push((c[4 + i], c[4 + next]));
            segments.push((c[i], c[4 + i]));
            segments.push((self.eye, c[i]));
        }
        segments
    }
}
