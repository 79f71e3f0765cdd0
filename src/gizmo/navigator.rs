use glam::{Mat4, Vec2, Vec3};

use super::axis::GizmoAxis;
use super::proxy::{AxisProxy, Pickable, Ray};
use super::state::GizmoState;
use crate::camera::Camera;
use crate::error::Result;
use crate::options::GizmoOptions;
use crate::render::{RenderTarget, ViewportRegion};

/// Half-width of the square the gizmo camera sees.
const VIEW_HALF_EXTENT: f32 = 2.0;
/// Gizmo camera distance from the gizmo origin, looking down −Z.
const EYE_DISTANCE: f32 = 2.0;
/// Far plane of the gizmo camera.
const FAR_PLANE: f32 = 4.0;
/// Length of the three positive axis bars.
const BAR_LENGTH: f32 = 0.8;
/// Opacity of the proxy facing away from the camera.
const BACK_OPACITY: f32 = 0.5;

/// Result of a click on the gizmo.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitTest {
    /// The click hit a proxy and a reorientation began.
    Started(GizmoAxis),
    /// The click hit nothing.
    Missed,
    /// A reorientation is already running; the click was ignored.
    Rejected,
}

/// Axis bar from the gizmo origin, in gizmo view space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisBar {
    /// Bar tip.
    pub end: Vec3,
    /// Bar colour.
    pub color: [f32; 3],
}

/// Everything a backend needs to draw the gizmo.
#[derive(Debug, Clone, PartialEq)]
pub struct GizmoFrame {
    /// Orthographic projection times the gizmo camera's view.
    pub view_projection: Mat4,
    /// +X, +Y, +Z bars.
    pub bars: [AxisBar; 3],
    /// Proxies sorted back to front.
    pub proxies: Vec<AxisProxy>,
}

/// On-screen orientation gizmo: six clickable axis proxies that swing the
/// camera to look along the chosen axis.
#[derive(Debug, Clone)]
pub struct GizmoNavigator {
    state: GizmoState,
    proxies: [AxisProxy; 6],
    axis_colors: [[f32; 3]; 3],
    dim: f32,
    turn_rate: f32,
}

impl GizmoNavigator {
    /// Build the gizmo from its options.
    #[must_use]
    pub fn new(options: &GizmoOptions) -> Self {
        let axis_colors = [options.x_color, options.y_color, options.z_color];
        Self {
            state: GizmoState::Idle,
            proxies: GizmoAxis::ALL
                .map(|axis| AxisProxy::new(axis, axis_colors[axis.component()])),
            axis_colors,
            dim: options.dim,
            turn_rate: options.turn_rate,
        }
    }

    /// Current animation state.
    #[must_use]
    pub fn state(&self) -> &GizmoState {
        &self.state
    }

    /// Whether a reorientation is running.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.state.is_animating()
    }

    /// Side length of the gizmo's host square in logical pixels.
    #[must_use]
    pub fn dim(&self) -> f32 {
        self.dim
    }

    /// The six proxies as of the last pick or render.
    #[must_use]
    pub fn proxies(&self) -> &[AxisProxy] {
        &self.proxies
    }

    /// Turn the proxies to match `camera` and fade the side of each axis
    /// that points away from the viewer.
    pub fn sync_to_camera(&mut self, camera: &Camera) {
        let rotation = camera.orientation.inverse();
        let backward = (camera.orientation * Vec3::Z).to_array();
        for proxy in &mut self.proxies {
            proxy.orient(rotation);
            let facing = backward[proxy.axis.component()] >= 0.0;
            proxy.opacity = if facing == proxy.axis.is_positive() {
                1.0
            } else {
                BACK_OPACITY
            };
        }
    }

    /// Nearest proxy under `pointer`, given in pixels from the top-left of
    /// the host square.
    pub fn pick(&mut self, pointer: Vec2, camera: &Camera) -> Option<GizmoAxis> {
        self.sync_to_camera(camera);
        let ndc = Vec2::new(
            (pointer.x / self.dim) * 2.0 - 1.0,
            -(pointer.y / self.dim) * 2.0 + 1.0,
        );
        let ray = Ray {
            origin: (ndc * VIEW_HALF_EXTENT).extend(EYE_DISTANCE),
            direction: Vec3::NEG_Z,
        };
        self.proxies
            .iter()
            .filter_map(|proxy| {
                proxy
                    .intersect(&ray)
                    .filter(|&t| t <= FAR_PLANE)
                    .map(|t| (t, proxy.axis))
            })
            .min_by(|a, b| a.0.total_cmp(&b.0))
            .map(|(_, axis)| axis)
    }

    /// Hit-test a click and, on a hit, start swinging `camera` around
    /// `focus`.
    pub fn handle_click(&mut self, pointer: Vec2, camera: &Camera, focus: Vec3) -> HitTest {
        if self.is_animating() {
            return HitTest::Rejected;
        }
        match self.pick(pointer, camera) {
            Some(axis) => self.reorient(axis, camera, focus),
            None => HitTest::Missed,
        }
    }

    /// Start swinging `camera` around `focus` to look along `axis`.
    pub fn reorient(&mut self, axis: GizmoAxis, camera: &Camera, focus: Vec3) -> HitTest {
        if self.is_animating() {
            log::debug!("gizmo: ignoring {axis} while reorienting");
            return HitTest::Rejected;
        }
        log::debug!("gizmo: reorienting to {axis}");
        self.state = GizmoState::begin(axis, camera, focus);
        HitTest::Started(axis)
    }

    /// [`reorient`](Self::reorient) by `posX`-style tag.
    ///
    /// # Errors
    ///
    /// [`ViewportError::InvalidGizmoAxis`](crate::error::ViewportError::InvalidGizmoAxis)
    /// for an unknown tag; no animation starts.
    pub fn reorient_to_tag(
        &mut self,
        tag: &str,
        camera: &Camera,
        focus: Vec3,
    ) -> Result<HitTest> {
        match GizmoAxis::from_tag(tag) {
            Ok(axis) => Ok(self.reorient(axis, camera, focus)),
            Err(e) => {
                log::error!("gizmo: {e}");
                Err(e)
            }
        }
    }

    /// Advance the reorientation by `dt` seconds and move `camera`.
    /// Returns whether the camera was moved.
    pub fn update(&mut self, dt: f32, camera: &mut Camera) -> bool {
        let (next, transform) = self.state.update(dt, self.turn_rate, camera.orientation);
        self.state = next;
        let Some(transform) = transform else {
            return false;
        };
        transform.apply(camera);
        if !self.is_animating() {
            log::debug!("gizmo: reorientation finished");
        }
        true
    }

    /// Drawing data for the current camera.
    pub fn frame(&mut self, camera: &Camera) -> GizmoFrame {
        self.sync_to_camera(camera);
        let rotation = camera.orientation.inverse();
        let projection = Mat4::orthographic_rh(
            -VIEW_HALF_EXTENT,
            VIEW_HALF_EXTENT,
            -VIEW_HALF_EXTENT,
            VIEW_HALF_EXTENT,
            0.0,
            FAR_PLANE,
        );
        let view = Mat4::from_translation(Vec3::new(0.0, 0.0, -EYE_DISTANCE));

        let bars = [GizmoAxis::PosX, GizmoAxis::PosY, GizmoAxis::PosZ].map(|axis| AxisBar {
            end: rotation * axis.direction() * BAR_LENGTH,
            color: self.axis_colors[axis.component()],
        });
        let mut proxies = self.proxies.to_vec();
        proxies.sort_by(|a, b| a.center.z.total_cmp(&b.center.z));

        GizmoFrame {
            view_projection: projection * view,
            bars,
            proxies,
        }
    }

    /// Draw the gizmo on top of whatever `target` holds, inside `region`,
    /// then restore the previous viewport.
    pub fn render_into<T: RenderTarget + ?Sized>(
        &mut self,
        target: &mut T,
        camera: &Camera,
        region: ViewportRegion,
    ) {
        let frame = self.frame(camera);
        let saved = target.viewport();
        target.clear_depth();
        target.set_viewport(region);
        target.render_gizmo(&frame);
        target.set_viewport(saved);
    }
}
