//! Splits one draw surface between the primary view and the optional
//! camera-helper picture-in-picture view.

use super::backend::{CameraHelper, RenderBackend, RenderTarget, ScenePass};
use super::region::{region_for, ScreenRect, ViewportRegion};
use crate::camera::Camera;
use crate::util::color::Rgba;

/// Cameras and rectangles for one composite frame.
#[derive(Debug)]
pub struct CompositeTargets<'a> {
    /// Whole draw surface.
    pub surface: ScreenRect,
    /// Primary camera, drawn across the whole surface.
    pub primary: &'a mut Camera,
    /// Secondary camera and the quadrant it draws into.
    pub secondary: Option<(&'a mut Camera, ScreenRect)>,
    /// Frustum outline of the primary camera.
    pub helper: &'a mut CameraHelper,
}

/// Which passes drew in a composite frame.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CompositeReport {
    /// The full-surface primary pass ran.
    pub primary: bool,
    /// The scissored secondary pass ran.
    pub secondary: bool,
}

/// Computes per-pass rectangles and issues the scene draws.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewportCompositor {
    /// Clear colour of the primary pass.
    pub background: Rgba,
    /// Clear colour of the secondary pass.
    pub helper_background: Rgba,
}

impl ViewportCompositor {
    /// Compositor with the given clear colours.
    #[must_use]
    pub fn new(background: Rgba, helper_background: Rgba) -> Self {
        Self {
            background,
            helper_background,
        }
    }

    /// Draw one composite frame.
    ///
    /// Scissoring is enabled exactly when `dual_mode` is on. The primary
    /// pass always covers the whole surface with the helper outline hidden
    /// and is followed by `overlay`. In dual mode, when a secondary camera
    /// exists, a second pass is clipped to its quadrant with the helper
    /// outline shown. Passes whose region has no area are skipped.
    pub fn render<S, B, F>(
        &self,
        backend: &mut B,
        scene: &S,
        dual_mode: bool,
        targets: CompositeTargets<'_>,
        overlay: F,
    ) -> CompositeReport
    where
        S: ?Sized,
        B: RenderBackend<S>,
        F: FnOnce(&mut B, &Camera),
    {
        let CompositeTargets {
            surface,
            primary,
            secondary,
            helper,
        } = targets;
        let mut report = CompositeReport::default();

        backend.set_scissor_test(dual_mode);

        if let Some(region) = drawable_region(surface, surface, "primary") {
            apply_region(backend, region, primary);
            helper.update(primary);
            helper.visible = false;
            backend.render_scene(
                scene,
                &ScenePass {
                    camera: &*primary,
                    background: self.background,
                    helper: &*helper,
                },
            );
            overlay(&mut *backend, &*primary);
            report.primary = true;
        }

        let Some((camera, quadrant)) = secondary.filter(|_| dual_mode) else {
            return report;
        };
        if let Some(region) = drawable_region(quadrant, surface, "secondary") {
            apply_region(backend, region, camera);
            helper.visible = true;
            backend.render_scene(
                scene,
                &ScenePass {
                    camera: &*camera,
                    background: self.helper_background,
                    helper: &*helper,
                },
            );
            report.secondary = true;
        }
        report
    }
}

fn drawable_region(
    element: ScreenRect,
    surface: ScreenRect,
    pass: &str,
) -> Option<ViewportRegion> {
    match region_for(element, surface).ensure_drawable() {
        Ok(region) => Some(region),
        Err(e) => {
            log::debug!("compositor: skipping {pass} pass: {e}");
            None
        }
    }
}

fn apply_region<T: RenderTarget + ?Sized>(
    backend: &mut T,
    region: ViewportRegion,
    camera: &mut Camera,
) {
    backend.set_scissor(region);
    backend.set_viewport(region);
    camera.aspect = region.aspect();
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::testing::{BackendCall, RecordingBackend};

    const SURFACE: ScreenRect = ScreenRect::new(0.0, 0.0, 800.0, 400.0);
    const QUADRANT: ScreenRect = ScreenRect::new(0.0, 0.0, 400.0, 200.0);

    fn compositor() -> ViewportCompositor {
        ViewportCompositor::new([0.0, 0.0, 0.0, 1.0], [0.0, 0.0, 0.25, 1.0])
    }

    fn cameras() -> (Camera, Camera) {
        let mut primary = Camera::new(60.0, 1.0, 0.1, 100.0);
        primary.position = Vec3::new(0.0, 0.0, 10.0);
        let mut secondary = Camera::new(75.0, 1.0, 0.05, 200.0);
        secondary.position = Vec3::new(40.0, 10.0, 30.0);
        secondary.look_at(Vec3::new(0.0, 5.0, 0.0));
        (primary, secondary)
    }

    #[test]
    fn single_mode_draws_once_without_scissor() {
        let (mut primary, mut secondary) = cameras();
        let mut helper = CameraHelper::default();
        let mut backend = RecordingBackend::default();
        let mut overlays = 0;

        let report = compositor().render(
            &mut backend,
            &(),
            false,
            CompositeTargets {
                surface: SURFACE,
                primary: &mut primary,
                secondary: Some((&mut secondary, QUADRANT)),
                helper: &mut helper,
            },
            |_, _| overlays += 1,
        );

        assert_eq!(report, CompositeReport { primary: true, secondary: false });
        assert_eq!(overlays, 1);
        assert_eq!(backend.scene_passes.len(), 1);
        assert!(!backend.scene_passes[0].helper_visible);
        assert!(!backend.scissor_test);
        assert_eq!(backend.calls[0], BackendCall::ScissorTest(false));
        assert!((primary.aspect - 2.0).abs() < 1e-6);
        // The secondary camera was not touched.
        assert!((secondary.aspect - 1.0).abs() < 1e-6);
    }

    #[test]
    fn dual_mode_adds_scissored_helper_pass() {
        let (mut primary, mut secondary) = cameras();
        let mut helper = CameraHelper::default();
        let mut backend = RecordingBackend::default();

        let report = compositor().render(
            &mut backend,
            &(),
            true,
            CompositeTargets {
                surface: SURFACE,
                primary: &mut primary,
                secondary: Some((&mut secondary, ScreenRect::new(0.0, 0.0, 400.0, 100.0))),
                helper: &mut helper,
            },
            |_, _| {},
        );

        assert_eq!(report, CompositeReport { primary: true, secondary: true });
        assert!(backend.scissor_test);
        let passes = &backend.scene_passes;
        assert_eq!(passes.len(), 2);
        assert!(!passes[0].helper_visible);
        assert!(passes[1].helper_visible);
        assert_eq!(passes[1].background, [0.0, 0.0, 0.25, 1.0]);
        assert_eq!(passes[1].viewport, ViewportRegion::new(0.0, 300.0, 400.0, 100.0));
        assert_eq!(passes[1].scissor, passes[1].viewport);
        assert!((secondary.aspect - 4.0).abs() < 1e-6);
        assert!((primary.aspect - 2.0).abs() < 1e-6);
    }

    #[test]
    fn dual_mode_without_secondary_camera_draws_primary_only() {
        let (mut primary, _) = cameras();
        let mut helper = CameraHelper::default();
        let mut backend = RecordingBackend::default();

        let report = compositor().render(
            &mut backend,
            &(),
            true,
            CompositeTargets {
                surface: SURFACE,
                primary: &mut primary,
                secondary: None,
                helper: &mut helper,
            },
            |_, _| {},
        );
        assert_eq!(report, CompositeReport { primary: true, secondary: false });
        assert!(backend.scissor_test);
    }

    #[test]
    fn degenerate_surface_skips_every_pass() {
        let (mut primary, mut secondary) = cameras();
        let mut helper = CameraHelper::default();
        let mut backend = RecordingBackend::default();
        let mut overlays = 0;

        let report = compositor().render(
            &mut backend,
            &(),
            true,
            CompositeTargets {
                surface: ScreenRect::new(0.0, 0.0, 800.0, 0.0),
                primary: &mut primary,
                secondary: Some((&mut secondary, QUADRANT)),
                helper: &mut helper,
            },
            |_, _| overlays += 1,
        );
        assert_eq!(report, CompositeReport::default());
        assert_eq!(overlays, 0);
        assert!(backend.scene_passes.is_empty());
        assert!((primary.aspect - 1.0).abs() < 1e-6);
    }

    #[test]
    fn helper_outline_follows_primary_camera() {
        let (mut primary, mut secondary) = cameras();
        let mut helper = CameraHelper::default();
        let mut backend = RecordingBackend::default();

        let _ = compositor().render(
            &mut backend,
            &(),
            true,
            CompositeTargets {
                surface: SURFACE,
                primary: &mut primary,
                secondary: Some((&mut secondary, QUADRANT)),
                helper: &mut helper,
            },
            |_, _| {},
        );
        assert_eq!(helper.eye, primary.position);
        assert_eq!(helper.corners, primary.frustum_corners());
    }
}
