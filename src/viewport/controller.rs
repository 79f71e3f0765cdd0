use glam::{Vec2, Vec3};

use super::surface::HostSurface;
use crate::camera::{fit, Camera, Framing, OrbitController};
use crate::error::Result;
use crate::event::{
    ControlsId, EventDispatcher, EventKind, ListenerId, ViewerAction, ViewerEvent,
};
use crate::gizmo::{GizmoAxis, GizmoNavigator, HitTest};
use crate::input::{InputCommand, InputEvent, InputLayout, InputProcessor, KeyAction};
use crate::options::{KeybindingOptions, Options};
use crate::render::{
    region_for, CameraHelper, CompositeReport, CompositeTargets, FrameRequester,
    RenderBackend, RenderScheduler, ViewportCompositor,
};
use crate::scene::{NodeId, SceneGraph, SceneObject};
use crate::util::color::with_alpha;

/// Intensity of the ambient light added when `display.light` is on.
const AMBIENT_INTENSITY: f32 = 1.0;

/// Camera-helper view: a second camera with its own orbit controller,
/// drawn into the top-left quadrant.
#[derive(Debug)]
struct SecondaryView {
    camera: Camera,
    controls: OrbitController,
}

/// Starting pose restored by [`KeyAction::ResetCamera`].
#[derive(Debug, Clone)]
struct InitialPose {
    camera: Camera,
    target: Vec3,
}

/// Interactive viewport over a scene graph.
///
/// Renders happen on demand: every state change calls
/// [`request_render_if_not_requested`](Self::request_render_if_not_requested),
/// and the platform's frame callback calls
/// [`animation_frame`](Self::animation_frame), which draws at most once.
pub struct ViewportController<S, R> {
    // --- Scene and surface ---
    scene: S,
    surface: HostSurface,

    // --- Cameras ---
    camera: Camera,
    controls: OrbitController,
    secondary: Option<SecondaryView>,
    helper: CameraHelper,
    helper_visible: bool,
    initial: InitialPose,

    // --- Drawing ---
    scheduler: RenderScheduler<R>,
    compositor: ViewportCompositor,
    gizmo: GizmoNavigator,

    // --- Input and events ---
    input: InputProcessor,
    keybindings: KeybindingOptions,
    events: EventDispatcher,
    listeners: Vec<ListenerId>,
    disposed: bool,
    options: Options,
}

impl<S: SceneGraph, R: FrameRequester> ViewportController<S, R> {
    /// Set up the viewport over `scene`.
    ///
    /// The helper quadrant and gizmo square of `surface` are resized to
    /// match `options`, so drawing, routing and hit-testing agree. The
    /// primary camera starts at the configured pose, with its aspect
    /// taken from the surface. When `display.light` is on an ambient light
    /// is added to the scene. A first render is requested.
    pub fn new(mut scene: S, requester: R, surface: HostSurface, options: &Options) -> Self {
        let surface = surface.with_options(options);
        let camera_opts = &options.camera;
        let target = Vec3::from_array(camera_opts.target);
        let mut camera = Camera::new(
            camera_opts.fovy,
            surface.aspect().unwrap_or(1.0),
            camera_opts.znear,
            camera_opts.zfar,
        );
        camera.position = Vec3::from_array(camera_opts.position);
        camera.look_at(target);

        let controls = OrbitController::new(target, surface.container()).with_speeds(
            camera_opts.rotate_speed,
            camera_opts.pan_speed,
            camera_opts.zoom_speed,
        );

        if options.display.light {
            let _ = scene.add(SceneObject::ambient_light([1.0; 3], AMBIENT_INTENSITY));
        }

        let compositor = ViewportCompositor::new(
            with_alpha(options.display.background, 1.0),
            with_alpha(options.display.helper_background, 1.0),
        );

        let mut events = EventDispatcher::new();
        let listeners = vec![
            events.add_listener(EventKind::ControlsChanged, |_| {
                Some(ViewerAction::RequestRender)
            }),
            events.add_listener(EventKind::Resized, |_| Some(ViewerAction::RequestRender)),
        ];

        let mut viewport = Self {
            scene,
            surface,
            initial: InitialPose {
                camera: camera.clone(),
                target,
            },
            camera,
            controls,
            secondary: None,
            helper: CameraHelper::default(),
            helper_visible: false,
            scheduler: RenderScheduler::new(requester),
            compositor,
            gizmo: GizmoNavigator::new(&options.gizmo),
            input: InputProcessor::new(),
            keybindings: options.keybindings.clone(),
            events,
            listeners,
            disposed: false,
            options: options.clone(),
        };
        if options.helper.visible {
            viewport.set_camera_helper_visible(true);
        }
        let _ = viewport.request_render_if_not_requested();
        log::debug!(
            "viewport: created {}x{} @{}",
            surface.logical_width,
            surface.logical_height,
            surface.pixel_ratio
        );
        viewport
    }

    // -----------------------------------------------------------------------
    // Rendering
    // -----------------------------------------------------------------------

    /// Ask for a render on the next platform frame. Returns whether a new
    /// frame was requested; `false` when one is already pending or the
    /// viewport has been disposed.
    pub fn request_render_if_not_requested(&mut self) -> bool {
        if self.disposed {
            return false;
        }
        self.scheduler.request_render()
    }

    /// Whether a render is pending.
    #[must_use]
    pub fn render_requested(&self) -> bool {
        self.scheduler.is_pending()
    }

    /// Draw one frame into `backend`.
    ///
    /// Clears the pending request first, so requests made while drawing
    /// schedule another frame. The drawing buffer is resized only when its
    /// size differs from the surface's physical size.
    pub fn render<B: RenderBackend<S>>(&mut self, backend: &mut B) -> CompositeReport {
        let _ = self.scheduler.begin_frame();

        let physical = self.surface.physical_size();
        if backend.drawing_buffer_size() != physical {
            backend.set_drawing_buffer_size(physical.0, physical.1, self.surface.pixel_ratio);
            if let Some(aspect) = self.surface.aspect() {
                self.camera.aspect = aspect;
            }
            log::debug!("viewport: drawing buffer resized to {}x{}", physical.0, physical.1);
        }

        let container = self.surface.container();
        let gizmo_region = region_for(self.surface.gizmo_rect(), container);
        let quadrant = self.surface.helper_rect();
        let gizmo = &mut self.gizmo;

        self.compositor.render(
            backend,
            &self.scene,
            self.helper_visible,
            CompositeTargets {
                surface: container,
                primary: &mut self.camera,
                secondary: self
                    .secondary
                    .as_mut()
                    .map(|view| (&mut view.camera, quadrant)),
                helper: &mut self.helper,
            },
            |backend, camera| gizmo.render_into(backend, camera, gizmo_region),
        )
    }

    /// Platform frame callback.
    ///
    /// Advances a running gizmo reorientation by `dt` seconds, then renders
    /// if a render was requested or the gizmo is animating. While the
    /// animation continues another frame is requested. Returns whether a
    /// frame was drawn.
    pub fn animation_frame<B: RenderBackend<S>>(&mut self, dt: f32, backend: &mut B) -> bool {
        let animating = self.gizmo.is_animating();
        if animating {
            let _ = self.gizmo.update(dt, &mut self.camera);
        }
        if !animating && !self.scheduler.is_pending() {
            return false;
        }
        let _ = self.render(backend);
        if self.gizmo.is_animating() {
            let _ = self.request_render_if_not_requested();
        }
        true
    }

    // -----------------------------------------------------------------------
    // Scene
    // -----------------------------------------------------------------------

    /// Add root-level objects and request a render.
    pub fn add_objects<I>(&mut self, objects: I) -> Vec<NodeId>
    where
        I: IntoIterator<Item = SceneObject>,
    {
        let ids: Vec<NodeId> = objects.into_iter().map(|o| self.scene.add(o)).collect();
        if !ids.is_empty() {
            let _ = self.request_render_if_not_requested();
        }
        ids
    }

    /// Frame the subtree rooted at `node` with the primary camera.
    ///
    /// # Errors
    ///
    /// [`ViewportError::UnknownNode`](crate::error::ViewportError::UnknownNode)
    /// when `node` is not in the scene, and the
    /// [`fit`](crate::camera::fit) errors for an empty or zero-size subtree.
    /// The camera is untouched on error.
    pub fn set_fit_view(&mut self, node: NodeId) -> Result<Framing> {
        let bounds = self.scene.bounding_box(node)?;
        let framing = fit(&bounds, &mut self.camera, &mut self.controls)?;
        let _ = self.request_render_if_not_requested();
        Ok(framing)
    }

    /// Frame everything in the scene.
    ///
    /// # Errors
    ///
    /// The [`fit`](crate::camera::fit) errors when the scene has no
    /// geometry.
    pub fn fit_all(&mut self) -> Result<Framing> {
        let bounds = self.scene.world_bounds();
        let framing = fit(&bounds, &mut self.camera, &mut self.controls)?;
        let _ = self.request_render_if_not_requested();
        Ok(framing)
    }

    // -----------------------------------------------------------------------
    // Camera helper
    // -----------------------------------------------------------------------

    /// Show or hide the camera-helper view.
    ///
    /// The first show creates the secondary camera and its controller; the
    /// same camera is reused by every later show.
    pub fn set_camera_helper_visible(&mut self, visible: bool) {
        if visible && self.secondary.is_none() {
            self.secondary = Some(self.create_secondary());
            log::debug!("viewport: camera helper created");
        }
        if self.helper_visible != visible {
            self.helper_visible = visible;
            self.input.release_capture();
            let _ = self.request_render_if_not_requested();
        }
    }

    /// Whether the camera-helper view is shown.
    #[must_use]
    pub fn camera_helper_visible(&self) -> bool {
        self.helper_visible
    }

    /// Flip the camera-helper view.
    pub fn toggle_camera_helper(&mut self) {
        self.set_camera_helper_visible(!self.helper_visible);
    }

    fn create_secondary(&self) -> SecondaryView {
        let helper = &self.options.helper;
        let target = Vec3::from_array(helper.target);
        let mut camera = Camera::new(
            helper.fovy,
            self.camera.aspect,
            self.camera.znear / 2.0,
            self.camera.zfar * 2.0,
        );
        camera.position = Vec3::from_array(helper.position);
        camera.look_at(target);
        let camera_opts = &self.options.camera;
        let controls = OrbitController::new(target, self.surface.helper_rect()).with_speeds(
            camera_opts.rotate_speed,
            camera_opts.pan_speed,
            camera_opts.zoom_speed,
        );
        SecondaryView { camera, controls }
    }

    // -----------------------------------------------------------------------
    // Gizmo
    // -----------------------------------------------------------------------

    /// Swing the primary camera to look along `axis` around the orbit
    /// target.
    pub fn view_from(&mut self, axis: GizmoAxis) -> HitTest {
        let hit = self.gizmo.reorient(axis, &self.camera, self.controls.target);
        self.after_reorient(hit);
        hit
    }

    /// [`view_from`](Self::view_from) by `posX`-style tag.
    ///
    /// # Errors
    ///
    /// [`ViewportError::InvalidGizmoAxis`](crate::error::ViewportError::InvalidGizmoAxis)
    /// for an unknown tag.
    pub fn view_from_tag(&mut self, tag: &str) -> Result<HitTest> {
        let hit = self
            .gizmo
            .reorient_to_tag(tag, &self.camera, self.controls.target)?;
        self.after_reorient(hit);
        Ok(hit)
    }

    fn after_reorient(&mut self, hit: HitTest) {
        if let HitTest::Started(axis) = hit {
            self.emit(ViewerEvent::GizmoReorient { axis });
            let _ = self.request_render_if_not_requested();
        }
    }

    // -----------------------------------------------------------------------
    // Input
    // -----------------------------------------------------------------------

    /// Feed a platform input event.
    ///
    /// Presses on the gizmo square are captured and hit-tested on release.
    /// Drags elsewhere go to the helper view's controller when the pointer
    /// started in its quadrant, otherwise to the primary controller.
    /// Returns whether the event moved a camera or started a swing.
    pub fn handle_input(&mut self, event: InputEvent) -> bool {
        if self.disposed {
            log::warn!("viewport: input after dispose ignored");
            return false;
        }
        let layout = self.input_layout();
        let Some(command) = self.input.handle_event(event, &layout) else {
            return false;
        };
        match command {
            InputCommand::GizmoClick { position } => {
                let hit = self.gizmo.handle_click(position, &self.camera, self.controls.target);
                self.after_reorient(hit);
                matches!(hit, HitTest::Started(_))
            }
            InputCommand::Rotate { controls, delta } => {
                self.drive(controls, |c, _| c.rotate(delta))
            }
            InputCommand::Pan { controls, delta } => {
                self.drive(controls, |c, camera| c.pan(delta, camera))
            }
            InputCommand::Zoom { controls, delta } => {
                self.drive(controls, |c, _| c.zoom(delta))
            }
        }
    }

    /// Run the action bound to `key` (a `KeyboardEvent.code`-style name).
    /// Returns whether the key is bound.
    pub fn handle_key(&mut self, key: &str) -> bool {
        let Some(action) = self.keybindings.lookup(key) else {
            return false;
        };
        if let Err(e) = self.execute(action) {
            log::warn!("viewport: {action:?} failed: {e}");
        }
        true
    }

    /// Run a key action.
    ///
    /// # Errors
    ///
    /// Framing errors from [`KeyAction::FitView`] on a scene without
    /// geometry.
    pub fn execute(&mut self, action: KeyAction) -> Result<()> {
        match action {
            KeyAction::FitView => {
                let _ = self.fit_all()?;
            }
            KeyAction::ToggleCameraHelper => self.toggle_camera_helper(),
            KeyAction::ResetCamera => self.reset_camera(),
            KeyAction::ViewPosX
            | KeyAction::ViewPosY
            | KeyAction::ViewPosZ
            | KeyAction::ViewNegX
            | KeyAction::ViewNegY
            | KeyAction::ViewNegZ => {
                if let Some(axis) = action.gizmo_axis() {
                    let _ = self.view_from(axis);
                }
            }
        }
        Ok(())
    }

    /// Put the primary camera back at its starting pose.
    pub fn reset_camera(&mut self) {
        if self.gizmo.is_animating() {
            log::debug!("viewport: reset ignored while reorienting");
            return;
        }
        self.camera = Camera {
            aspect: self.camera.aspect,
            ..self.initial.camera.clone()
        };
        let camera_opts = &self.options.camera;
        self.controls = OrbitController::new(self.initial.target, self.surface.container())
            .with_speeds(camera_opts.rotate_speed, camera_opts.pan_speed, camera_opts.zoom_speed);
        let _ = self.request_render_if_not_requested();
    }

    fn input_layout(&self) -> InputLayout {
        InputLayout {
            gizmo: self.surface.gizmo_rect(),
            helper: self.helper_visible.then(|| self.surface.helper_rect()),
        }
    }

    /// Apply one input to a controller, then update its camera and emit
    /// `ControlsChanged` if it moved.
    fn drive(
        &mut self,
        id: ControlsId,
        apply: impl FnOnce(&mut OrbitController, &Camera),
    ) -> bool {
        let (controls, camera) = match id {
            ControlsId::Primary => {
                // The swing owns the primary camera until it lands.
                if self.gizmo.is_animating() {
                    return false;
                }
                (&mut self.controls, &mut self.camera)
            }
            ControlsId::Secondary => match self.secondary.as_mut() {
                Some(view) => (&mut view.controls, &mut view.camera),
                None => return false,
            },
        };
        apply(&mut *controls, &*camera);
        if !controls.update(camera) {
            return false;
        }
        self.emit(ViewerEvent::ControlsChanged { controls: id });
        true
    }

    // -----------------------------------------------------------------------
    // Events and lifecycle
    // -----------------------------------------------------------------------

    fn emit(&mut self, event: ViewerEvent) {
        for action in self.events.dispatch(&event) {
            match action {
                ViewerAction::RequestRender => {
                    let _ = self.request_render_if_not_requested();
                }
            }
        }
    }

    /// The host element changed size or pixel ratio.
    pub fn resize(&mut self, logical_width: f32, logical_height: f32, pixel_ratio: f32) {
        self.surface.resize(logical_width, logical_height, pixel_ratio);
        self.controls.set_element(self.surface.container());
        if let Some(view) = self.secondary.as_mut() {
            view.controls.set_element(self.surface.helper_rect());
        }
        self.emit(ViewerEvent::Resized {
            width: logical_width,
            height: logical_height,
            pixel_ratio,
        });
    }

    /// Unsubscribe the viewport's listeners and stop requesting renders.
    /// The scene is left as is.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        for id in self.listeners.drain(..) {
            let _ = self.events.remove_listener(id);
        }
        self.disposed = true;
        log::debug!("viewport: disposed");
    }

    /// Whether [`dispose`](Self::dispose) has run.
    #[must_use]
    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    /// Give back the scene.
    pub fn into_scene(self) -> S {
        self.scene
    }

    // -----------------------------------------------------------------------
    // Accessors
    // -----------------------------------------------------------------------

    /// The whole host element in logical pixels.
    #[must_use]
    pub fn container(&self) -> crate::render::ScreenRect {
        self.surface.container()
    }

    /// Host surface layout.
    #[must_use]
    pub fn surface(&self) -> &HostSurface {
        &self.surface
    }

    /// Primary camera.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Mutable primary camera. Call
    /// [`request_render_if_not_requested`](Self::request_render_if_not_requested)
    /// after changing it.
    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    /// Camera-helper camera, once the helper has been shown.
    #[must_use]
    pub fn secondary_camera(&self) -> Option<&Camera> {
        self.secondary.as_ref().map(|view| &view.camera)
    }

    /// Primary orbit controller.
    #[must_use]
    pub fn controls(&self) -> &OrbitController {
        &self.controls
    }

    /// Camera-helper orbit controller, once the helper has been shown.
    #[must_use]
    pub fn secondary_controls(&self) -> Option<&OrbitController> {
        self.secondary.as_ref().map(|view| &view.controls)
    }

    /// Orientation gizmo.
    #[must_use]
    pub fn gizmo(&self) -> &GizmoNavigator {
        &self.gizmo
    }

    /// Scene graph.
    #[must_use]
    pub fn scene(&self) -> &S {
        &self.scene
    }

    /// Mutable scene graph. Call
    /// [`request_render_if_not_requested`](Self::request_render_if_not_requested)
    /// after changing it.
    pub fn scene_mut(&mut self) -> &mut S {
        &mut self.scene
    }

    /// Event dispatcher, for adding listeners.
    pub fn events_mut(&mut self) -> &mut EventDispatcher {
        &mut self.events
    }

    /// Render scheduler.
    #[must_use]
    pub fn scheduler(&self) -> &RenderScheduler<R> {
        &self.scheduler
    }

    /// Last known cursor position in logical pixels.
    #[must_use]
    pub fn cursor(&self) -> Vec2 {
        self.input.cursor()
    }
}

impl<S, R> std::fmt::Debug for ViewportController<S, R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewportController")
            .field("surface", &self.surface)
            .field("camera", &self.camera)
            .field("helper_visible", &self.helper_visible)
            .field("gizmo", &self.gizmo.state())
            .field("disposed", &self.disposed)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::rc::Rc;

    use super::*;
    use crate::error::ViewportError;
    use crate::gizmo::GizmoState;
    use crate::input::MouseButton;
    use crate::render::{ScreenRect, ViewportRegion};
    use crate::scene::Scene;
    use crate::testing::{BackendCall, CountingRequester, RecordingBackend};

    const DT: f32 = 1.0 / 60.0;
    const EPSILON: f32 = 1e-4;

    type TestViewport = ViewportController<Scene, CountingRequester>;

    fn viewport() -> (TestViewport, CountingRequester) {
        let requester = CountingRequester::default();
        let viewport = ViewportController::new(
            Scene::new(),
            requester.clone(),
            HostSurface::new(800.0, 600.0, 2.0),
            &Options::default(),
        );
        (viewport, requester)
    }

    /// Viewport whose initial render has already been drawn.
    fn settled() -> (TestViewport, CountingRequester, RecordingBackend) {
        let (mut viewport, requester) = viewport();
        let mut backend = RecordingBackend::default();
        assert!(viewport.animation_frame(DT, &mut backend));
        (viewport, requester, backend)
    }

    fn click(viewport: &mut TestViewport, x: f32, y: f32) -> bool {
        let _ = viewport.handle_input(InputEvent::CursorMoved { x, y });
        let _ = viewport.handle_input(InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: true,
        });
        viewport.handle_input(InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: false,
        })
    }

    fn drag(viewport: &mut TestViewport, from: Vec2, to: Vec2) -> bool {
        let _ = viewport.handle_input(InputEvent::CursorMoved { x: from.x, y: from.y });
        let _ = viewport.handle_input(InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: true,
        });
        let moved = viewport.handle_input(InputEvent::CursorMoved { x: to.x, y: to.y });
        let _ = viewport.handle_input(InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed: false,
        });
        moved
    }

    #[test]
    fn construction_requests_one_render_and_adds_light() {
        let (viewport, requester) = viewport();
        assert_eq!(requester.count(), 1);
        assert!(viewport.render_requested());
        assert_eq!(viewport.scene().ambient_light(), Some([1.0; 3]));
        assert_eq!(viewport.camera().position, Vec3::new(0.0, 0.0, 10.0));
    }

    #[test]
    fn requests_coalesce_until_the_frame_runs() {
        let (mut viewport, requester, mut backend) = settled();
        for _ in 0..10 {
            let _ = viewport.request_render_if_not_requested();
        }
        assert_eq!(requester.count(), 2);
        assert!(viewport.animation_frame(DT, &mut backend));
        assert!(!viewport.render_requested());
        assert!(!viewport.animation_frame(DT, &mut backend));
        assert_eq!(backend.scene_passes.len(), 2);
    }

    #[test]
    fn no_render_without_a_request() {
        let (mut viewport, _, mut backend) = settled();
        for _ in 0..5 {
            assert!(!viewport.animation_frame(DT, &mut backend));
        }
        assert_eq!(backend.scene_passes.len(), 1);
    }

    #[test]
    fn request_after_render_start_schedules_new_frame() {
        let (mut viewport, requester, mut backend) = settled();
        let _ = viewport.request_render_if_not_requested();
        let _ = viewport.render(&mut backend);
        // The flag was cleared at render start, so a new request goes out.
        assert!(viewport.request_render_if_not_requested());
        assert_eq!(requester.count(), 3);
    }

    #[test]
    fn render_resizes_buffer_only_when_size_differs() {
        let (mut viewport, _, mut backend) = settled();
        assert_eq!(backend.size, (1600, 1200));
        let _ = viewport.render(&mut backend);
        assert_eq!(backend.resize_count(), 1);

        viewport.resize(400.0, 100.0, 1.0);
        let _ = viewport.render(&mut backend);
        assert_eq!(backend.resize_count(), 2);
        assert_eq!(backend.size, (400, 100));
        assert!((viewport.camera().aspect - 4.0).abs() < EPSILON);
    }

    #[test]
    fn aspect_matches_surface_after_render() {
        let (viewport, _, backend) = settled();
        let expected = 800.0 / 600.0;
        assert!((viewport.camera().aspect - expected).abs() < EPSILON);
        assert_eq!(
            backend.scene_passes[0].viewport,
            ViewportRegion::new(0.0, 0.0, 800.0, 600.0)
        );
    }

    #[test]
    fn showing_the_helper_creates_secondary_camera() {
        let (mut viewport, _, mut backend) = settled();
        assert!(viewport.secondary_camera().is_none());
        viewport.toggle_camera_helper();
        assert!(viewport.camera_helper_visible());

        let primary = viewport.camera().clone();
        let secondary = viewport.secondary_camera().unwrap();
        assert!((secondary.aspect - primary.aspect).abs() < EPSILON);
        assert!((secondary.znear - primary.znear / 2.0).abs() < EPSILON);
        assert!((secondary.zfar - primary.zfar * 2.0).abs() < EPSILON);
        assert!((secondary.fovy - 75.0).abs() < EPSILON);
        assert_eq!(secondary.position, Vec3::new(40.0, 10.0, 30.0));
        assert_eq!(
            viewport.secondary_controls().unwrap().target,
            Vec3::new(0.0, 5.0, 0.0)
        );

        assert!(viewport.animation_frame(DT, &mut backend));
        let secondary = viewport.secondary_camera().unwrap();
        assert!((secondary.aspect - viewport.camera().aspect).abs() < EPSILON);
        let passes = &backend.scene_passes[1..];
        assert_eq!(passes.len(), 2);
        assert!(passes[1].helper_visible);
        assert!(passes[1].scissor_test);
        assert_eq!(passes[1].viewport, ViewportRegion::new(0.0, 300.0, 400.0, 300.0));
    }

    #[test]
    fn toggling_keeps_the_same_secondary_camera() {
        let (mut viewport, _, mut backend) = settled();
        viewport.toggle_camera_helper();
        let first: *const Camera = viewport.secondary_camera().unwrap();
        let before = viewport.secondary_camera().unwrap().clone();

        viewport.toggle_camera_helper();
        viewport.toggle_camera_helper();
        let _ = viewport.animation_frame(DT, &mut backend);

        let again = viewport.secondary_camera().unwrap();
        assert!(std::ptr::eq(first, again));
        assert_eq!(again.position, before.position);
        assert_eq!(again.orientation, before.orientation);
    }

    #[test]
    fn hiding_the_helper_disables_scissor() {
        let (mut viewport, _, mut backend) = settled();
        viewport.set_camera_helper_visible(true);
        let _ = viewport.animation_frame(DT, &mut backend);
        assert!(backend.scissor_test);

        viewport.set_camera_helper_visible(false);
        assert!(viewport.animation_frame(DT, &mut backend));
        assert!(!backend.scissor_test);
        assert!(!backend.scene_passes.last().unwrap().helper_visible);
    }

    #[test]
    fn setting_same_visibility_does_not_request() {
        let (mut viewport, requester, _) = settled();
        viewport.set_camera_helper_visible(false);
        assert_eq!(requester.count(), 1);
    }

    #[test]
    fn fit_view_frames_node_and_requests_render() {
        let (mut viewport, requester, _) = settled();
        let ids = viewport.add_objects([SceneObject::cuboid(
            "box",
            Vec3::new(2.0, 2.0, 2.0),
            [1.0, 1.0, 1.0],
        )
        .with_translation(Vec3::new(5.0, 0.0, 0.0))]);
        assert_eq!(requester.count(), 2);
        let _ = viewport.animation_frame(DT, &mut RecordingBackend::default());

        let framing = viewport.set_fit_view(ids[0]).unwrap();
        assert!(viewport.render_requested());
        assert_eq!(requester.count(), 3);
        assert!((framing.center - Vec3::new(5.0, 0.0, 0.0)).length() < EPSILON);
        let half_fov = viewport.camera().fovy.to_radians() * 0.5;
        assert!((framing.size * 0.5 - framing.distance * half_fov.tan()).abs() < EPSILON);
        assert_eq!(viewport.controls().target, framing.center);
    }

    #[test]
    fn fit_view_on_missing_node_fails() {
        let (mut viewport, _, _) = settled();
        let ids = viewport.add_objects([SceneObject::group("empty")]);
        let _ = viewport.scene_mut().remove(ids[0]);
        let before = viewport.camera().clone();
        assert!(matches!(
            viewport.set_fit_view(ids[0]),
            Err(ViewportError::UnknownNode(_))
        ));
        assert_eq!(*viewport.camera(), before);
    }

    #[test]
    fn drag_rotates_primary_and_requests_render() {
        let (mut viewport, requester, _) = settled();
        let before = viewport.camera().position;
        assert!(drag(&mut viewport, Vec2::new(400.0, 300.0), Vec2::new(450.0, 300.0)));
        assert_ne!(viewport.camera().position, before);
        assert_eq!(requester.count(), 2);
    }

    #[test]
    fn drag_in_helper_quadrant_moves_secondary_only() {
        let (mut viewport, _, _) = settled();
        viewport.set_camera_helper_visible(true);
        let primary = viewport.camera().clone();
        let secondary = viewport.secondary_camera().unwrap().position;

        assert!(drag(&mut viewport, Vec2::new(100.0, 100.0), Vec2::new(150.0, 120.0)));
        assert_eq!(*viewport.camera(), primary);
        assert_ne!(viewport.secondary_camera().unwrap().position, secondary);
    }

    #[test]
    fn controls_changed_reaches_user_listeners() {
        let (mut viewport, _, _) = settled();
        let seen = Rc::new(Cell::new(0));
        let counter = Rc::clone(&seen);
        let _ = viewport
            .events_mut()
            .add_listener(EventKind::ControlsChanged, move |_| {
                counter.set(counter.get() + 1);
                None
            });
        let _ = viewport.handle_input(InputEvent::Scroll { delta: 1.0 });
        assert_eq!(seen.get(), 1);
    }

    #[test]
    fn gizmo_click_swings_camera_to_axis() {
        let (mut viewport, requester, mut backend) = settled();
        // +X proxy sits at three quarters across the gizmo square.
        assert!(click(&mut viewport, 672.0 + 96.0, 472.0 + 64.0));
        assert!(viewport.gizmo().is_animating());
        assert_eq!(requester.count(), 2);

        let mut frames = 0;
        while viewport.animation_frame(DT, &mut backend) {
            frames += 1;
            assert!(frames <= 17, "swing did not settle");
        }
        assert_eq!(*viewport.gizmo().state(), GizmoState::Idle);
        assert!((viewport.camera().position - Vec3::new(10.0, 0.0, 0.0)).length() < EPSILON);
        assert!(backend
            .calls
            .iter()
            .any(|c| matches!(c, BackendCall::Gizmo(_))));
    }

    #[test]
    fn views_clear_to_opaque_backgrounds_on_a_transparent_surface() {
        let (mut viewport, _, mut backend) = settled();
        assert!(Options::default().display.alpha);
        assert_eq!(backend.scene_passes[0].background, [0.0, 0.0, 0.0, 1.0]);

        viewport.set_camera_helper_visible(true);
        assert!(viewport.animation_frame(DT, &mut backend));
        let helper = backend.scene_passes.last().unwrap();
        assert_eq!(helper.background, [0.0, 0.0, 64.0 / 255.0, 1.0]);
    }

    #[test]
    fn gizmo_size_follows_options_over_surface_default() {
        let mut options = Options::default();
        options.gizmo.dim = 96.0;
        let mut viewport = ViewportController::new(
            Scene::new(),
            CountingRequester::default(),
            HostSurface::new(800.0, 600.0, 2.0),
            &options,
        );
        assert_eq!(
            viewport.surface().gizmo_rect(),
            ScreenRect::new(704.0, 504.0, 96.0, 96.0)
        );
        // +X proxy of the smaller square: three quarters across, half down.
        assert!(click(&mut viewport, 704.0 + 72.0, 504.0 + 48.0));
        assert!(matches!(
            viewport.gizmo().state(),
            GizmoState::Reorienting(swing) if swing.axis == GizmoAxis::PosX
        ));
    }

    #[test]
    fn second_click_while_swinging_is_rejected() {
        let (mut viewport, _, _) = settled();
        assert!(click(&mut viewport, 768.0, 536.0));
        assert!(!click(&mut viewport, 768.0, 536.0));
    }

    #[test]
    fn gizmo_is_drawn_in_bottom_right_square() {
        let (_, _, backend) = settled();
        assert!(backend
            .calls
            .contains(&BackendCall::Gizmo(ViewportRegion::new(672.0, 0.0, 128.0, 128.0))));
        // The full viewport is restored after the gizmo.
        assert_eq!(backend.viewport, ViewportRegion::new(0.0, 0.0, 800.0, 600.0));
    }

    #[test]
    fn invalid_view_tag_is_an_error() {
        let (mut viewport, requester, _) = settled();
        assert!(matches!(
            viewport.view_from_tag("diagonal"),
            Err(ViewportError::InvalidGizmoAxis(_))
        ));
        assert!(!viewport.gizmo().is_animating());
        assert_eq!(requester.count(), 1);
    }

    #[test]
    fn keybindings_run_actions() {
        let (mut viewport, _, _) = settled();
        assert!(viewport.handle_key("KeyH"));
        assert!(viewport.camera_helper_visible());
        assert!(viewport.handle_key("Digit2"));
        assert!(viewport.gizmo().is_animating());
        assert!(!viewport.handle_key("KeyQ"));
        // Fit on a scene with only a light logs and keeps going.
        assert!(viewport.handle_key("KeyF"));
    }

    #[test]
    fn reset_restores_starting_pose() {
        let (mut viewport, _, _) = settled();
        let start = viewport.camera().clone();
        let _ = drag(&mut viewport, Vec2::new(400.0, 300.0), Vec2::new(500.0, 250.0));
        viewport.execute(KeyAction::ResetCamera).unwrap();
        assert_eq!(viewport.camera().position, start.position);
        assert_eq!(viewport.camera().orientation, start.orientation);
    }

    #[test]
    fn resize_updates_layout_and_requests_render() {
        let (mut viewport, requester, _) = settled();
        viewport.resize(1024.0, 768.0, 1.0);
        assert_eq!(viewport.container(), ScreenRect::new(0.0, 0.0, 1024.0, 768.0));
        assert_eq!(viewport.controls().element(), viewport.container());
        assert_eq!(requester.count(), 2);
    }

    #[test]
    fn dispose_stops_render_requests() {
        let (mut viewport, requester, _) = settled();
        viewport.dispose();
        assert!(viewport.is_disposed());
        assert_eq!(viewport.events_mut().listener_count(EventKind::ControlsChanged), 0);

        viewport.resize(640.0, 480.0, 1.0);
        assert!(!viewport.handle_input(InputEvent::Scroll { delta: 1.0 }));
        assert!(!viewport.request_render_if_not_requested());
        assert_eq!(requester.count(), 1);

        let ids = viewport.add_objects([SceneObject::group("kept")]);
        let scene = viewport.into_scene();
        assert!(scene.contains(ids[0]));
    }
}
