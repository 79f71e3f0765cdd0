//! Standalone viewport window backed by winit and wgpu.
//!
//! ```no_run
//! # use vantage::{Viewer, scene::{Scene, SceneGraph, SceneObject}};
//! # use glam::Vec3;
//! let mut scene = Scene::new();
//! let _ = scene.add(SceneObject::cuboid("box", Vec3::ONE, [0.8, 0.8, 0.8]));
//! Viewer::builder()
//!     .with_scene(scene)
//!     .with_fit_on_start(true)
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::{ElementState, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::PhysicalKey,
    window::{Window, WindowId},
};

use crate::{
    error::ViewportError,
    gizmo::GizmoAxis,
    gpu::{RenderContext, WgpuBackend},
    input::{InputEvent, MouseButton},
    options::Options,
    render::FrameRequester,
    scene::Scene,
    util::frame_timing::FrameClock,
    viewport::{HostSurface, ViewportController},
};

/// Share of the monitor the window opens at.
const INITIAL_MONITOR_FRACTION: f64 = 0.75;
/// Scroll units per pixel of touchpad scroll.
const PIXEL_SCROLL_SCALE: f32 = 0.01;

/// [`FrameRequester`] that asks winit for a `RedrawRequested` event.
#[derive(Debug, Clone)]
pub struct WindowRequester(Arc<Window>);

impl FrameRequester for WindowRequester {
    fn request_frame(&self) {
        self.0.request_redraw();
    }
}

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    scene: Scene,
    options: Option<Options>,
    title: String,
    fit_on_start: bool,
    initial_view: Option<GizmoAxis>,
}

impl ViewerBuilder {
    /// Create a builder with an empty scene and default options.
    fn new() -> Self {
        Self {
            scene: Scene::new(),
            options: None,
            title: "Vantage".into(),
            fit_on_start: false,
            initial_view: None,
        }
    }

    /// Set the scene to show.
    #[must_use]
    pub fn with_scene(mut self, scene: Scene) -> Self {
        self.scene = scene;
        self
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Set the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Frame the whole scene once the window opens.
    #[must_use]
    pub fn with_fit_on_start(mut self, fit: bool) -> Self {
        self.fit_on_start = fit;
        self
    }

    /// Swing to an axis view once the window opens.
    #[must_use]
    pub fn with_initial_view(mut self, axis: GizmoAxis) -> Self {
        self.initial_view = Some(axis);
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        Viewer {
            scene: self.scene,
            options: self.options.unwrap_or_default(),
            title: self.title,
            fit_on_start: self.fit_on_start,
            initial_view: self.initial_view,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A standalone window showing a scene through a [`ViewportController`].
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    scene: Scene,
    options: Options,
    title: String,
    fit_on_start: bool,
    initial_view: Option<GizmoAxis>,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed.
    ///
    /// # Errors
    ///
    /// [`ViewportError::Viewer`] if the event loop cannot be created or
    /// exits with an error.
    pub fn run(self) -> Result<(), ViewportError> {
        let event_loop = EventLoop::new().map_err(|e| ViewportError::Viewer(e.to_string()))?;
        // Frames are only drawn when the viewport asks for one.
        event_loop.set_control_flow(ControlFlow::Wait);

        let mut app = ViewerApp {
            window: None,
            state: None,
            scene: Some(self.scene),
            options: self.options,
            title: self.title,
            fit_on_start: self.fit_on_start,
            initial_view: self.initial_view,
            clock: FrameClock::new(),
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| ViewportError::Viewer(e.to_string()))
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

struct ViewerState {
    viewport: ViewportController<Scene, WindowRequester>,
    backend: WgpuBackend,
}

/// Internal winit application handler.
struct ViewerApp {
    window: Option<Arc<Window>>,
    state: Option<ViewerState>,
    scene: Option<Scene>,
    options: Options,
    title: String,
    fit_on_start: bool,
    initial_view: Option<GizmoAxis>,
    clock: FrameClock,
}

/// Logical size of a physical window size.
fn logical_size(inner: PhysicalSize<u32>, scale: f64) -> (f32, f32) {
    let logical = inner.to_logical::<f64>(scale);
    (logical.width as f32, logical.height as f32)
}

impl ViewerApp {
    fn create_window(&self, event_loop: &ActiveEventLoop) -> Option<Arc<Window>> {
        let monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next());
        let mut attrs = Window::default_attributes()
            .with_title(&self.title)
            .with_transparent(self.options.display.alpha);
        if let Some(mon) = &monitor {
            let size = mon.size().to_logical::<f64>(mon.scale_factor());
            attrs = attrs.with_inner_size(winit::dpi::LogicalSize::new(
                size.width * INITIAL_MONITOR_FRACTION,
                size.height * INITIAL_MONITOR_FRACTION,
            ));
        }
        match event_loop.create_window(attrs) {
            Ok(window) => Some(Arc::new(window)),
            Err(e) => {
                log::error!("failed to create window: {e}");
                None
            }
        }
    }

    fn handle_input(&mut self, event: InputEvent) {
        if let Some(state) = &mut self.state {
            let _ = state.viewport.handle_input(event);
            self.clock.track(state.viewport.gizmo().is_animating());
        }
    }

    fn handle_key(&mut self, key: &str) {
        if let Some(state) = &mut self.state {
            let _ = state.viewport.handle_key(key);
            self.clock.track(state.viewport.gizmo().is_animating());
        }
    }

    fn redraw(&mut self) {
        let dt = self.clock.tick();
        let Some(state) = &mut self.state else {
            return;
        };
        let drawn = state.viewport.animation_frame(dt, &mut state.backend);
        self.clock.track(state.viewport.gizmo().is_animating());
        if !drawn {
            return;
        }
        match state.backend.present() {
            Ok(()) => {}
            Err(wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost) => {
                log::debug!("surface lost, reconfiguring");
                state.backend.recover_surface();
                let _ = state.viewport.request_render_if_not_requested();
            }
            Err(e) => log::error!("render error: {e:?}"),
        }
    }

    fn resize(&mut self) {
        let (Some(window), Some(state)) = (&self.window, &mut self.state) else {
            return;
        };
        let scale = window.scale_factor();
        let (width, height) = logical_size(window.inner_size(), scale);
        state.viewport.resize(width, height, scale as f32);
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        let Some(window) = self.create_window(event_loop) else {
            event_loop.exit();
            return;
        };

        let inner = window.inner_size();
        let scale = window.scale_factor();
        let context = match pollster::block_on(RenderContext::new(
            window.clone(),
            (inner.width, inner.height),
            self.options.display.alpha,
        )) {
            Ok(context) => context,
            Err(e) => {
                log::error!("failed to initialize GPU: {e}");
                event_loop.exit();
                return;
            }
        };
        let backend = WgpuBackend::new(context, scale as f32);

        let (width, height) = logical_size(inner, scale);
        let surface = HostSurface::from_options(width, height, scale as f32, &self.options);
        let scene = self.scene.take().unwrap_or_default();
        let mut viewport = ViewportController::new(
            scene,
            WindowRequester(window.clone()),
            surface,
            &self.options,
        );

        if self.fit_on_start {
            if let Err(e) = viewport.fit_all() {
                log::warn!("initial fit skipped: {e}");
            }
        }
        if let Some(axis) = self.initial_view {
            let _ = viewport.view_from(axis);
        }

        self.clock.restart();
        self.clock.track(viewport.gizmo().is_animating());
        self.window = Some(window);
        self.state = Some(ViewerState { viewport, backend });
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        if matches!(event, WindowEvent::CloseRequested) {
            if let Some(state) = &mut self.state {
                state.viewport.dispose();
            }
            event_loop.exit();
            return;
        }

        let Some(scale) = self.window.as_ref().map(|w| w.scale_factor()) else {
            return;
        };

        match event {
            WindowEvent::Resized(_) | WindowEvent::ScaleFactorChanged { .. } => self.resize(),

            WindowEvent::RedrawRequested => self.redraw(),

            WindowEvent::MouseInput { button, state, .. } => {
                self.handle_input(InputEvent::MouseButton {
                    button: MouseButton::from(button),
                    pressed: state == ElementState::Pressed,
                });
            }

            WindowEvent::CursorMoved { position, .. } => {
                let logical = position.to_logical::<f32>(scale);
                self.handle_input(InputEvent::CursorMoved {
                    x: logical.x,
                    y: logical.y,
                });
            }

            WindowEvent::MouseWheel { delta, .. } => {
                let delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * PIXEL_SCROLL_SCALE,
                };
                self.handle_input(InputEvent::Scroll { delta });
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                self.handle_input(InputEvent::ModifiersChanged {
                    shift: modifiers.state().shift_key(),
                });
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                self.handle_key(&format!("{code:?}"));
            }

            _ => (),
        }
    }
}
