//! Recording test doubles for the render backend and frame requester.

use std::cell::Cell;
use std::rc::Rc;

use crate::camera::Camera;
use crate::gizmo::GizmoFrame;
use crate::render::{
    FrameRequester, RenderBackend, RenderTarget, ScenePass, ViewportRegion,
};
use crate::util::color::Rgba;

/// Counts platform frame requests. Clones share the counter.
#[derive(Debug, Clone, Default)]
pub(crate) struct CountingRequester(Rc<Cell<u32>>);

impl CountingRequester {
    pub(crate) fn count(&self) -> u32 {
        self.0.get()
    }
}

impl FrameRequester for CountingRequester {
    fn request_frame(&self) {
        self.0.set(self.0.get() + 1);
    }
}

/// One state-changing backend call, in issue order.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum BackendCall {
    Resize(u32, u32),
    ScissorTest(bool),
    Scissor(ViewportRegion),
    Viewport(ViewportRegion),
    ClearDepth,
    Scene,
    Gizmo(ViewportRegion),
}

/// Snapshot of a scene draw.
#[derive(Debug, Clone)]
pub(crate) struct RecordedPass {
    pub(crate) camera: Camera,
    pub(crate) background: Rgba,
    pub(crate) helper_visible: bool,
    pub(crate) viewport: ViewportRegion,
    pub(crate) scissor: ViewportRegion,
    pub(crate) scissor_test: bool,
}

/// Backend that records calls instead of drawing.
#[derive(Debug, Default)]
pub(crate) struct RecordingBackend {
    pub(crate) size: (u32, u32),
    pub(crate) pixel_ratio: f32,
    pub(crate) scissor_test: bool,
    pub(crate) scissor: ViewportRegion,
    pub(crate) viewport: ViewportRegion,
    pub(crate) calls: Vec<BackendCall>,
    pub(crate) scene_passes: Vec<RecordedPass>,
    pub(crate) gizmo_frames: Vec<GizmoFrame>,
}

impl RecordingBackend {
    pub(crate) fn resize_count(&self) -> usize {
        self.calls
            .iter()
            .filter(|c| matches!(c, BackendCall::Resize(..)))
            .count()
    }
}

impl RenderTarget for RecordingBackend {
    fn drawing_buffer_size(&self) -> (u32, u32) {
        self.size
    }

    fn set_drawing_buffer_size(&mut self, width: u32, height: u32, pixel_ratio: f32) {
        self.size = (width, height);
        self.pixel_ratio = pixel_ratio;
        self.calls.push(BackendCall::Resize(width, height));
    }

    fn set_scissor_test(&mut self, enabled: bool) {
        self.scissor_test = enabled;
        self.calls.push(BackendCall::ScissorTest(enabled));
    }

    fn set_scissor(&mut self, region: ViewportRegion) {
        self.scissor = region;
        self.calls.push(BackendCall::Scissor(region));
    }

    fn set_viewport(&mut self, region: ViewportRegion) {
        self.viewport = region;
        self.calls.push(BackendCall::Viewport(region));
    }

    fn viewport(&self) -> ViewportRegion {
        self.viewport
    }

    fn clear_depth(&mut self) {
        self.calls.push(BackendCall::ClearDepth);
    }

    fn render_gizmo(&mut self, frame: &GizmoFrame) {
        self.calls.push(BackendCall::Gizmo(self.viewport));
        self.gizmo_frames.push(frame.clone());
    }
}

impl<S: ?Sized> RenderBackend<S> for RecordingBackend {
    fn render_scene(&mut self, _scene: &S, pass: &ScenePass<'_>) {
        self.calls.push(BackendCall::Scene);
        self.scene_passes.push(RecordedPass {
            camera: pass.camera.clone(),
            background: pass.background,
            helper_visible: pass.helper.visible,
            viewport: self.viewport,
            scissor: self.scissor,
            scissor_test: self.scissor_test,
        });
    }
}
