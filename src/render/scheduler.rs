//! On-demand render coalescing.

/// Platform capability to schedule one call of the animation tick.
pub trait FrameRequester {
    /// Ask the platform for a future frame. Never blocks.
    fn request_frame(&self);
}

/// Coalesces any number of render requests into at most one pending
/// platform frame.
///
/// The pending flag is cleared when the render starts, so a request made
/// from inside a render schedules another frame instead of being lost.
#[derive(Debug)]
pub struct RenderScheduler<R> {
    requester: R,
    pending: bool,
    requested_frames: u64,
}

impl<R: FrameRequester> RenderScheduler<R> {
    /// Create an idle scheduler.
    pub fn new(requester: R) -> Self {
        Self {
            requester,
            pending: false,
            requested_frames: 0,
        }
    }

    /// Request a render. Returns `true` if this call scheduled a new
    /// platform frame, `false` if one was already pending.
    pub fn request_render(&mut self) -> bool {
        if self.pending {
            return false;
        }
        self.pending = true;
        self.requested_frames += 1;
        self.requester.request_frame();
        true
    }

    /// Whether a render has been requested and not yet started.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Mark the start of a render, clearing the pending flag. Returns
    /// whether a request was pending.
    pub fn begin_frame(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    /// Run `render` if a request is pending, clearing the flag first.
    /// Returns whether it ran.
    pub fn tick(&mut self, render: impl FnOnce(&mut Self)) -> bool {
        if !self.begin_frame() {
            return false;
        }
        render(self);
        true
    }

    /// Number of platform frames requested over the scheduler's lifetime.
    #[must_use]
    pub fn requested_frames(&self) -> u64 {
        self.requested_frames
    }
}
