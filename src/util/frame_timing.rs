use web_time::{Duration, Instant};

/// Largest delta handed to animation code. A window that idled under
/// `ControlFlow::Wait` would otherwise report the whole idle gap.
const MAX_DELTA: Duration = Duration::from_millis(100);

/// Per-tick delta clock with a smoothed FPS readout.
pub struct FrameClock {
    /// Last tick timestamp
    last_tick: Instant,
    /// Upper bound for a single delta
    max_delta: Duration,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f32,
    /// Whether the last [`track`](FrameClock::track) saw an animation
    animating: bool,
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameClock {
    /// Create a clock whose first delta is measured from now.
    pub fn new() -> Self {
        Self {
            last_tick: Instant::now(),
            max_delta: MAX_DELTA,
            smoothed_fps: 60.0,
            smoothing: 0.05,
            animating: false,
        }
    }

    /// Seconds since the previous tick, clamped to the clock's maximum.
    pub fn tick(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_tick);
        self.last_tick = now;
        self.record(elapsed)
    }

    /// Restart the measurement without producing a delta.
    pub fn restart(&mut self) {
        self.last_tick = Instant::now();
    }

    /// Report whether an animation is running. The clock restarts when one
    /// starts after the loop has been idle, so the first animated tick
    /// measures from the start instead of the idle gap.
    pub fn track(&mut self, animating: bool) {
        if animating && !self.animating {
            self.restart();
        }
        self.animating = animating;
    }

    fn record(&mut self, elapsed: Duration) -> f32 {
        let frame_time = elapsed.as_secs_f32();
        if frame_time > 0.0 {
            let instant_fps = 1.0 / frame_time;
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }
        elapsed.min(self.max_delta).as_secs_f32()
    }

    /// Get the current FPS (smoothed)
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }
}
