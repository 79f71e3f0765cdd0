//! Logical layout of the host surface.

use crate::options::Options;
use crate::render::ScreenRect;

/// Default share of each dimension given to the camera-helper quadrant.
pub const DEFAULT_HELPER_FRACTION: f32 = 0.5;
/// Default gizmo host square side in logical pixels.
pub const DEFAULT_GIZMO_DIM: f32 = 128.0;

/// The element the viewport draws into, in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HostSurface {
    /// Logical width.
    pub logical_width: f32,
    /// Logical height.
    pub logical_height: f32,
    /// Device pixels per logical pixel.
    pub pixel_ratio: f32,
    /// Share of width and height taken by the helper quadrant.
    pub helper_fraction: f32,
    /// Gizmo host square side.
    pub gizmo_dim: f32,
}

impl HostSurface {
    /// Surface with the default helper fraction and gizmo size.
    #[must_use]
    pub fn new(logical_width: f32, logical_height: f32, pixel_ratio: f32) -> Self {
        Self {
            logical_width,
            logical_height,
            pixel_ratio,
            helper_fraction: DEFAULT_HELPER_FRACTION,
            gizmo_dim: DEFAULT_GIZMO_DIM,
        }
    }

    /// Surface whose quadrant and gizmo sizes come from `options`.
    #[must_use]
    pub fn from_options(
        logical_width: f32,
        logical_height: f32,
        pixel_ratio: f32,
        options: &Options,
    ) -> Self {
        Self::new(logical_width, logical_height, pixel_ratio).with_options(options)
    }

    /// Take the quadrant and gizmo sizes from `options`, keeping the size
    /// and pixel ratio.
    #[must_use]
    pub fn with_options(self, options: &Options) -> Self {
        Self {
            helper_fraction: options.helper.fraction,
            gizmo_dim: options.gizmo.dim,
            ..self
        }
    }

    /// Update the size after the host element changed.
    pub fn resize(&mut self, logical_width: f32, logical_height: f32, pixel_ratio: f32) {
        self.logical_width = logical_width;
        self.logical_height = logical_height;
        self.pixel_ratio = pixel_ratio;
    }

    /// The whole element.
    #[must_use]
    pub fn container(&self) -> ScreenRect {
        ScreenRect::new(0.0, 0.0, self.logical_width, self.logical_height)
    }

    /// Top-left quadrant used by the camera-helper view.
    #[must_use]
    pub fn helper_rect(&self) -> ScreenRect {
        ScreenRect::new(
            0.0,
            0.0,
            self.logical_width * self.helper_fraction,
            self.logical_height * self.helper_fraction,
        )
    }

    /// Bottom-right square hosting the gizmo.
    #[must_use]
    pub fn gizmo_rect(&self) -> ScreenRect {
        ScreenRect::new(
            self.logical_width - self.gizmo_dim,
            self.logical_height - self.gizmo_dim,
            self.gizmo_dim,
            self.gizmo_dim,
        )
    }

    /// Drawing-buffer size the surface wants, in device pixels.
    #[must_use]
    pub fn physical_size(&self) -> (u32, u32) {
        (
            (self.logical_width * self.pixel_ratio).floor().max(0.0) as u32,
            (self.logical_height * self.pixel_ratio).floor().max(0.0) as u32,
        )
    }

    /// Width over height of the whole element, if it has any height.
    #[must_use]
    pub fn aspect(&self) -> Option<f32> {
        (self.logical_height > 0.0).then(|| self.logical_width / self.logical_height)
    }
}
