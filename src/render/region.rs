//! Screen rectangles and draw-surface viewport regions.

use glam::Vec2;

use crate::error::{Result, ViewportError};

/// Element rectangle in logical pixels with a top-left origin, as reported
/// by the host window layout.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenRect {
    /// Distance from the host's left edge.
    pub left: f32,
    /// Distance from the host's top edge.
    pub top: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl ScreenRect {
    /// Rectangle from its top-left corner and size.
    #[must_use]
    pub const fn new(left: f32, top: f32, width: f32, height: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
        }
    }

    /// Right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.left + self.width
    }

    /// Bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.top + self.height
    }

    /// Whether a pointer position falls inside (right/bottom exclusive).
    #[must_use]
    pub fn contains(&self, point: Vec2) -> bool {
        point.x >= self.left
            && point.x < self.right()
            && point.y >= self.top
            && point.y < self.bottom()
    }

    /// Pointer position relative to the top-left corner.
    #[must_use]
    pub fn to_local(&self, point: Vec2) -> Vec2 {
        point - Vec2::new(self.left, self.top)
    }
}

/// Drawing region in logical pixels with a bottom-left origin, the
/// convention used for scissor and viewport state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ViewportRegion {
    /// Offset from the surface's left edge.
    pub x: f32,
    /// Offset from the surface's bottom edge.
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

/// A [`ViewportRegion`] scaled to device pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PhysicalRegion {
    /// Offset from the surface's left edge.
    pub x: u32,
    /// Offset from the surface's bottom edge.
    pub y: u32,
    /// Width.
    pub width: u32,
    /// Height.
    pub height: u32,
}

impl ViewportRegion {
    /// Region from its bottom-left corner and size.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Width over height. Only meaningful for a drawable region.
    #[must_use]
    pub fn aspect(&self) -> f32 {
        self.width / self.height
    }

    /// Whether the region has no drawable area.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
            || !self.width.is_finite()
            || !self.height.is_finite()
    }

    /// Pass the region through when drawable.
    ///
    /// # Errors
    ///
    /// [`ViewportError::DegenerateViewport`] when the region has zero or
    /// non-finite width or height.
    pub fn ensure_drawable(self) -> Result<Self> {
        if self.is_degenerate() {
            Err(ViewportError::DegenerateViewport {
                width: self.width,
                height: self.height,
            })
        } else {
            Ok(self)
        }
    }

    /// Scale to device pixels, flooring each component.
    #[must_use]
    pub fn to_physical(&self, pixel_ratio: f32) -> PhysicalRegion {
        let scale = |v: f32| (v * pixel_ratio).floor().max(0.0) as u32;
        PhysicalRegion {
            x: scale(self.x),
            y: scale(self.y),
            width: scale(self.width),
            height: scale(self.height),
        }
    }

    /// Whether `other` lies entirely inside this region.
    #[must_use]
    pub fn encloses(&self, other: &Self) -> bool {
        other.x >= self.x
            && other.y >= self.y
            && other.x + other.width <= self.x + self.width
            && other.y + other.height <= self.y + self.height
    }
}

/// Region of `surface` covered by `element`, clamped to the surface and
/// flipped to a bottom-left origin.
///
/// The result never extends past the surface. Elements entirely outside
/// produce a degenerate region.
#[must_use]
pub fn region_for(element: ScreenRect, surface: ScreenRect) -> ViewportRegion {
    let right = element.right().min(surface.right()) - surface.left;
    let left = (element.left - surface.left).max(0.0);
    let bottom = element.bottom().min(surface.bottom()) - surface.top;
    let top = (element.top - surface.top).max(0.0);

    let width = (right - left).min(surface.width).max(0.0);
    let height = (bottom - top).min(surface.height).max(0.0);

    ViewportRegion {
        x: left.min(surface.width),
        y: (surface.height - bottom).clamp(0.0, surface.height),
        width,
        height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SURFACE: ScreenRect = ScreenRect::new(0.0, 0.0, 800.0, 600.0);

    fn assert_within_surface(region: ViewportRegion) {
        let bounds = ViewportRegion::new(0.0, 0.0, SURFACE.width, SURFACE.height);
        assert!(bounds.encloses(&region), "{region:?} escapes the surface");
    }

    #[test]
    fn full_surface_maps_to_itself() {
        let region = region_for(SURFACE, SURFACE);
        assert_eq!(region, ViewportRegion::new(0.0, 0.0, 800.0, 600.0));
        assert!((region.aspect() - 4.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn top_left_quadrant_flips_to_upper_half() {
        let quadrant = ScreenRect::new(0.0, 0.0, 400.0, 300.0);
        assert_eq!(
            region_for(quadrant, SURFACE),
            ViewportRegion::new(0.0, 300.0, 400.0, 300.0)
        );
    }

    #[test]
    fn bottom_right_square_sits_on_the_origin_row() {
        let square = ScreenRect::new(672.0, 472.0, 128.0, 128.0);
        assert_eq!(
            region_for(square, SURFACE),
            ViewportRegion::new(672.0, 0.0, 128.0, 128.0)
        );
    }

    #[test]
    fn overflowing_elements_are_clamped() {
        let cases = [
            ScreenRect::new(-100.0, -50.0, 300.0, 200.0),
            ScreenRect::new(700.0, 500.0, 500.0, 500.0),
            ScreenRect::new(-10.0, -10.0, 2000.0, 2000.0),
            ScreenRect::new(900.0, 100.0, 50.0, 50.0),
            ScreenRect::new(100.0, -300.0, 50.0, 50.0),
            ScreenRect::new(100.0, 700.0, 50.0, 50.0),
        ];
        for element in cases {
            assert_within_surface(region_for(element, SURFACE));
        }
    }

    #[test]
    fn element_outside_the_surface_is_degenerate() {
        let outside = ScreenRect::new(900.0, 100.0, 50.0, 50.0);
        let region = region_for(outside, SURFACE);
        assert!(region.is_degenerate());
        assert!(matches!(
            region.ensure_drawable(),
            Err(ViewportError::DegenerateViewport { .. })
        ));
    }

    #[test]
    fn offset_surface_is_relative() {
        let surface = ScreenRect::new(50.0, 20.0, 400.0, 300.0);
        let element = ScreenRect::new(50.0, 20.0, 200.0, 150.0);
        assert_eq!(
            region_for(element, surface),
            ViewportRegion::new(0.0, 150.0, 200.0, 150.0)
        );
    }

    #[test]
    fn zero_height_is_degenerate() {
        let region = ViewportRegion::new(0.0, 0.0, 100.0, 0.0);
        assert!(region.is_degenerate());
        assert!(ViewportRegion::new(0.0, 0.0, 1.0, 1.0).ensure_drawable().is_ok());
    }

    #[test]
    fn physical_region_floors_scaled_values() {
        let region = ViewportRegion::new(10.5, 0.0, 100.3, 50.0);
        assert_eq!(
            region.to_physical(2.0),
            PhysicalRegion {
                x: 21,
                y: 0,
                width: 200,
                height: 100,
            }
        );
    }

    #[test]
    fn rect_contains_is_half_open() {
        let rect = ScreenRect::new(10.0, 10.0, 10.0, 10.0);
        assert!(rect.contains(Vec2::new(10.0, 10.0)));
        assert!(!rect.contains(Vec2::new(20.0, 15.0)));
        assert_eq!(rect.to_local(Vec2::new(15.0, 12.0)), Vec2::new(5.0, 2.0));
    }
}
