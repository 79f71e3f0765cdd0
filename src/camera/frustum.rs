//! View frustum
//!
//! Extracts clip planes from a view-projection matrix. Used to verify that
//! framed volumes are fully visible.

use glam::{Mat4, Vec3, Vec4};

use crate::scene::Aabb;

/// A plane `n · p + d = 0` with unit normal pointing into the frustum.
#[derive(Debug, Clone, Copy)]
pub struct Plane {
    /// Unit normal pointing into the positive half-space.
    pub normal: Vec3,
    /// Signed offset from the origin.
    pub distance: f32,
}

impl Plane {
    fn from_row(row: Vec4) -> Self {
        let len = row.truncate().length();
        if len > 0.0 {
            Self {
                normal: row.truncate() / len,
                distance: row.w / len,
            }
        } else {
            Self {
                normal: Vec3::ZERO,
                distance: 0.0,
            }
        }
    }

    /// Signed distance from point to plane (positive = inside).
    #[inline]
    pub fn distance_to_point(&self, point: Vec3) -> f32 {
        self.normal.dot(point) + self.distance
    }
}

/// View frustum consisting of 6 planes
#[derive(Debug, Clone)]
pub struct Frustum {
    /// Six clipping planes: left, right, bottom, top, near, far.
    pub planes: [Plane; 6],
}

impl Frustum {
    /// Extract inward-facing planes from a view-projection matrix with a
    /// `[0, 1]` depth range (Gribb/Hartmann).
    pub fn from_view_projection(vp: Mat4) -> Self {
        let t = vp.transpose();
        let (r0, r1, r2, r3) = (t.x_axis, t.y_axis, t.z_axis, t.w_axis);

        Self {
            planes: [
                Plane::from_row(r3 + r0),
                Plane::from_row(r3 - r0),
                Plane::from_row(r3 + r1),
                Plane::from_row(r3 - r1),
                Plane::from_row(r2),
                Plane::from_row(r3 - r2),
            ],
        }
    }

    /// Test if a point is inside the frustum, allowing `tolerance` of slack
    /// on every plane.
    #[inline]
    pub fn contains_point(&self, point: Vec3, tolerance: f32) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance_to_point(point) >= -tolerance)
    }

    /// Test if a sphere intersects or is inside the frustum
    #[inline]
    pub fn intersects_sphere(&self, center: Vec3, radius: f32) -> bool {
        self.planes
            .iter()
            .all(|plane| plane.distance_to_point(center) >= -radius)
    }

    /// Whether all eight corners of `aabb` are inside.
    pub fn contains_aabb(&self, aabb: &Aabb, tolerance: f32) -> bool {
        !aabb.is_empty()
            && aabb
                .corners()
                .into_iter()
                .all(|c| self.contains_point(c, tolerance))
    }
}
