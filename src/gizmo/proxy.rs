//! Clickable axis proxies and the ray test they answer.

use glam::{Quat, Vec3};

use super::axis::GizmoAxis;

/// Distance a label sits in front of its disc, towards the gizmo camera.
const LABEL_LIFT: f32 = 0.01;

/// Half-line used for picking.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    /// Start point.
    pub origin: Vec3,
    /// Unit direction.
    pub direction: Vec3,
}

/// Something a [`Ray`] can hit.
pub trait Pickable {
    /// Distance along `ray` to the hit, if any.
    fn intersect(&self, ray: &Ray) -> Option<f32>;
}

/// Disc of the gizmo: a camera-facing sprite at unit distance on its axis.
#[derive(Debug, Clone, PartialEq)]
pub struct AxisProxy {
    /// Axis this proxy stands for.
    pub axis: GizmoAxis,
    /// Fill colour.
    pub color: [f32; 3],
    /// Current opacity, 1.0 or 0.5 depending on which side faces the
    /// camera.
    pub opacity: f32,
    /// Center in gizmo view space, after the inverse camera rotation.
    pub center: Vec3,
}

impl AxisProxy {
    /// Proxy for `axis` in the unrotated pose.
    #[must_use]
    pub fn new(axis: GizmoAxis, color: [f32; 3]) -> Self {
        Self {
            axis,
            color,
            opacity: 1.0,
            center: axis.direction(),
        }
    }

    /// Disc radius.
    #[must_use]
    pub fn radius(&self) -> f32 {
        0.5 * self.axis.proxy_scale()
    }

    /// Label strokes in gizmo view space, just in front of the disc and
    /// spanning most of it.
    pub fn label_segments(&self) -> impl Iterator<Item = [Vec3; 2]> {
        let origin = self.center + Vec3::Z * LABEL_LIFT;
        let scale = self.radius() * 2.0;
        self.axis
            .label_strokes()
            .iter()
            .map(move |stroke| stroke.map(|[x, y]| origin + Vec3::new(x, y, 0.0) * scale))
    }

    /// Place the proxy for a gizmo turned by `rotation`.
    pub fn orient(&mut self, rotation: Quat) {
        self.center = rotation * self.axis.direction();
    }
}

impl Pickable for AxisProxy {
    /// Sprites always face the viewer, so the disc lies in the plane
    /// through its center perpendicular to the ray.
    fn intersect(&self, ray: &Ray) -> Option<f32> {
        let t = (self.center - ray.origin).dot(ray.direction);
        if t < 0.0 {
            return None;
        }
        let closest = ray.origin + ray.direction * t;
        (closest.distance_squared(self.center) <= self.radius() * self.radius())
            .then_some(t)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ray_towards_negative_z(x: f32, y: f32) -> Ray {
        Ray {
            origin: Vec3::new(x, y, 2.0),
            direction: Vec3::NEG_Z,
        }
    }

    #[test]
    fn ray_through_center_hits_at_plane_distance() {
        let proxy = AxisProxy::new(GizmoAxis::PosZ, [1.0; 3]);
        let t = proxy.intersect(&ray_towards_negative_z(0.0, 0.0)).unwrap();
        assert!((t - 1.0).abs() < 1e-6);
    }

    #[test]
    fn edge_of_disc_depends_on_scale() {
        let positive = AxisProxy::new(GizmoAxis::PosX, [1.0; 3]);
        let negative = AxisProxy::new(GizmoAxis::NegX, [1.0; 3]);
        assert!(positive.intersect(&ray_towards_negative_z(1.45, 0.0)).is_some());
        assert!(positive.intersect(&ray_towards_negative_z(1.55, 0.0)).is_none());
        assert!(negative.intersect(&ray_towards_negative_z(-1.35, 0.0)).is_some());
        assert!(negative.intersect(&ray_towards_negative_z(-1.45, 0.0)).is_none());
    }

    #[test]
    fn proxies_behind_the_origin_are_missed() {
        let proxy = AxisProxy::new(GizmoAxis::PosZ, [1.0; 3]);
        let ray = Ray {
            origin: Vec3::new(0.0, 0.0, 3.0),
            direction: Vec3::Z,
        };
        assert!(proxy.intersect(&ray).is_none());
    }

    #[test]
    fn labels_sit_on_the_disc_facing_the_camera() {
        let mut proxy = AxisProxy::new(GizmoAxis::PosY, [1.0; 3]);
        proxy.orient(Quat::from_rotation_x(0.3));
        let segments: Vec<_> = proxy.label_segments().collect();
        assert_eq!(segments.len(), 3);
        for point in segments.iter().flatten() {
            assert!((point.z - proxy.center.z - LABEL_LIFT).abs() < 1e-6);
            assert!(point.truncate().distance(proxy.center.truncate()) < proxy.radius());
        }
        let unlabeled = AxisProxy::new(GizmoAxis::NegY, [1.0; 3]);
        assert_eq!(unlabeled.label_segments().count(), 0);
    }

    #[test]
    fn orient_rotates_center() {
        let mut proxy = AxisProxy::new(GizmoAxis::PosX, [1.0; 3]);
        proxy.orient(Quat::from_rotation_z(std::f32::consts::FRAC_PI_2));
        assert!((proxy.center - Vec3::Y).length() < 1e-6);
    }
}
