//! Auto-framing: place the camera so a bounding volume fills the view.

use std::f32::consts::FRAC_PI_2;

use glam::Vec3;

use super::controller::OrbitController;
use super::core::Camera;
use crate::error::{Result, ViewportError};
use crate::scene::Aabb;

/// Upper bound for the far plane chosen by [`fit`].
pub const MAX_FAR_PLANE: f32 = 1000.0;

/// What [`fit`] chose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Framing {
    /// Center of the framed volume (new orbit target).
    pub center: Vec3,
    /// Diagonal length of the framed volume.
    pub size: f32,
    /// Camera-to-center distance.
    pub distance: f32,
}

/// Frame `volume` with `camera`, keeping the camera's current horizontal
/// heading, and constrain `controller` around it.
///
/// The vertical field of view covers exactly the volume's diagonal at the
/// center plane. Clip planes are re-derived from the volume size
/// (`far = min(3 * size, 1000)`, `near = far / 10`).
///
/// # Errors
///
/// [`ViewportError::EmptyBoundingVolume`] for an empty box and
/// [`ViewportError::DegenerateBoundingVolume`] for a box with zero
/// diagonal.
pub fn fit(
    volume: &Aabb,
    camera: &mut Camera,
    controller: &mut OrbitController,
) -> Result<Framing> {
    if volume.is_empty() {
        return Err(ViewportError::EmptyBoundingVolume);
    }
    let size = volume.diagonal();
    if !(size > 0.0 && size.is_finite()) {
        return Err(ViewportError::DegenerateBoundingVolume);
    }
    let center = volume.center();

    let half_fov = camera.fovy.to_radians() * 0.5;
    let distance = (size * 0.5) / half_fov.tan();

    // Horizontal heading only; straight above or below falls back to +Z.
    let direction = ((camera.position - center) * Vec3::new(1.0, 0.0, 1.0))
        .try_normalize()
        .unwrap_or(Vec3::Z);

    camera.position = center + direction * distance;
    camera.zfar = (size * 3.0).min(MAX_FAR_PLANE);
    camera.znear = camera.zfar / 10.0;
    camera.look_at(center);

    controller.max_distance = size * 2.0;
    controller.target = center;
    controller.max_polar_angle = FRAC_PI_2;

    log::debug!(
        "fit: center {center:?}, size {size:.3}, distance {distance:.3}, near {:.3}, far {:.3}",
        camera.znear,
        camera.zfar
    );

    Ok(Framing {
        center,
        size,
        distance,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::ScreenRect;

    const EPSILON: f32 = 1e-3;

    fn setup(position: Vec3) -> (Camera, OrbitController) {
        let mut camera = Camera::new(60.0, 2.0, 0.1, 100.0);
        camera.position = position;
        camera.look_at(Vec3::ZERO);
        let controller =
            OrbitController::new(Vec3::ZERO, ScreenRect::new(0.0, 0.0, 800.0, 400.0));
        (camera, controller)
    }

    #[test]
    fn diagonal_fills_vertical_field_of_view() {
        let (mut camera, mut controller) = setup(Vec3::new(0.0, 0.0, 10.0));
        let volume = Aabb::new(Vec3::new(1.0, 2.0, 3.0), Vec3::new(4.0, 6.0, 5.0));
        let framing = fit(&volume, &mut camera, &mut controller).unwrap();

        let d = (camera.position - volume.center()).length();
        let half_fov = camera.fovy.to_radians() * 0.5;
        assert!((framing.size * 0.5 - d * half_fov.tan()).abs() < EPSILON);
        assert!((framing.distance - d).abs() < EPSILON);
    }

    #[test]
    fn framed_cube_is_inside_the_frustum() {
        let (mut camera, mut controller) = setup(Vec3::new(3.0, 8.0, 10.0));
        let volume = Aabb::from_center_size(Vec3::new(5.0, -2.0, 1.0), Vec3::splat(4.0));
        let _ = fit(&volume, &mut camera, &mut controller).unwrap();
        assert!(camera.frustum().contains_aabb(&volume, 1e-4));
    }

    #[test]
    fn keeps_horizontal_heading_and_levels_the_camera() {
        let (mut camera, mut controller) = setup(Vec3::new(10.0, 50.0, 0.0));
        let volume = Aabb::from_center_size(Vec3::ZERO, Vec3::ONE);
        let _ = fit(&volume, &mut camera, &mut controller).unwrap();
        assert!(camera.position.y.abs() < EPSILON);
        assert!(camera.position.x > 0.0);
        assert!(camera.position.z.abs() < EPSILON);
        assert!((camera.forward() - Vec3::NEG_X).length() < EPSILON);
    }

    #[test]
    fn camera_straight_above_falls_back_to_positive_z() {
        let (mut camera, mut controller) = setup(Vec3::new(0.0, 20.0, 0.0));
        let volume = Aabb::from_center_size(Vec3::ZERO, Vec3::splat(2.0));
        let framing = fit(&volume, &mut camera, &mut controller).unwrap();
        assert!((camera.position - Vec3::Z * framing.distance).length() < EPSILON);
    }

    #[test]
    fn constrains_the_controller() {
        let (mut camera, mut controller) = setup(Vec3::new(0.0, 0.0, 10.0));
        let volume = Aabb::from_center_size(Vec3::new(1.0, 1.0, 1.0), Vec3::splat(2.0));
        let framing = fit(&volume, &mut camera, &mut controller).unwrap();
        assert_eq!(controller.target, volume.center());
        assert!((controller.max_distance - 2.0 * framing.size).abs() < EPSILON);
        assert!((controller.max_polar_angle - FRAC_PI_2).abs() < EPSILON);
    }

    #[test]
    fn clip_planes_follow_size_below_the_cap() {
        let (mut camera, mut controller) = setup(Vec3::new(0.0, 0.0, 10.0));
        let volume = Aabb::new(Vec3::ZERO, Vec3::new(3.0, 4.0, 0.0));
        let _ = fit(&volume, &mut camera, &mut controller).unwrap();
        assert!((camera.zfar - 15.0).abs() < EPSILON);
        assert!((camera.znear - 1.5).abs() < EPSILON);
    }

    #[test]
    fn far_plane_is_capped_for_large_volumes() {
        let (mut camera, mut controller) = setup(Vec3::new(0.0, 0.0, 10.0));
        let at_cap = Aabb::new(Vec3::ZERO, Vec3::new(0.0, 0.0, MAX_FAR_PLANE / 3.0));
        let _ = fit(&at_cap, &mut camera, &mut controller).unwrap();
        assert!((camera.zfar - MAX_FAR_PLANE).abs() < 0.01);

        let beyond = Aabb::new(Vec3::ZERO, Vec3::new(0.0, 0.0, 600.0));
        let _ = fit(&beyond, &mut camera, &mut controller).unwrap();
        assert_eq!(camera.zfar, MAX_FAR_PLANE);
        assert_eq!(camera.znear, MAX_FAR_PLANE / 10.0);
    }

    #[test]
    fn empty_and_point_volumes_are_rejected() {
        let (mut camera, mut controller) = setup(Vec3::new(0.0, 0.0, 10.0));
        let before = camera.clone();
        assert!(matches!(
            fit(&Aabb::EMPTY, &mut camera, &mut controller),
            Err(ViewportError::EmptyBoundingVolume)
        ));
        let point = Aabb::from_points([Vec3::ONE]);
        assert!(matches!(
            fit(&point, &mut camera, &mut controller),
            Err(ViewportError::DegenerateBoundingVolume)
        ));
        assert_eq!(camera, before);
    }
}
