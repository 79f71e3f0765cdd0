//! Reorientation state machine.

use glam::{Quat, Vec3};

use super::axis::GizmoAxis;
use crate::camera::Camera;
use crate::util::rotation::{angle_between, look_at_rotation, rotate_towards};

/// Remaining angle, in radians, below which a reorientation counts as
/// finished.
pub const CONVERGENCE_EPSILON: f32 = 1.0e-6;

/// Pose the camera should take after a tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraTransform {
    /// New world position.
    pub position: Vec3,
    /// New world orientation.
    pub orientation: Quat,
}

impl CameraTransform {
    /// Write the pose into `camera`.
    pub fn apply(&self, camera: &mut Camera) {
        camera.position = self.position;
        camera.orientation = self.orientation;
    }
}

/// An in-flight camera swing towards an axis view.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Reorientation {
    /// Axis being swung to.
    pub axis: GizmoAxis,
    /// Orbit orientation now; the camera sits on its +Z at `radius`.
    pub current: Quat,
    /// Final camera orientation.
    pub target: Quat,
    /// Final camera position.
    pub target_position: Vec3,
    /// Point the camera orbits.
    pub focus: Vec3,
    /// Camera-to-focus distance, kept for the whole swing.
    pub radius: f32,
}

/// Gizmo animation state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum GizmoState {
    /// Waiting for a click.
    #[default]
    Idle,
    /// Swinging the camera; clicks are rejected.
    Reorienting(Reorientation),
}

impl GizmoState {
    /// Start a swing of `camera` around `focus` towards the view from
    /// `axis`.
    #[must_use]
    pub fn begin(axis: GizmoAxis, camera: &Camera, focus: Vec3) -> Self {
        let radius = camera.position.distance(focus);
        Self::Reorienting(Reorientation {
            axis,
            current: look_at_rotation(camera.position, focus, Vec3::Y),
            target: axis.view_orientation(),
            target_position: axis.direction() * radius + focus,
            focus,
            radius,
        })
    }

    /// Whether a swing is in progress.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        matches!(self, Self::Reorienting(_))
    }

    /// Advance by `dt` seconds at `turn_rate` radians per second, given the
    /// camera's current orientation.
    ///
    /// Returns the next state and, while reorienting, the camera pose for
    /// this tick. The final tick snaps the camera exactly onto the target
    /// and returns [`GizmoState::Idle`].
    #[must_use]
    pub fn update(
        self,
        dt: f32,
        turn_rate: f32,
        camera_orientation: Quat,
    ) -> (Self, Option<CameraTransform>) {
        let Self::Reorienting(mut swing) = self else {
            return (Self::Idle, None);
        };
        let step = dt * turn_rate;

        swing.current = rotate_towards(swing.current, swing.target, step);
        let converged = swing.current == swing.target
            || angle_between(swing.current, swing.target) < CONVERGENCE_EPSILON;

        if converged {
            let transform = CameraTransform {
                position: swing.target_position,
                orientation: swing.target,
            };
            return (Self::Idle, Some(transform));
        }

        let transform = CameraTransform {
            position: swing.current * Vec3::Z * swing.radius + swing.focus,
            orientation: rotate_towards(camera_orientation, swing.target, step),
        };
        (Self::Reorienting(swing), Some(transform))
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::{FRAC_PI_2, TAU};

    use super::*;

    const DT: f32 = 1.0 / 60.0;

    fn camera_on_z(distance: f32) -> Camera {
        let mut camera = Camera::new(60.0, 1.0, 0.1, 100.0);
        camera.position = Vec3::new(0.0, 0.0, distance);
        camera.look_at(Vec3::ZERO);
        camera
    }

    #[test]
    fn idle_update_is_a_no_op() {
        let (state, transform) = GizmoState::Idle.update(DT, TAU, Quat::IDENTITY);
        assert_eq!(state, GizmoState::Idle);
        assert!(transform.is_none());
    }

    #[test]
    fn begin_records_target_pose() {
        let camera = camera_on_z(5.0);
        let focus = Vec3::new(1.0, 0.0, 0.0);
        let GizmoState::Reorienting(swing) = GizmoState::begin(GizmoAxis::PosY, &camera, focus)
        else {
            panic!("expected reorienting");
        };
        let radius = camera.position.distance(focus);
        assert!((swing.radius - radius).abs() < 1e-5);
        assert!((swing.target_position - (Vec3::Y * radius + focus)).length() < 1e-5);
        assert_eq!(swing.target, GizmoAxis::PosY.view_orientation());
        // The orbit pose starts where the camera is.
        assert!((swing.current * Vec3::Z * radius + focus - camera.position).length() < 1e-4);
    }

    #[test]
    fn quarter_turn_converges_within_sixteen_ticks() {
        let mut camera = camera_on_z(10.0);
        let mut state = GizmoState::begin(GizmoAxis::PosX, &camera, Vec3::ZERO);
        let target = GizmoAxis::PosX.view_orientation();
        let mut ticks = 0;

        while state.is_animating() {
            let GizmoState::Reorienting(swing) = state else {
                unreachable!()
            };
            // Still animating means the swing has not arrived yet.
            assert_ne!(swing.current, target);

            let (next, transform) = state.update(DT, TAU, camera.orientation);
            transform.unwrap().apply(&mut camera);
            state = next;
            ticks += 1;
            assert!(ticks <= 16, "did not converge in 16 ticks");
        }

        assert!(ticks >= 15, "converged too early after {ticks} ticks");
        assert_eq!(camera.orientation, target);
        assert!((camera.position - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-4);
    }

    #[test]
    fn camera_stays_on_the_orbit_sphere() {
        let mut camera = camera_on_z(4.0);
        let focus = Vec3::new(0.0, 1.0, 0.0);
        let mut state = GizmoState::begin(GizmoAxis::NegX, &camera, focus);
        let radius = camera.position.distance(focus);
        while state.is_animating() {
            let (next, transform) = state.update(DT, TAU, camera.orientation);
            transform.unwrap().apply(&mut camera);
            assert!((camera.position.distance(focus) - radius).abs() < 1e-3);
            state = next;
        }
    }

    #[test]
    fn zero_dt_stalls() {
        let camera = camera_on_z(10.0);
        let state = GizmoState::begin(GizmoAxis::PosX, &camera, Vec3::ZERO);
        let (next, transform) = state.update(0.0, TAU, camera.orientation);
        assert_eq!(next, state);
        assert!((transform.unwrap().position - camera.position).length() < 1e-4);
    }

    #[test]
    fn already_aligned_finishes_on_first_tick() {
        let camera = camera_on_z(10.0);
        let state = GizmoState::begin(GizmoAxis::PosZ, &camera, Vec3::ZERO);
        let (next, transform) = state.update(DT, TAU, camera.orientation);
        assert_eq!(next, GizmoState::Idle);
        assert_eq!(transform.unwrap().orientation, Quat::IDENTITY);
    }

    #[test]
    fn each_tick_turns_by_at_most_one_step() {
        let camera = camera_on_z(10.0);
        let mut state = GizmoState::begin(GizmoAxis::PosX, &camera, Vec3::ZERO);
        let step = DT * TAU;
        let mut previous = match state {
            GizmoState::Reorienting(swing) => swing.current,
            GizmoState::Idle => unreachable!(),
        };
        for _ in 0..5 {
            let (next, _) = state.update(DT, TAU, camera.orientation);
            let GizmoState::Reorienting(swing) = next else {
                break;
            };
            assert!(angle_between(previous, swing.current) <= step + 1e-4);
            previous = swing.current;
            state = next;
        }
        assert!(angle_between(previous, Quat::IDENTITY) < FRAC_PI_2);
    }
}
