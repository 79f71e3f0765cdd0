use std::f32::consts::{PI, TAU};

use glam::{Vec2, Vec3};

use super::core::Camera;
use crate::render::ScreenRect;

/// Smallest change treated as movement by [`OrbitController::update`].
const CHANGE_EPSILON: f32 = 1.0e-6;
/// Keeps the polar angle off the poles so `look_at` stays defined.
const POLE_MARGIN: f32 = 1.0e-6;
/// Distance factor per unit of zoom input.
const ZOOM_BASE: f32 = 0.95;

/// Orbit-style input controller: the camera circles `target` on a sphere.
///
/// Input calls accumulate deltas; [`update`](Self::update) applies them to
/// the camera, clamps distance and polar angle, and reports whether the
/// camera moved.
#[derive(Debug, Clone)]
pub struct OrbitController {
    /// Point the camera orbits and looks at.
    pub target: Vec3,
    /// Lower bound on the camera-to-target distance.
    pub min_distance: f32,
    /// Upper bound on the camera-to-target distance.
    pub max_distance: f32,
    /// Lower bound on the angle from +Y, in radians.
    pub min_polar_angle: f32,
    /// Upper bound on the angle from +Y, in radians.
    pub max_polar_angle: f32,
    /// Disabled controllers ignore input.
    pub enabled: bool,
    rotate_speed: f32,
    pan_speed: f32,
    zoom_speed: f32,
    /// Screen rectangle the controller receives input from.
    element: ScreenRect,
    theta_delta: f32,
    phi_delta: f32,
    scale: f32,
    pan_offset: Vec3,
}

impl OrbitController {
    /// Create an unconstrained controller orbiting `target`.
    #[must_use]
    pub fn new(target: Vec3, element: ScreenRect) -> Self {
        Self {
            target,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            enabled: true,
            rotate_speed: 1.0,
            pan_speed: 1.0,
            zoom_speed: 1.0,
            element,
            theta_delta: 0.0,
            phi_delta: 0.0,
            scale: 1.0,
            pan_offset: Vec3::ZERO,
        }
    }

    /// Builder: input sensitivities.
    #[must_use]
    pub fn with_speeds(mut self, rotate: f32, pan: f32, zoom: f32) -> Self {
        self.rotate_speed = rotate;
        self.pan_speed = pan;
        self.zoom_speed = zoom;
        self
    }

    /// Screen rectangle the controller listens on.
    #[must_use]
    pub fn element(&self) -> ScreenRect {
        self.element
    }

    /// Rebind to a new screen rectangle (after a resize).
    pub fn set_element(&mut self, element: ScreenRect) {
        self.element = element;
    }

    /// Whether input has been accumulated since the last update.
    #[must_use]
    pub fn has_pending_input(&self) -> bool {
        self.theta_delta != 0.0
            || self.phi_delta != 0.0
            || self.scale != 1.0
            || self.pan_offset != Vec3::ZERO
    }

    /// Orbit by a pointer drag of `delta` pixels. A drag across the full
    /// element height turns a full circle.
    pub fn rotate(&mut self, delta: Vec2) {
        if !self.enabled {
            return;
        }
        let height = self.element.height.max(1.0);
        self.theta_delta -= TAU * delta.x / height * self.rotate_speed;
        self.phi_delta -= TAU * delta.y / height * self.rotate_speed;
    }

    /// Slide the target in the camera plane so the point under the pointer
    /// follows a drag of `delta` pixels.
    pub fn pan(&mut self, delta: Vec2, camera: &Camera) {
        if !self.enabled {
            return;
        }
        let height = self.element.height.max(1.0);
        let distance = (camera.position - self.target).length();
        let half_extent = distance * (camera.fovy.to_radians() * 0.5).tan();
        let per_pixel = 2.0 * half_extent / height * self.pan_speed;
        self.pan_offset += camera.right() * (-delta.x * per_pixel)
            + camera.up() * (delta.y * per_pixel);
    }

    /// Dolly towards the target for positive `delta`, away for negative.
    pub fn zoom(&mut self, delta: f32) {
        if !self.enabled {
            return;
        }
        self.scale *= ZOOM_BASE.powf(delta * self.zoom_speed);
    }

    /// Apply accumulated input to `camera`, enforce the distance and polar
    /// constraints, and aim the camera at `target`.
    ///
    /// Returns `true` when the camera pose changed.
    pub fn update(&mut self, camera: &mut Camera) -> bool {
        let before_position = camera.position;
        let before_orientation = camera.orientation;

        let offset = camera.position - self.target;
        let mut radius = offset.length();
        let (mut theta, mut phi) = if radius > 0.0 {
            (offset.x.atan2(offset.z), (offset.y / radius).clamp(-1.0, 1.0).acos())
        } else {
            (0.0, PI * 0.5)
        };

        theta += self.theta_delta;
        phi += self.phi_delta;
        phi = phi
            .clamp(self.min_polar_angle, self.max_polar_angle)
            .clamp(POLE_MARGIN, PI - POLE_MARGIN);

        radius = (radius * self.scale).clamp(self.min_distance, self.max_distance);
        self.target += self.pan_offset;

        let sin_phi = phi.sin();
        let direction = Vec3::new(
            sin_phi * theta.sin(),
            phi.cos(),
            sin_phi * theta.cos(),
        );
        camera.position = self.target + direction * radius;
        camera.look_at(self.target);

        self.theta_delta = 0.0;
        self.phi_delta = 0.0;
        self.scale = 1.0;
        self.pan_offset = Vec3::ZERO;

        let moved = camera.position.distance_squared(before_position) > CHANGE_EPSILON;
        let turned =
            8.0 * (1.0 - camera.orientation.dot(before_orientation).abs()) > CHANGE_EPSILON;
        moved || turned
    }
}
