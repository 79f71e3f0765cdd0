//! Quaternion helpers shared by the camera and the orientation gizmo.

use glam::{Mat3, Quat, Vec3};

/// Nudge applied when the view direction is parallel to `up`.
const PARALLEL_NUDGE: f32 = 1.0e-4;

/// Orientation of an object at `eye` whose local −Z points at `target`,
/// with local +Y as close to `up` as possible.
///
/// When the view direction is parallel to `up` the direction is nudged
/// slightly (towards +Z, or +X when `up` is ±Z) so the basis stays defined.
/// Looking straight down from +Y therefore yields an up vector of −Z, and
/// looking up from −Y yields +Z.
pub fn look_at_rotation(eye: Vec3, target: Vec3, up: Vec3) -> Quat {
    let mut z = eye - target;
    if z.length_squared() == 0.0 {
        z = Vec3::Z;
    }
    z = z.normalize();

    let mut x = up.cross(z);
    if x.length_squared() == 0.0 {
        if up.z.abs() == 1.0 {
            z.x += PARALLEL_NUDGE;
        } else {
            z.z += PARALLEL_NUDGE;
        }
        z = z.normalize();
        x = up.cross(z);
    }
    let x = x.normalize_or(Vec3::X);
    let y = z.cross(x);

    Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize()
}

/// Angle in radians separating two unit quaternions.
pub fn angle_between(a: Quat, b: Quat) -> f32 {
    2.0 * a.dot(b).abs().clamp(-1.0, 1.0).acos()
}

/// Rotate `from` towards `to` by at most `max_step` radians.
///
/// Returns `to` exactly when the remaining angle fits within the step, so
/// callers can detect arrival with an equality test.
pub fn rotate_towards(from: Quat, to: Quat, max_step: f32) -> Quat {
    let angle = angle_between(from, to);
    if angle == 0.0 || max_step <= 0.0 {
        return from;
    }
    if max_step >= angle {
        return to;
    }
    from.slerp(to, max_step / angle)
}
