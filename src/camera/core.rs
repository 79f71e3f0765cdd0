use glam::{Mat4, Quat, Vec3, Vec4};

use super::frustum::Frustum;
use crate::util::rotation::look_at_rotation;

/// Perspective camera defined by a world-space pose and projection
/// parameters. Looks down its local −Z axis with local +Y up.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    /// Eye (camera) position in world space.
    pub position: Vec3,
    /// World-space orientation.
    pub orientation: Quat,
    /// Viewport aspect ratio (width / height).
    pub aspect: f32,
    /// Vertical field of view in degrees.
    pub fovy: f32,
    /// Near clipping plane distance.
    pub znear: f32,
    /// Far clipping plane distance.
    pub zfar: f32,
}

impl Camera {
    /// Create a camera at the origin looking down −Z.
    #[must_use]
    pub fn new(fovy: f32, aspect: f32, znear: f32, zfar: f32) -> Self {
        Self {
            position: Vec3::ZERO,
            orientation: Quat::IDENTITY,
            aspect,
            fovy,
            znear,
            zfar,
        }
    }

    /// Turn the camera to face `target`, keeping world +Y up.
    pub fn look_at(&mut self, target: Vec3) {
        self.orientation = look_at_rotation(self.position, target, Vec3::Y);
    }

    /// Unit view direction.
    #[must_use]
    pub fn forward(&self) -> Vec3 {
        self.orientation * Vec3::NEG_Z
    }

    /// Unit up direction.
    #[must_use]
    pub fn up(&self) -> Vec3 {
        self.orientation * Vec3::Y
    }

    /// Unit right direction.
    #[must_use]
    pub fn right(&self) -> Vec3 {
        self.orientation * Vec3::X
    }

    /// World-to-view matrix.
    #[must_use]
    pub fn view_matrix(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.position)
            .inverse()
    }

    /// Projection matrix.
    #[must_use]
    pub fn build_projection(&self) -> Mat4 {
        // perspective_rh already uses [0,1] depth range (wgpu/Vulkan
        // convention)
        Mat4::perspective_rh(
            self.fovy.to_radians(),
            self.aspect,
            self.znear,
            self.zfar,
        )
    }

    /// Build the combined view-projection matrix.
    #[must_use]
    pub fn build_matrix(&self) -> Mat4 {
        self.build_projection() * self.view_matrix()
    }

    /// View frustum for the current pose and projection.
    #[must_use]
    pub fn frustum(&self) -> Frustum {
        Frustum::from_view_projection(self.build_matrix())
    }

    /// World-space corners of the view frustum: the four near-plane
    /// corners followed by the four far-plane corners, each in the order
    /// bottom-left, bottom-right, top-right, top-left.
    #[must_use]
    pub fn frustum_corners(&self) -> [Vec3; 8] {
        let inverse = self.build_matrix().inverse();
        let ndc = [
            (-1.0, -1.0),
            (1.0, -1.0),
            (1.0, 1.0),
            (-1.0, 1.0),
        ];
        let mut corners = [Vec3::ZERO; 8];
        for (depth_index, depth) in [0.0, 1.0].into_iter().enumerate() {
            for (i, (x, y)) in ndc.into_iter().enumerate() {
                let p = inverse * Vec4::new(x, y, depth, 1.0);
                corners[depth_index * 4 + i] = p.truncate() / p.w;
            }
        }
        corners
    }
}
