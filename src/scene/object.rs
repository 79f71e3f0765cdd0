//! Scene node payloads: transforms, geometry, and lights.

use glam::{Mat4, Quat, Vec3};

use super::bounds::Aabb;

/// Local transform of a scene node relative to its parent.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Translation in parent space.
    pub translation: Vec3,
    /// Rotation in parent space.
    pub rotation: Quat,
    /// Non-uniform scale applied before rotation.
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Transform {
    /// No translation, rotation, or scale.
    pub const IDENTITY: Self = Self {
        translation: Vec3::ZERO,
        rotation: Quat::IDENTITY,
        scale: Vec3::ONE,
    };

    /// Matrix mapping local coordinates to parent coordinates.
    #[must_use]
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(
            self.scale,
            self.rotation,
            self.translation,
        )
    }
}

/// What a node draws or contributes to the scene.
#[derive(Debug, Clone, PartialEq)]
pub enum Content {
    /// Pure grouping node.
    Group,
    /// Box centered on the node origin, drawn as its twelve edges.
    Cuboid {
        /// Full extents along each local axis.
        size: Vec3,
        /// Edge colour.
        color: [f32; 3],
    },
    /// Connected line strip in local coordinates.
    Polyline {
        /// Strip vertices.
        points: Vec<Vec3>,
        /// Line colour.
        color: [f32; 3],
    },
    /// Uniform light; has no extent.
    AmbientLight {
        /// Light colour.
        color: [f32; 3],
        /// Scalar intensity.
        intensity: f32,
    },
}

impl Content {
    /// Local-space bounds of the geometry. Empty for groups and lights.
    #[must_use]
    pub fn local_bounds(&self) -> Aabb {
        match self {
            Self::Cuboid { size, .. } => Aabb::from_center_size(Vec3::ZERO, *size),
            Self::Polyline { points, .. } => Aabb::from_points(points.iter().copied()),
            Self::Group | Self::AmbientLight { .. } => Aabb::EMPTY,
        }
    }
}

/// A node payload as handed to [`SceneGraph::add`](super::SceneGraph::add).
#[derive(Debug, Clone, PartialEq)]
pub struct SceneObject {
    /// Human-readable name, used in logs.
    pub name: String,
    /// Local transform.
    pub transform: Transform,
    /// Geometry or light.
    pub content: Content,
    /// Hidden nodes hide their whole subtree.
    pub visible: bool,
}

impl SceneObject {
    /// Create a visible object with an identity transform.
    pub fn new(name: impl Into<String>, content: Content) -> Self {
        Self {
            name: name.into(),
            transform: Transform::IDENTITY,
            content,
            visible: true,
        }
    }

    /// Empty grouping node.
    pub fn group(name: impl Into<String>) -> Self {
        Self::new(name, Content::Group)
    }

    /// Edge-drawn box.
    pub fn cuboid(name: impl Into<String>, size: Vec3, color: [f32; 3]) -> Self {
        Self::new(name, Content::Cuboid { size, color })
    }

    /// Line strip.
    pub fn polyline(
        name: impl Into<String>,
        points: Vec<Vec3>,
        color: [f32; 3],
    ) -> Self {
        Self::new(name, Content::Polyline { points, color })
    }

    /// Ambient light.
    pub fn ambient_light(color: [f32; 3], intensity: f32) -> Self {
        Self::new("ambient light", Content::AmbientLight { color, intensity })
    }

    /// Builder: set the translation.
    #[must_use]
    pub fn with_translation(mut self, translation: Vec3) -> Self {
        self.transform.translation = translation;
        self
    }

    /// Builder: set the rotation.
    #[must_use]
    pub fn with_rotation(mut self, rotation: Quat) -> Self {
        self.transform.rotation = rotation;
        self
    }

    /// Builder: set the scale.
    #[must_use]
    pub fn with_scale(mut self, scale: Vec3) -> Self {
        self.transform.scale = scale;
        self
    }
}
