//! The six gizmo axes and their fixed properties.

use std::f32::consts::{FRAC_PI_2, PI};
use std::fmt;
use std::str::FromStr;

use glam::{Quat, Vec3};

use crate::error::ViewportError;

const GLYPH_X: [[[f32; 2]; 2]; 2] = [
    [[-0.3, -0.4], [0.3, 0.4]],
    [[-0.3, 0.4], [0.3, -0.4]],
];
const GLYPH_Y: [[[f32; 2]; 2]; 3] = [
    [[-0.3, 0.4], [0.0, 0.0]],
    [[0.3, 0.4], [0.0, 0.0]],
    [[0.0, 0.0], [0.0, -0.4]],
];
const GLYPH_Z: [[[f32; 2]; 2]; 3] = [
    [[-0.3, 0.4], [0.3, 0.4]],
    [[0.3, 0.4], [-0.3, -0.4]],
    [[-0.3, -0.4], [0.3, -0.4]],
];

/// One of the six clickable axis directions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GizmoAxis {
    /// +X
    PosX,
    /// +Y
    PosY,
    /// +Z
    PosZ,
    /// −X
    NegX,
    /// −Y
    NegY,
    /// −Z
    NegZ,
}

impl GizmoAxis {
    /// All axes, positive first.
    pub const ALL: [Self; 6] = [
        Self::PosX,
        Self::PosY,
        Self::PosZ,
        Self::NegX,
        Self::NegY,
        Self::NegZ,
    ];

    /// Parse a `posX`-style tag.
    ///
    /// # Errors
    ///
    /// [`ViewportError::InvalidGizmoAxis`] for anything other than the six
    /// tags.
    pub fn from_tag(tag: &str) -> Result<Self, ViewportError> {
        Self::ALL
            .into_iter()
            .find(|axis| axis.tag() == tag)
            .ok_or_else(|| ViewportError::InvalidGizmoAxis(tag.to_owned()))
    }

    /// The `posX`-style tag.
    #[must_use]
    pub fn tag(self) -> &'static str {
        match self {
            Self::PosX => "posX",
            Self::PosY => "posY",
            Self::PosZ => "posZ",
            Self::NegX => "negX",
            Self::NegY => "negY",
            Self::NegZ => "negZ",
        }
    }

    /// Unit direction.
    #[must_use]
    pub fn direction(self) -> Vec3 {
        match self {
            Self::PosX => Vec3::X,
            Self::PosY => Vec3::Y,
            Self::PosZ => Vec3::Z,
            Self::NegX => Vec3::NEG_X,
            Self::NegY => Vec3::NEG_Y,
            Self::NegZ => Vec3::NEG_Z,
        }
    }

    /// Whether this is one of the positive axes.
    #[must_use]
    pub fn is_positive(self) -> bool {
        matches!(self, Self::PosX | Self::PosY | Self::PosZ)
    }

    /// 0, 1, or 2 for X, Y, or Z.
    #[must_use]
    pub fn component(self) -> usize {
        match self {
            Self::PosX | Self::NegX => 0,
            Self::PosY | Self::NegY => 1,
            Self::PosZ | Self::NegZ => 2,
        }
    }

    /// Line strokes spelling the proxy's label, in a unit box centred on
    /// the origin with +Y up. Only positive axes are labeled.
    #[must_use]
    pub fn label_strokes(self) -> &'static [[[f32; 2]; 2]] {
        match self {
            Self::PosX => &GLYPH_X,
            Self::PosY => &GLYPH_Y,
            Self::PosZ => &GLYPH_Z,
            Self::NegX | Self::NegY | Self::NegZ => &[],
        }
    }

    /// Proxy size relative to a positive proxy.
    #[must_use]
    pub fn proxy_scale(self) -> f32 {
        if self.is_positive() {
            1.0
        } else {
            0.8
        }
    }

    /// Camera orientation when viewing the focus point from this axis.
    ///
    /// Looking along ±Y has no natural up direction: from above the
    /// screen's up is −Z, from below it is +Z.
    #[must_use]
    pub fn view_orientation(self) -> Quat {
        match self {
            Self::PosX => Quat::from_rotation_y(FRAC_PI_2),
            Self::PosY => Quat::from_rotation_x(-FRAC_PI_2),
            Self::PosZ => Quat::IDENTITY,
            Self::NegX => Quat::from_rotation_y(-FRAC_PI_2),
            Self::NegY => Quat::from_rotation_x(FRAC_PI_2),
            Self::NegZ => Quat::from_rotation_y(PI),
        }
    }
}

impl fmt::Display for GizmoAxis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for GizmoAxis {
    type Err = ViewportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_tag(s)
    }
}
