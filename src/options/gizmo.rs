use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::util::color::rgb_from_hex;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Orientation Gizmo", inline)]
#[serde(default)]
/// Orientation gizmo size, speed, and axis colours.
pub struct GizmoOptions {
    /// Side of the square host area in logical pixels.
    #[schemars(title = "Size", range(min = 64.0, max = 256.0), extend("step" = 8.0))]
    pub dim: f32,
    /// Reorientation speed in radians per second.
    #[schemars(skip)]
    pub turn_rate: f32,
    /// X axis colour.
    #[schemars(skip)]
    pub x_color: [f32; 3],
    /// Y axis colour.
    #[schemars(skip)]
    pub y_color: [f32; 3],
    /// Z axis colour.
    #[schemars(skip)]
    pub z_color: [f32; 3],
}

impl Default for GizmoOptions {
    fn default() -> Self {
        Self {
            dim: 128.0,
            turn_rate: crate::gizmo::TURN_RATE,
            x_color: rgb_from_hex(0xff_36_53),
            y_color: rgb_from_hex(0x8a_db_00),
            z_color: rgb_from_hex(0x2c_8f_ff),
        }
    }
}
