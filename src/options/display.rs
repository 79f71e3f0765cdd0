use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::util::color::rgb_from_hex;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Display", inline)]
#[serde(default)]
/// Surface and scene defaults.
pub struct DisplayOptions {
    /// Add an ambient light to a fresh scene.
    #[schemars(title = "Ambient Light")]
    pub light: bool,
    /// Let the window surface composite with what is behind it, where the
    /// platform supports it. Views still clear to their opaque backgrounds.
    #[schemars(skip)]
    pub alpha: bool,
    /// Clear colour of the primary view.
    #[schemars(skip)]
    pub background: [f32; 3],
    /// Clear colour of the camera-helper view.
    #[schemars(skip)]
    pub helper_background: [f32; 3],
}

impl Default for DisplayOptions {
    fn default() -> Self {
        Self {
            light: true,
            alpha: true,
            background: [0.0, 0.0, 0.0],
            helper_background: rgb_from_hex(0x00_00_40),
        }
    }
}
