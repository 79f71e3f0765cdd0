use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera", inline)]
#[serde(default)]
/// Primary camera projection, starting pose, and orbit sensitivities.
pub struct CameraOptions {
    /// Vertical field of view in degrees.
    #[schemars(title = "Field of View", range(min = 20.0, max = 90.0), extend("step" = 1.0))]
    pub fovy: f32,
    /// Near clipping plane distance. Replaced on fit.
    #[schemars(skip)]
    pub znear: f32,
    /// Far clipping plane distance. Replaced on fit.
    #[schemars(skip)]
    pub zfar: f32,
    /// Starting eye position.
    #[schemars(skip)]
    pub position: [f32; 3],
    /// Starting orbit target.
    #[schemars(skip)]
    pub target: [f32; 3],
    /// Rotation sensitivity multiplier.
    #[schemars(title = "Rotate Speed", range(min = 0.1, max = 2.0), extend("step" = 0.05))]
    pub rotate_speed: f32,
    /// Pan sensitivity multiplier.
    #[schemars(title = "Pan Speed", range(min = 0.1, max = 2.0), extend("step" = 0.05))]
    pub pan_speed: f32,
    /// Zoom sensitivity multiplier.
    #[schemars(title = "Zoom Speed", range(min = 0.1, max = 2.0), extend("step" = 0.05))]
    pub zoom_speed: f32,
}

impl Default for CameraOptions {
    fn default() -> Self {
        Self {
            fovy: 60.0,
            znear: 0.1,
            zfar: 100.0,
            position: [0.0, 0.0, 10.0],
            target: [0.0, 0.0, 0.0],
            rotate_speed: 1.0,
            pan_speed: 1.0,
            zoom_speed: 1.0,
        }
    }
}
