use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Camera Helper", inline)]
#[serde(default)]
/// Secondary "camera helper" view shown in the top-left quadrant.
pub struct HelperOptions {
    /// Vertical field of view in degrees.
    #[schemars(title = "Field of View", range(min = 20.0, max = 120.0), extend("step" = 1.0))]
    pub fovy: f32,
    /// Starting eye position.
    #[schemars(skip)]
    pub position: [f32; 3],
    /// Orbit target and initial look-at point.
    #[schemars(skip)]
    pub target: [f32; 3],
    /// Share of the host width and height given to the quadrant.
    #[schemars(title = "Quadrant Size", range(min = 0.2, max = 0.8), extend("step" = 0.05))]
    pub fraction: f32,
    /// Whether the helper view starts visible.
    #[schemars(title = "Show on Start")]
    pub visible: bool,
}

impl Default for HelperOptions {
    fn default() -> Self {
        Self {
            fovy: 75.0,
            position: [40.0, 10.0, 30.0],
            target: [0.0, 5.0, 0.0],
            fraction: 0.5,
            visible: false,
        }
    }
}
