use serde::{Deserialize, Serialize};

use crate::gizmo::GizmoAxis;

/// Viewport actions that can be bound to keys.
///
/// Serde serializes as `snake_case` strings so TOML presets stay readable:
/// ```toml
/// [keybindings.bindings]
/// fit_view = "KeyF"
/// toggle_camera_helper = "KeyH"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyAction {
    /// Frame everything in the scene.
    FitView,
    /// Show or hide the camera-helper view.
    ToggleCameraHelper,
    /// Return the primary camera to its starting pose.
    ResetCamera,
    /// Look from +X.
    ViewPosX,
    /// Look from +Y.
    ViewPosY,
    /// Look from +Z.
    ViewPosZ,
    /// Look from −X.
    ViewNegX,
    /// Look from −Y.
    ViewNegY,
    /// Look from −Z.
    ViewNegZ,
}

impl KeyAction {
    /// The gizmo axis an axis-view action swings to.
    #[must_use]
    pub fn gizmo_axis(self) -> Option<GizmoAxis> {
        match self {
            Self::ViewPosX => Some(GizmoAxis::PosX),
            Self::ViewPosY => Some(GizmoAxis::PosY),
            Self::ViewPosZ => Some(GizmoAxis::PosZ),
            Self::ViewNegX => Some(GizmoAxis::NegX),
            Self::ViewNegY => Some(GizmoAxis::NegY),
            Self::ViewNegZ => Some(GizmoAxis::NegZ),
            Self::FitView | Self::ToggleCameraHelper | Self::ResetCamera => None,
        }
    }
}
