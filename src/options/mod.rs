//! Viewport options with TOML preset support.
//!
//! Camera, camera-helper, gizmo, display, and keybinding settings live
//! here. Options serialize to/from TOML; every section uses
//! `#[serde(default)]` so partial files work.

mod camera;
mod display;
mod gizmo;
mod helper;
mod keybindings;

use std::path::Path;

pub use camera::CameraOptions;
pub use display::DisplayOptions;
pub use gizmo::GizmoOptions;
pub use helper::HelperOptions;
pub use keybindings::KeybindingOptions;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::ViewportError;

/// Top-level options container. All sub-structs use `#[serde(default)]` so
/// partial TOML files (e.g. only overriding `[gizmo]`) work correctly.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct Options {
    /// Primary camera projection and control parameters.
    pub camera: CameraOptions,
    /// Camera-helper view parameters.
    pub helper: HelperOptions,
    /// Orientation gizmo parameters.
    pub gizmo: GizmoOptions,
    /// Surface and scene defaults.
    pub display: DisplayOptions,
    /// Keyboard binding options.
    #[schemars(skip)]
    pub keybindings: KeybindingOptions,
}

impl Options {
    /// Generate JSON Schema describing the UI-exposed options.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(Options)
    }

    /// Parse options from TOML text. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// [`ViewportError::OptionsParse`] for malformed TOML.
    pub fn from_toml_str(content: &str) -> Result<Self, ViewportError> {
        toml::from_str(content)
            .map_err(|e| ViewportError::OptionsParse(e.to_string()))
    }

    /// Load options from a TOML file. Missing fields use defaults.
    ///
    /// # Errors
    ///
    /// [`ViewportError::Io`] if the file cannot be read and
    /// [`ViewportError::OptionsParse`] for malformed TOML.
    pub fn load(path: &Path) -> Result<Self, ViewportError> {
        let content = std::fs::read_to_string(path)?;
        let options = Self::from_toml_str(&content)?;
        log::info!("loaded options from {}", path.display());
        Ok(options)
    }

    /// Save options to a TOML file (pretty-printed).
    ///
    /// # Errors
    ///
    /// [`ViewportError::OptionsParse`] if serialization fails and
    /// [`ViewportError::Io`] if the file cannot be written.
    pub fn save(&self, path: &Path) -> Result<(), ViewportError> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| ViewportError::OptionsParse(e.to_string()))?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)?;
        Ok(())
    }

    /// List available preset names (TOML file stems) in a directory.
    #[must_use]
    pub fn list_presets(dir: &Path) -> Vec<String> {
        let mut names = Vec::new();
        if let Ok(entries) = std::fs::read_dir(dir) {
            for entry in entries.flatten() {
                let path = entry.path();
                if path.extension().is_some_and(|ext| ext == "toml") {
                    if let Some(stem) =
                        path.file_stem().and_then(|s| s.to_str())
                    {
                        names.push(stem.to_owned());
                    }
                }
            }
        }
        names.sort();
        names
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::KeyAction;

    #[test]
    fn default_round_trips_through_toml() {
        let opts = Options::default();
        let toml_str = toml::to_string_pretty(&opts).unwrap();
        let parsed = Options::from_toml_str(&toml_str).unwrap();
        assert_eq!(opts, parsed);
    }

    #[test]
    fn partial_toml_fills_defaults() {
        let toml_str = r"
[gizmo]
dim = 96.0
";
        let opts = Options::from_toml_str(toml_str).unwrap();
        assert_eq!(opts.gizmo.dim, 96.0);
        // Everything else should be default
        assert_eq!(opts.gizmo.turn_rate, std::f32::consts::TAU);
        assert_eq!(opts.camera.fovy, 60.0);
        assert_eq!(opts.helper.position, [40.0, 10.0, 30.0]);
        assert_eq!(opts.keybindings.lookup("KeyF"), Some(KeyAction::FitView));
    }

    #[test]
    fn malformed_toml_is_a_parse_error() {
        let err = Options::from_toml_str("[camera\nfovy = ").unwrap_err();
        assert!(matches!(err, ViewportError::OptionsParse(_)));
    }

    #[test]
    fn keybinding_lookup() {
        let opts = Options::default();
        assert_eq!(
            opts.keybindings.lookup("KeyH"),
            Some(KeyAction::ToggleCameraHelper)
        );
        assert_eq!(opts.keybindings.lookup("Digit2"), Some(KeyAction::ViewPosY));
        assert_eq!(opts.keybindings.lookup("KeyZ"), None);
    }

    #[test]
    fn rebinding_from_toml_updates_lookup() {
        let toml_str = r#"
[keybindings.bindings]
fit_view = "Space"
"#;
        let opts = Options::from_toml_str(toml_str).unwrap();
        assert_eq!(opts.keybindings.lookup("Space"), Some(KeyAction::FitView));
        assert_eq!(opts.keybindings.lookup("KeyF"), None);
    }

    #[test]
    fn default_colors_match_axis_palette() {
        let gizmo = GizmoOptions::default();
        assert!((gizmo.x_color[0] - 1.0).abs() < 1e-6);
        assert!((gizmo.y_color[1] - 219.0 / 255.0).abs() < 1e-6);
        assert!((gizmo.z_color[2] - 1.0).abs() < 1e-6);
        let display = DisplayOptions::default();
        assert!((display.helper_background[2] - 64.0 / 255.0).abs() < 1e-6);
        assert!(display.light);
        assert!(display.alpha);
    }

    #[test]
    fn save_and_load_preset() {
        let dir = std::env::temp_dir().join(format!("vantage-presets-{}", std::process::id()));
        let mut opts = Options::default();
        opts.camera.fovy = 45.0;
        opts.save(&dir.join("narrow.toml")).unwrap();

        let loaded = Options::load(&dir.join("narrow.toml")).unwrap();
        assert_eq!(loaded, opts);
        assert_eq!(Options::list_presets(&dir), vec!["narrow".to_owned()]);
        assert!(matches!(
            Options::load(&dir.join("missing.toml")),
            Err(ViewportError::Io(_))
        ));
        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn schema_has_expected_properties() {
        let schema_value =
            serde_json::to_value(Options::json_schema()).unwrap();
        let props = schema_value["properties"].as_object().unwrap();

        assert!(props.contains_key("camera"));
        assert!(props.contains_key("helper"));
        assert!(props.contains_key("gizmo"));
        assert!(props.contains_key("display"));
        assert!(!props.contains_key("keybindings"));

        let camera = &props["camera"]["properties"];
        assert!(camera.get("fovy").is_some());
        assert!(camera.get("position").is_none());
    }
}
