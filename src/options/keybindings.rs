use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::input::KeyAction;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(from = "BindingTable", into = "BindingTable")]
/// Configurable keyboard bindings mapping actions to key codes.
pub struct KeybindingOptions {
    /// Maps action → key string (e.g. `fit_view` → `"KeyF"`).
    pub bindings: HashMap<KeyAction, String>,
    /// Reverse lookup cache (key string → action). Rebuilt on load.
    key_to_action: HashMap<String, KeyAction>,
}

/// Serialized form: just the forward map.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct BindingTable {
    bindings: HashMap<KeyAction, String>,
}

impl Default for BindingTable {
    fn default() -> Self {
        Self {
            bindings: default_bindings(),
        }
    }
}

impl From<BindingTable> for KeybindingOptions {
    fn from(table: BindingTable) -> Self {
        let mut opts = Self {
            bindings: table.bindings,
            key_to_action: HashMap::new(),
        };
        opts.rebuild_reverse_map();
        opts
    }
}

impl From<KeybindingOptions> for BindingTable {
    fn from(opts: KeybindingOptions) -> Self {
        Self {
            bindings: opts.bindings,
        }
    }
}

impl Default for KeybindingOptions {
    fn default() -> Self {
        BindingTable::default().into()
    }
}

fn default_bindings() -> HashMap<KeyAction, String> {
    HashMap::from([
        (KeyAction::FitView, "KeyF".into()),
        (KeyAction::ToggleCameraHelper, "KeyH".into()),
        (KeyAction::ResetCamera, "KeyR".into()),
        (KeyAction::ViewPosX, "Digit1".into()),
        (KeyAction::ViewPosY, "Digit2".into()),
        (KeyAction::ViewPosZ, "Digit3".into()),
        (KeyAction::ViewNegX, "Digit4".into()),
        (KeyAction::ViewNegY, "Digit5".into()),
        (KeyAction::ViewNegZ, "Digit6".into()),
    ])
}

impl KeybindingOptions {
    /// Rebuild the reverse lookup map (key string → action).
    pub fn rebuild_reverse_map(&mut self) {
        self.key_to_action.clear();
        for (action, key) in &self.bindings {
            let _ = self.key_to_action.insert(key.clone(), *action);
        }
    }

    /// Look up the action for a key string.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<KeyAction> {
        self.key_to_action.get(key).copied()
    }
}
