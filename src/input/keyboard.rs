use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::engine::ViewerCommand;

/// Maps physical key strings to [`ViewerCommand`] variants.
///
/// Key strings use the `winit::keyboard::KeyCode` debug format:
/// `"KeyR"`, `"Escape"`, `"Space"`, etc. `Digit1` through `Digit9` always
/// focus the matching hotspot and cannot be rebound.
///
/// Serde serializes tags as `snake_case` strings so TOML stays readable:
/// ```toml
/// [bindings]
/// KeyH = "reset_camera"
/// KeyP = "toggle_auto_rotate"
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct KeyBindings {
    bindings: HashMap<String, KeyCommandTag>,
}

/// Serializable tag for the parameterless [`ViewerCommand`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyCommandTag {
    /// Fly back to the initial camera pose.
    ResetCamera,
    /// Dismiss the hotspot popup.
    ClosePopup,
    /// Toggle turntable auto-rotation.
    ToggleAutoRotate,
    /// Load the configured model again.
    ReloadModel,
}

impl KeyCommandTag {
    fn to_command(self) -> ViewerCommand {
        match self {
            Self::ResetCamera => ViewerCommand::ResetCamera,
            Self::ClosePopup => ViewerCommand::ClosePopup,
            Self::ToggleAutoRotate => ViewerCommand::ToggleAutoRotate,
            Self::ReloadModel => ViewerCommand::ReloadModel,
        }
    }
}

impl Default for KeyBindings {
    fn default() -> Self {
        let bindings = HashMap::from([
            ("KeyR".into(), KeyCommandTag::ResetCamera),
            ("Escape".into(), KeyCommandTag::ClosePopup),
            ("Space".into(), KeyCommandTag::ToggleAutoRotate),
        ]);
        Self { bindings }
    }
}

impl KeyBindings {
    /// Look up the command for a physical key string.
    #[must_use]
    pub fn lookup(&self, key: &str) -> Option<ViewerCommand> {
        if let Some(digit) = key.strip_prefix("Digit") {
            return match digit.parse::<usize>() {
                Ok(n @ 1..=9) => Some(ViewerCommand::FocusHotspot(n - 1)),
                _ => None,
            };
        }
        self.bindings.get(key).map(|tag| tag.to_command())
    }

    /// Bind `key` to `tag`, replacing any previous binding for that key.
    pub fn bind(&mut self, key: impl Into<String>, tag: KeyCommandTag) {
        let _ = self.bindings.insert(key.into(), tag);
    }

    /// Remove the binding for `key`.
    pub fn unbind(&mut self, key: &str) {
        let _ = self.bindings.remove(key);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let keys = KeyBindings::default();
        assert_eq!(keys.lookup("KeyR"), Some(ViewerCommand::ResetCamera));
        assert_eq!(keys.lookup("Escape"), Some(ViewerCommand::ClosePopup));
        assert_eq!(keys.lookup("Space"), Some(ViewerCommand::ToggleAutoRotate));
        assert_eq!(keys.lookup("KeyQ"), None);
    }

    #[test]
    fn digits_focus_hotspots() {
        let keys = KeyBindings::default();
        assert_eq!(keys.lookup("Digit1"), Some(ViewerCommand::FocusHotspot(0)));
        assert_eq!(keys.lookup("Digit9"), Some(ViewerCommand::FocusHotspot(8)));
        assert_eq!(keys.lookup("Digit0"), None);
    }

    #[test]
    fn rebinding() {
        let mut keys = KeyBindings::default();
        keys.bind("KeyL", KeyCommandTag::ReloadModel);
        keys.unbind("KeyR");
        assert_eq!(keys.lookup("KeyL"), Some(ViewerCommand::ReloadModel));
        assert_eq!(keys.lookup("KeyR"), None);
    }

    #[test]
    fn toml_round_trip() {
        let keys = KeyBindings::default();
        let text = toml::to_string(&keys).unwrap();
        assert!(text.contains("reset_camera"));
        let back: KeyBindings = toml::from_str(&text).unwrap();
        assert_eq!(back, keys);
    }
}
