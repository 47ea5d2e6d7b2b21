use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use super::color::Color;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Context", inline)]
#[serde(default, rename_all = "camelCase")]
/// Descriptive text shown around the viewer.
pub struct ContextConfig {
    /// Window / page title.
    pub title: String,
    /// Short description of the scene.
    pub description: String,
}

impl Default for ContextConfig {
    fn default() -> Self {
        Self {
            title: "Vitrine".to_owned(),
            description: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Theme", inline)]
#[serde(default, rename_all = "camelCase")]
/// Colors used by the scene and the surrounding popup.
pub struct ThemeConfig {
    /// Clear color of the render surface.
    pub background_color: Color,
    /// Default hotspot color (used by badges).
    pub hotspot_color: Color,
    /// Hotspot color while hovered.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hotspot_hover_color: Option<Color>,
    /// Popup panel background.
    pub popup_background_color: Color,
    /// Popup text color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub popup_text_color: Option<Color>,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            background_color: Color::from_rgba8(0x1a, 0x1a, 0x2e, 0xff),
            hotspot_color: Color::from_rgba8(0xff, 0x6b, 0x35, 0xff),
            hotspot_hover_color: None,
            popup_background_color: Color::WHITE,
            popup_text_color: None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Assets", inline)]
#[serde(default, rename_all = "camelCase")]
/// The model to display and how to place it.
pub struct AssetsConfig {
    /// File path or `http(s)` URL of the model.
    pub model_url: String,
    /// Declared model format: `gltf`, `glb` or `fbx`.
    pub model_type: String,
    /// Uniform scale applied to the loaded model.
    #[schemars(range(min = 0.0))]
    pub model_scale: f32,
    /// Base viewing distance from the scene origin.
    #[schemars(range(min = 0.0))]
    pub camera_distance: f32,
    /// Background music track. Parsed but not played.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub music_track: Option<String>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            model_url: String::new(),
            model_type: "glb".to_owned(),
            model_scale: 1.0,
            camera_distance: 5.0,
            music_track: None,
        }
    }
}
