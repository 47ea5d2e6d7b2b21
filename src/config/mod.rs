//! Viewer configuration document.
//!
//! A single [`ViewerConfig`] describes everything the viewer shows: the
//! model, the theme colors, camera behavior, and the hotspot list. It is read
//! once at startup (JSON, or TOML for `.toml` files) and handed to the engine
//! by value. All sections use `#[serde(default)]`, so partial documents work.

mod color;
mod sections;
mod settings;
mod validate;

use std::path::Path;

pub use color::{Color, ColorParseError};
use schemars::JsonSchema;
pub use sections::{AssetsConfig, ContextConfig, ThemeConfig};
use serde::{Deserialize, Serialize};
pub use settings::{
    CameraOptions, HotspotConfig, HotspotContent, HotspotShape, Position,
    SettingsConfig,
};
pub use validate::{
    is_placeholder_url, looks_unconfigured, ConfigValidationError,
    ModelRequest, PLACEHOLDER_MODEL_URL,
};

use crate::error::ViewerError;

/// Default location of the configuration document.
pub const DEFAULT_CONFIG_PATH: &str = "app-config/appConfig.json";

/// Top-level configuration document.
#[derive(
    Debug, Clone, Serialize, Deserialize, PartialEq, Default, JsonSchema,
)]
#[serde(default)]
pub struct ViewerConfig {
    /// Title and description.
    pub context: ContextConfig,
    /// Scene and popup colors.
    pub theme: ThemeConfig,
    /// Model location, scale and base camera distance.
    pub assets: AssetsConfig,
    /// Interaction behavior and hotspots.
    pub settings: SettingsConfig,
}

fn is_toml(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "toml")
}

impl ViewerConfig {
    /// Generate a JSON Schema describing the document.
    #[must_use]
    pub fn json_schema() -> schemars::Schema {
        schemars::schema_for!(ViewerConfig)
    }

    /// Parse a JSON document and run [`validate`](Self::validate).
    pub fn from_json_str(json: &str) -> Result<Self, ViewerError> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| ViewerError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a TOML document and run [`validate`](Self::validate).
    pub fn from_toml_str(toml_str: &str) -> Result<Self, ViewerError> {
        let config: Self = toml::from_str(toml_str)
            .map_err(|e| ViewerError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a document. `.toml` files are read as TOML,
    /// everything else as JSON. Missing fields use defaults.
    pub fn load(path: &Path) -> Result<Self, ViewerError> {
        let content = std::fs::read_to_string(path).map_err(ViewerError::Io)?;
        let config = if is_toml(path) {
            Self::from_toml_str(&content)?
        } else {
            Self::from_json_str(&content)?
        };
        log::info!(
            "loaded configuration '{}' ({} hotspots) from {}",
            config.context.title,
            config.settings.hotspots.len(),
            path.display()
        );
        Ok(config)
    }

    /// Save the document, pretty-printed, in the format implied by the
    /// extension.
    pub fn save(&self, path: &Path) -> Result<(), ViewerError> {
        let content = if is_toml(path) {
            toml::to_string_pretty(self)
                .map_err(|e| ViewerError::ConfigParse(e.to_string()))?
        } else {
            serde_json::to_string_pretty(self)
                .map_err(|e| ViewerError::ConfigParse(e.to_string()))?
        };
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(ViewerError::Io)?;
        }
        std::fs::write(path, content).map_err(ViewerError::Io)
    }
}
