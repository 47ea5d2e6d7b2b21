//! Configuration checks that run before anything is loaded.

use std::fmt;

use super::ViewerConfig;
use crate::loader::ModelType;

/// Placeholder path shipped in template configuration documents.
pub const PLACEHOLDER_MODEL_URL: &str = "path/to/your/model.glb";

/// A configuration document that cannot be used as-is.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValidationError {
    /// `assets.modelUrl` is empty.
    EmptyModelUrl,
    /// `assets.modelUrl` still holds a template placeholder.
    PlaceholderModelUrl(String),
    /// `assets.modelType` is not one of `gltf`, `glb`, `fbx`.
    UnsupportedModelType(String),
    /// `assets.cameraDistance` is zero, negative or not finite.
    NonPositiveCameraDistance(f32),
    /// `assets.modelScale` is zero, negative or not finite.
    NonPositiveModelScale(f32),
    /// A hotspot `size` is zero, negative or not finite.
    InvalidHotspotSize {
        /// Index in `settings.hotspots`.
        index: usize,
        /// Offending value.
        size: f32,
    },
}

impl fmt::Display for ConfigValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyModelUrl => write!(f, "model URL is empty"),
            Self::PlaceholderModelUrl(url) => write!(
                f,
                "model URL '{url}' is a placeholder; set assets.modelUrl to a \
                 real model"
            ),
            Self::UnsupportedModelType(ty) => write!(
                f,
                "unsupported model type '{ty}' (expected gltf, glb or fbx)"
            ),
            Self::NonPositiveCameraDistance(d) => {
                write!(f, "camera distance must be positive, got {d}")
            }
            Self::NonPositiveModelScale(s) => {
                write!(f, "model scale must be positive, got {s}")
            }
            Self::InvalidHotspotSize { index, size } => {
                write!(f, "hotspot {index} has invalid size {size}")
            }
        }
    }
}

impl std::error::Error for ConfigValidationError {}

/// A model location that passed validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelRequest {
    /// File path or URL.
    pub url: String,
    /// Parsed model format.
    pub model_type: ModelType,
}

fn positive(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

/// Whether `url` is empty or still a template placeholder.
#[must_use]
pub fn is_placeholder_url(url: &str) -> bool {
    let url = url.trim();
    url.is_empty() || url == PLACEHOLDER_MODEL_URL || url.contains("path/to/your")
}

/// Heuristic used in load-failure diagnostics: does this URL look like
/// something nobody filled in?
#[must_use]
pub fn looks_unconfigured(url: &str) -> bool {
    url.contains("path/to")
        || url.contains("your/model")
        || !(url.starts_with("http") || url.starts_with('/') || url.starts_with("./"))
}

impl ViewerConfig {
    /// Check numeric fields. Model location is checked separately by
    /// [`validate_model`](Self::validate_model) so that a document without a
    /// model can still drive an empty viewer.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if !positive(self.assets.camera_distance) {
            return Err(ConfigValidationError::NonPositiveCameraDistance(
                self.assets.camera_distance,
            ));
        }
        if !positive(self.assets.model_scale) {
            return Err(ConfigValidationError::NonPositiveModelScale(
                self.assets.model_scale,
            ));
        }
        if let Some((index, hotspot)) = self
            .settings
            .hotspots
            .iter()
            .enumerate()
            .find(|(_, h)| !positive(h.size))
        {
            return Err(ConfigValidationError::InvalidHotspotSize {
                index,
                size: hotspot.size,
            });
        }
        Ok(())
    }

    /// Check the model URL and type before a load is attempted.
    pub fn validate_model(&self) -> Result<ModelRequest, ConfigValidationError> {
        let url = self.assets.model_url.trim();
        if url.is_empty() {
            return Err(ConfigValidationError::EmptyModelUrl);
        }
        if is_placeholder_url(url) {
            return Err(ConfigValidationError::PlaceholderModelUrl(url.to_owned()));
        }
        let model_type = self.assets.model_type.parse::<ModelType>().map_err(|_| {
            ConfigValidationError::UnsupportedModelType(self.assets.model_type.clone())
        })?;
        Ok(ModelRequest {
            url: url.to_owned(),
            model_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HotspotConfig;

    fn config_with_model(url: &str, ty: &str) -> ViewerConfig {
        let mut config = ViewerConfig::default();
        config.assets.model_url = url.to_owned();
        config.assets.model_type = ty.to_owned();
        config
    }

    #[test]
    fn empty_url_is_rejected() {
        let config = config_with_model("   ", "glb");
        assert_eq!(
            config.validate_model(),
            Err(ConfigValidationError::EmptyModelUrl)
        );
    }

    #[test]
    fn placeholder_urls_are_rejected() {
        for url in ["path/to/your/model.glb", "./assets/path/to/your/thing.gltf"] {
            let config = config_with_model(url, "glb");
            assert!(matches!(
                config.validate_model(),
                Err(ConfigValidationError::PlaceholderModelUrl(_))
            ));
        }
    }

    #[test]
    fn unsupported_type_is_rejected() {
        let config = config_with_model("models/chair.obj", "obj");
        assert_eq!(
            config.validate_model(),
            Err(ConfigValidationError::UnsupportedModelType("obj".to_owned()))
        );
    }

    #[test]
    fn valid_model_request() {
        let config = config_with_model("https://example.com/chair.glb", "GLB");
        let request = config.validate_model().unwrap();
        assert_eq!(request.url, "https://example.com/chair.glb");
        assert_eq!(request.model_type, ModelType::Glb);
    }

    #[test]
    fn numeric_fields_must_be_positive() {
        let mut config = ViewerConfig::default();
        assert!(config.validate().is_ok());

        config.assets.camera_distance = 0.0;
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::NonPositiveCameraDistance(_))
        ));

        config.assets.camera_distance = 5.0;
        config.assets.model_scale = f32::NAN;
        assert!(matches!(
            config.validate(),
            Err(ConfigValidationError::NonPositiveModelScale(_))
        ));

        config.assets.model_scale = 1.0;
        config.settings.hotspots = vec![
            HotspotConfig::default(),
            HotspotConfig {
                size: -1.0,
                ..HotspotConfig::default()
            },
        ];
        assert_eq!(
            config.validate(),
            Err(ConfigValidationError::InvalidHotspotSize {
                index: 1,
                size: -1.0
            })
        );
    }

    #[test]
    fn unconfigured_heuristic() {
        assert!(looks_unconfigured("path/to/model.glb"));
        assert!(looks_unconfigured("models/your/model.glb"));
        assert!(looks_unconfigured("models/chair.glb"));
        assert!(!looks_unconfigured("./models/chair.glb"));
        assert!(!looks_unconfigured("/srv/models/chair.glb"));
        assert!(!looks_unconfigured("https://cdn.example.com/chair.glb"));
    }
}
