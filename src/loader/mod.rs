//! Asset loading: the loader collaborator and the background worker that
//! runs it off the frame thread.

mod gltf_loader;
mod worker;

use std::fmt;
use std::str::FromStr;

pub use gltf_loader::GltfLoader;
pub use worker::{spawn_load, LoadResult, PendingLoad};

use crate::config::looks_unconfigured;
use crate::scene::ModelData;

/// Declared model file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModelType {
    /// glTF JSON with external or embedded buffers.
    Gltf,
    /// Binary glTF.
    Glb,
    /// Autodesk FBX.
    Fbx,
}

impl ModelType {
    /// Lowercase name as used in configuration documents.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Gltf => "gltf",
            Self::Glb => "glb",
            Self::Fbx => "fbx",
        }
    }
}

impl fmt::Display for ModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A model type name that is not supported.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownModelType(pub String);

impl fmt::Display for UnknownModelType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown model type '{}'", self.0)
    }
}

impl std::error::Error for UnknownModelType {}

impl FromStr for ModelType {
    type Err = UnknownModelType;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "gltf" => Ok(Self::Gltf),
            "glb" => Ok(Self::Glb),
            "fbx" => Ok(Self::Fbx),
            _ => Err(UnknownModelType(s.to_owned())),
        }
    }
}

/// Why a load failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadFailure {
    /// Reading a local file failed.
    Io(String),
    /// Fetching a remote URL failed.
    Http(String),
    /// The bytes are not a valid model.
    Parse(String),
    /// The format (or URL scheme) is not supported by this loader.
    Unsupported(String),
    /// The background worker went away without answering.
    WorkerDisconnected,
}

impl fmt::Display for LoadFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "I/O error: {msg}"),
            Self::Http(msg) => write!(f, "HTTP error: {msg}"),
            Self::Parse(msg) => write!(f, "parse error: {msg}"),
            Self::Unsupported(msg) => write!(f, "unsupported: {msg}"),
            Self::WorkerDisconnected => {
                write!(f, "loader thread exited without a result")
            }
        }
    }
}

/// A failed model load, with the request that caused it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetLoadError {
    /// Requested location.
    pub url: String,
    /// Declared format.
    pub model_type: ModelType,
    /// What went wrong.
    pub kind: LoadFailure,
}

impl AssetLoadError {
    /// Error for `url` / `model_type`.
    #[must_use]
    pub fn new(url: &str, model_type: ModelType, kind: LoadFailure) -> Self {
        Self {
            url: url.to_owned(),
            model_type,
            kind,
        }
    }

    /// Hint shown when the URL looks like an unfilled template value.
    #[must_use]
    pub fn hint(&self) -> Option<&'static str> {
        looks_unconfigured(&self.url).then_some(
            "the configured model URL looks like a placeholder; point \
             assets.modelUrl at a real model file",
        )
    }
}

impl fmt::Display for AssetLoadError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "failed to load {} model '{}': {}",
            self.model_type, self.url, self.kind
        )?;
        if let Some(hint) = self.hint() {
            write!(f, " ({hint})")?;
        }
        Ok(())
    }
}

impl std::error::Error for AssetLoadError {}

/// The asset-loader collaborator. Called from a background thread.
pub trait AssetLoader: Send + Sync {
    /// Load the model at `url`. Placement (scale, centering) is applied by
    /// the caller.
    fn load(&self, url: &str, model_type: ModelType) -> Result<ModelData, AssetLoadError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_type_parses_case_insensitively() {
        assert_eq!("GLB".parse::<ModelType>(), Ok(ModelType::Glb));
        assert_eq!(" gltf ".parse::<ModelType>(), Ok(ModelType::Gltf));
        assert_eq!("fbx".parse::<ModelType>(), Ok(ModelType::Fbx));
        assert!("obj".parse::<ModelType>().is_err());
    }

    #[test]
    fn diagnostic_names_url_and_type() {
        let err = AssetLoadError::new(
            "https://cdn.test/chair.glb",
            ModelType::Glb,
            LoadFailure::Http("404".to_owned()),
        );
        let msg = err.to_string();
        assert!(msg.contains("https://cdn.test/chair.glb"));
        assert!(msg.contains("glb"));
        assert!(msg.contains("404"));
        assert!(err.hint().is_none());
    }

    #[test]
    fn placeholder_looking_urls_get_a_hint() {
        let err = AssetLoadError::new(
            "models/your/model.glb",
            ModelType::Glb,
            LoadFailure::Io("not found".to_owned()),
        );
        assert!(err.hint().is_some());
        assert!(err.to_string().contains("placeholder"));
    }
}
