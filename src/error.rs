//! Crate-level error types.

use std::fmt;

use crate::config::ConfigValidationError;
use crate::gpu::render_context::RenderContextError;
use crate::loader::AssetLoadError;

/// Errors produced by the vitrine crate.
#[derive(Debug)]
pub enum ViewerError {
    /// GPU context initialization failure.
    Gpu(RenderContextError),
    /// Configuration parsed but is not usable.
    Config(ConfigValidationError),
    /// Configuration could not be parsed or serialized.
    ConfigParse(String),
    /// The model could not be loaded.
    AssetLoad(AssetLoadError),
    /// Generic I/O failure.
    Io(std::io::Error),
    /// Failed to spawn a background thread.
    ThreadSpawn(std::io::Error),
    /// Viewer event-loop failure.
    Viewer(String),
}

impl fmt::Display for ViewerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Gpu(e) => write!(f, "GPU error: {e}"),
            Self::Config(e) => write!(f, "invalid configuration: {e}"),
            Self::ConfigParse(msg) => {
                write!(f, "configuration parse error: {msg}")
            }
            Self::AssetLoad(e) => write!(f, "{e}"),
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::ThreadSpawn(e) => {
                write!(f, "failed to spawn thread: {e}")
            }
            Self::Viewer(msg) => write!(f, "viewer error: {msg}"),
        }
    }
}

impl std::error::Error for ViewerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Gpu(e) => Some(e),
            Self::Config(e) => Some(e),
            Self::AssetLoad(e) => Some(e),
            Self::Io(e) | Self::ThreadSpawn(e) => Some(e),
            Self::ConfigParse(_) | Self::Viewer(_) => None,
        }
    }
}

impl From<RenderContextError> for ViewerError {
    fn from(e: RenderContextError) -> Self {
        Self::Gpu(e)
    }
}

impl From<ConfigValidationError> for ViewerError {
    fn from(e: ConfigValidationError) -> Self {
        Self::Config(e)
    }
}

impl From<AssetLoadError> for ViewerError {
    fn from(e: AssetLoadError) -> Self {
        Self::AssetLoad(e)
    }
}

impl From<std::io::Error> for ViewerError {
    fn from(e: std::io::Error) -> Self {
        Self::Io(e)
    }
}
