use crate::config::ConfigValidationError;
use crate::loader::AssetLoadError;

/// Something the host may want to show. Drained with
/// [`ViewerEngine::drain_events`](super::ViewerEngine::drain_events).
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerEvent {
    /// A model load started.
    ModelLoading {
        /// Requested location.
        url: String,
    },
    /// The model is in the scene and hotspots were built.
    ModelLoaded {
        /// Requested location.
        url: String,
        /// Uploaded parts.
        parts: usize,
        /// Hotspots built for it.
        hotspots: usize,
    },
    /// The loader failed. The previous scene is unchanged.
    ModelLoadFailed(AssetLoadError),
    /// The configuration cannot be used; nothing was loaded.
    ConfigRejected(ConfigValidationError),
    /// A hotspot transition finished; show its content.
    HotspotRevealed {
        /// Index in the hotspot list.
        index: usize,
        /// Popup title.
        title: String,
        /// Popup body.
        description: String,
    },
    /// The revealed hotspot was dismissed.
    PopupClosed,
}
