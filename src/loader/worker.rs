//! Runs an [`AssetLoader`] on its own thread so a slow download or parse
//! never blocks the frame loop.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread::JoinHandle;

use web_time::Duration;

use super::{AssetLoadError, AssetLoader, LoadFailure, ModelType};
use crate::config::ModelRequest;
use crate::error::ViewerError;
use crate::scene::ModelData;

/// What a load thread hands back.
pub type LoadResult = Result<ModelData, AssetLoadError>;

/// A load in flight, tagged with the generation that requested it.
///
/// Dropping a `PendingLoad` detaches the thread; its result is discarded
/// when it arrives.
#[derive(Debug)]
pub struct PendingLoad {
    generation: u64,
    url: String,
    model_type: ModelType,
    rx: mpsc::Receiver<LoadResult>,
    _thread: JoinHandle<()>,
}

/// Start loading `request` on a background thread.
///
/// # Errors
///
/// Returns [`ViewerError::ThreadSpawn`] if the thread cannot be created.
pub fn spawn_load(
    loader: Arc<dyn AssetLoader>,
    request: ModelRequest,
    generation: u64,
) -> Result<PendingLoad, ViewerError> {
    let (tx, rx) = mpsc::channel();
    let ModelRequest { url, model_type } = request;

    let thread_url = url.clone();
    let thread = std::thread::Builder::new()
        .name("asset-loader".into())
        .spawn(move || {
            log::debug!("loading {thread_url} ({model_type}), generation {generation}");
            let result = loader.load(&thread_url, model_type);
            // receiver gone means the load was superseded
            let _ = tx.send(result);
        })
        .map_err(ViewerError::ThreadSpawn)?;

    Ok(PendingLoad {
        generation,
        url,
        model_type,
        rx,
        _thread: thread,
    })
}

impl PendingLoad {
    /// Generation this load belongs to.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Requested location.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    fn disconnected(&self) -> LoadResult {
        Err(AssetLoadError::new(
            &self.url,
            self.model_type,
            LoadFailure::WorkerDisconnected,
        ))
    }

    /// Non-blocking check for the result.
    pub fn try_take(&self) -> Option<LoadResult> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(mpsc::TryRecvError::Empty) => None,
            Err(mpsc::TryRecvError::Disconnected) => Some(self.disconnected()),
        }
    }

    /// Block up to `timeout` for the result.
    pub fn wait(&self, timeout: Duration) -> Option<LoadResult> {
        match self.rx.recv_timeout(timeout) {
            Ok(result) => Some(result),
            Err(mpsc::RecvTimeoutError::Timeout) => None,
            Err(mpsc::RecvTimeoutError::Disconnected) => Some(self.disconnected()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::InstantLoader;

    fn request() -> ModelRequest {
        ModelRequest {
            url: "./models/cube.glb".to_owned(),
            model_type: ModelType::Glb,
        }
    }

    #[test]
    fn delivers_loaded_model() {
        let pending = spawn_load(Arc::new(InstantLoader::cube()), request(), 7).unwrap();
        assert_eq!(pending.generation(), 7);
        assert_eq!(pending.url(), "./models/cube.glb");
        let model = pending.wait(Duration::from_secs(5)).unwrap().unwrap();
        assert_eq!(model.meshes.len(), 1);
    }

    #[test]
    fn delivers_failure_with_request_details() {
        let loader = InstantLoader::failing(LoadFailure::Http("503".to_owned()));
        let pending = spawn_load(Arc::new(loader), request(), 1).unwrap();
        let err = pending.wait(Duration::from_secs(5)).unwrap().unwrap_err();
        assert_eq!(err.url, "./models/cube.glb");
        assert_eq!(err.kind, LoadFailure::Http("503".to_owned()));
    }

    struct PanickingLoader;

    impl AssetLoader for PanickingLoader {
        fn load(&self, _url: &str, _model_type: ModelType) -> LoadResult {
            panic!("loader blew up");
        }
    }

    #[test]
    fn dead_thread_reports_disconnect() {
        let pending = spawn_load(Arc::new(PanickingLoader), request(), 1).unwrap();
        let err = pending.wait(Duration::from_secs(5)).unwrap().unwrap_err();
        assert_eq!(err.kind, LoadFailure::WorkerDisconnected);
    }
}
