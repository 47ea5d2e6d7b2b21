//! Test doubles for the renderer and asset-loader collaborators.

use rustc_hash::FxHashSet;

use crate::camera::Camera;
use crate::loader::{AssetLoadError, AssetLoader, LoadFailure, ModelType};
use crate::renderer::{
    Frame, GeometryHandle, GpuResources, MaterialDesc, MaterialHandle,
    RenderError, ResourceHandle, RgbaImage, SceneRenderer, TextureHandle,
    Viewport,
};
use crate::scene::{DrawItem, DrawKind, MeshData, ModelData, ModelMesh};

/// Renderer that draws nothing and records every call.
#[derive(Debug, Default)]
pub(crate) struct RecordingRenderer {
    next_id: u32,
    live: FxHashSet<ResourceHandle>,
    released: usize,
    pub(crate) frames: usize,
    pub(crate) last_items: Vec<DrawItem>,
    pub(crate) last_camera: Option<Camera>,
    pub(crate) viewport: Option<Viewport>,
}

impl RecordingRenderer {
    fn next(&mut self) -> u32 {
        self.next_id += 1;
        self.next_id
    }

    fn track(&mut self, handle: ResourceHandle) {
        let _ = self.live.insert(handle);
    }

    /// Resources created and not yet released.
    pub(crate) fn live(&self) -> usize {
        self.live.len()
    }

    /// Successful releases so far.
    pub(crate) fn released(&self) -> usize {
        self.released
    }

    pub(crate) fn is_live(&self, handle: ResourceHandle) -> bool {
        self.live.contains(&handle)
    }
}

impl GpuResources for RecordingRenderer {
    fn create_geometry(&mut self, _mesh: &MeshData) -> GeometryHandle {
        let handle = GeometryHandle(self.next());
        self.track(ResourceHandle::Geometry(handle));
        handle
    }

    fn create_material(&mut self, _desc: &MaterialDesc) -> MaterialHandle {
        let handle = MaterialHandle(self.next());
        self.track(ResourceHandle::Material(handle));
        handle
    }

    fn create_texture(&mut self, _image: &RgbaImage) -> TextureHandle {
        let handle = TextureHandle(self.next());
        self.track(ResourceHandle::Texture(handle));
        handle
    }

    fn release(&mut self, handle: ResourceHandle) {
        if self.live.remove(&handle) {
            self.released += 1;
        }
    }
}

impl SceneRenderer for RecordingRenderer {
    fn resize(&mut self, viewport: Viewport) {
        self.viewport = Some(viewport);
    }

    fn render(&mut self, camera: &Camera, frame: &Frame<'_>) -> Result<(), RenderError> {
        for item in frame.items {
            let handles = match item.kind {
                DrawKind::Mesh { geometry, material } => vec![
                    ResourceHandle::Geometry(geometry),
                    ResourceHandle::Material(material),
                ],
                DrawKind::Sprite { texture } => vec![ResourceHandle::Texture(texture)],
            };
            if let Some(missing) = handles.into_iter().find(|h| !self.live.contains(h)) {
                return Err(RenderError::UnknownResource(missing));
            }
        }
        self.frames += 1;
        self.last_items = frame.items.to_vec();
        self.last_camera = Some(camera.clone());
        Ok(())
    }
}

/// Loader that answers immediately with a canned result.
#[derive(Debug, Clone)]
pub(crate) struct InstantLoader {
    result: Result<ModelData, LoadFailure>,
    /// URLs containing this fragment fail instead.
    broken: Option<(String, LoadFailure)>,
}

impl InstantLoader {
    /// Always returns a single unit cube.
    pub(crate) fn cube() -> Self {
        Self {
            result: Ok(ModelData {
                meshes: vec![ModelMesh {
                    mesh: MeshData::cube(1.0),
                    transform: glam::Mat4::IDENTITY,
                    base_color: crate::config::Color::WHITE,
                }],
            }),
            broken: None,
        }
    }

    /// Fail with `failure` for any URL containing `fragment`.
    pub(crate) fn failing_for(mut self, fragment: &str, failure: LoadFailure) -> Self {
        self.broken = Some((fragment.to_owned(), failure));
        self
    }

    /// Always fails with `failure`.
    pub(crate) fn failing(failure: LoadFailure) -> Self {
        Self {
            result: Err(failure),
            broken: None,
        }
    }
}

impl AssetLoader for InstantLoader {
    fn load(&self, url: &str, model_type: ModelType) -> Result<ModelData, AssetLoadError> {
        let result = match &self.broken {
            Some((fragment, failure)) if url.contains(fragment.as_str()) => Err(failure.clone()),
            _ => self.result.clone(),
        };
        result
            .map_err(|kind| AssetLoadError::new(url, model_type, kind))
    }
}
