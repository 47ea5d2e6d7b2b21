use std::path::Path;

use glam::Mat4;

use super::{AssetLoadError, AssetLoader, LoadFailure, ModelType};
use crate::config::Color;
use crate::scene::{MeshData, ModelData, ModelMesh};

/// Largest remote model accepted, in bytes.
#[cfg(feature = "http")]
const MAX_DOWNLOAD_BYTES: u64 = 512 * 1024 * 1024;

/// glTF / GLB loader for local files and (with the `http` feature) remote
/// URLs.
///
/// Remote `.gltf` files must embed their buffers as data URIs; external
/// buffer references are only resolved for local files.
#[derive(Debug, Clone, Copy, Default)]
pub struct GltfLoader;

impl GltfLoader {
    /// New loader.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn is_remote(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

type Imported = (
    gltf::Document,
    Vec<gltf::buffer::Data>,
    Vec<gltf::image::Data>,
);

fn import_local(path: &Path) -> Result<Imported, LoadFailure> {
    if !path.exists() {
        return Err(LoadFailure::Io(format!(
            "{} does not exist",
            path.display()
        )));
    }
    gltf::import(path).map_err(|e| match e {
        gltf::Error::Io(io) => LoadFailure::Io(io.to_string()),
        other => LoadFailure::Parse(other.to_string()),
    })
}

#[cfg(feature = "http")]
fn import_remote(url: &str) -> Result<Imported, LoadFailure> {
    log::info!("downloading {url}");
    let bytes = ureq::get(url)
        .call()
        .map_err(|e| LoadFailure::Http(e.to_string()))?
        .into_body()
        .with_config()
        .limit(MAX_DOWNLOAD_BYTES)
        .read_to_vec()
        .map_err(|e| LoadFailure::Http(e.to_string()))?;
    log::debug!("downloaded {} bytes from {url}", bytes.len());
    gltf::import_slice(&bytes).map_err(|e| LoadFailure::Parse(e.to_string()))
}

#[cfg(not(feature = "http"))]
fn import_remote(url: &str) -> Result<Imported, LoadFailure> {
    Err(LoadFailure::Unsupported(format!(
        "{url}: remote models need the `http` feature"
    )))
}

/// Flatten the default scene's node tree into model-space meshes.
fn collect_meshes(document: &gltf::Document, buffers: &[gltf::buffer::Data]) -> Result<ModelData, LoadFailure> {
    let scene = document
        .default_scene()
        .or_else(|| document.scenes().next())
        .ok_or_else(|| LoadFailure::Parse("document contains no scene".to_owned()))?;

    let mut meshes = Vec::new();
    for node in scene.nodes() {
        collect_node(&node, Mat4::IDENTITY, buffers, &mut meshes);
    }
    if meshes.is_empty() {
        return Err(LoadFailure::Parse(
            "scene contains no triangle meshes".to_owned(),
        ));
    }
    Ok(ModelData { meshes })
}

fn collect_node(
    node: &gltf::Node<'_>,
    parent: Mat4,
    buffers: &[gltf::buffer::Data],
    out: &mut Vec<ModelMesh>,
) {
    let transform = parent * Mat4::from_cols_array_2d(&node.transform().matrix());

    if let Some(mesh) = node.mesh() {
        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                log::debug!(
                    "skipping {:?} primitive in mesh {:?}",
                    primitive.mode(),
                    mesh.name()
                );
                continue;
            }
            let reader = primitive.reader(|buffer| {
                buffers.get(buffer.index()).map(|data| data.0.as_slice())
            });
            let Some(positions) = reader.read_positions() else {
                continue;
            };
            let positions: Vec<[f32; 3]> = positions.collect();
            let normals: Option<Vec<[f32; 3]>> = reader.read_normals().map(Iterator::collect);
            let uvs: Option<Vec<[f32; 2]>> =
                reader.read_tex_coords(0).map(|tc| tc.into_f32().collect());
            let indices: Option<Vec<u32>> = reader.read_indices().map(|i| i.into_u32().collect());

            let [r, g, b, a] = primitive
                .material()
                .pbr_metallic_roughness()
                .base_color_factor();

            out.push(ModelMesh {
                mesh: MeshData::from_attributes(
                    &positions,
                    normals.as_deref(),
                    uvs.as_deref(),
                    indices,
                ),
                transform,
                base_color: Color { r, g, b, a },
            });
        }
    }

    for child in node.children() {
        collect_node(&child, transform, buffers, out);
    }
}

impl AssetLoader for GltfLoader {
    fn load(&self, url: &str, model_type: ModelType) -> Result<ModelData, AssetLoadError> {
        let fail = |kind| AssetLoadError::new(url, model_type, kind);

        if model_type == ModelType::Fbx {
            return Err(fail(LoadFailure::Unsupported(
                "FBX models are not supported by the glTF loader".to_owned(),
            )));
        }

        let (document, buffers, _images) = if is_remote(url) {
            import_remote(url)
        } else {
            import_local(Path::new(url))
        }
        .map_err(fail)?;

        let model = collect_meshes(&document, &buffers).map_err(fail)?;
        log::info!(
            "parsed {url}: {} meshes, {} triangles",
            model.meshes.len(),
            model.triangle_count()
        );
        Ok(model)
    }
}
