//! Scene content: meshes, loaded models and per-frame draw lists.

mod mesh;
mod model;

use glam::Mat4;
pub use mesh::{Bounds, MeshData, MeshVertex};
pub use model::{placement_transform, ModelData, ModelMesh, SceneModel};

use crate::renderer::{GeometryHandle, MaterialHandle, TextureHandle};

/// What a draw item renders.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DrawKind {
    /// Lit or emissive geometry.
    Mesh {
        /// Geometry to draw.
        geometry: GeometryHandle,
        /// Material to draw it with.
        material: MaterialHandle,
    },
    /// Camera-facing textured quad.
    Sprite {
        /// Texture to sample.
        texture: TextureHandle,
    },
}

/// One entry of a frame's draw list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawItem {
    /// What to draw.
    pub kind: DrawKind,
    /// Object-to-world transform.
    pub transform: Mat4,
}

impl SceneModel {
    /// Draw items for every part of the model.
    #[must_use]
    pub fn draw_items(&self) -> Vec<DrawItem> {
        self.parts()
            .iter()
            .map(|part| DrawItem {
                kind: DrawKind::Mesh {
                    geometry: part.geometry,
                    material: part.material,
                },
                transform: part.transform,
            })
            .collect()
    }
}
