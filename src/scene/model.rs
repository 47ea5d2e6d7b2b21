use glam::{Mat4, Vec3};

use super::mesh::{Bounds, MeshData};
use crate::config::Color;
use crate::renderer::{
    GeometryHandle, GpuResources, MaterialDesc, MaterialHandle,
    ResourceHandle,
};

/// One drawable part of a loaded model.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelMesh {
    /// Geometry in the part's local space.
    pub mesh: MeshData,
    /// Local-to-model transform (accumulated node hierarchy).
    pub transform: Mat4,
    /// Base color factor of the part's material.
    pub base_color: Color,
}

/// A model as produced by an asset loader, before placement.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelData {
    /// Drawable parts.
    pub meshes: Vec<ModelMesh>,
}

impl ModelData {
    /// Bounds of all parts in model space.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        self.meshes
            .iter()
            .filter_map(|m| m.mesh.bounds(m.transform))
            .reduce(Bounds::union)
    }

    /// Total triangle count.
    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(|m| m.mesh.triangle_count()).sum()
    }
}

/// Transform that scales the model uniformly by `scale` and then moves the
/// center of its scaled bounds to the origin.
#[must_use]
pub fn placement_transform(bounds: Option<Bounds>, scale: f32) -> Mat4 {
    let center = bounds.map_or(Vec3::ZERO, |b| b.center());
    Mat4::from_translation(-center * scale) * Mat4::from_scale(Vec3::splat(scale))
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct PlacedMesh {
    pub(crate) geometry: GeometryHandle,
    pub(crate) material: MaterialHandle,
    pub(crate) transform: Mat4,
}

/// A placed model whose parts live in renderer memory.
#[derive(Debug)]
pub struct SceneModel {
    parts: Vec<PlacedMesh>,
    bounds: Option<Bounds>,
    placement: Mat4,
}

impl SceneModel {
    /// Upload `data`, scaled by `scale` and centered on the origin.
    pub fn upload<G: GpuResources + ?Sized>(
        data: &ModelData,
        scale: f32,
        gpu: &mut G,
    ) -> Self {
        let placement = placement_transform(data.bounds(), scale);
        let parts = data
            .meshes
            .iter()
            .filter(|m| !m.mesh.is_empty())
            .map(|m| PlacedMesh {
                geometry: gpu.create_geometry(&m.mesh),
                material: gpu.create_material(&MaterialDesc::lit(m.base_color)),
                transform: placement * m.transform,
            })
            .collect();
        let bounds = data
            .meshes
            .iter()
            .filter_map(|m| m.mesh.bounds(placement * m.transform))
            .reduce(Bounds::union);
        Self {
            parts,
            bounds,
            placement,
        }
    }

    /// World-space bounds after placement.
    #[must_use]
    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    /// Model-to-world transform applied at upload.
    #[must_use]
    pub fn placement(&self) -> Mat4 {
        self.placement
    }

    /// Number of uploaded parts.
    #[must_use]
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    pub(crate) fn parts(&self) -> &[PlacedMesh] {
        &self.parts
    }

    /// Release every renderer resource this model holds.
    pub fn release<G: GpuResources + ?Sized>(self, gpu: &mut G) {
        let count = self.parts.len();
        for part in self.parts {
            gpu.release(ResourceHandle::Geometry(part.geometry));
            gpu.release(ResourceHandle::Material(part.material));
        }
        log::debug!("released model ({count} parts)");
    }
}
