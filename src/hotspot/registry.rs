use glam::Quat;

use super::badge::render_badge;
use super::{pulse_scale, Hotspot, HotspotVisual};
use crate::config::{HotspotConfig, HotspotShape};
use crate::picking::HitProxy;
use crate::renderer::{GpuResources, MaterialDesc, ResourceHandle};
use crate::scene::{DrawItem, DrawKind, MeshData};

/// Sphere tessellation used for hotspot markers.
const SPHERE_SEGMENTS: u32 = 16;

/// Owns the current hotspot set and the renderer resources behind it.
///
/// The set is only ever replaced as a whole. Every rebuild (and
/// [`release_all`](Self::release_all)) bumps the generation so work tied to
/// an older set can tell it has been superseded.
#[derive(Debug, Default)]
pub struct HotspotRegistry {
    hotspots: Vec<Hotspot>,
    numbered: bool,
    generation: u64,
}

impl HotspotRegistry {
    /// Empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the whole set. Resources of the previous set are released
    /// before the new ones are created.
    ///
    /// With `numbered` set, every hotspot is drawn as a numbered badge and
    /// none of them pulse.
    pub fn rebuild<G: GpuResources + ?Sized>(
        &mut self,
        configs: &[HotspotConfig],
        numbered: bool,
        gpu: &mut G,
    ) -> &[Hotspot] {
        self.release_all(gpu);
        self.numbered = numbered;

        self.hotspots = configs
            .iter()
            .enumerate()
            .map(|(index, config)| {
                let mut hotspot = Hotspot::detached(index, config);
                hotspot.visual = Some(if numbered {
                    HotspotVisual::Badge {
                        texture: gpu.create_texture(&render_badge(hotspot.number(), config.color)),
                    }
                } else {
                    let mesh = match config.shape {
                        HotspotShape::Box => MeshData::cube(config.size),
                        HotspotShape::Sphere => {
                            MeshData::sphere(config.size, SPHERE_SEGMENTS, SPHERE_SEGMENTS)
                        }
                    };
                    HotspotVisual::Shape {
                        geometry: gpu.create_geometry(&mesh),
                        material: gpu.create_material(&MaterialDesc::hotspot(config.color)),
                    }
                });
                hotspot
            })
            .collect();

        log::info!(
            "built {} hotspots as {} (generation {})",
            self.hotspots.len(),
            if numbered { "badges" } else { "shapes" },
            self.generation
        );
        &self.hotspots
    }

    /// Release every resource and empty the set.
    pub fn release_all<G: GpuResources + ?Sized>(&mut self, gpu: &mut G) {
        self.generation += 1;
        if self.hotspots.is_empty() {
            return;
        }
        let count = self.hotspots.len();
        for hotspot in self.hotspots.drain(..) {
            match hotspot.visual {
                Some(HotspotVisual::Shape { geometry, material }) => {
                    gpu.release(ResourceHandle::Geometry(geometry));
                    gpu.release(ResourceHandle::Material(material));
                }
                Some(HotspotVisual::Badge { texture }) => {
                    gpu.release(ResourceHandle::Texture(texture));
                }
                None => {}
            }
        }
        log::debug!("released {count} hotspots");
    }

    /// Update pulse scales for `now_ms`. Badges never pulse.
    pub fn tick(&mut self, now_ms: f64) {
        if self.numbered {
            return;
        }
        let scale = pulse_scale(now_ms);
        for hotspot in self.hotspots.iter_mut().filter(|h| h.pulsate) {
            hotspot.scale = scale;
        }
    }

    /// Current set, in configuration order.
    #[must_use]
    pub fn hotspots(&self) -> &[Hotspot] {
        &self.hotspots
    }

    /// Hotspot at `index`.
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Hotspot> {
        self.hotspots.get(index)
    }

    /// Number of hotspots.
    #[must_use]
    pub fn len(&self) -> usize {
        self.hotspots.len()
    }

    /// Whether the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.hotspots.is_empty()
    }

    /// Whether the current set is drawn as badges.
    #[must_use]
    pub fn is_numbered(&self) -> bool {
        self.numbered
    }

    /// Incremented on every rebuild and release.
    #[must_use]
    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// Ray-test proxies for every hotspot.
    #[must_use]
    pub fn hit_proxies(&self) -> Vec<HitProxy> {
        self.hotspots.iter().map(Hotspot::hit_proxy).collect()
    }

    /// Draw items for every hotspot; badges are turned by `billboard`.
    #[must_use]
    pub fn draw_items(&self, billboard: Quat) -> Vec<DrawItem> {
        self.hotspots
            .iter()
            .filter_map(|hotspot| {
                let kind = match hotspot.visual? {
                    HotspotVisual::Shape { geometry, material } => {
                        DrawKind::Mesh { geometry, material }
                    }
                    HotspotVisual::Badge { texture } => DrawKind::Sprite { texture },
                };
                Some(DrawItem {
                    kind,
                    transform: hotspot.transform(billboard),
                })
            })
            .collect()
    }
}
