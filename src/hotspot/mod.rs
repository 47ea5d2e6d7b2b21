//! Interactive markers placed on the model.

mod badge;
mod registry;

pub use badge::{render_badge, BADGE_SIZE};
use glam::{Mat4, Quat, Vec3};
pub use registry::HotspotRegistry;

use crate::config::{Color, HotspotConfig, HotspotContent, HotspotShape};
use crate::picking::{HitProxy, ProxyShape};
use crate::renderer::{GeometryHandle, MaterialHandle, TextureHandle};

/// Amplitude of the pulse scale oscillation.
pub const PULSE_AMPLITUDE: f32 = 0.2;
/// Angular frequency of the pulse, in radians per millisecond.
pub const PULSE_RATE: f64 = 0.003;

/// Pulse scale factor at `now_ms`.
#[must_use]
pub fn pulse_scale(now_ms: f64) -> f32 {
    1.0 + PULSE_AMPLITUDE * (now_ms * PULSE_RATE).sin() as f32
}

/// How a hotspot is drawn. Chosen once per registry rebuild.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HotspotVisual {
    /// Sphere or box mesh with a glowing material.
    Shape {
        /// Mesh of the configured shape and size.
        geometry: GeometryHandle,
        /// Emissive, translucent material in the hotspot color.
        material: MaterialHandle,
    },
    /// Camera-facing numbered badge.
    Badge {
        /// Badge image.
        texture: TextureHandle,
    },
}

/// A marker built from a [`HotspotConfig`].
#[derive(Debug, Clone, PartialEq)]
pub struct Hotspot {
    /// Position in the configuration list (badge number minus one).
    pub index: usize,
    /// Optional stable identifier.
    pub id: Option<String>,
    /// World-space position.
    pub position: Vec3,
    /// Configured geometry.
    pub shape: HotspotShape,
    /// Sphere radius or box edge length.
    pub size: f32,
    /// Marker color.
    pub color: Color,
    /// Whether the marker pulses.
    pub pulsate: bool,
    /// Popup content.
    pub content: HotspotContent,
    scale: f32,
    visual: Option<HotspotVisual>,
}

impl Hotspot {
    /// Hotspot with no renderer resources attached.
    #[must_use]
    pub fn detached(index: usize, config: &HotspotConfig) -> Self {
        Self {
            index,
            id: config.id.clone(),
            position: config.position.into(),
            shape: config.shape,
            size: config.size,
            color: config.color,
            pulsate: config.pulsate,
            content: config.content.clone(),
            scale: 1.0,
            visual: None,
        }
    }

    /// Current uniform scale (pulse).
    #[must_use]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Renderer resources backing this hotspot.
    #[must_use]
    pub fn visual(&self) -> Option<HotspotVisual> {
        self.visual
    }

    /// One-based number shown on badges.
    #[must_use]
    pub fn number(&self) -> usize {
        self.index + 1
    }

    /// Ray-test proxy matching what is drawn.
    #[must_use]
    pub fn hit_proxy(&self) -> HitProxy {
        let shape = match (self.visual, self.shape) {
            (Some(HotspotVisual::Badge { .. }), _) | (_, HotspotShape::Sphere) => {
                ProxyShape::Sphere {
                    radius: self.size * self.scale,
                }
            }
            (_, HotspotShape::Box) => ProxyShape::Box {
                half_extent: self.size * 0.5 * self.scale,
            },
        };
        HitProxy {
            index: self.index,
            center: self.position,
            shape,
        }
    }

    /// Object-to-world transform. Badges face the camera (`billboard`).
    #[must_use]
    pub fn transform(&self, billboard: Quat) -> Mat4 {
        match self.visual {
            Some(HotspotVisual::Badge { .. }) => Mat4::from_scale_rotation_translation(
                Vec3::splat(self.size * 2.0 * self.scale),
                billboard,
                self.position,
            ),
            _ => Mat4::from_scale_rotation_translation(
                Vec3::splat(self.scale),
                Quat::IDENTITY,
                self.position,
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Position;

    #[test]
    fn pulse_stays_within_amplitude() {
        for i in 0..1000 {
            let s = pulse_scale(f64::from(i) * 7.3);
            assert!((0.8 - 1e-6..=1.2 + 1e-6).contains(&s));
        }
        assert_eq!(pulse_scale(0.0), 1.0);
    }

    #[test]
    fn box_proxy_uses_half_edge() {
        let hotspot = Hotspot::detached(
            2,
            &HotspotConfig {
                shape: HotspotShape::Box,
                size: 1.0,
                position: Position { x: 1.0, y: 2.0, z: 3.0 },
                ..HotspotConfig::default()
            },
        );
        let proxy = hotspot.hit_proxy();
        assert_eq!(proxy.index, 2);
        assert_eq!(proxy.center, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(proxy.shape, ProxyShape::Box { half_extent: 0.5 });
        assert_eq!(hotspot.number(), 3);
    }
}
