//! The renderer collaborator.
//!
//! The engine never talks to the GPU directly. It creates resources through
//! [`GpuResources`], hands a [`Frame`] draw list plus the camera to
//! [`SceneRenderer::render`] each tick, and asks [`SceneRenderer::intersect`]
//! for ray hits. [`crate::gpu::WgpuRenderer`] is the wgpu implementation.

use std::fmt;

use glam::Vec3;

use crate::camera::Camera;
use crate::config::Color;
use crate::picking::{intersect_proxies, HitProxy, Ray, RayHit};
use crate::scene::{DrawItem, MeshData};

/// Renderer-owned geometry (vertex + index buffers).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct GeometryHandle(pub u32);

/// Renderer-owned material parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MaterialHandle(pub u32);

/// Renderer-owned texture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TextureHandle(pub u32);

/// Any renderer resource, for release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceHandle {
    /// A geometry.
    Geometry(GeometryHandle),
    /// A material.
    Material(MaterialHandle),
    /// A texture.
    Texture(TextureHandle),
}

/// Surface appearance of a mesh.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialDesc {
    /// Base (diffuse) color.
    pub color: Color,
    /// Emitted color, added regardless of lighting.
    pub emissive: Color,
    /// Scale applied to `emissive`.
    pub emissive_intensity: f32,
    /// Overall opacity; below 1 the mesh is alpha blended.
    pub opacity: f32,
}

impl MaterialDesc {
    /// Plain lit surface. Opacity follows the color's alpha.
    #[must_use]
    pub fn lit(color: Color) -> Self {
        Self {
            color,
            emissive: Color::BLACK,
            emissive_intensity: 0.0,
            opacity: color.a,
        }
    }

    /// Glowing, translucent marker surface.
    #[must_use]
    pub fn hotspot(color: Color) -> Self {
        Self {
            color,
            emissive: color,
            emissive_intensity: 0.5,
            opacity: 0.8,
        }
    }
}

/// Tightly packed 8-bit RGBA image, rows top to bottom.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RgbaImage {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `width * height * 4` bytes.
    pub pixels: Vec<u8>,
}

impl RgbaImage {
    /// Fully transparent image.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; (width * height * 4) as usize],
        }
    }

    /// Pixel at (`x`, `y`), or `None` outside the image.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = ((y * self.width + x) * 4) as usize;
        Some([
            self.pixels[i],
            self.pixels[i + 1],
            self.pixels[i + 2],
            self.pixels[i + 3],
        ])
    }

    /// Overwrite the pixel at (`x`, `y`); ignored outside the image.
    pub fn put(&mut self, x: u32, y: u32, rgba: [u8; 4]) {
        if x < self.width && y < self.height {
            let i = ((y * self.width + x) * 4) as usize;
            self.pixels[i..i + 4].copy_from_slice(&rgba);
        }
    }
}

/// A light shining along a fixed direction.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalLight {
    /// Position the light shines from; it points toward the origin.
    pub position: Vec3,
    /// Intensity multiplier.
    pub intensity: f32,
}

/// Scene lighting: white ambient plus two directional lights.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Lighting {
    /// Ambient intensity.
    pub ambient: f32,
    /// Key and fill lights.
    pub lights: [DirectionalLight; 2],
}

impl Default for Lighting {
    fn default() -> Self {
        Self {
            ambient: 0.6,
            lights: [
                DirectionalLight {
                    position: Vec3::splat(5.0),
                    intensity: 0.8,
                },
                DirectionalLight {
                    position: Vec3::splat(-5.0),
                    intensity: 0.4,
                },
            ],
        }
    }
}

/// Render surface size in physical pixels. Never zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    /// Width in pixels (at least 1).
    pub width: u32,
    /// Height in pixels (at least 1).
    pub height: u32,
}

impl Viewport {
    /// Viewport of the given size, clamped to at least 1x1.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width: width.max(1),
            height: height.max(1),
        }
    }

    /// Width / height.
    #[must_use]
    pub fn aspect(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// Pixel position (origin top-left, +Y down) to normalized device
    /// coordinates (origin center, +Y up).
    #[must_use]
    pub fn to_ndc(&self, x: f32, y: f32) -> glam::Vec2 {
        glam::Vec2::new(
            (x / self.width as f32) * 2.0 - 1.0,
            -(y / self.height as f32) * 2.0 + 1.0,
        )
    }
}

/// Everything the renderer needs for one frame besides the camera.
#[derive(Debug, Clone, Copy)]
pub struct Frame<'a> {
    /// Background color.
    pub clear_color: Color,
    /// Lights.
    pub lighting: Lighting,
    /// Draw list, opaque and translucent mixed.
    pub items: &'a [DrawItem],
}

/// A frame that could not be drawn.
#[derive(Debug)]
pub enum RenderError {
    /// The swapchain surface could not provide a texture.
    Surface(wgpu::SurfaceError),
    /// A draw item referenced a released or unknown resource.
    UnknownResource(ResourceHandle),
}

impl fmt::Display for RenderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Surface(e) => write!(f, "surface error: {e}"),
            Self::UnknownResource(handle) => {
                write!(f, "draw item references unknown resource {handle:?}")
            }
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Surface(e) => Some(e),
            Self::UnknownResource(_) => None,
        }
    }
}

impl From<wgpu::SurfaceError> for RenderError {
    fn from(e: wgpu::SurfaceError) -> Self {
        Self::Surface(e)
    }
}

/// Resource creation and explicit release.
///
/// Nothing is reclaimed automatically: every handle returned here must be
/// passed back to [`release`](Self::release) once superseded.
pub trait GpuResources {
    /// Upload a mesh.
    fn create_geometry(&mut self, mesh: &MeshData) -> GeometryHandle;
    /// Create a material.
    fn create_material(&mut self, desc: &MaterialDesc) -> MaterialHandle;
    /// Upload an image.
    fn create_texture(&mut self, image: &RgbaImage) -> TextureHandle;
    /// Free a resource. Releasing an unknown handle is a no-op.
    fn release(&mut self, handle: ResourceHandle);
}

/// Draws frames and answers ray queries.
pub trait SceneRenderer: GpuResources {
    /// Match the render surface to a new viewport.
    fn resize(&mut self, viewport: Viewport);

    /// Draw one frame from `camera`.
    fn render(&mut self, camera: &Camera, frame: &Frame<'_>) -> Result<(), RenderError>;

    /// Hits of `ray` against `candidates`, nearest first.
    fn intersect(&self, ray: &Ray, candidates: &[HitProxy]) -> Vec<RayHit> {
        intersect_proxies(ray, candidates)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn viewport_never_zero() {
        let v = Viewport::new(0, 0);
        assert_eq!((v.width, v.height), (1, 1));
        assert_eq!(v.aspect(), 1.0);
    }

    #[test]
    fn ndc_mapping() {
        let v = Viewport::new(800, 600);
        assert_eq!(v.to_ndc(0.0, 0.0), glam::Vec2::new(-1.0, 1.0));
        assert_eq!(v.to_ndc(800.0, 600.0), glam::Vec2::new(1.0, -1.0));
        assert_eq!(v.to_ndc(400.0, 300.0), glam::Vec2::ZERO);
    }

    #[test]
    fn hotspot_material_glows() {
        let red = Color::rgb(1.0, 0.0, 0.0);
        let m = MaterialDesc::hotspot(red);
        assert_eq!(m.emissive, red);
        assert_eq!(m.emissive_intensity, 0.5);
        assert_eq!(m.opacity, 0.8);
    }

    #[test]
    fn image_put_and_read() {
        let mut img = RgbaImage::new(2, 2);
        img.put(1, 0, [1, 2, 3, 4]);
        img.put(5, 5, [9; 4]);
        assert_eq!(img.pixel(1, 0), Some([1, 2, 3, 4]));
        assert_eq!(img.pixel(0, 1), Some([0; 4]));
        assert_eq!(img.pixel(2, 0), None);
    }
}
