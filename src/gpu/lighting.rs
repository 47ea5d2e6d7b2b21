//! Uniform blocks shared by the scene shader.

use crate::config::Color;
use crate::renderer::Lighting;

/// Scene lighting as the shader sees it.
///
/// WGSL layout:
///   light1_dir: vec3<f32>     (offset 0,  align 16)
///   light1_intensity: f32     (offset 12)
///   light2_dir: vec3<f32>     (offset 16, align 16)
///   light2_intensity: f32     (offset 28)
///   ambient: f32              (offset 32)
///   _pad: 3 x f32             (offset 36)
///   Total: 48 bytes
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct LightingUniform {
    /// Unit vector toward the key light.
    pub light1_dir: [f32; 3],
    /// Key light strength.
    pub light1_intensity: f32,
    /// Unit vector toward the fill light.
    pub light2_dir: [f32; 3],
    /// Fill light strength.
    pub light2_intensity: f32,
    /// Ambient term added to every lit fragment.
    pub ambient: f32,
    /// Pads the struct to 48 bytes.
    pub _pad: [f32; 3],
}

impl From<&Lighting> for LightingUniform {
    fn from(lighting: &Lighting) -> Self {
        let [key, fill] = lighting.lights;
        Self {
            light1_dir: key.position.normalize_or_zero().to_array(),
            light1_intensity: key.intensity,
            light2_dir: fill.position.normalize_or_zero().to_array(),
            light2_intensity: fill.intensity,
            ambient: lighting.ambient,
            _pad: [0.0; 3],
        }
    }
}

/// Per-draw parameters, bound with a dynamic offset.
///
/// WGSL layout:
///   model: mat4x4<f32>        (offset 0)
///   color: vec4<f32>          (offset 64)
///   emissive: vec4<f32>       (offset 80, rgb premultiplied by intensity)
///   params: vec4<f32>         (offset 96: opacity, lit, 0, 0)
///   Total: 112 bytes
#[repr(C)]
#[derive(Debug, Copy, Clone, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct DrawUniform {
    /// Object-to-world transform.
    pub model: [[f32; 4]; 4],
    /// Linear base color.
    pub color: [f32; 4],
    /// Linear emissive color scaled by its intensity.
    pub emissive: [f32; 4],
    /// Opacity, lit flag (1.0 or 0.0), unused, unused.
    pub params: [f32; 4],
}

/// Convert an sRGB-encoded channel to linear.
pub fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

/// Color as shader input. Render targets with an sRGB format encode on
/// write, so the config's sRGB values are decoded first.
pub fn shader_color(color: Color, srgb_target: bool) -> [f32; 4] {
    if srgb_target {
        [
            srgb_to_linear(color.r),
            srgb_to_linear(color.g),
            srgb_to_linear(color.b),
            color.a,
        ]
    } else {
        color.to_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uniform_sizes_match_shader() {
        assert_eq!(size_of::<LightingUniform>(), 48);
        assert_eq!(size_of::<DrawUniform>(), 112);
    }

    #[test]
    fn default_lights_point_at_origin() {
        let u = LightingUniform::from(&Lighting::default());
        let s = 1.0 / 3f32.sqrt();
        for (a, b) in u.light1_dir.iter().zip([s, s, s]) {
            assert!((a - b).abs() < 1e-6);
        }
        assert!((u.light2_dir[0] + s).abs() < 1e-6);
        assert_eq!(u.light1_intensity, 0.8);
        assert_eq!(u.ambient, 0.6);
    }

    #[test]
    fn srgb_decoding_keeps_endpoints_and_alpha() {
        let c = shader_color(Color::WHITE.with_alpha(0.5), true);
        assert!((c[0] - 1.0).abs() < 1e-6);
        assert_eq!(c[3], 0.5);
        let mid = shader_color(Color::rgb(0.5, 0.5, 0.5), true);
        assert!((mid[0] - 0.214).abs() < 1e-3);
        assert_eq!(shader_color(Color::rgb(0.5, 0.5, 0.5), false)[0], 0.5);
    }
}
