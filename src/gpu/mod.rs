//! The wgpu backend.
//!
//! Device and surface setup, growable buffers, pipeline boilerplate, shader
//! uniform layouts, and [`WgpuRenderer`], the [`SceneRenderer`] used by the
//! windowed viewer.
//!
//! [`SceneRenderer`]: crate::renderer::SceneRenderer

/// Growable GPU buffers and uniform packing.
pub mod dynamic_buffer;
/// Uniform blocks shared with the scene shader.
pub mod lighting;
/// Shared wgpu boilerplate for layouts, samplers and pipelines.
pub mod pipeline_helpers;
/// wgpu device, surface, and queue initialization.
pub mod render_context;
mod renderer;

pub use render_context::{RenderContext, RenderContextError};
pub use renderer::WgpuRenderer;
