//! GPU device, presentation surface and the depth target that follows it.
//!
//! The context keeps the depth attachment in lockstep with the surface:
//! every size change goes through [`RenderContext::resize`], which
//! reconfigures the surface and rebuilds the depth texture together.

use std::fmt;

use crate::renderer::Viewport;

/// Depth buffer format used by every scene pass.
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Why the viewer could not get a GPU to draw with.
#[derive(Debug)]
pub enum RenderContextError {
    /// The window cannot be presented to.
    Surface(wgpu::CreateSurfaceError),
    /// No adapter can present to the window.
    NoAdapter(wgpu::RequestAdapterError),
    /// The adapter refused to open a device.
    Device(wgpu::RequestDeviceError),
    /// The adapter offers no configuration for this surface.
    IncompatibleSurface {
        /// Adapter name as reported by the driver.
        adapter: String,
    },
}

impl fmt::Display for RenderContextError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Surface(e) => write!(f, "cannot present to window: {e}"),
            Self::NoAdapter(e) => write!(f, "no GPU adapter for this window: {e}"),
            Self::Device(e) => write!(f, "GPU device unavailable: {e}"),
            Self::IncompatibleSurface { adapter } => {
                write!(f, "adapter '{adapter}' cannot drive this window surface")
            }
        }
    }
}

impl std::error::Error for RenderContextError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Surface(e) => Some(e),
            Self::NoAdapter(e) => Some(e),
            Self::Device(e) => Some(e),
            Self::IncompatibleSurface { .. } => None,
        }
    }
}

/// Device and queue plus the surface frames are presented to and its depth
/// attachment.
pub struct RenderContext {
    /// The wgpu logical device.
    pub device: wgpu::Device,
    /// The wgpu command queue.
    pub queue: wgpu::Queue,
    surface: Option<wgpu::Surface<'static>>,
    config: wgpu::SurfaceConfiguration,
    depth_view: wgpu::TextureView,
}

impl RenderContext {
    /// Open a device able to present to `window`, sized to `viewport`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderContextError`] if the window, adapter or device is
    /// unusable.
    pub async fn new(
        window: impl Into<wgpu::SurfaceTarget<'static>>,
        viewport: Viewport,
    ) -> Result<Self, RenderContextError> {
        let instance = wgpu::Instance::default();
        let surface = instance
            .create_surface(window)
            .map_err(RenderContextError::Surface)?;

        let adapter = instance
            .request_adapter(&wgpu::RequestAdapterOptions {
                compatible_surface: Some(&surface),
                ..Default::default()
            })
            .await
            .map_err(RenderContextError::NoAdapter)?;
        let adapter_name = adapter.get_info().name;

        let (device, queue) = adapter
            .request_device(&wgpu::DeviceDescriptor {
                label: Some("Viewer Device"),
                required_limits: wgpu::Limits::default(),
                ..Default::default()
            })
            .await
            .map_err(RenderContextError::Device)?;

        let mut config = surface
            .get_default_config(&adapter, viewport.width, viewport.height)
            .ok_or_else(|| RenderContextError::IncompatibleSurface {
                adapter: adapter_name.clone(),
            })?;
        config.present_mode = wgpu::PresentMode::AutoVsync;
        surface.configure(&device, &config);
        log::info!(
            "presenting on '{adapter_name}' as {:?} at {}x{}",
            config.format,
            config.width,
            config.height
        );

        let depth_view = depth_target(&device, &config);
        Ok(Self {
            device,
            queue,
            surface: Some(surface),
            config,
            depth_view,
        })
    }

    /// Context over a device owned by the host. There is no surface, so
    /// [`acquire_frame`](Self::acquire_frame) always fails; the host draws
    /// into its own targets of `format`.
    #[must_use]
    pub fn headless(
        device: wgpu::Device,
        queue: wgpu::Queue,
        format: wgpu::TextureFormat,
        viewport: Viewport,
    ) -> Self {
        let config = wgpu::SurfaceConfiguration {
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            format,
            width: viewport.width,
            height: viewport.height,
            present_mode: wgpu::PresentMode::AutoVsync,
            desired_maximum_frame_latency: 2,
            alpha_mode: wgpu::CompositeAlphaMode::Auto,
            view_formats: Vec::new(),
        };
        let depth_view = depth_target(&device, &config);
        Self {
            device,
            queue,
            surface: None,
            config,
            depth_view,
        }
    }

    /// The color format frames are drawn in.
    pub fn format(&self) -> wgpu::TextureFormat {
        self.config.format
    }

    /// Current drawable size.
    pub fn viewport(&self) -> Viewport {
        Viewport::new(self.config.width, self.config.height)
    }

    /// Depth attachment matching the current size.
    pub fn depth_view(&self) -> &wgpu::TextureView {
        &self.depth_view
    }

    /// Follow the window to `viewport`. Returns `false` if the size did not
    /// change, in which case nothing is rebuilt.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        if self.viewport() == viewport {
            return false;
        }
        self.config.width = viewport.width;
        self.config.height = viewport.height;
        self.configure_surface();
        self.depth_view = depth_target(&self.device, &self.config);
        true
    }

    fn configure_surface(&self) {
        if let Some(surface) = &self.surface {
            surface.configure(&self.device, &self.config);
        }
    }

    /// Next surface texture to draw into.
    ///
    /// An outdated or lost surface is reconfigured at the current size and
    /// asked once more before the error is handed back.
    ///
    /// # Errors
    ///
    /// Returns [`wgpu::SurfaceError`] if no frame could be acquired, and
    /// [`wgpu::SurfaceError::Lost`] for a headless context.
    pub fn acquire_frame(&self) -> Result<wgpu::SurfaceTexture, wgpu::SurfaceError> {
        let Some(surface) = &self.surface else {
            return Err(wgpu::SurfaceError::Lost);
        };
        match surface.get_current_texture() {
            Err(e @ (wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost)) => {
                log::warn!("surface {e}; reconfiguring");
                self.configure_surface();
                surface.get_current_texture()
            }
            other => other,
        }
    }

    /// Record commands with `record` and submit them as one command buffer.
    pub fn submit_with(&self, label: &str, record: impl FnOnce(&mut wgpu::CommandEncoder)) {
        let mut encoder = self
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some(label) });
        record(&mut encoder);
        let _ = self.queue.submit(std::iter::once(encoder.finish()));
    }
}

fn depth_target(device: &wgpu::Device, config: &wgpu::SurfaceConfiguration) -> wgpu::TextureView {
    device
        .create_texture(&wgpu::TextureDescriptor {
            label: Some("Scene Depth"),
            size: wgpu::Extent3d {
                width: config.width,
                height: config.height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        })
        .create_view(&wgpu::TextureViewDescriptor::default())
}
