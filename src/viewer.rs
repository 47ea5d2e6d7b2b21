//! Standalone viewer window backed by winit.
//!
//! ```no_run
//! # use vitrine::Viewer;
//! Viewer::builder()
//!     .with_config_path("app-config/appConfig.json")
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::{path::PathBuf, sync::Arc};

use web_time::Instant;
use winit::{
    application::ApplicationHandler,
    event::{ElementState, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::{
    config::{ViewerConfig, DEFAULT_CONFIG_PATH},
    engine::{events::ViewerEvent, ViewerEngine},
    error::ViewerError,
    gpu::{RenderContext, WgpuRenderer},
    input::InputEvent,
    loader::GltfLoader,
    renderer::{RenderError, Viewport},
};

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    config_path: PathBuf,
    config: Option<ViewerConfig>,
    title: Option<String>,
}

impl ViewerBuilder {
    fn new() -> Self {
        Self {
            config_path: PathBuf::from(DEFAULT_CONFIG_PATH),
            config: None,
            title: None,
        }
    }

    /// Read the configuration document from `path` (JSON or TOML by
    /// extension).
    #[must_use]
    pub fn with_config_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config_path = path.into();
        self
    }

    /// Use an in-memory configuration instead of reading a file.
    #[must_use]
    pub fn with_config(mut self, config: ViewerConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Override the window title (defaults to the configured title).
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        Viewer {
            config_path: self.config_path,
            config: self.config,
            title: self.title,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A window showing one configured model with its hotspots.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    config_path: PathBuf,
    config: Option<ViewerConfig>,
    title: Option<String>,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError`] if the configuration cannot be read or the
    /// event loop fails to start.
    pub fn run(self) -> Result<(), ViewerError> {
        let config = match self.config {
            Some(config) => config,
            None => ViewerConfig::load(&self.config_path)?,
        };
        let title = self
            .title
            .unwrap_or_else(|| config.context.title.clone());

        let event_loop =
            EventLoop::new().map_err(|e| ViewerError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = ViewerApp {
            window: None,
            engine: None,
            config: Some(config),
            title,
        };
        event_loop
            .run_app(&mut app)
            .map_err(|e| ViewerError::Viewer(e.to_string()))
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

struct ViewerApp {
    window: Option<Arc<Window>>,
    engine: Option<ViewerEngine<WgpuRenderer>>,
    config: Option<ViewerConfig>,
    title: String,
}

fn viewport_of(window: &Window) -> Viewport {
    let inner = window.inner_size();
    Viewport::new(inner.width, inner.height)
}

impl ViewerApp {
    fn create_engine(
        &mut self,
        window: &Arc<Window>,
    ) -> Result<ViewerEngine<WgpuRenderer>, ViewerError> {
        let viewport = viewport_of(window);
        let context = pollster::block_on(RenderContext::new(window.clone(), viewport))?;
        let renderer = WgpuRenderer::new(context);
        let config = self.config.take().unwrap_or_default();
        ViewerEngine::new(
            config,
            renderer,
            viewport,
            Arc::new(GltfLoader::new()),
            Instant::now(),
        )
    }

    /// Surface engine notifications: popup content goes to the log and the
    /// window title.
    fn report_events(&mut self) {
        let (Some(engine), Some(window)) = (&mut self.engine, &self.window) else {
            return;
        };
        for event in engine.drain_events() {
            match event {
                ViewerEvent::HotspotRevealed {
                    index,
                    title,
                    description,
                } => {
                    log::info!("[hotspot {}] {title}: {description}", index + 1);
                    window.set_title(&format!("{} | {title}", self.title));
                }
                ViewerEvent::PopupClosed => window.set_title(&self.title),
                ViewerEvent::ModelLoadFailed(e) => log::error!("{e}"),
                ViewerEvent::ConfigRejected(e) => log::error!("{e}"),
                other => log::debug!("{other:?}"),
            }
        }
    }

    fn redraw(&mut self) {
        let (Some(engine), Some(window)) = (&mut self.engine, &self.window) else {
            return;
        };
        let now = Instant::now();
        if engine.should_render(now) {
            match engine.frame(now) {
                Ok(()) => {}
                Err(RenderError::Surface(
                    wgpu::SurfaceError::Outdated | wgpu::SurfaceError::Lost,
                )) => {
                    let viewport = viewport_of(window);
                    engine.resize(viewport.width, viewport.height);
                }
                Err(e) => log::error!("render error: {e}"),
            }
        }
        window.request_redraw();
        self.report_events();
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let attrs = Window::default_attributes()
            .with_title(&self.title)
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 800));
        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        match self.create_engine(&window) {
            Ok(engine) => self.engine = Some(engine),
            Err(e) => {
                log::error!("Failed to initialize viewer: {e}");
                event_loop.exit();
                return;
            }
        }

        window.request_redraw();
        self.window = Some(window);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::CloseRequested) {
            if let Some(engine) = &mut self.engine {
                engine.shutdown();
            }
            event_loop.exit();
            return;
        }
        if matches!(event, WindowEvent::RedrawRequested) {
            self.redraw();
            return;
        }

        let Some(engine) = &mut self.engine else {
            return;
        };
        let now = Instant::now();

        match event {
            WindowEvent::Resized(size) => {
                engine.resize(size.width, size.height);
            }

            WindowEvent::MouseInput { button, state, .. } => {
                let _ = engine.handle_input(
                    InputEvent::MouseButton {
                        button: button.into(),
                        pressed: state == ElementState::Pressed,
                    },
                    now,
                );
            }

            WindowEvent::CursorMoved { position, .. } => {
                #[allow(clippy::cast_possible_truncation)]
                let _ = engine.handle_input(
                    InputEvent::CursorMoved {
                        x: position.x as f32,
                        y: position.y as f32,
                    },
                    now,
                );
            }

            WindowEvent::CursorLeft { .. } => {
                let _ = engine.handle_input(InputEvent::CursorLeft, now);
            }

            WindowEvent::MouseWheel { delta, .. } => {
                #[allow(clippy::cast_possible_truncation)]
                let scroll_delta = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 * 0.01,
                };
                let _ = engine.handle_input(
                    InputEvent::Scroll {
                        delta: scroll_delta,
                    },
                    now,
                );
            }

            WindowEvent::ModifiersChanged(modifiers) => {
                let _ = engine.handle_input(
                    InputEvent::ModifiersChanged {
                        shift: modifiers.state().shift_key(),
                    },
                    now,
                );
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if event.state != ElementState::Pressed || event.repeat {
                    return;
                }
                use winit::keyboard::PhysicalKey;
                let PhysicalKey::Code(code) = event.physical_key else {
                    return;
                };
                let _ = engine.handle_key(&format!("{code:?}"), now);
            }

            _ => (),
        }
    }
}
