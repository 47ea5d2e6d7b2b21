//! The viewer orchestrator.
//!
//! [`ViewerEngine`] wires the renderer, the orbit controls, the camera
//! animator, the hotspot registry and the hit-test dispatcher together and
//! owns the per-frame loop. It holds no window and reads no clock: the host
//! passes in the time of every frame and event.
//!
//! # Frame loop
//!
//! Each frame, call [`frame`](ViewerEngine::frame). Within one frame the
//! order is fixed: finished loads are applied, then either the running
//! camera transition or the orbit controls move the camera (never both),
//! then hotspots pulse, then the renderer draws.
//!
//! # Input
//!
//! Forward pointer events with [`handle_input`](ViewerEngine::handle_input)
//! and key presses with [`handle_key`](ViewerEngine::handle_key). Outcomes
//! the host should surface (popup content, load failures) are queued as
//! [`ViewerEvent`]s.

mod accessors;
/// Discrete viewer commands.
pub mod command;
/// Host-facing notifications.
pub mod events;
mod frame;
mod input;
mod loading;

use std::sync::Arc;

use glam::Vec3;
use web_time::Instant;

pub use self::command::ViewerCommand;
pub use self::events::ViewerEvent;
use crate::camera::{Camera, CameraAnimator, CameraInput, OrbitControls};
use crate::config::ViewerConfig;
use crate::error::ViewerError;
use crate::hotspot::HotspotRegistry;
use crate::input::{HitTestDispatcher, KeyBindings};
use crate::loader::{AssetLoader, PendingLoad};
use crate::renderer::{Lighting, SceneRenderer, Viewport};
use crate::scene::SceneModel;
use crate::util::frame_timing::FrameTiming;

/// Frame limiter target; 0 renders every frame the host asks for.
const TARGET_FPS: u32 = 0;

/// Interactive hotspot viewer over a [`SceneRenderer`].
pub struct ViewerEngine<R: SceneRenderer> {
    config: ViewerConfig,
    renderer: R,
    camera: Camera,
    controls: OrbitControls,
    animator: CameraAnimator,
    registry: HotspotRegistry,
    dispatcher: HitTestDispatcher,
    key_bindings: KeyBindings,
    lighting: Lighting,
    viewport: Viewport,

    loader: Arc<dyn AssetLoader>,
    pending: Option<PendingLoad>,
    load_generation: u64,
    model: Option<SceneModel>,
    /// Camera distance changed mid-transition; re-ready once it lands.
    camera_stale: bool,

    epoch: Instant,
    frame_timing: FrameTiming,
    events: Vec<ViewerEvent>,
    selected: Option<usize>,
}

impl<R: SceneRenderer> ViewerEngine<R> {
    /// Build the engine and start loading the configured model.
    ///
    /// The camera starts at `(0, 0, cameraDistance)` looking at the origin,
    /// and that pose becomes the target of [`ViewerCommand::ResetCamera`].
    /// An unusable model URL is reported as
    /// [`ViewerEvent::ConfigRejected`]; the engine still runs, without a
    /// model.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::ThreadSpawn`] if the loader thread cannot be
    /// started.
    pub fn new(
        config: ViewerConfig,
        mut renderer: R,
        viewport: Viewport,
        loader: Arc<dyn AssetLoader>,
        now: Instant,
    ) -> Result<Self, ViewerError> {
        let options = &config.settings.camera;
        let base_distance = config.assets.camera_distance;
        let camera = Camera::looking_at(
            Vec3::new(0.0, 0.0, base_distance),
            Vec3::ZERO,
            viewport.aspect(),
            options.fovy,
            options.znear,
            options.zfar,
        );

        let mut controls = OrbitControls::new(options);
        controls.apply_settings(&config.settings);
        controls.set_target(Vec3::ZERO);
        controls.set_viewport_height(viewport.height);

        let mut animator = CameraAnimator::new(base_distance, options);
        animator.save_initial_position(&camera, &controls);

        renderer.resize(viewport);

        let mut engine = Self {
            config,
            renderer,
            camera,
            controls,
            animator,
            registry: HotspotRegistry::new(),
            dispatcher: HitTestDispatcher::new(),
            key_bindings: KeyBindings::default(),
            lighting: Lighting::default(),
            viewport,
            loader,
            pending: None,
            load_generation: 0,
            model: None,
            camera_stale: false,
            epoch: now,
            frame_timing: FrameTiming::new(TARGET_FPS),
            events: Vec::new(),
            selected: None,
        };
        let _ = engine.start_load()?;
        Ok(engine)
    }

    /// Replace the key binding map.
    #[must_use]
    pub fn with_key_bindings(mut self, key_bindings: KeyBindings) -> Self {
        self.key_bindings = key_bindings;
        self
    }

    /// Match the camera and render surface to a new window size. Zero
    /// dimensions are clamped to 1.
    pub fn resize(&mut self, width: u32, height: u32) {
        self.viewport = Viewport::new(width, height);
        self.camera.aspect = self.viewport.aspect();
        self.controls.set_viewport_height(self.viewport.height);
        self.renderer.resize(self.viewport);
        log::debug!("resized to {}x{}", self.viewport.width, self.viewport.height);
    }

    /// Release every renderer resource held for the model and hotspots and
    /// abandon any load in flight. The engine keeps running with an empty
    /// scene.
    pub fn shutdown(&mut self) {
        self.pending = None;
        self.load_generation += 1;
        self.registry.release_all(&mut self.renderer);
        if let Some(model) = self.model.take() {
            model.release(&mut self.renderer);
        }
        let _ = self.close_popup();
    }
}

impl<R: SceneRenderer> Drop for ViewerEngine<R> {
    fn drop(&mut self) {
        self.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use web_time::Duration;

    use super::*;
    use crate::camera::compute_framing_pose;
    use crate::config::{HotspotConfig, HotspotContent, Position};
    use crate::input::{InputEvent, MouseButton};
    use crate::loader::LoadFailure;
    use crate::testing::{InstantLoader, RecordingRenderer};

    const CENTER: Vec2 = Vec2::new(400.0, 300.0);

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn hotspot(position: Position, size: f32, title: &str) -> HotspotConfig {
        HotspotConfig {
            position,
            size,
            content: HotspotContent {
                title: title.to_owned(),
                description: format!("{title} details"),
            },
            ..HotspotConfig::default()
        }
    }

    fn config() -> ViewerConfig {
        let mut config = ViewerConfig::default();
        config.assets.model_url = "./models/cube.glb".to_owned();
        config.settings.hotspots = vec![
            hotspot(Position { x: 0.0, y: 0.0, z: 1.0 }, 0.3, "Front"),
            hotspot(Position { x: 2.0, y: 0.0, z: 0.0 }, 0.2, "Side"),
        ];
        config
    }

    fn engine_with(
        config: ViewerConfig,
        loader: InstantLoader,
    ) -> (ViewerEngine<RecordingRenderer>, Instant) {
        let t0 = Instant::now();
        let engine = ViewerEngine::new(
            config,
            RecordingRenderer::default(),
            Viewport::new(800, 600),
            Arc::new(loader),
            t0,
        )
        .unwrap();
        (engine, t0)
    }

    fn loaded_engine() -> (ViewerEngine<RecordingRenderer>, Instant) {
        let (mut engine, t0) = engine_with(config(), InstantLoader::cube());
        assert!(engine.wait_for_model(Duration::from_secs(5)));
        engine.frame(t0).unwrap();
        let _ = engine.drain_events();
        (engine, t0)
    }

    fn click(engine: &mut ViewerEngine<RecordingRenderer>, at: Vec2, t: Instant) -> bool {
        let left = |pressed| InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed,
        };
        let _ = engine.handle_input(InputEvent::CursorMoved { x: at.x, y: at.y }, t);
        let _ = engine.handle_input(left(true), t);
        engine.handle_input(left(false), t + ms(50))
    }

    #[test]
    fn loads_model_then_builds_hotspots() {
        let (mut engine, t0) = engine_with(config(), InstantLoader::cube());
        assert!(engine.is_loading());
        assert!(engine.hotspots().is_empty());

        assert!(engine.wait_for_model(Duration::from_secs(5)));
        assert!(!engine.is_loading());
        assert_eq!(engine.hotspots().len(), 2);

        engine.frame(t0).unwrap();
        // one model part plus two hotspots
        assert_eq!(engine.renderer().last_items.len(), 3);

        let events = engine.drain_events();
        assert_eq!(
            events,
            vec![
                ViewerEvent::ModelLoading {
                    url: "./models/cube.glb".to_owned()
                },
                ViewerEvent::ModelLoaded {
                    url: "./models/cube.glb".to_owned(),
                    parts: 1,
                    hotspots: 2,
                },
            ]
        );
    }

    #[test]
    fn placeholder_url_is_rejected_without_loading() {
        let mut config = config();
        config.assets.model_url = crate::config::PLACEHOLDER_MODEL_URL.to_owned();
        let (mut engine, t0) = engine_with(config, InstantLoader::cube());

        assert!(!engine.is_loading());
        assert!(matches!(
            engine.drain_events().as_slice(),
            [ViewerEvent::ConfigRejected(
                crate::config::ConfigValidationError::PlaceholderModelUrl(_)
            )]
        ));
        // still renders an empty scene
        engine.frame(t0).unwrap();
        assert_eq!(engine.renderer().frames, 1);
        assert!(engine.renderer().last_items.is_empty());
    }

    #[test]
    fn load_failure_is_reported_and_not_fatal() {
        let loader = InstantLoader::failing(LoadFailure::Http("404".to_owned()));
        let (mut engine, t0) = engine_with(config(), loader);
        assert!(!engine.wait_for_model(Duration::from_secs(5)));
        assert!(!engine.is_loading());

        let events = engine.drain_events();
        let Some(ViewerEvent::ModelLoadFailed(err)) = events.last() else {
            panic!("expected a load failure, got {events:?}");
        };
        assert_eq!(err.url, "./models/cube.glb");
        assert_eq!(err.kind, LoadFailure::Http("404".to_owned()));

        engine.frame(t0 + ms(16)).unwrap();
        assert!(engine.hotspots().is_empty());
        assert!(!click(&mut engine, CENTER, t0 + ms(20)));
    }

    #[test]
    fn clicking_a_hotspot_frames_it_and_reveals_content() {
        let (mut engine, t0) = loaded_engine();
        let start = engine.camera().pose();

        assert!(click(&mut engine, CENTER, t0));
        let started = t0 + ms(50);
        assert!(engine.is_animating());

        let end = compute_framing_pose(Vec3::new(0.0, 0.0, 1.0), 5.0);

        // halfway through the eased curve is halfway along the path
        engine.frame(started + ms(750)).unwrap();
        let halfway = start.position.lerp(end.position, 0.5);
        assert!(engine.camera().eye.distance(halfway) < 1e-4);
        assert!(engine.selected_hotspot().is_none());

        engine.frame(started + ms(1500)).unwrap();
        assert!(!engine.is_animating());
        assert_eq!(engine.camera().eye, end.position);
        assert_eq!(engine.camera().target, end.look_at);
        assert_eq!(engine.selected_hotspot().map(|h| h.index), Some(0));
        assert_eq!(
            engine.drain_events(),
            vec![ViewerEvent::HotspotRevealed {
                index: 0,
                title: "Front".to_owned(),
                description: "Front details".to_owned(),
            }]
        );

        // the controls pick up from the new pose without moving it
        engine.frame(started + ms(1516)).unwrap();
        assert_eq!(engine.camera().eye, end.position);
    }

    #[test]
    fn user_input_cannot_move_the_camera_mid_transition() {
        let (mut engine, t0) = loaded_engine();
        assert!(click(&mut engine, CENTER, t0));
        let started = t0 + ms(50);

        let _ = engine.handle_input(InputEvent::Scroll { delta: 3.0 }, started + ms(100));
        engine.frame(started + ms(1500)).unwrap();
        let landed = engine.camera().eye;

        engine.frame(started + ms(1600)).unwrap();
        assert_eq!(engine.camera().eye, landed);
    }

    #[test]
    fn retrigger_while_animating_is_ignored() {
        let (mut engine, t0) = loaded_engine();
        assert!(click(&mut engine, CENTER, t0));
        let before = engine.animator().in_flight();

        assert!(!engine.execute(ViewerCommand::FocusHotspot(1), t0 + ms(200)));
        assert!(!engine.handle_key("KeyR", t0 + ms(200)));
        assert_eq!(engine.animator().in_flight(), before);
    }

    #[test]
    fn drag_over_hotspot_does_not_select_it() {
        let (mut engine, t0) = loaded_engine();
        let left = |pressed| InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed,
        };
        let _ = engine.handle_input(InputEvent::CursorMoved { x: 380.0, y: 300.0 }, t0);
        let _ = engine.handle_input(left(true), t0);
        let _ = engine.handle_input(InputEvent::CursorMoved { x: 400.0, y: 300.0 }, t0 + ms(30));
        assert!(!engine.handle_input(left(false), t0 + ms(60)));
        assert!(!engine.is_animating());
    }

    #[test]
    fn rebuild_mid_flight_drops_stale_reveal() {
        let (mut engine, t0) = loaded_engine();
        assert!(click(&mut engine, CENTER, t0));

        engine.set_hotspots(config().settings.hotspots);
        engine.frame(t0 + ms(2000)).unwrap();

        assert!(!engine.is_animating());
        assert!(engine.selected_hotspot().is_none());
        assert!(engine.drain_events().is_empty());
    }

    #[test]
    fn reset_returns_to_initial_pose_after_orbiting() {
        let (mut engine, t0) = loaded_engine();
        let initial = engine.camera().pose();
        let left = |pressed| InputEvent::MouseButton {
            button: MouseButton::Left,
            pressed,
        };

        let _ = engine.handle_input(InputEvent::CursorMoved { x: 400.0, y: 300.0 }, t0);
        let _ = engine.handle_input(left(true), t0);
        let _ = engine.handle_input(InputEvent::CursorMoved { x: 500.0, y: 250.0 }, t0 + ms(10));
        let _ = engine.handle_input(left(false), t0 + ms(20));
        for i in 1..=10 {
            engine.frame(t0 + ms(16 * i)).unwrap();
        }
        assert_ne!(engine.camera().eye, initial.position);

        let t1 = t0 + ms(200);
        assert!(engine.handle_key("KeyR", t1));
        engine.frame(t1 + ms(1500)).unwrap();
        assert_eq!(engine.camera().pose(), initial);
    }

    #[test]
    fn keys_close_popup_and_toggle_auto_rotate() {
        let (mut engine, t0) = loaded_engine();
        assert!(engine.handle_key("Digit2", t0));
        engine.frame(t0 + ms(1500)).unwrap();
        assert_eq!(engine.selected_hotspot().map(|h| h.index), Some(1));
        let _ = engine.drain_events();

        assert!(engine.handle_key("Escape", t0 + ms(1600)));
        assert!(engine.selected_hotspot().is_none());
        assert_eq!(engine.drain_events(), vec![ViewerEvent::PopupClosed]);
        assert!(!engine.handle_key("Escape", t0 + ms(1700)));

        assert!(!engine.controls().auto_rotate());
        assert!(engine.handle_key("Space", t0 + ms(1800)));
        assert!(engine.controls().auto_rotate());

        let before = engine.camera().eye;
        engine.frame(t0 + ms(1900)).unwrap();
        assert_ne!(engine.camera().eye, before);
    }

    #[test]
    fn reconfigure_mid_flight_restores_new_flags() {
        let (mut engine, t0) = loaded_engine();
        assert!(click(&mut engine, CENTER, t0));

        let mut next = config();
        next.settings.auto_rotate = true;
        engine.reconfigure(next).unwrap();
        // still suspended
        assert!(!engine.controls().auto_rotate());
        assert!(!engine.controls().enabled());

        engine.frame(t0 + ms(1600)).unwrap();
        assert!(engine.controls().auto_rotate());
        assert!(engine.controls().enabled());
    }

    #[test]
    fn invalid_reconfigure_changes_nothing() {
        let (mut engine, _) = loaded_engine();
        let mut bad = config();
        bad.assets.camera_distance = 0.0;
        bad.context.title = "Broken".to_owned();
        assert!(matches!(engine.reconfigure(bad), Err(ViewerError::Config(_))));
        assert_ne!(engine.config().context.title, "Broken");
        assert!(matches!(
            engine.drain_events().as_slice(),
            [ViewerEvent::ConfigRejected(_)]
        ));
    }

    #[test]
    fn rejected_model_url_clears_the_scene() {
        let (mut engine, t0) = loaded_engine();
        assert!(click(&mut engine, CENTER, t0));
        engine.frame(t0 + ms(1600)).unwrap();
        assert!(engine.selected_hotspot().is_some());
        let _ = engine.drain_events();

        let mut next = config();
        next.assets.model_url = crate::config::PLACEHOLDER_MODEL_URL.to_owned();
        engine.reconfigure(next).unwrap();
        assert!(!engine.is_loading());
        assert!(engine.model().is_none());
        assert!(engine.selected_hotspot().is_none());

        engine.frame(t0 + ms(1700)).unwrap();
        assert!(engine.renderer().last_items.is_empty());
        assert!(engine.hotspots().is_empty());
        assert_eq!(engine.renderer().live(), 0);

        let events = engine.drain_events();
        assert_eq!(events.first(), Some(&ViewerEvent::PopupClosed));
        assert!(matches!(events.last(), Some(ViewerEvent::ConfigRejected(_))));
    }

    #[test]
    fn failed_reload_leaves_no_model() {
        let loader =
            InstantLoader::cube().failing_for("broken", LoadFailure::Http("404".to_owned()));
        let (mut engine, t0) = engine_with(config(), loader);
        assert!(engine.wait_for_model(Duration::from_secs(5)));
        engine.frame(t0).unwrap();
        assert_eq!(engine.renderer().last_items.len(), 3);

        let mut next = config();
        next.assets.model_url = "./models/broken.glb".to_owned();
        engine.reconfigure(next).unwrap();
        assert!(!engine.wait_for_model(Duration::from_secs(5)));

        engine.frame(t0 + ms(16)).unwrap();
        assert!(engine.renderer().last_items.is_empty());
        assert!(engine.hotspots().is_empty());
        assert_eq!(engine.renderer().live(), 0);
        assert!(matches!(
            engine.drain_events().last(),
            Some(ViewerEvent::ModelLoadFailed(_))
        ));

        // reloading the same broken location fails the same way
        assert!(engine.execute(ViewerCommand::ReloadModel, t0 + ms(32)));
        assert!(!engine.wait_for_model(Duration::from_secs(5)));
        assert_eq!(engine.renderer().live(), 0);
    }

    #[test]
    fn new_camera_distance_becomes_the_reset_pose() {
        let (mut engine, t0) = loaded_engine();
        let mut next = config();
        next.assets.camera_distance = 10.0;
        engine.reconfigure(next).unwrap();
        assert_eq!(engine.camera().eye, Vec3::new(0.0, 0.0, 10.0));
        assert_eq!(engine.animator().base_distance(), 10.0);

        let _ = engine.execute(ViewerCommand::ResetCamera, t0 + ms(100));
        engine.frame(t0 + ms(1700)).unwrap();
        assert!(!engine.is_animating());
        assert_eq!(engine.camera().eye, Vec3::new(0.0, 0.0, 10.0));
        assert_eq!(engine.camera().target, Vec3::ZERO);
    }

    #[test]
    fn camera_distance_change_waits_for_running_transition() {
        let (mut engine, t0) = loaded_engine();
        assert!(click(&mut engine, CENTER, t0));
        let started = t0 + ms(50);

        let mut next = config();
        next.assets.camera_distance = 10.0;
        engine.reconfigure(next).unwrap();
        engine.frame(started + ms(750)).unwrap();
        assert!(engine.is_animating());
        assert_ne!(engine.camera().eye, Vec3::new(0.0, 0.0, 10.0));

        engine.frame(started + ms(1500)).unwrap();
        assert!(!engine.is_animating());
        assert_eq!(engine.camera().eye, Vec3::new(0.0, 0.0, 10.0));

        assert!(engine.execute(ViewerCommand::ResetCamera, started + ms(1600)));
        engine.frame(started + ms(3200)).unwrap();
        assert_eq!(engine.camera().eye, Vec3::new(0.0, 0.0, 10.0));
    }

    #[test]
    fn new_model_supersedes_pending_load_without_leaks() {
        let (mut engine, _) = engine_with(config(), InstantLoader::cube());
        let mut next = config();
        next.assets.model_url = "./models/other.glb".to_owned();
        engine.reconfigure(next).unwrap();
        assert!(engine.wait_for_model(Duration::from_secs(5)));

        let loaded: Vec<_> = engine
            .drain_events()
            .into_iter()
            .filter(|e| matches!(e, ViewerEvent::ModelLoaded { .. }))
            .collect();
        assert_eq!(loaded.len(), 1);
        // model geometry + material, two hotspots with geometry + material
        assert_eq!(engine.renderer().live(), 6);

        // reloading replaces the model and hotspots
        assert!(engine.execute(ViewerCommand::ReloadModel, Instant::now()));
        assert!(engine.wait_for_model(Duration::from_secs(5)));
        assert_eq!(engine.renderer().live(), 6);
    }

    #[test]
    fn numbered_mode_draws_badges() {
        let mut config = config();
        config.settings.number_hotspots = true;
        let (mut engine, t0) = engine_with(config, InstantLoader::cube());
        assert!(engine.wait_for_model(Duration::from_secs(5)));
        engine.frame(t0).unwrap();
        let sprites = engine
            .renderer()
            .last_items
            .iter()
            .filter(|i| matches!(i.kind, crate::scene::DrawKind::Sprite { .. }))
            .count();
        assert_eq!(sprites, 2);
    }

    #[test]
    fn resize_updates_camera_and_surface() {
        let (mut engine, _) = loaded_engine();
        engine.resize(0, 300);
        assert_eq!(engine.viewport(), Viewport::new(1, 300));
        assert!((engine.camera().aspect - 1.0 / 300.0).abs() < 1e-6);
        assert_eq!(engine.renderer().viewport, Some(Viewport::new(1, 300)));
    }

    #[test]
    fn shutdown_releases_everything() {
        let (mut engine, t0) = loaded_engine();
        assert!(engine.renderer().live() > 0);
        engine.shutdown();
        assert_eq!(engine.renderer().live(), 0);
        engine.frame(t0 + ms(16)).unwrap();
        assert!(engine.renderer().last_items.is_empty());
    }
}
