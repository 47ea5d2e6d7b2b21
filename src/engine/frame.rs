//! The per-frame update loop.

use web_time::Instant;

use super::events::ViewerEvent;
use super::ViewerEngine;
use crate::camera::{CameraInput, TransitionKind};
use crate::renderer::{Frame, RenderError, SceneRenderer};
use crate::scene::SceneModel;

impl<R: SceneRenderer> ViewerEngine<R> {
    /// Advance everything to `now` and draw.
    ///
    /// Order within a frame: apply a finished load, then move the camera
    /// (the running transition if there is one, the orbit controls
    /// otherwise), then pulse hotspots, then render.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if the renderer could not draw. State has
    /// already advanced, so the host may simply try again next frame (after
    /// a resize, for a lost surface).
    pub fn frame(&mut self, now: Instant) -> Result<(), RenderError> {
        let dt = self.frame_timing.tick(now);
        self.poll_load();
        self.update_camera(now, dt);
        self.registry.tick(self.elapsed_ms(now));
        self.render()
    }

    /// Whether the frame limiter allows drawing at `now`.
    #[must_use]
    pub fn should_render(&self, now: Instant) -> bool {
        self.frame_timing.should_render(now)
    }

    fn elapsed_ms(&self, now: Instant) -> f64 {
        now.saturating_duration_since(self.epoch).as_secs_f64() * 1000.0
    }

    fn update_camera(&mut self, now: Instant, dt: f32) {
        if !self.animator.is_animating() {
            self.controls.update(&mut self.camera, dt);
            return;
        }
        match self.animator.step(&mut self.camera, &mut self.controls, now) {
            Some(TransitionKind::Hotspot { index, generation }) => {
                self.reveal_hotspot(index, generation);
            }
            Some(kind @ (TransitionKind::Pose | TransitionKind::Reset)) => {
                log::debug!("camera transition {kind:?} finished");
            }
            None => return,
        }
        if self.camera_stale {
            self.ready_camera();
        }
    }

    fn reveal_hotspot(&mut self, index: usize, generation: u64) {
        if generation != self.registry.generation() {
            log::debug!("hotspot {index} from generation {generation} was rebuilt; not revealing");
            return;
        }
        let Some(hotspot) = self.registry.get(index) else {
            return;
        };
        log::info!("revealing hotspot {} '{}'", index + 1, hotspot.content.title);
        self.selected = Some(index);
        self.events.push(ViewerEvent::HotspotRevealed {
            index,
            title: hotspot.content.title.clone(),
            description: hotspot.content.description.clone(),
        });
    }

    fn render(&mut self) -> Result<(), RenderError> {
        let mut items = self
            .model
            .as_ref()
            .map(SceneModel::draw_items)
            .unwrap_or_default();
        items.extend(self.registry.draw_items(self.camera.billboard_rotation()));

        let frame = Frame {
            clear_color: self.config.theme.background_color,
            lighting: self.lighting,
            items: &items,
        };
        self.renderer.render(&self.camera, &frame)
    }
}
