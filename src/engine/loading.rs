//! Model loading, hotspot rebuilds and configuration changes.

use glam::Vec3;
use web_time::Duration;

use super::events::ViewerEvent;
use super::ViewerEngine;
use crate::camera::CameraInput;
use crate::config::{HotspotConfig, ViewerConfig};
use crate::error::ViewerError;
use crate::loader::{spawn_load, LoadResult};
use crate::renderer::SceneRenderer;
use crate::scene::SceneModel;

impl<R: SceneRenderer> ViewerEngine<R> {
    /// Start loading the configured model, superseding any load in flight.
    /// The current model and its hotspots are torn down first, so a rejected
    /// or failed load leaves an empty scene.
    ///
    /// Returns `Ok(false)` if the model location is rejected by validation
    /// (reported as [`ViewerEvent::ConfigRejected`]).
    pub(super) fn start_load(&mut self) -> Result<bool, ViewerError> {
        self.load_generation += 1;
        if let Some(stale) = self.pending.take() {
            log::debug!("abandoning load of {} (generation {})", stale.url(), stale.generation());
        }
        self.clear_scene();

        let request = match self.config.validate_model() {
            Ok(request) => request,
            Err(e) => {
                log::error!("not loading model: {e}");
                self.events.push(ViewerEvent::ConfigRejected(e));
                return Ok(false);
            }
        };

        log::info!(
            "loading {} model from {} (generation {})",
            request.model_type,
            request.url,
            self.load_generation
        );
        let url = request.url.clone();
        let pending = spawn_load(self.loader.clone(), request, self.load_generation)?;
        self.pending = Some(pending);
        self.events.push(ViewerEvent::ModelLoading { url });
        Ok(true)
    }

    /// Apply the load result if it has arrived. Called at the start of
    /// every frame.
    pub(super) fn poll_load(&mut self) {
        let Some(result) = self.pending.as_ref().and_then(|p| p.try_take()) else {
            return;
        };
        if let Some(pending) = self.pending.take() {
            self.apply_load(pending.generation(), result);
        }
    }

    /// Block up to `timeout` for the model load in flight and apply it.
    /// Returns `true` if a model is in the scene afterwards.
    ///
    /// Meant for headless hosts; interactive hosts just keep calling
    /// [`frame`](Self::frame).
    pub fn wait_for_model(&mut self, timeout: Duration) -> bool {
        let result = self.pending.as_ref().and_then(|p| p.wait(timeout));
        if let Some(result) = result {
            if let Some(pending) = self.pending.take() {
                self.apply_load(pending.generation(), result);
            }
        }
        self.model.is_some()
    }

    fn apply_load(&mut self, generation: u64, result: LoadResult) {
        if generation != self.load_generation {
            log::debug!(
                "dropping result of superseded load (generation {generation}, current {})",
                self.load_generation
            );
            return;
        }

        match result {
            Ok(data) => {
                let model =
                    SceneModel::upload(&data, self.config.assets.model_scale, &mut self.renderer);
                if let Some(previous) = self.model.replace(model) {
                    previous.release(&mut self.renderer);
                }
                self.rebuild_hotspots();

                let parts = self.model.as_ref().map_or(0, SceneModel::part_count);
                log::info!(
                    "model ready: {parts} parts, {} triangles, {} hotspots",
                    data.triangle_count(),
                    self.registry.len()
                );
                self.events.push(ViewerEvent::ModelLoaded {
                    url: self.config.assets.model_url.clone(),
                    parts,
                    hotspots: self.registry.len(),
                });
            }
            Err(e) => {
                log::error!("{e}");
                self.clear_scene();
                self.events.push(ViewerEvent::ModelLoadFailed(e));
            }
        }
    }

    /// Release the model and every hotspot.
    fn clear_scene(&mut self) {
        if let Some(model) = self.model.take() {
            log::debug!("releasing model ({} parts)", model.part_count());
            model.release(&mut self.renderer);
        }
        self.rebuild_hotspots();
    }

    /// Put the camera at `(0, 0, cameraDistance)` facing the origin and make
    /// that the reset pose.
    pub(super) fn ready_camera(&mut self) {
        self.camera_stale = false;
        let distance = self.config.assets.camera_distance;
        self.camera.eye = Vec3::new(0.0, 0.0, distance);
        self.camera.target = Vec3::ZERO;
        self.controls.set_target(Vec3::ZERO);
        self.animator.save_initial_position(&self.camera, &self.controls);
        log::debug!("camera readied at distance {distance}");
    }

    /// Rebuild the hotspot set from the configuration. Without a model the
    /// set is emptied.
    fn rebuild_hotspots(&mut self) {
        let _ = self.close_popup();
        if self.model.is_none() {
            self.registry.release_all(&mut self.renderer);
            return;
        }
        let _ = self.registry.rebuild(
            &self.config.settings.hotspots,
            self.config.settings.number_hotspots,
            &mut self.renderer,
        );
    }

    /// Replace the hotspot list and rebuild the set. A camera transition in
    /// flight keeps running but will not reveal content from the old set.
    pub fn set_hotspots(&mut self, hotspots: Vec<HotspotConfig>) {
        self.config.settings.hotspots = hotspots;
        self.rebuild_hotspots();
    }

    /// Apply a new configuration.
    ///
    /// Interaction settings take effect immediately. The model is reloaded
    /// when its location, type or scale changed; otherwise only the hotspot
    /// set is rebuilt. A new camera distance moves the camera back to
    /// `(0, 0, cameraDistance)` and makes that the reset pose. A running
    /// camera transition is not interrupted; it restores the new settings
    /// and then applies the new distance when it finishes.
    ///
    /// # Errors
    ///
    /// Returns [`ViewerError::Config`] (and changes nothing) if the document
    /// fails validation, or [`ViewerError::ThreadSpawn`] if the reload cannot
    /// start.
    pub fn reconfigure(&mut self, config: ViewerConfig) -> Result<(), ViewerError> {
        if let Err(e) = config.validate() {
            log::error!("configuration rejected: {e}");
            self.events.push(ViewerEvent::ConfigRejected(e.clone()));
            return Err(e.into());
        }

        let reload = config.assets.model_url != self.config.assets.model_url
            || config.assets.model_type != self.config.assets.model_type
            || config.assets.model_scale != self.config.assets.model_scale;
        let moved = config.assets.camera_distance != self.config.assets.camera_distance;
        self.config = config;

        let settings = &self.config.settings;
        self.controls.apply_settings(settings);
        self.animator
            .configure(self.config.assets.camera_distance, &settings.camera);
        if self
            .animator
            .override_restored_flags(settings.auto_rotate, settings.enable_controls)
        {
            // stay suspended until the transition hands control back
            self.controls.set_auto_rotate(false);
            self.controls.set_enabled(false);
        }
        self.camera.fovy = settings.camera.fovy;
        self.camera.znear = settings.camera.znear;
        self.camera.zfar = settings.camera.zfar;
        if moved {
            if self.animator.is_animating() {
                self.camera_stale = true;
            } else {
                self.ready_camera();
            }
        }
        log::info!("configuration '{}' applied", self.config.context.title);

        if reload {
            let _ = self.start_load()?;
        } else {
            self.rebuild_hotspots();
        }
        Ok(())
    }
}
