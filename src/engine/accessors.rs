//! Read-only queries and collaborator access for [`ViewerEngine`].

use super::events::ViewerEvent;
use super::ViewerEngine;
use crate::camera::{Camera, CameraAnimator, OrbitControls};
use crate::config::ViewerConfig;
use crate::hotspot::{Hotspot, HotspotRegistry};
use crate::input::KeyBindings;
use crate::renderer::{Lighting, SceneRenderer, Viewport};
use crate::scene::SceneModel;

// ── Camera ──

impl<R: SceneRenderer> ViewerEngine<R> {
    /// The camera frames are drawn from.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// The orbit controls.
    #[must_use]
    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    /// The scripted-transition state machine.
    #[must_use]
    pub fn animator(&self) -> &CameraAnimator {
        &self.animator
    }

    /// Whether a camera transition is running.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.animator.is_animating()
    }
}

// ── Scene ──

impl<R: SceneRenderer> ViewerEngine<R> {
    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// The loaded model, if any.
    #[must_use]
    pub fn model(&self) -> Option<&SceneModel> {
        self.model.as_ref()
    }

    /// Whether a model load is in flight.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// The current hotspot set.
    #[must_use]
    pub fn hotspots(&self) -> &HotspotRegistry {
        &self.registry
    }

    /// The hotspot whose content is revealed, if any.
    #[must_use]
    pub fn selected_hotspot(&self) -> Option<&Hotspot> {
        self.selected.and_then(|index| self.registry.get(index))
    }

    /// Scene lights.
    #[must_use]
    pub fn lighting(&self) -> &Lighting {
        &self.lighting
    }

    /// Replace the scene lights.
    pub fn set_lighting(&mut self, lighting: Lighting) {
        self.lighting = lighting;
    }
}

// ── Host ──

impl<R: SceneRenderer> ViewerEngine<R> {
    /// Current render surface size.
    #[must_use]
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// The renderer.
    #[must_use]
    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    /// Mutable renderer access (e.g. to recover a lost surface).
    pub fn renderer_mut(&mut self) -> &mut R {
        &mut self.renderer
    }

    /// Active key bindings.
    #[must_use]
    pub fn key_bindings(&self) -> &KeyBindings {
        &self.key_bindings
    }

    /// Smoothed frames per second.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.frame_timing.fps()
    }

    /// Take every event queued since the last call.
    pub fn drain_events(&mut self) -> Vec<ViewerEvent> {
        std::mem::take(&mut self.events)
    }
}
