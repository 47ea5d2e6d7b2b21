//! The engine's interactive vocabulary.
//!
//! Every user-facing operation, whether it comes from a key press, a UI
//! button or a host program, is a `ViewerCommand` passed to
//! [`ViewerEngine::execute`](super::ViewerEngine::execute).

use web_time::Instant;

use super::events::ViewerEvent;
use super::ViewerEngine;
use crate::camera::CameraInput;
use crate::renderer::SceneRenderer;

/// Discrete viewer actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerCommand {
    /// Fly back to the initial camera pose.
    ResetCamera,
    /// Fly to the hotspot at this index and reveal it on arrival.
    FocusHotspot(usize),
    /// Dismiss the revealed hotspot.
    ClosePopup,
    /// Toggle turntable auto-rotation.
    ToggleAutoRotate,
    /// Load the configured model again.
    ReloadModel,
}

impl<R: SceneRenderer> ViewerEngine<R> {
    /// Run `command`. Returns `true` if it changed anything.
    ///
    /// Camera commands are ignored while a transition is running.
    pub fn execute(&mut self, command: ViewerCommand, now: Instant) -> bool {
        log::debug!("execute {command:?}");
        match command {
            ViewerCommand::ResetCamera => self.animator.reset(
                &self.camera,
                &mut self.controls,
                now,
            ),
            ViewerCommand::FocusHotspot(index) => self.focus_hotspot(index, now),
            ViewerCommand::ClosePopup => self.close_popup(),
            ViewerCommand::ToggleAutoRotate => self.toggle_auto_rotate(),
            ViewerCommand::ReloadModel => match self.start_load() {
                Ok(started) => started,
                Err(e) => {
                    log::error!("could not start model load: {e}");
                    false
                }
            },
        }
    }

    /// Start a transition framing hotspot `index`. Returns `false` if there
    /// is no such hotspot or a transition is already running.
    pub fn focus_hotspot(&mut self, index: usize, now: Instant) -> bool {
        let Some(hotspot) = self.registry.get(index) else {
            log::debug!("no hotspot {index}");
            return false;
        };
        let started = self.animator.animate_to_hotspot(
            hotspot,
            self.registry.generation(),
            &self.camera,
            &mut self.controls,
            now,
        );
        if started {
            log::info!("focusing hotspot {} '{}'", index + 1, hotspot.content.title);
        }
        started
    }

    /// Dismiss the revealed hotspot, if any.
    pub fn close_popup(&mut self) -> bool {
        if self.selected.take().is_none() {
            return false;
        }
        self.events.push(ViewerEvent::PopupClosed);
        true
    }

    fn toggle_auto_rotate(&mut self) -> bool {
        if self.animator.is_animating() {
            log::debug!("auto-rotate toggle ignored during camera transition");
            return false;
        }
        let enabled = !self.controls.auto_rotate();
        self.controls.set_auto_rotate(enabled);
        log::info!("auto-rotate {}", if enabled { "on" } else { "off" });
        true
    }
}
