//! Pointer and keyboard input for [`ViewerEngine`].

use web_time::Instant;

use super::ViewerEngine;
use crate::input::{InputEvent, PickContext, PointerOutcome};
use crate::renderer::SceneRenderer;

impl<R: SceneRenderer> ViewerEngine<R> {
    /// Process a platform-agnostic input event that happened at `at`.
    ///
    /// Every event goes to the orbit controls (which ignore motion while
    /// disabled or during a transition) and to the hit-test dispatcher.
    /// A click on a hotspot starts a transition to it.
    ///
    /// Returns `true` if a hotspot transition started.
    ///
    /// # Example
    ///
    /// ```ignore
    /// engine.handle_input(InputEvent::CursorMoved { x, y }, Instant::now());
    /// engine.handle_input(InputEvent::Scroll { delta: 1.0 }, Instant::now());
    /// ```
    pub fn handle_input(&mut self, event: InputEvent, at: Instant) -> bool {
        let _ = self.controls.handle_event(&event);

        let ctx = PickContext {
            camera: &self.camera,
            viewport: self.viewport,
            registry: &self.registry,
            renderer: &self.renderer,
        };
        match self.dispatcher.handle_event(&event, at, &ctx) {
            Some(PointerOutcome::Hit(hit)) => {
                log::debug!("clicked hotspot {} at distance {:.3}", hit.index, hit.distance);
                self.focus_hotspot(hit.index, at)
            }
            Some(PointerOutcome::Miss) => {
                log::trace!("click hit nothing");
                false
            }
            Some(PointerOutcome::Drag | PointerOutcome::Unpaired) | None => false,
        }
    }

    /// Run the command bound to a physical key string (winit `KeyCode`
    /// debug format, e.g. `"KeyR"`). Returns `true` if it changed anything.
    pub fn handle_key(&mut self, key: &str, at: Instant) -> bool {
        match self.key_bindings.lookup(key) {
            Some(command) => self.execute(command, at),
            None => false,
        }
    }
}
