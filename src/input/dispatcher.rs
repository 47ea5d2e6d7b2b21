//! Turns left-button press/release pairs into hotspot picks.
//!
//! The dispatcher only looks at the primary button. Everything it sees is
//! also fed to the orbit controller by the engine, so a gesture classified
//! as a drag needs no further handling here.

use glam::Vec2;
use web_time::Instant;

use super::event::{InputEvent, MouseButton};
use super::gesture::{Gesture, GestureClassifier};
use crate::camera::Camera;
use crate::hotspot::HotspotRegistry;
use crate::picking::RayHit;
use crate::renderer::{SceneRenderer, Viewport};

/// Result of a pointer release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerOutcome {
    /// Moved or held too long; the orbit controller owns it.
    Drag,
    /// Release without a tracked press.
    Unpaired,
    /// A click that hit nothing.
    Miss,
    /// A click on a hotspot.
    Hit(RayHit),
}

/// What a click is tested against.
pub struct PickContext<'a, R: SceneRenderer + ?Sized> {
    /// Camera the frame was drawn with.
    pub camera: &'a Camera,
    /// Surface the pointer position is relative to.
    pub viewport: Viewport,
    /// Current hotspot set.
    pub registry: &'a HotspotRegistry,
    /// Ray query provider.
    pub renderer: &'a R,
}

/// Click-vs-drag classification plus ray picking against the hotspot set.
#[derive(Debug, Clone, Default)]
pub struct HitTestDispatcher {
    gesture: GestureClassifier,
    cursor: Option<Vec2>,
}

impl HitTestDispatcher {
    /// Dispatcher with no tracked pointer.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last known cursor position on the surface.
    #[must_use]
    pub fn cursor(&self) -> Option<Vec2> {
        self.cursor
    }

    /// Record a primary-button press.
    pub fn on_pointer_down(&mut self, position: Vec2, at: Instant) {
        self.gesture.pointer_down(position, at);
    }

    /// Classify a primary-button release. Clicks are ray-tested against
    /// `ctx.registry`; the nearest hit wins. The press is forgotten either
    /// way.
    pub fn on_pointer_up<R: SceneRenderer + ?Sized>(
        &mut self,
        position: Vec2,
        at: Instant,
        ctx: &PickContext<'_, R>,
    ) -> PointerOutcome {
        match self.gesture.pointer_up(position, at) {
            Gesture::Drag => PointerOutcome::Drag,
            Gesture::Unpaired => PointerOutcome::Unpaired,
            Gesture::Click(position) => match pick(position, ctx) {
                Some(hit) => PointerOutcome::Hit(hit),
                None => PointerOutcome::Miss,
            },
        }
    }

    /// Feed a raw event. Returns an outcome only for primary-button
    /// releases.
    pub fn handle_event<R: SceneRenderer + ?Sized>(
        &mut self,
        event: &InputEvent,
        at: Instant,
        ctx: &PickContext<'_, R>,
    ) -> Option<PointerOutcome> {
        match *event {
            InputEvent::CursorMoved { x, y } => {
                self.cursor = Some(Vec2::new(x, y));
                None
            }
            InputEvent::CursorLeft => {
                self.cursor = None;
                self.gesture.cancel();
                None
            }
            InputEvent::MouseButton {
                button: MouseButton::Left,
                pressed,
            } => {
                let position = self.cursor?;
                if pressed {
                    self.on_pointer_down(position, at);
                    None
                } else {
                    Some(self.on_pointer_up(position, at, ctx))
                }
            }
            InputEvent::MouseButton { .. }
            | InputEvent::Scroll { .. }
            | InputEvent::ModifiersChanged { .. } => None,
        }
    }
}

/// Nearest hotspot under the pixel `position`, if any.
pub fn pick<R: SceneRenderer + ?Sized>(
    position: Vec2,
    ctx: &PickContext<'_, R>,
) -> Option<RayHit> {
    if ctx.registry.is_empty() {
        return None;
    }
    let ndc = ctx.viewport.to_ndc(position.x, position.y);
    let ray = ctx.camera.ray_from_ndc(ndc);
    let hits = ctx.renderer.intersect(&ray, &ctx.registry.hit_proxies());
    hits.into_iter().next()
}
