//! Input handling: platform-agnostic events, click-vs-drag classification,
//! hotspot hit testing and key bindings.

/// Hotspot picking on primary-button clicks.
pub mod dispatcher;
/// Platform-agnostic input events.
pub mod event;
/// Click-vs-drag state machine.
pub mod gesture;
/// Key string to command mapping.
pub mod keyboard;

pub use dispatcher::{pick, HitTestDispatcher, PickContext, PointerOutcome};
pub use event::{InputEvent, MouseButton};
pub use gesture::{Gesture, GestureClassifier, CLICK_MAX_DURATION, CLICK_MAX_TRAVEL};
pub use keyboard::{KeyBindings, KeyCommandTag};
