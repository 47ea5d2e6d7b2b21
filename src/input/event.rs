/// Platform-agnostic pointer and keyboard-modifier events.
///
/// Hosts translate their native window events into these and hand them to
/// [`ViewerEngine::handle_input`](crate::engine::ViewerEngine::handle_input)
/// together with the time the event occurred.
///
/// Positions are in physical pixels relative to the top-left corner of the
/// render surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Cursor moved to an absolute surface position.
    CursorMoved {
        /// Horizontal position.
        x: f32,
        /// Vertical position (grows downward).
        y: f32,
    },
    /// Cursor left the render surface.
    CursorLeft,
    /// Mouse button pressed or released at the last cursor position.
    MouseButton {
        /// Which button changed.
        button: MouseButton,
        /// `true` for press, `false` for release.
        pressed: bool,
    },
    /// Scroll wheel (positive = zoom in).
    Scroll {
        /// Scroll amount in wheel lines.
        delta: f32,
    },
    /// Modifier key state changed.
    ModifiersChanged {
        /// Whether the shift key is held.
        shift: bool,
    },
}

/// Platform-agnostic mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button: clicks hotspots, drags to orbit.
    Left,
    /// Secondary button: drags to pan.
    Right,
    /// Middle button: drags to pan.
    Middle,
}

#[cfg(feature = "viewer")]
impl From<winit::event::MouseButton> for MouseButton {
    fn from(button: winit::event::MouseButton) -> Self {
        match button {
            winit::event::MouseButton::Right => Self::Right,
            winit::event::MouseButton::Middle => Self::Middle,
            _ => Self::Left,
        }
    }
}
