use glam::Vec2;
use web_time::{Duration, Instant};

/// Farthest a pointer may travel (Manhattan distance, in pixels) between
/// press and release for the gesture to count as a click.
pub const CLICK_MAX_TRAVEL: f32 = 5.0;
/// Longest a press may last for the gesture to count as a click.
pub const CLICK_MAX_DURATION: Duration = Duration::from_millis(300);

/// How a press/release pair was classified.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Gesture {
    /// Short, nearly stationary press. Carries the release position.
    Click(Vec2),
    /// Moved too far or held too long; belongs to the orbit controller.
    Drag,
    /// Release without a recorded press (e.g. the press happened outside
    /// the surface).
    Unpaired,
}

#[derive(Debug, Clone, Copy)]
struct PointerDown {
    position: Vec2,
    at: Instant,
}

/// Click-vs-drag state machine for a single pointer.
#[derive(Debug, Clone, Default)]
pub struct GestureClassifier {
    down: Option<PointerDown>,
}

impl GestureClassifier {
    /// Fresh classifier with no press recorded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a press is being tracked.
    #[must_use]
    pub fn is_pressed(&self) -> bool {
        self.down.is_some()
    }

    /// Record a press. A second press without a release replaces the first.
    pub fn pointer_down(&mut self, position: Vec2, at: Instant) {
        self.down = Some(PointerDown { position, at });
    }

    /// Classify the release against the recorded press and forget the press.
    pub fn pointer_up(&mut self, position: Vec2, at: Instant) -> Gesture {
        let Some(down) = self.down.take() else {
            return Gesture::Unpaired;
        };

        let travel = (position - down.position).abs();
        let travel = travel.x + travel.y;
        let held = at.saturating_duration_since(down.at);

        if travel > CLICK_MAX_TRAVEL || held > CLICK_MAX_DURATION {
            Gesture::Drag
        } else {
            Gesture::Click(position)
        }
    }

    /// Forget any recorded press.
    pub fn cancel(&mut self) {
        self.down = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(up: Vec2, after_ms: u64) -> Gesture {
        let t0 = Instant::now();
        let mut classifier = GestureClassifier::new();
        classifier.pointer_down(Vec2::new(100.0, 100.0), t0);
        classifier.pointer_up(up, t0 + Duration::from_millis(after_ms))
    }

    #[test]
    fn quick_stationary_release_is_click() {
        assert_eq!(
            classify(Vec2::new(100.0, 100.0), 100),
            Gesture::Click(Vec2::new(100.0, 100.0))
        );
    }

    #[test]
    fn travel_beyond_threshold_is_drag() {
        assert_eq!(classify(Vec2::new(110.0, 100.0), 100), Gesture::Drag);
    }

    #[test]
    fn long_press_is_drag() {
        assert_eq!(classify(Vec2::new(100.0, 100.0), 400), Gesture::Drag);
    }

    #[test]
    fn thresholds_are_inclusive_for_clicks() {
        // 3 + 2 = 5 px exactly, held exactly 300 ms
        assert!(matches!(
            classify(Vec2::new(103.0, 98.0), 300),
            Gesture::Click(_)
        ));
        // Manhattan, not Euclidean: (4, 4) is 8 px
        assert_eq!(classify(Vec2::new(104.0, 104.0), 10), Gesture::Drag);
    }

    #[test]
    fn release_without_press_is_unpaired() {
        let mut classifier = GestureClassifier::new();
        assert_eq!(
            classifier.pointer_up(Vec2::ZERO, Instant::now()),
            Gesture::Unpaired
        );
    }

    #[test]
    fn press_is_consumed_by_release() {
        let t0 = Instant::now();
        let mut classifier = GestureClassifier::new();
        classifier.pointer_down(Vec2::ZERO, t0);
        assert!(classifier.is_pressed());
        let _ = classifier.pointer_up(Vec2::ZERO, t0);
        assert!(!classifier.is_pressed());
        assert_eq!(classifier.pointer_up(Vec2::ZERO, t0), Gesture::Unpaired);
    }
}
