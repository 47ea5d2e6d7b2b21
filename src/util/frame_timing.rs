use web_time::{Duration, Instant};

/// Longest step handed to the input controller. Keeps damping and
/// auto-rotate sane after the window was hidden or a debugger paused us.
const MAX_FRAME_STEP: f32 = 0.1;

/// Frame timing with FPS calculation and optional frame limiting.
///
/// Time is passed in rather than read from the clock so the engine can be
/// stepped deterministically.
#[derive(Debug, Clone)]
pub struct FrameTiming {
    /// Target FPS (0 = unlimited)
    target_fps: u32,
    /// Minimum frame duration based on target FPS
    min_frame_duration: Duration,
    /// Last frame timestamp
    last_frame: Option<Instant>,
    /// Smoothed FPS using exponential moving average
    smoothed_fps: f32,
    /// Smoothing factor (lower = smoother, 0.0-1.0)
    smoothing: f32,
}

impl FrameTiming {
    /// Create a new frame timer with the given FPS target (0 = unlimited).
    #[must_use]
    pub fn new(target_fps: u32) -> Self {
        let min_frame_duration = if target_fps > 0 {
            Duration::from_secs_f64(1.0 / f64::from(target_fps))
        } else {
            Duration::ZERO
        };

        Self {
            target_fps,
            min_frame_duration,
            last_frame: None,
            smoothed_fps: 60.0,
            smoothing: 0.05,
        }
    }

    /// Whether enough time has passed since the last frame to render
    /// another one.
    #[must_use]
    pub fn should_render(&self, now: Instant) -> bool {
        match self.last_frame {
            Some(last) if self.target_fps > 0 => {
                now.saturating_duration_since(last) >= self.min_frame_duration
            }
            _ => true,
        }
    }

    /// Mark a frame at `now` and return the seconds since the previous one,
    /// capped at 0.1 s. The first frame returns 0.
    pub fn tick(&mut self, now: Instant) -> f32 {
        let Some(last) = self.last_frame.replace(now) else {
            return 0.0;
        };
        let frame_time = now.saturating_duration_since(last).as_secs_f32();
        if frame_time > 0.0 {
            let instant_fps = 1.0 / frame_time;
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + instant_fps * self.smoothing;
        }
        frame_time.min(MAX_FRAME_STEP)
    }

    /// Get the current FPS (smoothed)
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_tick_is_zero_then_measures() {
        let mut timing = FrameTiming::new(0);
        let t0 = Instant::now();
        assert_eq!(timing.tick(t0), 0.0);
        let dt = timing.tick(t0 + Duration::from_millis(16));
        assert!((dt - 0.016).abs() < 1e-6);
    }

    #[test]
    fn long_gaps_are_capped() {
        let mut timing = FrameTiming::new(0);
        let t0 = Instant::now();
        let _ = timing.tick(t0);
        assert_eq!(timing.tick(t0 + Duration::from_secs(3)), MAX_FRAME_STEP);
    }

    #[test]
    fn limiter_waits_for_frame_budget() {
        let mut timing = FrameTiming::new(100);
        let t0 = Instant::now();
        assert!(timing.should_render(t0));
        let _ = timing.tick(t0);
        assert!(!timing.should_render(t0 + Duration::from_millis(5)));
        assert!(timing.should_render(t0 + Duration::from_millis(10)));
    }
}
