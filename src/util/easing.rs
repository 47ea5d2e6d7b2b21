//! Easing functions for camera transitions.
//!
//! All curves map `[0, 1]` onto `[0, 1]` with `f(0) = 0` and `f(1) = 1`.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Easing curve used to shape interpolation progress.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, JsonSchema,
)]
#[serde(rename_all = "camelCase")]
pub enum EasingFunction {
    /// Linear interpolation (no easing).
    Linear,
    /// Cubic ease-in-out: slow start, fast middle, slow end.
    /// Formula: `4t³` below the midpoint, `1 - (-2t + 2)³ / 2` above it.
    #[default]
    CubicInOut,
}

impl EasingFunction {
    /// Evaluate the easing function at progress `t`.
    ///
    /// Input is clamped to `[0.0, 1.0]`.
    #[inline]
    #[must_use]
    pub fn evaluate(self, t: f32) -> f32 {
        let t = t.clamp(0.0, 1.0);

        match self {
            Self::Linear => t,
            Self::CubicInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    let u = -2.0 * t + 2.0;
                    1.0 - u * u * u / 2.0
                }
            }
        }
    }
}

/// Cubic ease-in-out of `progress`, the curve camera transitions use.
#[inline]
#[must_use]
pub fn ease(progress: f32) -> f32 {
    EasingFunction::CubicInOut.evaluate(progress)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cubic_endpoints_and_midpoint() {
        assert_eq!(ease(0.0), 0.0);
        assert_eq!(ease(0.5), 0.5);
        assert_eq!(ease(1.0), 1.0);
    }

    #[test]
    fn test_cubic_is_monotonic() {
        let mut prev = ease(0.0);
        for i in 1..=1000 {
            let v = ease(i as f32 / 1000.0);
            assert!(v >= prev, "ease decreased at step {i}: {prev} -> {v}");
            assert!((0.0..=1.0).contains(&v));
            prev = v;
        }
    }

    #[test]
    fn test_cubic_is_continuous_at_midpoint() {
        let below = ease(0.5 - 1e-4);
        let above = ease(0.5 + 1e-4);
        assert!((above - below).abs() < 1e-3);
    }

    #[test]
    fn test_cubic_shape() {
        // 4 * 0.25^3
        assert!((ease(0.25) - 0.0625).abs() < 1e-6);
        // symmetric about the midpoint
        assert!((ease(0.75) - (1.0 - ease(0.25))).abs() < 1e-6);
    }

    #[test]
    fn test_input_clamping() {
        assert_eq!(ease(-0.5), 0.0);
        assert_eq!(ease(1.5), 1.0);
        assert_eq!(EasingFunction::Linear.evaluate(-1.0), 0.0);
        assert_eq!(EasingFunction::Linear.evaluate(2.0), 1.0);
    }

    #[test]
    fn test_linear_passthrough() {
        let linear = EasingFunction::Linear;
        assert_eq!(linear.evaluate(0.3), 0.3);
        assert_eq!(linear.evaluate(0.5), 0.5);
    }

    #[test]
    fn test_default_is_cubic_in_out() {
        assert_eq!(EasingFunction::default(), EasingFunction::CubicInOut);
    }
}
