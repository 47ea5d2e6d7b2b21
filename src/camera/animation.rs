//! Scripted camera transitions.
//!
//! [`CameraAnimator`] is a two-state machine (idle / animating). Starting a
//! transition suspends the input controller's auto-rotate and enabled flags;
//! finishing it snaps the camera onto the exact end pose, restores the flags,
//! and reports what finished exactly once. A new request while a transition
//! is running is ignored, never queued.

use web_time::{Duration, Instant};

use super::core::{Camera, CameraPose};
use super::framing::{compute_framing_pose, lerp};
use super::orbit::CameraInput;
use crate::config::CameraOptions;
use crate::hotspot::Hotspot;
use crate::util::easing::EasingFunction;

/// What a transition was started for. Returned by [`CameraAnimator::step`]
/// when it completes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// Framing a hotspot.
    Hotspot {
        /// Index of the hotspot in its registry.
        index: usize,
        /// Registry generation the hotspot belonged to when the transition
        /// started.
        generation: u64,
    },
    /// Moving to an explicit pose.
    Pose,
    /// Returning to the initial pose.
    Reset,
}

#[derive(Debug, Clone)]
struct Transition {
    start: CameraPose,
    end: CameraPose,
    start_time: Instant,
    duration: Duration,
    easing: EasingFunction,
    saved_auto_rotate: bool,
    saved_enabled: bool,
    kind: TransitionKind,
}

impl Transition {
    fn progress(&self, now: Instant) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        let elapsed = now.saturating_duration_since(self.start_time);
        (elapsed.as_secs_f32() / self.duration.as_secs_f32()).clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Default)]
enum AnimationState {
    #[default]
    Idle,
    Animating(Transition),
}

/// Drives the camera between poses over time.
#[derive(Debug, Clone)]
pub struct CameraAnimator {
    state: AnimationState,
    initial_pose: Option<CameraPose>,
    base_distance: f32,
    duration: Duration,
    easing: EasingFunction,
}

impl CameraAnimator {
    /// Animator framing hotspots relative to `base_distance`.
    #[must_use]
    pub fn new(base_distance: f32, options: &CameraOptions) -> Self {
        Self {
            state: AnimationState::Idle,
            initial_pose: None,
            base_distance,
            duration: Duration::from_millis(options.transition_ms),
            easing: options.easing,
        }
    }

    /// Update tuning. Affects transitions started afterwards.
    pub fn configure(&mut self, base_distance: f32, options: &CameraOptions) {
        self.base_distance = base_distance;
        self.duration = Duration::from_millis(options.transition_ms);
        self.easing = options.easing;
    }

    /// Base viewing distance.
    #[must_use]
    pub fn base_distance(&self) -> f32 {
        self.base_distance
    }

    /// Transition duration.
    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Whether a transition is running.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        matches!(self.state, AnimationState::Animating(_))
    }

    /// Start and end pose of the running transition.
    #[must_use]
    pub fn in_flight(&self) -> Option<(CameraPose, CameraPose)> {
        match &self.state {
            AnimationState::Animating(t) => Some((t.start, t.end)),
            AnimationState::Idle => None,
        }
    }

    /// Kind of the running transition.
    #[must_use]
    pub fn in_flight_kind(&self) -> Option<TransitionKind> {
        match &self.state {
            AnimationState::Animating(t) => Some(t.kind),
            AnimationState::Idle => None,
        }
    }

    /// Remember the current pose as the target of [`reset`](Self::reset).
    pub fn save_initial_position(&mut self, camera: &Camera, controls: &dyn CameraInput) {
        self.initial_pose = Some(CameraPose::new(camera.eye, controls.target()));
    }

    /// Pose that [`reset`](Self::reset) returns to.
    #[must_use]
    pub fn reset_pose(&self) -> CameraPose {
        self.initial_pose.unwrap_or_else(|| {
            CameraPose::new(glam::Vec3::new(0.0, 0.0, self.base_distance), glam::Vec3::ZERO)
        })
    }

    /// Replace the flags that will be restored when the running transition
    /// completes. Returns `false` when idle.
    pub fn override_restored_flags(&mut self, auto_rotate: bool, enabled: bool) -> bool {
        match &mut self.state {
            AnimationState::Animating(t) => {
                t.saved_auto_rotate = auto_rotate;
                t.saved_enabled = enabled;
                true
            }
            AnimationState::Idle => false,
        }
    }

    /// Frame `hotspot`. Returns `false` (and changes nothing) if a transition
    /// is already running.
    pub fn animate_to_hotspot(
        &mut self,
        hotspot: &Hotspot,
        generation: u64,
        camera: &Camera,
        controls: &mut dyn CameraInput,
        now: Instant,
    ) -> bool {
        let end = compute_framing_pose(hotspot.position, self.base_distance);
        let kind = TransitionKind::Hotspot {
            index: hotspot.index,
            generation,
        };
        self.begin(end, kind, camera, controls, now)
    }

    /// Move to `pose`. Returns `false` if a transition is already running.
    pub fn animate_to_pose(
        &mut self,
        pose: CameraPose,
        camera: &Camera,
        controls: &mut dyn CameraInput,
        now: Instant,
    ) -> bool {
        self.begin(pose, TransitionKind::Pose, camera, controls, now)
    }

    /// Return to the saved initial pose, or to `(0, 0, base)` looking at the
    /// origin if none was saved. Returns `false` if a transition is already
    /// running.
    pub fn reset(
        &mut self,
        camera: &Camera,
        controls: &mut dyn CameraInput,
        now: Instant,
    ) -> bool {
        let pose = self.reset_pose();
        self.begin(pose, TransitionKind::Reset, camera, controls, now)
    }

    fn begin(
        &mut self,
        end: CameraPose,
        kind: TransitionKind,
        camera: &Camera,
        controls: &mut dyn CameraInput,
        now: Instant,
    ) -> bool {
        if self.is_animating() {
            log::debug!("camera transition {kind:?} ignored: one is already running");
            return false;
        }

        let transition = Transition {
            start: CameraPose::new(camera.eye, controls.target()),
            end,
            start_time: now,
            duration: self.duration,
            easing: self.easing,
            saved_auto_rotate: controls.auto_rotate(),
            saved_enabled: controls.enabled(),
            kind,
        };
        controls.set_auto_rotate(false);
        controls.set_enabled(false);

        log::debug!(
            "camera transition {kind:?}: {:?} -> {:?} over {:?}",
            transition.start.position,
            transition.end.position,
            transition.duration
        );
        self.state = AnimationState::Animating(transition);
        true
    }

    /// Advance the running transition to `now`.
    ///
    /// Returns the kind of the transition on the step that completes it, and
    /// `None` otherwise (including when idle).
    pub fn step(
        &mut self,
        camera: &mut Camera,
        controls: &mut dyn CameraInput,
        now: Instant,
    ) -> Option<TransitionKind> {
        let AnimationState::Animating(transition) = &self.state else {
            return None;
        };

        let progress = transition.progress(now);
        if progress < 1.0 {
            let t = transition.easing.evaluate(progress);
            let target = lerp(transition.start.look_at, transition.end.look_at, t);
            camera.eye = lerp(transition.start.position, transition.end.position, t);
            camera.target = target;
            controls.set_target(target);
            controls.sync(camera);
            return None;
        }

        let AnimationState::Animating(transition) = std::mem::take(&mut self.state) else {
            return None;
        };
        camera.eye = transition.end.position;
        camera.target = transition.end.look_at;
        controls.set_target(transition.end.look_at);
        controls.sync(camera);
        controls.set_auto_rotate(transition.saved_auto_rotate);
        controls.set_enabled(transition.saved_enabled);

        log::debug!("camera transition {:?} complete", transition.kind);
        Some(transition.kind)
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec3;

    use super::*;
    use crate::camera::orbit::OrbitControls;
    use crate::config::{HotspotConfig, Position};
    use crate::hotspot::Hotspot;

    fn setup() -> (CameraAnimator, Camera, OrbitControls) {
        let options = CameraOptions::default();
        let camera =
            Camera::looking_at(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, 1.0, 75.0, 0.1, 1000.0);
        (CameraAnimator::new(5.0, &options), camera, OrbitControls::new(&options))
    }

    fn hotspot_at(position: Vec3) -> Hotspot {
        Hotspot::detached(
            0,
            &HotspotConfig {
                position: Position::from(position),
                ..HotspotConfig::default()
            },
        )
    }

    #[test]
    fn hotspot_transition_lands_exactly() {
        let (mut animator, mut camera, mut controls) = setup();
        let t0 = Instant::now();
        let hotspot = hotspot_at(Vec3::new(2.0, 0.0, 0.0));
        assert!(animator.animate_to_hotspot(&hotspot, 7, &camera, &mut controls, t0));
        assert!(animator.is_animating());

        let mid = animator.step(&mut camera, &mut controls, t0 + Duration::from_millis(750));
        assert_eq!(mid, None);
        assert!(animator.is_animating());

        let done = animator.step(&mut camera, &mut controls, t0 + Duration::from_millis(1600));
        assert_eq!(done, Some(TransitionKind::Hotspot { index: 0, generation: 7 }));
        assert!(!animator.is_animating());

        let expected = compute_framing_pose(Vec3::new(2.0, 0.0, 0.0), 5.0);
        assert_eq!(camera.eye, expected.position);
        assert_eq!(camera.target, expected.look_at);
        assert_eq!(controls.target(), expected.look_at);

        // Completion is reported once.
        assert_eq!(
            animator.step(&mut camera, &mut controls, t0 + Duration::from_millis(1700)),
            None
        );
    }

    #[test]
    fn retrigger_while_animating_is_ignored() {
        let (mut animator, mut camera, mut controls) = setup();
        let t0 = Instant::now();
        assert!(animator.animate_to_hotspot(
            &hotspot_at(Vec3::new(2.0, 0.0, 0.0)),
            0,
            &camera,
            &mut controls,
            t0
        ));
        let before = animator.in_flight().unwrap();

        let _ = animator.step(&mut camera, &mut controls, t0 + Duration::from_millis(300));
        assert!(!animator.animate_to_hotspot(
            &hotspot_at(Vec3::new(-4.0, 1.0, 0.0)),
            0,
            &camera,
            &mut controls,
            t0 + Duration::from_millis(300)
        ));
        assert!(!animator.reset(&camera, &mut controls, t0 + Duration::from_millis(300)));
        assert_eq!(animator.in_flight().unwrap(), before);
    }

    #[test]
    fn flags_are_suspended_and_restored() {
        let (mut animator, mut camera, mut controls) = setup();
        controls.set_auto_rotate(true);
        let t0 = Instant::now();
        assert!(animator.animate_to_pose(
            CameraPose::new(Vec3::new(1.0, 1.0, 1.0), Vec3::ZERO),
            &camera,
            &mut controls,
            t0
        ));
        assert!(!controls.auto_rotate());
        assert!(!controls.enabled());

        let _ = animator.step(&mut camera, &mut controls, t0 + Duration::from_secs(2));
        assert!(controls.auto_rotate());
        assert!(controls.enabled());
    }

    #[test]
    fn reset_round_trip() {
        let (mut animator, mut camera, mut controls) = setup();
        animator.save_initial_position(&camera, &controls);
        let saved = CameraPose::new(camera.eye, controls.target());

        camera.eye = Vec3::new(3.0, -2.0, 7.0);
        controls.set_target(Vec3::new(0.5, 0.5, 0.5));
        controls.sync(&mut camera);

        let t0 = Instant::now();
        assert!(animator.reset(&camera, &mut controls, t0));
        let done = animator.step(&mut camera, &mut controls, t0 + Duration::from_millis(1500));
        assert_eq!(done, Some(TransitionKind::Reset));
        assert_eq!(camera.pose(), saved);
    }

    #[test]
    fn reset_without_saved_pose_uses_base_distance() {
        let (mut animator, mut camera, mut controls) = setup();
        camera.eye = Vec3::new(9.0, 9.0, 9.0);
        let t0 = Instant::now();
        assert!(animator.reset(&camera, &mut controls, t0));
        let _ = animator.step(&mut camera, &mut controls, t0 + Duration::from_secs(5));
        assert_eq!(camera.eye, Vec3::new(0.0, 0.0, 5.0));
        assert_eq!(camera.target, Vec3::ZERO);
    }

    #[test]
    fn midpoint_follows_easing() {
        let (mut animator, mut camera, mut controls) = setup();
        let t0 = Instant::now();
        let end = CameraPose::new(Vec3::new(0.0, 0.0, 15.0), Vec3::new(0.0, 0.0, 10.0));
        assert!(animator.animate_to_pose(end, &camera, &mut controls, t0));
        let _ = animator.step(&mut camera, &mut controls, t0 + Duration::from_millis(750));
        // ease(0.5) = 0.5
        assert!((camera.eye.z - 10.0).abs() < 1e-3);
        assert!((camera.target.z - 5.0).abs() < 1e-3);
    }

    #[test]
    fn step_before_start_time_holds_start_pose() {
        let (mut animator, mut camera, mut controls) = setup();
        let t0 = Instant::now() + Duration::from_secs(1);
        let start = camera.eye;
        assert!(animator.animate_to_pose(
            CameraPose::new(Vec3::new(0.0, 4.0, 4.0), Vec3::ZERO),
            &camera,
            &mut controls,
            t0
        ));
        assert_eq!(animator.step(&mut camera, &mut controls, Instant::now()), None);
        assert_eq!(camera.eye, start);
    }
}
