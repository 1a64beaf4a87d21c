//! Orbiting camera path with randomized zoom.
//!
//! The orbit angle is a pure function of elapsed time. Only the radius has
//! memory: it eases toward a target radius that is redrawn every few seconds.
//!
//! The ease is a fixed fraction per tick, not per second, so zoom transitions
//! run faster at higher frame rates.

use donutspace_common::RandomSource;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::CameraTuning;

/// The point the camera always faces: the center of the text mesh.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TextAnchor {
    pub position: Vec3,
}

impl TextAnchor {
    pub fn new(position: Vec3) -> Self {
        Self { position }
    }
}

/// Mutable state of the camera path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CameraState {
    /// Radius used for positioning this tick.
    pub current_radius: f32,
    /// Radius being eased toward.
    pub target_radius: f32,
    /// Elapsed time after which a new target radius is drawn.
    pub radius_change_time: f64,
    /// Easing rate coefficient.
    pub radius_speed: f32,
}

impl Default for CameraState {
    fn default() -> Self {
        Self::from_tuning(&CameraTuning::default())
    }
}

impl CameraState {
    pub fn from_tuning(tuning: &CameraTuning) -> Self {
        Self {
            current_radius: tuning.initial_radius,
            target_radius: tuning.initial_radius,
            radius_change_time: 0.0,
            radius_speed: tuning.radius_speed,
        }
    }
}

/// Camera placement for one tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraPose {
    pub eye: Vec3,
    /// Look-at point.
    pub target: Vec3,
}

/// Result of one camera update.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraUpdate {
    pub pose: CameraPose,
    /// A new target radius was drawn this tick.
    pub radius_retargeted: bool,
}

/// The camera path controller.
#[derive(Debug, Clone, PartialEq)]
pub struct CameraPath {
    state: CameraState,
    tuning: CameraTuning,
}

impl Default for CameraPath {
    fn default() -> Self {
        Self::new(CameraTuning::default())
    }
}

impl CameraPath {
    pub fn new(tuning: CameraTuning) -> Self {
        Self {
            state: CameraState::from_tuning(&tuning),
            tuning,
        }
    }

    /// Resume from an explicit state.
    pub fn with_state(tuning: CameraTuning, state: CameraState) -> Self {
        Self { state, tuning }
    }

    pub fn state(&self) -> &CameraState {
        &self.state
    }

    pub fn tuning(&self) -> &CameraTuning {
        &self.tuning
    }

    /// Advance the path to `elapsed` and place the camera.
    ///
    /// Returns `None` without touching any state when there is no anchor.
    pub fn update(
        &mut self,
        elapsed: f64,
        anchor: Option<&TextAnchor>,
        rng: &mut impl RandomSource,
    ) -> Option<CameraUpdate> {
        let anchor = anchor?;
        let tuning = &self.tuning;
        let state = &mut self.state;

        let radius_retargeted = elapsed > state.radius_change_time;
        if radius_retargeted {
            state.target_radius = tuning.radius.sample(rng);
            state.radius_change_time = elapsed + f64::from(tuning.change_interval.sample(rng));
            tracing::debug!(
                "camera radius -> {:.2}, next change at {:.2}s",
                state.target_radius,
                state.radius_change_time
            );
        }

        state.current_radius = lerp(
            state.current_radius,
            state.target_radius,
            tuning.ease_fraction(state.radius_speed),
        );

        Some(CameraUpdate {
            pose: CameraPose {
                eye: orbit_position(elapsed, state.current_radius, tuning),
                target: anchor.position,
            },
            radius_retargeted,
        })
    }
}

/// Camera position on the orbit at `elapsed` for a given radius.
///
/// The angle is evaluated in `f64`; only the final position narrows to `f32`.
pub fn orbit_position(elapsed: f64, radius: f32, tuning: &CameraTuning) -> Vec3 {
    let angle = elapsed * f64::from(tuning.orbit_speed);
    let bob = (angle * f64::from(tuning.bob_ratio)).sin() as f32;
    Vec3::new(
        angle.sin() as f32 * radius,
        bob * tuning.bob_amplitude + tuning.bob_offset,
        angle.cos() as f32 * radius,
    )
}

/// Move `from` toward `to` by fraction `t`. Equal endpoints stay put exactly.
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

#[cfg(test)]
mod tests {
    use super::*;
    use donutspace_common::{ScriptedRandom, ThreadRandom};

    fn origin() -> TextAnchor {
        TextAnchor::new(Vec3::ZERO)
    }

    #[test]
    fn fresh_path_at_time_zero_sits_on_initial_radius() {
        let state = CameraState {
            current_radius: 3.0,
            target_radius: 3.0,
            radius_change_time: 0.0,
            radius_speed: 0.5,
        };
        assert_eq!(state, CameraState::default());
        let mut path = CameraPath::with_state(CameraTuning::default(), state);
        let mut rng = ScriptedRandom::constant(0.5);

        let update = path.update(0.0, Some(&origin()), &mut rng).unwrap();

        assert!(!update.radius_retargeted);
        assert_eq!(rng.draws(), 0);
        assert_eq!(path.state().current_radius, 3.0);
        assert_eq!(update.pose.eye, Vec3::new(0.0, 1.0, 3.0));
        assert_eq!(update.pose.target, Vec3::ZERO);
    }

    #[test]
    fn no_anchor_means_no_mutation() {
        let mut path = CameraPath::default();
        let before = *path.state();
        let mut rng = ScriptedRandom::constant(0.9);

        for i in 0..1000 {
            assert!(path.update(i as f64 * 0.1, None, &mut rng).is_none());
        }

        assert_eq!(*path.state(), before);
        assert_eq!(rng.draws(), 0);
    }

    #[test]
    fn retarget_draws_radius_then_interval() {
        let mut path = CameraPath::default();
        // radius: 1 + 0.5 * 3 = 2.5, interval: 2 + 0.5 * 3 = 3.5
        let mut rng = ScriptedRandom::constant(0.5);

        let update = path.update(1.0, Some(&origin()), &mut rng).unwrap();

        assert!(update.radius_retargeted);
        assert_eq!(path.state().target_radius, 2.5);
        assert_eq!(path.state().radius_change_time, 4.5);
        // 3 + (2.5 - 3) * 0.025
        assert!((path.state().current_radius - 2.9875).abs() < 1e-6);
    }

    #[test]
    fn no_retarget_before_change_time() {
        let mut path = CameraPath::default();
        let mut rng = ScriptedRandom::constant(0.0);
        path.update(1.0, Some(&origin()), &mut rng);
        let change_at = path.state().radius_change_time;
        let draws = rng.draws();

        for step in 1..10 {
            let t = 1.0 + step as f64 * 0.1;
            assert!(t < change_at);
            let update = path.update(t, Some(&origin()), &mut rng).unwrap();
            assert!(!update.radius_retargeted);
        }
        assert_eq!(rng.draws(), draws);
    }

    #[test]
    fn easing_never_overshoots() {
        let mut path = CameraPath::default();
        let mut rng = ThreadRandom::new();
        let anchor = origin();

        for tick in 0..5000 {
            let before = *path.state();
            let t = tick as f64 / 60.0;
            path.update(t, Some(&anchor), &mut rng);
            let after = *path.state();

            let target = after.target_radius;
            let (lo, hi) = if before.current_radius <= target {
                (before.current_radius, target)
            } else {
                (target, before.current_radius)
            };
            assert!(after.current_radius >= lo && after.current_radius <= hi);
            if before.current_radius != target {
                assert_ne!(after.current_radius, target, "radius snapped to target");
            }
        }
    }

    #[test]
    fn drawn_radius_and_change_time_stay_in_bounds() {
        let mut path = CameraPath::default();
        let mut rng = ThreadRandom::new();
        let anchor = origin();

        // Jumps of 10s always pass the change time, forcing a redraw each call.
        for i in 1..2000 {
            let t = i as f64 * 10.0;
            let update = path.update(t, Some(&anchor), &mut rng).unwrap();
            assert!(update.radius_retargeted);
            let state = path.state();
            assert!((1.0..4.0).contains(&state.target_radius));
            assert!(state.radius_change_time >= t + 2.0);
            assert!(state.radius_change_time <= t + 5.0);
        }
    }

    #[test]
    fn position_depends_only_on_time_and_radius() {
        let tuning = CameraTuning::default();
        let a = orbit_position(7.3, 2.0, &tuning);
        let b = orbit_position(7.3, 2.0, &tuning);
        assert_eq!(a, b);

        let horizontal = Vec3::new(a.x, 0.0, a.z).length();
        assert!((horizontal - 2.0).abs() < 1e-5);

        // Quarter orbit: angle = pi / 2 puts the camera on +X.
        let quarter = orbit_position(std::f64::consts::PI, 3.0, &tuning);
        assert!((quarter.x - 3.0).abs() < 1e-5);
        assert!(quarter.z.abs() < 1e-5);
        assert!((quarter.y - (std::f32::consts::FRAC_PI_4.sin() + 1.0)).abs() < 1e-5);
    }

    #[test]
    fn looks_at_the_anchor() {
        let mut path = CameraPath::default();
        let mut rng = ScriptedRandom::constant(0.2);
        let anchor = TextAnchor::new(Vec3::new(0.5, -0.25, 0.0));
        let update = path.update(3.0, Some(&anchor), &mut rng).unwrap();
        assert_eq!(update.pose.target, anchor.position);
    }

    #[test]
    fn clock_stall_skips_retarget() {
        let mut path = CameraPath::default();
        let mut rng = ScriptedRandom::constant(0.0);
        path.update(10.0, Some(&origin()), &mut rng);
        let draws = rng.draws();

        // Time going backwards is tolerated and never redraws.
        path.update(5.0, Some(&origin()), &mut rng);
        path.update(5.0, Some(&origin()), &mut rng);
        assert_eq!(rng.draws(), draws);
    }

    #[test]
    fn orbit_stays_smooth_after_days() {
        let tuning = CameraTuning::default();
        let start = 2_000_000.0;
        let eyes: Vec<Vec3> = (0..60)
            .map(|frame| orbit_position(start + frame as f64 / 60.0, 3.0, &tuning))
            .collect();

        for pair in eyes.windows(2) {
            assert_ne!(pair[0], pair[1]);
            // 1/120 rad per frame at radius 3 is about 0.025 units of arc.
            let step = pair[0].distance(pair[1]);
            assert!(step > 0.01 && step < 0.05, "step {step}");
        }
    }

    #[test]
    fn change_time_stays_ahead_after_days() {
        let mut path = CameraPath::default();
        let mut rng = ScriptedRandom::constant(0.0);
        let start = 600_000.0;

        assert!(path.update(start, Some(&origin()), &mut rng).unwrap().radius_retargeted);
        assert_eq!(path.state().radius_change_time, start + 2.0);

        let next = path.update(start + 1.0 / 60.0, Some(&origin()), &mut rng).unwrap();
        assert!(!next.radius_retargeted);
    }

    #[test]
    fn lerp_fixed_point() {
        assert_eq!(lerp(2.5, 2.5, 0.025), 2.5);
        assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
    }
}
