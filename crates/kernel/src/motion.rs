//! Eased random walk for the decorative donuts.

use donutspace_common::RandomSource;
use glam::Vec3;
use serde::{Deserialize, Serialize};

use crate::config::MotionTuning;

/// Motion state of one donut.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionEntity {
    /// Rendered position, updated every tick.
    pub position: Vec3,
    /// Current waypoint, changed only on retarget.
    pub target_position: Vec3,
    /// Elapsed time after which a new waypoint is drawn.
    pub time_to_next_move: f64,
    /// Fraction of the remaining distance covered each tick.
    pub move_speed: f32,
}

impl MotionEntity {
    /// An entity resting at `position`.
    ///
    /// Its waypoint is its own position and its retarget time is zero, so it
    /// stays still until the first tick with positive elapsed time draws a
    /// real waypoint.
    pub fn at_rest(position: Vec3, move_speed: f32) -> Self {
        Self {
            position,
            target_position: position,
            time_to_next_move: 0.0,
            move_speed,
        }
    }

    /// Step toward the waypoint, then retarget if the waypoint has expired.
    ///
    /// Returns `true` when a new waypoint was drawn. The step always uses the
    /// waypoint and speed from before the retarget.
    pub fn update(
        &mut self,
        elapsed: f64,
        tuning: &MotionTuning,
        rng: &mut impl RandomSource,
    ) -> bool {
        self.position = approach(self.position, self.target_position, self.move_speed);

        if elapsed > self.time_to_next_move {
            self.retarget(elapsed, tuning, rng);
            true
        } else {
            false
        }
    }

    fn retarget(&mut self, elapsed: f64, tuning: &MotionTuning, rng: &mut impl RandomSource) {
        let range = tuning.target_range();
        self.target_position = Vec3::new(range.sample(rng), range.sample(rng), range.sample(rng));
        self.time_to_next_move = elapsed + f64::from(tuning.retarget_interval.sample(rng));
        self.move_speed = tuning.speed.sample(rng);
    }

    /// Distance left to the waypoint.
    pub fn remaining(&self) -> f32 {
        self.position.distance(self.target_position)
    }
}

/// Componentwise lerp written so that `current == target` is an exact fixed point.
fn approach(current: Vec3, target: Vec3, t: f32) -> Vec3 {
    current + (target - current) * t
}
