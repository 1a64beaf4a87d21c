//! Scene tuning, loadable from YAML. Every field has a default.

use donutspace_common::RandomSource;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Errors from loading or validating a [`SceneConfig`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_yaml::Error),
    #[error("{field}: range [{min}, {max}) is empty")]
    InvalidRange { field: &'static str, min: f32, max: f32 },
    #[error("{field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

/// Half-open interval `[min, max)` that random draws come from.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Interval {
    pub min: f32,
    pub max: f32,
}

impl Interval {
    pub const fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Symmetric interval `[-half, half)`.
    pub const fn symmetric(half: f32) -> Self {
        Self::new(-half, half)
    }

    pub fn sample(&self, rng: &mut impl RandomSource) -> f32 {
        rng.uniform(self.min, self.max)
    }

    pub fn contains(&self, value: f32) -> bool {
        value >= self.min && value < self.max
    }

    fn validate(&self, field: &'static str) -> Result<(), ConfigError> {
        if self.min.is_finite() && self.max.is_finite() && self.min < self.max {
            Ok(())
        } else {
            Err(ConfigError::InvalidRange {
                field,
                min: self.min,
                max: self.max,
            })
        }
    }
}

/// Constants of the orbiting camera path.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraTuning {
    /// Radius the camera starts at (and first eases from).
    pub initial_radius: f32,
    /// Easing rate coefficient.
    pub radius_speed: f32,
    /// Multiplier applied to `radius_speed` to get the per-tick lerp fraction.
    pub ease_scale: f32,
    /// Orbit angular speed in radians per second.
    pub orbit_speed: f32,
    /// Where new target radii are drawn from.
    pub radius: Interval,
    /// Seconds until the next target radius is drawn.
    pub change_interval: Interval,
    /// Vertical bob: `y = sin(angle * bob_ratio) * bob_amplitude + bob_offset`.
    pub bob_amplitude: f32,
    pub bob_offset: f32,
    pub bob_ratio: f32,
}

impl Default for CameraTuning {
    fn default() -> Self {
        Self {
            initial_radius: 3.0,
            radius_speed: 0.5,
            ease_scale: 0.05,
            orbit_speed: 0.5,
            radius: Interval::new(1.0, 4.0),
            change_interval: Interval::new(2.0, 5.0),
            bob_amplitude: 1.0,
            bob_offset: 1.0,
            bob_ratio: 0.5,
        }
    }
}

impl CameraTuning {
    /// Fraction of the remaining radius covered each tick.
    pub fn ease_fraction(&self, radius_speed: f32) -> f32 {
        radius_speed * self.ease_scale
    }
}

/// Constants of the per-entity random walk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MotionTuning {
    /// Waypoint coordinates are drawn from `[-half, half)` on each axis.
    pub target_half_extent: f32,
    /// Seconds until the next waypoint is drawn.
    pub retarget_interval: Interval,
    /// Per-tick lerp fraction toward the waypoint.
    pub speed: Interval,
}

impl Default for MotionTuning {
    fn default() -> Self {
        Self {
            target_half_extent: 5.0,
            retarget_interval: Interval::new(1.0, 3.0),
            speed: Interval::new(0.01, 0.03),
        }
    }
}

impl MotionTuning {
    pub fn target_range(&self) -> Interval {
        Interval::symmetric(self.target_half_extent)
    }
}

/// The centered text label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextConfig {
    pub content: String,
    pub size: f32,
    pub depth: f32,
}

impl Default for TextConfig {
    fn default() -> Self {
        Self {
            content: "Hello Three.js".into(),
            size: 0.5,
            depth: 0.2,
        }
    }
}

/// Everything needed to build and animate the scene.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Number of donuts created at population time.
    pub entity_count: usize,
    /// Initial positions are drawn from `[-half, half)` on each axis.
    pub spawn_half_extent: f32,
    /// Uniform scale drawn per donut.
    pub scale: Interval,
    pub text: TextConfig,
    pub camera: CameraTuning,
    pub motion: MotionTuning,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            entity_count: 100,
            spawn_half_extent: 5.0,
            scale: Interval::new(0.5, 1.0),
            text: TextConfig::default(),
            camera: CameraTuning::default(),
            motion: MotionTuning::default(),
        }
    }
}

impl SceneConfig {
    /// Load and validate a YAML config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&data)
    }

    /// Parse and validate YAML. Missing fields take their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_yaml(&self) -> Result<String, ConfigError> {
        Ok(serde_yaml::to_string(self)?)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.entity_count == 0 {
            return Err(ConfigError::InvalidValue {
                field: "entity_count",
                reason: "must be at least 1".into(),
            });
        }
        positive("spawn_half_extent", self.spawn_half_extent)?;
        self.scale.validate("scale")?;
        positive("text.size", self.text.size)?;

        let cam = &self.camera;
        positive("camera.initial_radius", cam.initial_radius)?;
        cam.radius.validate("camera.radius")?;
        cam.change_interval.validate("camera.change_interval")?;
        unit_fraction("camera.radius_speed * ease_scale", cam.ease_fraction(cam.radius_speed))?;

        let motion = &self.motion;
        positive("motion.target_half_extent", motion.target_half_extent)?;
        motion.retarget_interval.validate("motion.retarget_interval")?;
        motion.speed.validate("motion.speed")?;
        if motion.speed.min <= 0.0 || motion.speed.max > 1.0 {
            return Err(ConfigError::InvalidValue {
                field: "motion.speed",
                reason: "must lie within (0, 1]".into(),
            });
        }
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            reason: format!("must be positive, got {value}"),
        })
    }
}

fn unit_fraction(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 && value <= 1.0 {
        Ok(())
    } else {
        Err(ConfigError::InvalidValue {
            field,
            reason: format!("must lie within (0, 1], got {value}"),
        })
    }
}
