//! Scene kernel: the procedural motion driver behind the donut scene.
//!
//! A [`FrameDriver`] reads one clock value per tick, lets the [`CameraPath`]
//! orbit the text anchor, and walks every [`MotionEntity`] toward its current
//! waypoint. Rendering happens after the tick, outside this crate.
//!
//! # Invariants
//! - One clock read per tick; both controllers see the same elapsed time.
//! - The camera path is inert until the text anchor exists.
//! - Scene population happens at most once, and only after a successful font load.
//! - All randomness flows through an injected [`RandomSource`](donutspace_common::RandomSource).

pub mod camera;
pub mod clock;
pub mod config;
pub mod frame;
pub mod motion;
pub mod scene;

pub use camera::{CameraPath, CameraPose, CameraState, CameraUpdate, TextAnchor};
pub use clock::{ClockSource, ManualClock, MonotonicClock};
pub use config::{CameraTuning, ConfigError, Interval, MotionTuning, SceneConfig, TextConfig};
pub use frame::{AssetStatus, Frame, FrameDriver};
pub use motion::MotionEntity;
pub use scene::{EntityData, Scene, SceneStats, TextLabel};
