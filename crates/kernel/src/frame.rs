//! The per-frame tick: one clock read, pending assets, both controllers, then render.

use donutspace_assets::{AssetRequest, FontAsset, LoadState};
use donutspace_common::RandomSource;

use crate::camera::CameraPose;
use crate::clock::ClockSource;
use crate::scene::Scene;

/// What one tick produced.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    /// 1-based tick number.
    pub tick: u64,
    /// The single clock value both controllers saw.
    pub elapsed: f64,
    /// Camera placement, absent until the text anchor exists.
    pub camera: Option<CameraPose>,
}

/// Where the font that gates scene population stands.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssetStatus {
    NotRequested,
    Loading,
    Loaded,
    Failed(String),
}

/// Owns the clock, the random source and the scene, and ticks them together.
///
/// Single-threaded: the driver is advanced by whoever owns it, once per
/// rendered frame, and ticks never overlap.
pub struct FrameDriver<C, R> {
    clock: C,
    rng: R,
    scene: Scene,
    pending: Option<AssetRequest<FontAsset>>,
    status: AssetStatus,
}

impl<C: ClockSource, R: RandomSource> FrameDriver<C, R> {
    pub fn new(scene: Scene, clock: C, rng: R) -> Self {
        Self {
            clock,
            rng,
            scene,
            pending: None,
            status: AssetStatus::NotRequested,
        }
    }

    /// Wait on `request` for the font that populates the scene.
    ///
    /// The request is polled at the start of each tick. Once it resolves,
    /// population happens before that tick's controller updates.
    pub fn load_font(&mut self, request: AssetRequest<FontAsset>) {
        if self.scene.is_populated() {
            tracing::warn!(
                "scene already populated, ignoring font {}",
                request.path().display()
            );
            return;
        }
        tracing::debug!("waiting on font {}", request.path().display());
        self.pending = Some(request);
        self.status = AssetStatus::Loading;
    }

    /// Run one tick.
    pub fn tick(&mut self) -> Frame {
        let elapsed = self.clock.elapsed();
        self.poll_assets();
        let camera = self.scene.update(elapsed, &mut self.rng);
        Frame {
            tick: self.scene.stats().ticks,
            elapsed,
            camera,
        }
    }

    /// Run one tick, then hand the updated scene to `render`.
    pub fn run_frame<O>(&mut self, render: impl FnOnce(&Scene, &Frame) -> O) -> (Frame, O) {
        let frame = self.tick();
        let output = render(&self.scene, &frame);
        (frame, output)
    }

    fn poll_assets(&mut self) {
        let Some(request) = self.pending.as_mut() else {
            return;
        };
        match request.poll() {
            LoadState::Pending => {}
            LoadState::Ready(Ok(font)) => {
                self.pending = None;
                self.scene.populate(&font, &mut self.rng);
                self.status = AssetStatus::Loaded;
            }
            LoadState::Ready(Err(e)) => {
                // The scene stays empty and the camera stays inert.
                tracing::error!("font load failed: {e}");
                self.pending = None;
                self.status = AssetStatus::Failed(e.to_string());
            }
        }
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn clock_mut(&mut self) -> &mut C {
        &mut self.clock
    }

    pub fn asset_status(&self) -> &AssetStatus {
        &self.status
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::scene::tests::test_font;
    use donutspace_assets::AssetError;
    use donutspace_common::{ScriptedRandom, ThreadRandom};
    use glam::Vec3;
    use std::path::PathBuf;

    fn driver() -> FrameDriver<ManualClock, ThreadRandom> {
        FrameDriver::new(Scene::default(), ManualClock::new(), ThreadRandom::new())
    }

    #[test]
    fn ticks_without_font_are_inert() {
        let rng = ScriptedRandom::constant(0.5);
        let mut driver = FrameDriver::new(Scene::default(), ManualClock::new(), rng);
        for _ in 0..1000 {
            driver.clock_mut().advance(1.0 / 60.0);
            let frame = driver.tick();
            assert!(frame.camera.is_none());
        }
        assert_eq!(driver.scene().entity_count(), 0);
        assert_eq!(driver.scene().camera().state().current_radius, 3.0);
        assert_eq!(*driver.asset_status(), AssetStatus::NotRequested);
    }

    #[test]
    fn population_waits_for_the_font() {
        let mut driver = driver();
        let (tx, request) = AssetRequest::channel("test.typeface.json");
        driver.load_font(request);

        for _ in 0..5 {
            driver.clock_mut().advance(0.1);
            assert!(driver.tick().camera.is_none());
            assert_eq!(*driver.asset_status(), AssetStatus::Loading);
        }

        tx.send(Ok(test_font())).unwrap();
        driver.clock_mut().advance(0.1);
        let frame = driver.tick();

        assert_eq!(*driver.asset_status(), AssetStatus::Loaded);
        assert_eq!(driver.scene().entity_count(), 100);
        assert_eq!(frame.camera.unwrap().target, Vec3::ZERO);
        // The tick that populated the scene also moved every donut.
        assert_eq!(driver.scene().stats().entity_retargets, 100);
    }

    #[test]
    fn failed_font_leaves_scene_empty() {
        let mut driver = driver();
        driver.load_font(AssetRequest::ready(
            "missing.json",
            Err(AssetError::Disconnected(PathBuf::from("missing.json"))),
        ));

        for _ in 0..10 {
            driver.clock_mut().advance(0.5);
            assert!(driver.tick().camera.is_none());
        }

        assert!(matches!(
            driver.asset_status(),
            AssetStatus::Failed(msg) if msg.contains("missing.json")
        ));
        assert_eq!(driver.scene().entity_count(), 0);
    }

    #[test]
    fn second_font_is_ignored() {
        let mut driver = driver();
        driver.load_font(AssetRequest::ready("a.json", Ok(test_font())));
        driver.tick();
        driver.load_font(AssetRequest::ready("b.json", Ok(test_font())));
        driver.tick();
        assert_eq!(driver.scene().entity_count(), 100);
        assert_eq!(*driver.asset_status(), AssetStatus::Loaded);
    }

    #[test]
    fn one_clock_read_per_tick() {
        let mut driver = driver();
        driver.load_font(AssetRequest::ready("font.json", Ok(test_font())));
        driver.clock_mut().set(2.5);

        let frame = driver.tick();

        assert_eq!(frame.tick, 1);
        assert_eq!(frame.elapsed, 2.5);
        assert_eq!(driver.scene().elapsed(), 2.5);
        assert!(driver.scene().camera().state().radius_change_time > 2.5);
        for data in driver.scene().entities().values() {
            assert!(data.motion.time_to_next_move > 2.5);
        }
    }

    #[test]
    fn run_frame_renders_after_update() {
        let mut driver = driver();
        driver.load_font(AssetRequest::ready("font.json", Ok(test_font())));
        driver.clock_mut().set(1.0);

        let (frame, seen) =
            driver.run_frame(|scene, frame| (scene.stats().ticks, frame.camera.map(|c| c.eye)));

        assert_eq!(seen.0, frame.tick);
        assert_eq!(seen.1, frame.camera.map(|c| c.eye));
        assert!(seen.1.is_some());
    }

    #[test]
    fn frames_keep_moving_after_days() {
        let mut driver = driver();
        driver.load_font(AssetRequest::ready("font.json", Ok(test_font())));
        driver.clock_mut().set(600_000.0);

        let mut last = driver.tick();
        for _ in 0..60 {
            driver.clock_mut().advance(1.0 / 60.0);
            let frame = driver.tick();
            assert!(frame.elapsed > last.elapsed);
            assert_ne!(frame.camera.map(|c| c.eye), last.camera.map(|c| c.eye));
            last = frame;
        }
    }

    #[test]
    fn camera_follows_the_clock() {
        let mut driver = driver();
        driver.load_font(AssetRequest::ready("font.json", Ok(test_font())));

        let mut last_tick = 0;
        for _ in 0..600 {
            driver.clock_mut().advance(1.0 / 60.0);
            let frame = driver.tick();
            assert_eq!(frame.tick, last_tick + 1);
            last_tick = frame.tick;
            let radius = driver.scene().camera().state().current_radius;
            assert!((1.0..=4.0).contains(&radius));
        }
    }
}
