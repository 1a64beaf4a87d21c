use donutspace_assets::{FontAsset, TextExtent};
use donutspace_common::{EntityId, RandomSource, Transform};
use glam::{EulerRot, Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::f32::consts::PI;

use crate::camera::{CameraPath, CameraPose, TextAnchor};
use crate::config::{Interval, SceneConfig};
use crate::motion::MotionEntity;

/// Per-donut data stored in the scene.
///
/// Rotation and scale are drawn once at population time and never animated.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EntityData {
    pub motion: MotionEntity,
    pub rotation: Quat,
    pub scale: f32,
}

impl EntityData {
    pub fn transform(&self) -> Transform {
        Transform::uniform(self.motion.position, self.rotation, self.scale)
    }
}

/// The centered text block, measured from the loaded font.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextLabel {
    pub content: String,
    pub extent: TextExtent,
}

/// Running counters, cheap enough to keep for the lifetime of the loop.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SceneStats {
    /// Scene updates since creation.
    pub ticks: u64,
    /// Entity waypoints drawn, across all entities.
    pub entity_retargets: u64,
    /// Camera target radii drawn.
    pub radius_retargets: u64,
}

/// Explicitly owned scene state: camera path, donuts and text anchor.
///
/// Entities live in a BTreeMap so iteration order is stable between runs.
#[derive(Debug, Clone)]
pub struct Scene {
    config: SceneConfig,
    camera: CameraPath,
    entities: BTreeMap<EntityId, EntityData>,
    anchor: Option<TextAnchor>,
    text: Option<TextLabel>,
    elapsed: f64,
    camera_pose: Option<CameraPose>,
    stats: SceneStats,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new(SceneConfig::default())
    }
}

impl Scene {
    /// An empty scene. Nothing moves until [`Scene::populate`] runs.
    pub fn new(config: SceneConfig) -> Self {
        Self {
            camera: CameraPath::new(config.camera),
            config,
            entities: BTreeMap::new(),
            anchor: None,
            text: None,
            elapsed: 0.0,
            camera_pose: None,
            stats: SceneStats::default(),
        }
    }

    pub fn config(&self) -> &SceneConfig {
        &self.config
    }

    pub fn camera(&self) -> &CameraPath {
        &self.camera
    }

    /// Camera placement from the latest update, if the camera is live.
    pub fn camera_pose(&self) -> Option<CameraPose> {
        self.camera_pose
    }

    pub fn anchor(&self) -> Option<&TextAnchor> {
        self.anchor.as_ref()
    }

    pub fn text(&self) -> Option<&TextLabel> {
        self.text.as_ref()
    }

    pub fn entities(&self) -> &BTreeMap<EntityId, EntityData> {
        &self.entities
    }

    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn get(&self, id: EntityId) -> Option<&EntityData> {
        self.entities.get(&id)
    }

    /// Elapsed time passed to the latest update.
    pub fn elapsed(&self) -> f64 {
        self.elapsed
    }

    pub fn stats(&self) -> SceneStats {
        self.stats
    }

    pub fn is_populated(&self) -> bool {
        self.anchor.is_some()
    }

    /// Build the text anchor and the donuts from a loaded font.
    ///
    /// Runs at most once. Returns `false` if the scene was already populated.
    /// Draws per donut, in order: position x, y, z, rotation x, y, scale.
    pub fn populate(&mut self, font: &FontAsset, rng: &mut impl RandomSource) -> bool {
        if self.is_populated() {
            tracing::warn!("scene already populated, ignoring font {}", font.family_name);
            return false;
        }

        let text = &self.config.text;
        let extent = font.measure(&text.content, text.size, text.depth);
        // Text geometry is centered on the origin, so that is where the camera looks.
        self.anchor = Some(TextAnchor::new(Vec3::ZERO));
        self.text = Some(TextLabel {
            content: text.content.clone(),
            extent,
        });

        let spawn = Interval::symmetric(self.config.spawn_half_extent);
        let angle = Interval::new(0.0, PI);
        let rest_speed = self.config.motion.speed.min;
        for _ in 0..self.config.entity_count {
            let position = Vec3::new(spawn.sample(rng), spawn.sample(rng), spawn.sample(rng));
            let (rx, ry) = (angle.sample(rng), angle.sample(rng));
            let rotation = Quat::from_euler(EulerRot::XYZ, rx, ry, 0.0);
            let scale = self.config.scale.sample(rng);
            self.entities.insert(
                EntityId::new(),
                EntityData {
                    motion: MotionEntity::at_rest(position, rest_speed),
                    rotation,
                    scale,
                },
            );
        }

        tracing::info!(
            "populated scene: {} donuts, text {:?} ({:.2} x {:.2}) in {}",
            self.entities.len(),
            text.content,
            extent.width,
            extent.height,
            font.family_name
        );
        true
    }

    /// Advance both controllers to `elapsed`: the camera first, then every donut.
    pub fn update(&mut self, elapsed: f64, rng: &mut impl RandomSource) -> Option<CameraPose> {
        self.elapsed = elapsed;
        self.stats.ticks += 1;

        let camera = self.camera.update(elapsed, self.anchor.as_ref(), rng);
        if camera.is_some_and(|c| c.radius_retargeted) {
            self.stats.radius_retargets += 1;
        }
        self.camera_pose = camera.map(|c| c.pose);

        let tuning = &self.config.motion;
        for data in self.entities.values_mut() {
            if data.motion.update(elapsed, tuning, rng) {
                self.stats.entity_retargets += 1;
            }
        }

        self.camera_pose
    }
}
