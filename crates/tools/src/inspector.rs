use donutspace_common::EntityId;
use donutspace_kernel::Scene;

/// Scene inspector for developer tooling.
///
/// Read-only queries against the scene for the debug panel and the CLI.
pub struct SceneInspector;

impl SceneInspector {
    /// Produce a summary of the scene state.
    pub fn summary(scene: &Scene) -> SceneSummary {
        let camera = scene.camera().state();
        let stats = scene.stats();
        let (mean_speed, mean_remaining) = if scene.entity_count() == 0 {
            (0.0, 0.0)
        } else {
            let n = scene.entity_count() as f32;
            let (speed, remaining) = scene.entities().values().fold((0.0, 0.0), |(s, r), d| {
                (s + d.motion.move_speed, r + d.motion.remaining())
            });
            (speed / n, remaining / n)
        };
        SceneSummary {
            tick: stats.ticks,
            elapsed: scene.elapsed(),
            entity_count: scene.entity_count(),
            populated: scene.is_populated(),
            current_radius: camera.current_radius,
            target_radius: camera.target_radius,
            radius_change_time: camera.radius_change_time,
            entity_retargets: stats.entity_retargets,
            radius_retargets: stats.radius_retargets,
            mean_speed,
            mean_remaining,
        }
    }

    /// Motion state of a specific donut.
    pub fn inspect_entity(scene: &Scene, id: EntityId) -> Option<EntityInfo> {
        scene.get(id).map(|data| {
            let m = &data.motion;
            EntityInfo {
                id,
                position: m.position.to_array(),
                target: m.target_position.to_array(),
                time_to_next_move: m.time_to_next_move,
                move_speed: m.move_speed,
                scale: data.scale,
            }
        })
    }

    /// List all donut IDs in iteration order.
    pub fn list_entities(scene: &Scene) -> Vec<EntityId> {
        scene.entities().keys().copied().collect()
    }
}

/// Summary of scene state for the inspector.
#[derive(Debug, Clone, PartialEq)]
pub struct SceneSummary {
    pub tick: u64,
    pub elapsed: f64,
    pub entity_count: usize,
    pub populated: bool,
    pub current_radius: f32,
    pub target_radius: f32,
    pub radius_change_time: f64,
    pub entity_retargets: u64,
    pub radius_retargets: u64,
    /// Average per-tick lerp fraction across donuts.
    pub mean_speed: f32,
    /// Average distance from each donut to its waypoint.
    pub mean_remaining: f32,
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scene: tick={} t={:.2}s donuts={} radius={:.2}->{:.2} (next at {:.2}s) \
             retargets={}/{}",
            self.tick,
            self.elapsed,
            self.entity_count,
            self.current_radius,
            self.target_radius,
            self.radius_change_time,
            self.entity_retargets,
            self.radius_retargets,
        )
    }
}

/// Detailed info about a single donut.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityInfo {
    pub id: EntityId,
    pub position: [f32; 3],
    pub target: [f32; 3],
    pub time_to_next_move: f64,
    pub move_speed: f32,
    pub scale: f32,
}

impl std::fmt::Display for EntityInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Donut [{}] pos=({:.2}, {:.2}, {:.2}) -> ({:.2}, {:.2}, {:.2}) speed={:.3} next={:.2}s",
            self.id,
            self.position[0],
            self.position[1],
            self.position[2],
            self.target[0],
            self.target[1],
            self.target[2],
            self.move_speed,
            self.time_to_next_move,
        )
    }
}
