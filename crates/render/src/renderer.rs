use donutspace_kernel::{CameraPose, Scene};
use glam::{Mat4, Vec3};
use std::fmt::Write;

/// Camera/view configuration for rendering.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderView {
    /// Camera position in scene space.
    pub eye: Vec3,
    /// Point the camera is looking at.
    pub target: Vec3,
    /// Vertical field of view in degrees.
    pub fov_degrees: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for RenderView {
    /// The view before the camera path takes over.
    fn default() -> Self {
        Self {
            eye: Vec3::new(1.0, 1.0, 2.0),
            target: Vec3::ZERO,
            fov_degrees: 75.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl RenderView {
    /// Default lens placed at `pose`.
    pub fn from_pose(pose: CameraPose) -> Self {
        Self {
            eye: pose.eye,
            target: pose.target,
            ..Self::default()
        }
    }

    /// Follow `pose` when the camera is live, otherwise keep this view.
    pub fn follow(self, pose: Option<CameraPose>) -> Self {
        match pose {
            Some(pose) => Self {
                eye: pose.eye,
                target: pose.target,
                ..self
            },
            None => self,
        }
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye, self.target, Vec3::Y)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        Mat4::perspective_rh(self.fov_degrees.to_radians(), aspect.max(1e-3), self.near, self.far)
    }

    pub fn view_projection(&self, aspect: f32) -> Mat4 {
        self.projection_matrix(aspect) * self.view_matrix()
    }
}

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads scene state and a view, then produces output. It never
/// mutates the scene; the frame driver owns it.
pub trait Renderer {
    /// The output type produced by this renderer.
    type Output;

    /// Render one frame from the given scene and view.
    fn render(&self, scene: &Scene, view: &RenderView) -> Self::Output;
}

/// Plain-text renderer for headless runs, logging and tests.
#[derive(Debug, Default)]
pub struct DebugTextRenderer {
    /// Print at most this many donuts; `None` prints all of them.
    pub max_entities: Option<usize>,
}

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_limit(max_entities: usize) -> Self {
        Self {
            max_entities: Some(max_entities),
        }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene, view: &RenderView) -> String {
        let mut out = String::new();
        let stats = scene.stats();
        let _ = writeln!(
            out,
            "=== Scene (tick={}, t={:.2}s) ===",
            stats.ticks,
            scene.elapsed()
        );
        let _ = writeln!(out, "Donuts: {}", scene.entity_count());
        match scene.text() {
            Some(text) => {
                let _ = writeln!(
                    out,
                    "Text: {:?} {:.2} x {:.2} x {:.2}",
                    text.content, text.extent.width, text.extent.height, text.extent.depth
                );
            }
            None => out.push_str("Text: (loading)\n"),
        }
        let _ = writeln!(
            out,
            "Camera: eye=({:.2}, {:.2}, {:.2}) target=({:.1}, {:.1}, {:.1}) fov={:.0} radius={:.2}",
            view.eye.x,
            view.eye.y,
            view.eye.z,
            view.target.x,
            view.target.y,
            view.target.z,
            view.fov_degrees,
            scene.camera().state().current_radius
        );

        let limit = self.max_entities.unwrap_or(usize::MAX);
        for (id, data) in scene.entities().iter().take(limit) {
            let p = data.motion.position;
            let _ = writeln!(
                out,
                "  [{}] pos=({:.2}, {:.2}, {:.2}) speed={:.3}",
                id.short(),
                p.x,
                p.y,
                p.z,
                data.motion.move_speed
            );
        }
        if scene.entity_count() > limit {
            let _ = writeln!(out, "  ... {} more", scene.entity_count() - limit);
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use donutspace_assets::FontAsset;
    use donutspace_common::ThreadRandom;

    const FONT: &str = r#"{
        "familyName": "Mono",
        "resolution": 1000,
        "boundingBox": { "xMin": 0, "xMax": 600, "yMin": -200, "yMax": 800 },
        "glyphs": { "?": { "ha": 600 } }
    }"#;

    fn populated() -> Scene {
        let font = FontAsset::from_json("mono.json", FONT).unwrap();
        let mut scene = Scene::default();
        let mut rng = ThreadRandom::new();
        scene.populate(&font, &mut rng);
        scene.update(0.5, &mut rng);
        scene
    }

    #[test]
    fn debug_renderer_empty_scene() {
        let scene = Scene::default();
        let output = DebugTextRenderer::new().render(&scene, &RenderView::default());

        assert!(output.contains("tick=0"));
        assert!(output.contains("Donuts: 0"));
        assert!(output.contains("(loading)"));
    }

    #[test]
    fn debug_renderer_with_donuts() {
        let scene = populated();
        let view = RenderView::default().follow(scene.camera_pose());
        let output = DebugTextRenderer::new().render(&scene, &view);

        assert!(output.contains("Donuts: 100"));
        assert!(output.contains("\"Hello Three.js\""));
        assert_eq!(output.matches("pos=").count(), 100);
    }

    #[test]
    fn debug_renderer_limit() {
        let scene = populated();
        let output = DebugTextRenderer::with_limit(3).render(&scene, &RenderView::default());
        assert_eq!(output.matches("pos=").count(), 3);
        assert!(output.contains("... 97 more"));
    }

    #[test]
    fn render_view_default() {
        let view = RenderView::default();
        assert_eq!(view.eye, Vec3::new(1.0, 1.0, 2.0));
        assert_eq!(view.fov_degrees, 75.0);
        assert_eq!(view.target, Vec3::ZERO);
        assert_eq!((view.near, view.far), (0.1, 100.0));
    }

    #[test]
    fn follow_keeps_lens() {
        let pose = CameraPose {
            eye: Vec3::new(0.0, 1.0, 3.0),
            target: Vec3::ZERO,
        };
        let view = RenderView {
            fov_degrees: 50.0,
            ..RenderView::default()
        }
        .follow(Some(pose));
        assert_eq!(view.eye, pose.eye);
        assert_eq!(view.fov_degrees, 50.0);

        let idle = RenderView::default().follow(None);
        assert_eq!(idle, RenderView::default());
        assert_eq!(RenderView::from_pose(pose).eye, pose.eye);
    }

    #[test]
    fn view_matrix_maps_target_in_front() {
        let view = RenderView::default();
        let target = view.view_matrix().transform_point3(view.target);
        // Right-handed view space looks down -Z.
        assert!(target.z < 0.0);
        assert!(target.x.abs() < 1e-5 && target.y.abs() < 1e-5);
    }
}
