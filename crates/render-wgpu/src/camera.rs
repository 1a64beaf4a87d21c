use donutspace_kernel::CameraPose;
use donutspace_render::RenderView;
use glam::Mat4;

/// Camera driven by the scene's camera path rather than by input.
///
/// Holds the last view it was given, so frames rendered before the path is
/// live show the initial view.
#[derive(Debug, Clone, Copy)]
pub struct OrbitCamera {
    pub view: RenderView,
    pub aspect: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self {
            view: RenderView::default(),
            aspect: 16.0 / 9.0,
        }
    }
}

impl OrbitCamera {
    pub fn new(width: u32, height: u32) -> Self {
        let mut camera = Self::default();
        camera.resize(width, height);
        camera
    }

    /// Track a new surface size. Zero-sized surfaces keep the old aspect.
    pub fn resize(&mut self, width: u32, height: u32) {
        if width > 0 && height > 0 {
            self.aspect = width as f32 / height as f32;
        }
    }

    pub fn follow(&mut self, pose: Option<CameraPose>) {
        self.view = self.view.follow(pose);
    }

    pub fn view_matrix(&self) -> Mat4 {
        self.view.view_matrix()
    }

    pub fn view_projection(&self) -> Mat4 {
        self.view.view_projection(self.aspect)
    }
}
