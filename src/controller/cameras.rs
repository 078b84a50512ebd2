use glam::{Mat4, Vec2};

use crate::config::DemoConfig;
use crate::model::{Camera, ExtendViewport, ScreenBounds, UiCamera, WorldCamera};

/// World and UI camera, each behind its own extend viewport
pub struct DualCameraSystem {
    pub world: ExtendViewport<WorldCamera>,
    pub ui: ExtendViewport<UiCamera>,
}

impl DualCameraSystem {
    pub fn new(config: &DemoConfig, width: u32, height: u32) -> Self {
        let mut world_cam = WorldCamera::new(config.camera_fov_y_deg, width as f32, height as f32);
        world_cam.eye = config.camera_position;
        world_cam.z_near = config.camera_near;
        world_cam.z_far = config.camera_far;
        world_cam.look_at(config.camera_target);
        world_cam.update();

        let aspect = if height > 0 { width as f32 / height as f32 } else { 1.0 };
        let mut ui_cam = UiCamera::new();
        ui_cam.set_to_ortho(config.ui_height_units * aspect, config.ui_height_units);

        let world = ExtendViewport::new(config.min_world_width, config.min_world_height, world_cam);
        let mut ui = ExtendViewport::new(config.min_world_width, config.min_world_height, ui_cam);
        // the overlay starts centered on its logical area, the world camera keeps its placement
        ui.update(width, height, true);

        let mut cameras = Self { world, ui };
        cameras.on_resize(width, height);
        cameras
    }

    /// Recompute both screen mappings. Camera placement is left alone.
    pub fn on_resize(&mut self, width: u32, height: u32) {
        self.world.update(width, height, false);
        self.ui.update(width, height, false);
        tracing::debug!(
            "viewports resized to {}x{}: world {:?}, ui {:?}",
            width,
            height,
            self.world.screen_bounds(),
            self.ui.screen_bounds()
        );
    }

    pub fn update(&mut self) {
        self.world.camera.update();
        self.ui.camera.update();
    }

    pub fn world_view_proj(&self) -> Mat4 {
        self.world.camera.combined()
    }

    pub fn world_screen_bounds(&self) -> ScreenBounds {
        self.world.screen_bounds()
    }

    pub fn unproject_ui(&self, px: f32, py: f32) -> Option<Vec2> {
        self.ui.unproject(px, py)
    }

    pub fn project_ui(&self, point: Vec2) -> Option<Vec2> {
        self.ui.project(point)
    }
}
