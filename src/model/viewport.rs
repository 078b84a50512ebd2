use glam::{Vec2, Vec3};

use crate::model::camera::Camera;

/// Pixel rectangle on the output surface, bottom-left origin
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ScreenBounds {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl ScreenBounds {
    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }
}

/// Keeps a minimum world size visible and grows the world along whichever
/// axis has spare screen space, instead of stretching.
pub struct ExtendViewport<C: Camera> {
    pub camera: C,
    min_world_width: f32,
    min_world_height: f32,
    world_width: f32,
    world_height: f32,
    screen: ScreenBounds,
    screen_height: u32,
}

impl<C: Camera> ExtendViewport<C> {
    pub fn new(min_world_width: f32, min_world_height: f32, camera: C) -> Self {
        Self {
            camera,
            min_world_width,
            min_world_height,
            world_width: min_world_width,
            world_height: min_world_height,
            screen: ScreenBounds::default(),
            screen_height: 0,
        }
    }

    pub fn world_size(&self) -> Vec2 {
        Vec2::new(self.world_width, self.world_height)
    }

    pub fn screen_bounds(&self) -> ScreenBounds {
        self.screen
    }

    /// Pixels per world unit, or 0 when the viewport is degenerate
    pub fn scale(&self) -> f32 {
        if self.screen.is_empty() {
            0.0
        } else {
            self.screen.width as f32 / self.world_width
        }
    }

    /// Recompute the world size and screen mapping for a new surface size.
    /// Camera position is only touched when `center_camera` is set.
    pub fn update(&mut self, screen_width: u32, screen_height: u32, center_camera: bool) {
        self.screen_height = screen_height;

        if screen_width == 0 || screen_height == 0 {
            self.screen = ScreenBounds::default();
            return;
        }

        let sw = screen_width as f32;
        let sh = screen_height as f32;
        let mut world_width = self.min_world_width;
        let mut world_height = self.min_world_height;

        // fit the minimum world into the screen
        let scale = if sh / sw > world_height / world_width {
            sw / world_width
        } else {
            sh / world_height
        };
        let mut viewport_width = (world_width * scale).round() as i32;
        let mut viewport_height = (world_height * scale).round() as i32;

        // extend along the axis with leftover space
        if viewport_width < screen_width as i32 {
            let to_viewport = viewport_height as f32 / world_height;
            let to_world = world_height / viewport_height as f32;
            let lengthen = (screen_width as i32 - viewport_width) as f32 * to_world;
            world_width += lengthen;
            viewport_width += (lengthen * to_viewport).round() as i32;
        } else if viewport_height < screen_height as i32 {
            let to_viewport = viewport_width as f32 / world_width;
            let to_world = world_width / viewport_width as f32;
            let lengthen = (screen_height as i32 - viewport_height) as f32 * to_world;
            world_height += lengthen;
            viewport_height += (lengthen * to_viewport).round() as i32;
        }

        self.world_width = world_width;
        self.world_height = world_height;
        self.screen = ScreenBounds {
            x: (screen_width as i32 - viewport_width) / 2,
            y: (screen_height as i32 - viewport_height) / 2,
            width: viewport_width,
            height: viewport_height,
        };
        self.apply(center_camera);
    }

    fn apply(&mut self, center_camera: bool) {
        self.camera.set_viewport_size(self.world_width, self.world_height);
        if center_camera {
            self.camera.center_on(self.world_width / 2.0, self.world_height / 2.0);
        }
        self.camera.update();
    }

    /// Window pixel (top-left origin) to world coordinates on the camera's z = 0 plane
    pub fn unproject(&self, px: f32, py: f32) -> Option<Vec2> {
        if self.screen.is_empty() {
            return None;
        }
        let gl_y = self.screen_height as f32 - py;
        let ndc_x = (px - self.screen.x as f32) / self.screen.width as f32 * 2.0 - 1.0;
        let ndc_y = (gl_y - self.screen.y as f32) / self.screen.height as f32 * 2.0 - 1.0;
        let world = self
            .camera
            .combined()
            .inverse()
            .project_point3(Vec3::new(ndc_x, ndc_y, 0.0));
        world.is_finite().then(|| world.truncate())
    }

    /// World coordinates to window pixel (top-left origin)
    pub fn project(&self, world: Vec2) -> Option<Vec2> {
        if self.screen.is_empty() {
            return None;
        }
        let ndc = self.camera.combined().project_point3(world.extend(0.0));
        let x = self.screen.x as f32 + (ndc.x + 1.0) / 2.0 * self.screen.width as f32;
        let gl_y = self.screen.y as f32 + (ndc.y + 1.0) / 2.0 * self.screen.height as f32;
        Some(Vec2::new(x, self.screen_height as f32 - gl_y))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::camera::UiCamera;

    fn ui_viewport() -> ExtendViewport<UiCamera> {
        let mut cam = UiCamera::new();
        cam.set_to_ortho(10.0 * 800.0 / 600.0, 10.0);
        ExtendViewport::new(800.0, 600.0, cam)
    }

    #[test]
    fn native_size_maps_one_to_one() {
        let mut vp = ui_viewport();
        vp.update(800, 600, true);
        assert_eq!(vp.screen_bounds(), ScreenBounds { x: 0, y: 0, width: 800, height: 600 });
        assert_eq!(vp.world_size(), Vec2::new(800.0, 600.0));
        assert_eq!(vp.scale(), 1.0);
    }

    #[test]
    fn wide_window_extends_world_width() {
        let mut vp = ui_viewport();
        vp.update(1600, 600, true);
        assert_eq!(vp.world_size(), Vec2::new(1600.0, 600.0));
        assert_eq!(vp.screen_bounds(), ScreenBounds { x: 0, y: 0, width: 1600, height: 600 });
    }

    #[test]
    fn tall_window_extends_world_height() {
        let mut vp = ui_viewport();
        vp.update(400, 600, true);
        // 400/800 = 0.5 scale, 600 px of height covers 1200 world units
        assert_eq!(vp.world_size(), Vec2::new(800.0, 1200.0));
        assert_eq!(vp.scale(), 0.5);
    }

    #[test]
    fn zero_size_is_tolerated() {
        let mut vp = ui_viewport();
        vp.update(800, 600, true);
        vp.update(0, 0, false);
        assert!(vp.screen_bounds().is_empty());
        assert_eq!(vp.world_size(), Vec2::new(800.0, 600.0));
        assert_eq!(vp.unproject(10.0, 10.0), None);
        vp.update(0, 600, false);
        assert!(vp.screen_bounds().is_empty());
    }

    #[test]
    fn resize_without_centering_keeps_camera_position() {
        let mut vp = ui_viewport();
        vp.update(800, 600, true);
        let before = vp.camera.position;
        vp.update(1024, 768, false);
        assert_eq!(vp.camera.position, before);
    }

    #[test]
    fn unproject_inverts_project() {
        let mut vp = ui_viewport();
        vp.update(1280, 720, true);
        let world = Vec2::new(115.0, 115.0);
        let px = vp.project(world).unwrap();
        let back = vp.unproject(px.x, px.y).unwrap();
        assert!(back.abs_diff_eq(world, 1e-2));
    }

    #[test]
    fn bottom_left_pixel_unprojects_to_world_origin() {
        let mut vp = ui_viewport();
        vp.update(800, 600, true);
        let world = vp.unproject(0.0, 600.0).unwrap();
        assert!(world.abs_diff_eq(Vec2::ZERO, 1e-3));
    }
}
