use glam::{Mat4, Vec3};

/// What a viewport needs from the camera it drives.
pub trait Camera {
    /// Set the visible extent in world units
    fn set_viewport_size(&mut self, width: f32, height: f32);
    /// Move the camera so (x, y) sits at the viewport center
    fn center_on(&mut self, x: f32, y: f32);
    /// Recompute `combined` from position, orientation and projection
    fn update(&mut self);
    fn combined(&self) -> Mat4;
}

/// Perspective camera looking into the 3D scene
pub struct WorldCamera {
    pub eye: Vec3,
    pub direction: Vec3,
    pub up: Vec3,
    pub fov_y: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
    combined: Mat4,
}

impl WorldCamera {
    pub fn new(fov_y_deg: f32, viewport_width: f32, viewport_height: f32) -> Self {
        let mut cam = Self {
            eye: Vec3::ZERO,
            direction: Vec3::NEG_Z,
            up: Vec3::Y,
            fov_y: fov_y_deg.to_radians(),
            z_near: 1.0,
            z_far: 100.0,
            viewport_width,
            viewport_height,
            combined: Mat4::IDENTITY,
        };
        cam.update();
        cam
    }

    pub fn aspect(&self) -> f32 {
        if self.viewport_height > 0.0 {
            self.viewport_width / self.viewport_height
        } else {
            1.0
        }
    }

    /// Point the camera at `target`, re-orthogonalizing `up` against the new direction
    pub fn look_at(&mut self, target: Vec3) {
        let dir = target - self.eye;
        if dir.length_squared() == 0.0 {
            return;
        }
        self.direction = dir.normalize();
        let right = self.direction.cross(self.up);
        if right.length_squared() > 0.0 {
            self.up = right.cross(self.direction).normalize();
        }
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_to_rh(self.eye, self.direction, self.up)
    }

    pub fn projection(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect(), self.z_near, self.z_far)
    }
}

impl Camera for WorldCamera {
    fn set_viewport_size(&mut self, width: f32, height: f32) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    fn center_on(&mut self, x: f32, y: f32) {
        self.eye.x = x;
        self.eye.y = y;
    }

    fn update(&mut self) {
        self.combined = self.projection() * self.view();
    }

    fn combined(&self) -> Mat4 {
        self.combined
    }
}

/// Orthographic camera for the 2D overlay, y pointing up
pub struct UiCamera {
    pub position: Vec3,
    pub zoom: f32,
    pub z_near: f32,
    pub z_far: f32,
    pub viewport_width: f32,
    pub viewport_height: f32,
    combined: Mat4,
}

impl UiCamera {
    pub fn new() -> Self {
        let mut cam = Self {
            position: Vec3::ZERO,
            zoom: 1.0,
            z_near: 0.0,
            z_far: 100.0,
            viewport_width: 0.0,
            viewport_height: 0.0,
            combined: Mat4::IDENTITY,
        };
        cam.update();
        cam
    }

    /// Size the camera to `width`×`height` units with (0, 0) at the bottom-left corner
    pub fn set_to_ortho(&mut self, width: f32, height: f32) {
        self.viewport_width = width;
        self.viewport_height = height;
        self.position = Vec3::new(self.zoom * width / 2.0, self.zoom * height / 2.0, 0.0);
        self.update();
    }

    pub fn projection(&self) -> Mat4 {
        let half_w = self.zoom * self.viewport_width / 2.0;
        let half_h = self.zoom * self.viewport_height / 2.0;
        Mat4::orthographic_rh(-half_w, half_w, -half_h, half_h, self.z_near, self.z_far)
    }

    pub fn view(&self) -> Mat4 {
        Mat4::look_to_rh(self.position, Vec3::NEG_Z, Vec3::Y)
    }
}

impl Default for UiCamera {
    fn default() -> Self {
        Self::new()
    }
}

impl Camera for UiCamera {
    fn set_viewport_size(&mut self, width: f32, height: f32) {
        self.viewport_width = width;
        self.viewport_height = height;
    }

    fn center_on(&mut self, x: f32, y: f32) {
        self.position.x = x;
        self.position.y = y;
    }

    fn update(&mut self) {
        // a zero extent would make the ortho matrix non-finite
        if self.viewport_width > 0.0 && self.viewport_height > 0.0 {
            self.combined = self.projection() * self.view();
        }
    }

    fn combined(&self) -> Mat4 {
        self.combined
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec4Swizzles;

    #[test]
    fn look_at_points_direction_at_target() {
        let mut cam = WorldCamera::new(67.0, 800.0, 600.0);
        cam.eye = Vec3::new(0.0, 20.0, 10.0);
        cam.look_at(Vec3::ZERO);

        let expected = Vec3::new(0.0, -20.0, -10.0).normalize();
        assert!(cam.direction.abs_diff_eq(expected, 1e-6));
        assert!(cam.up.dot(cam.direction).abs() < 1e-6);
        assert!(cam.up.y > 0.0);
    }

    #[test]
    fn world_target_projects_to_screen_center() {
        let mut cam = WorldCamera::new(67.0, 800.0, 600.0);
        cam.eye = Vec3::new(0.0, 20.0, 10.0);
        cam.z_near = 1.0;
        cam.z_far = 300.0;
        cam.look_at(Vec3::ZERO);
        cam.update();

        let clip = cam.combined() * Vec3::ZERO.extend(1.0);
        let ndc = clip.xyz() / clip.w;
        assert!(ndc.x.abs() < 1e-5 && ndc.y.abs() < 1e-5);
        assert!(ndc.z > 0.0 && ndc.z < 1.0);
    }

    #[test]
    fn ortho_maps_extent_to_clip_edges() {
        let mut cam = UiCamera::new();
        cam.set_to_ortho(800.0, 600.0);

        let bottom_left = cam.combined().project_point3(Vec3::ZERO);
        let top_right = cam.combined().project_point3(Vec3::new(800.0, 600.0, 0.0));
        assert!(bottom_left.truncate().abs_diff_eq(glam::Vec2::new(-1.0, -1.0), 1e-5));
        assert!(top_right.truncate().abs_diff_eq(glam::Vec2::new(1.0, 1.0), 1e-5));
    }

    #[test]
    fn zero_extent_keeps_last_matrix() {
        let mut cam = UiCamera::new();
        cam.set_to_ortho(10.0, 10.0);
        let before = cam.combined();
        cam.set_viewport_size(0.0, 0.0);
        cam.update();
        assert_eq!(cam.combined(), before);
    }
}
