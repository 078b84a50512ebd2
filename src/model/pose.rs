use glam::{Mat4, Quat, Vec3};

/// Normalized knob displacement, each axis in [-1, 1].
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DirectionalInput {
    pub x: f32,
    pub y: f32,
}

impl DirectionalInput {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    pub fn new(x: f32, y: f32) -> Self {
        Self {
            x: x.clamp(-1.0, 1.0),
            y: y.clamp(-1.0, 1.0),
        }
    }

    pub fn is_zero(&self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Facing direction on the ground plane
    pub fn look_direction(&self) -> Vec3 {
        Vec3::new(self.x, 0.0, self.y)
    }
}

/// Position and facing of the moving block
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectPose {
    pub position: Vec3,
    pub orientation: Quat,
}

impl ObjectPose {
    pub fn at(position: Vec3) -> Self {
        Self {
            position,
            orientation: Quat::IDENTITY,
        }
    }

    pub fn transform(&self) -> Mat4 {
        Mat4::from_rotation_translation(self.orientation, self.position)
    }
}
