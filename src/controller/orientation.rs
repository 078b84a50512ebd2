use glam::{Mat3, Quat, Vec3};

use crate::model::{DirectionalInput, ObjectPose};

/// Faces the block along its direction of travel
pub struct OrientationResolver {
    pub up: Vec3,
}

impl OrientationResolver {
    pub fn new() -> Self {
        Self { up: Vec3::Y }
    }

    /// Rotation whose forward axis (-Z) points along the knob direction.
    /// The previous orientation is kept while the knob rests or the block
    /// sits exactly on the world origin.
    pub fn resolve(&self, input: DirectionalInput, pose: &ObjectPose) -> Quat {
        let direction = input.look_direction();
        if direction == Vec3::ZERO || pose.position == Vec3::ZERO {
            return pose.orientation;
        }

        let forward = direction.normalize();
        let right = forward.cross(self.up);
        if right.length_squared() == 0.0 {
            return pose.orientation;
        }
        let right = right.normalize();
        let up = right.cross(forward);
        Quat::from_mat3(&Mat3::from_cols(right, up, -forward))
    }

    pub fn apply(&self, input: DirectionalInput, pose: ObjectPose) -> ObjectPose {
        ObjectPose {
            orientation: self.resolve(input, &pose),
            ..pose
        }
    }
}

impl Default for OrientationResolver {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facing(q: Quat) -> Vec3 {
        q * Vec3::NEG_Z
    }

    #[test]
    fn faces_plus_x_when_pushed_right() {
        let resolver = OrientationResolver::new();
        let pose = ObjectPose::at(Vec3::new(5.0, 2.0, 0.0));
        let q = resolver.resolve(DirectionalInput::new(1.0, 0.0), &pose);
        assert!(facing(q).abs_diff_eq(Vec3::X, 1e-6));
        assert!((q * Vec3::Y).abs_diff_eq(Vec3::Y, 1e-6));
    }

    #[test]
    fn look_direction_uses_raw_knob_y() {
        let resolver = OrientationResolver::new();
        let pose = ObjectPose::at(Vec3::new(0.0, 2.0, 2.5));
        let q = resolver.resolve(DirectionalInput::new(0.0, -1.0), &pose);
        assert!(facing(q).abs_diff_eq(Vec3::NEG_Z, 1e-6));
    }

    #[test]
    fn zero_input_keeps_previous_orientation() {
        let resolver = OrientationResolver::new();
        let previous = Quat::from_rotation_y(1.2);
        let pose = ObjectPose { position: Vec3::new(3.0, 2.0, 1.0), orientation: previous };
        assert_eq!(resolver.resolve(DirectionalInput::ZERO, &pose), previous);
    }

    #[test]
    fn origin_position_keeps_previous_orientation() {
        let resolver = OrientationResolver::new();
        let previous = Quat::from_rotation_y(-0.4);
        let pose = ObjectPose { position: Vec3::ZERO, orientation: previous };
        assert_eq!(resolver.resolve(DirectionalInput::new(0.7, 0.7), &pose), previous);
    }

    #[test]
    fn apply_keeps_position() {
        let resolver = OrientationResolver::new();
        let pose = ObjectPose::at(Vec3::new(1.0, 2.0, 3.0));
        let out = resolver.apply(DirectionalInput::new(-1.0, 0.0), pose);
        assert_eq!(out.position, pose.position);
        assert!(facing(out.orientation).abs_diff_eq(Vec3::NEG_X, 1e-6));
    }
}
