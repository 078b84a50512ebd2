use glam::Vec3;

use crate::model::{DirectionalInput, ObjectPose};

/// Turns knob displacement into movement on the ground plane
pub struct MotionIntegrator {
    pub speed: f32,
}

impl MotionIntegrator {
    pub fn new(speed: f32) -> Self {
        Self { speed }
    }

    /// Displacement for one step. Knob up moves away from the camera (-Z).
    pub fn translation(&self, input: DirectionalInput, dt: f32) -> Vec3 {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        let step = self.speed * dt;
        Vec3::new(input.x * step, 0.0, -input.y * step)
    }

    /// Accumulate one step into the pose. Position is never clamped.
    pub fn integrate(&self, input: DirectionalInput, dt: f32, pose: ObjectPose) -> ObjectPose {
        ObjectPose {
            position: pose.position + self.translation(input, dt),
            ..pose
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const START: Vec3 = Vec3::new(0.0, 2.0, 0.0);

    #[test]
    fn zero_dt_is_a_no_op() {
        let integrator = MotionIntegrator::new(5.0);
        for input in [DirectionalInput::new(1.0, 1.0), DirectionalInput::new(-0.3, 0.7), DirectionalInput::ZERO] {
            let pose = integrator.integrate(input, 0.0, ObjectPose::at(START));
            assert_eq!(pose.position, START);
        }
    }

    #[test]
    fn bad_dt_is_treated_as_zero() {
        let integrator = MotionIntegrator::new(5.0);
        let input = DirectionalInput::new(1.0, 0.0);
        assert_eq!(integrator.translation(input, -1.0), Vec3::ZERO);
        assert_eq!(integrator.translation(input, f32::NAN), Vec3::ZERO);
        assert_eq!(integrator.translation(input, f32::INFINITY), Vec3::ZERO);
    }

    #[test]
    fn motion_stays_on_the_ground_plane() {
        let integrator = MotionIntegrator::new(5.0);
        for (x, y, dt) in [(1.0, 1.0, 0.016), (-1.0, 0.5, 1.0), (0.2, -0.9, 3.5)] {
            let t = integrator.translation(DirectionalInput::new(x, y), dt);
            assert_eq!(t.y, 0.0);
        }
    }

    #[test]
    fn right_for_one_second() {
        let integrator = MotionIntegrator::new(5.0);
        let input = DirectionalInput::new(1.0, 0.0);
        assert_eq!(integrator.translation(input, 1.0), Vec3::new(5.0, 0.0, 0.0));
        let pose = integrator.integrate(input, 1.0, ObjectPose::at(START));
        assert_eq!(pose.position, Vec3::new(5.0, 2.0, 0.0));
    }

    #[test]
    fn knob_down_moves_toward_camera() {
        let integrator = MotionIntegrator::new(5.0);
        let pose = integrator.integrate(DirectionalInput::new(0.0, -1.0), 0.5, ObjectPose::at(START));
        assert_eq!(pose.position, Vec3::new(0.0, 2.0, 2.5));
    }

    #[test]
    fn steps_accumulate_independent_of_order() {
        let integrator = MotionIntegrator::new(5.0);
        let a = (DirectionalInput::new(0.5, 0.25), 0.5);
        let b = (DirectionalInput::new(-0.25, 1.0), 0.25);

        let ab = integrator.integrate(b.0, b.1, integrator.integrate(a.0, a.1, ObjectPose::at(START)));
        let ba = integrator.integrate(a.0, a.1, integrator.integrate(b.0, b.1, ObjectPose::at(START)));
        let combined = START + integrator.translation(a.0, a.1) + integrator.translation(b.0, b.1);

        assert!(ab.position.abs_diff_eq(ba.position, 1e-6));
        assert!(ab.position.abs_diff_eq(combined, 1e-6));
    }

    #[test]
    fn position_is_never_clamped() {
        let integrator = MotionIntegrator::new(5.0);
        let mut pose = ObjectPose::at(START);
        for _ in 0..1000 {
            pose = integrator.integrate(DirectionalInput::new(1.0, 0.0), 1.0, pose);
        }
        assert_eq!(pose.position.x, 5000.0);
    }
}
