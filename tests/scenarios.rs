use glam::{Quat, Vec2, Vec3};

use joystick_nav::controller::{
    DualCameraSystem, FrameLoop, InputEvent, InputSampler, MotionIntegrator, OrientationResolver, Touchpad, UiRect,
};
use joystick_nav::model::{DirectionalInput, ObjectPose, ScreenBounds};
use joystick_nav::DemoConfig;

const START: Vec3 = Vec3::new(0.0, 2.0, 0.0);

fn step(input: DirectionalInput, dt: f32, pose: ObjectPose) -> ObjectPose {
    let integrator = MotionIntegrator::new(5.0);
    let resolver = OrientationResolver::new();
    resolver.apply(input, integrator.integrate(input, dt, pose))
}

#[test]
fn pushing_right_for_a_second_moves_five_units_and_faces_plus_x() {
    let pose = step(DirectionalInput::new(1.0, 0.0), 1.0, ObjectPose::at(START));
    assert!(pose.position.abs_diff_eq(Vec3::new(5.0, 2.0, 0.0), 1e-5));
    assert!((pose.orientation * Vec3::NEG_Z).abs_diff_eq(Vec3::X, 1e-5));
}

#[test]
fn pulling_down_for_half_a_second_moves_toward_the_camera() {
    let pose = step(DirectionalInput::new(0.0, -1.0), 0.5, ObjectPose::at(START));
    assert!(pose.position.abs_diff_eq(Vec3::new(0.0, 2.0, 2.5), 1e-5));
}

#[test]
fn resting_knob_changes_nothing() {
    let start = ObjectPose { position: START, orientation: Quat::from_rotation_y(0.7) };
    let pose = step(DirectionalInput::ZERO, 0.25, start);
    assert_eq!(pose, start);
}

#[test]
fn block_never_leaves_its_height() {
    let mut pose = ObjectPose::at(START);
    for (x, y) in [(0.3, 0.9), (-1.0, 0.0), (0.5, -0.5), (0.0, 1.0)] {
        pose = step(DirectionalInput::new(x, y), 0.1, pose);
        assert_eq!(pose.position.y, 2.0);
    }
}

#[test]
fn split_steps_match_one_long_step() {
    let input = DirectionalInput::new(0.6, -0.8);
    let integrator = MotionIntegrator::new(5.0);
    let once = integrator.integrate(input, 0.4, ObjectPose::at(START));
    let mut split = ObjectPose::at(START);
    for _ in 0..4 {
        split = integrator.integrate(input, 0.1, split);
    }
    assert!(once.position.abs_diff_eq(split.position, 1e-5));
}

#[test]
fn window_at_logical_size_maps_one_to_one() {
    let mut cameras = DualCameraSystem::new(&DemoConfig::default(), 1024, 768);
    cameras.on_resize(800, 600);
    assert_eq!(cameras.world.screen_bounds(), ScreenBounds { x: 0, y: 0, width: 800, height: 600 });
    assert_eq!(cameras.world.world_size(), Vec2::new(800.0, 600.0));
    assert_eq!(cameras.world.scale(), 1.0);
}

#[test]
fn touchpad_widget_cases() {
    let mut pad = Touchpad::new(
        UiRect { origin: Vec2::new(15.0, 15.0), size: Vec2::new(200.0, 200.0) },
        10.0,
        Vec2::new(64.0, 64.0),
    );
    let center = Vec2::new(100.0, 100.0);

    // outside the touch circle
    assert!(!pad.touch_down(1, Vec2::new(2.0, 2.0)));
    assert_eq!(pad.sample(), DirectionalInput::ZERO);

    // inside the dead zone
    assert!(pad.touch_down(1, center + Vec2::new(4.0, 4.0)));
    assert_eq!(pad.sample(), DirectionalInput::ZERO);

    // beyond the knob radius
    pad.touch_dragged(1, center + Vec2::new(0.0, 95.0));
    let input = pad.sample();
    assert!((Vec2::new(input.x, input.y).length() - 1.0).abs() < 1e-5);

    // release
    pad.touch_up(1, center + Vec2::new(0.0, 95.0));
    assert_eq!(pad.sample(), DirectionalInput::ZERO);
}

#[test]
fn frame_loop_drives_the_block_from_pointer_events() {
    let mut frame_loop = FrameLoop::new(&DemoConfig::default(), 800, 600, Vec2::new(64.0, 64.0));

    // knob center is at pixel (115, 485); push straight up by 100 pixels
    frame_loop.handle_event(&InputEvent::PointerDown { id: 7, x: 115.0, y: 485.0 });
    frame_loop.handle_event(&InputEvent::PointerMove { id: 7, x: 115.0, y: 385.0 });

    let snapshot = frame_loop.advance(0.1);
    assert!(snapshot.stats.position.abs_diff_eq(Vec3::new(0.0, 2.0, -0.5), 1e-4));

    frame_loop.handle_event(&InputEvent::FocusLost);
    let after = frame_loop.advance(0.1);
    assert_eq!(after.stats.position, snapshot.stats.position);
}
