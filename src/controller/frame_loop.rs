use glam::{Mat4, Vec2, Vec3};

use crate::config::DemoConfig;
use crate::controller::cameras::DualCameraSystem;
use crate::controller::input::{InputEvent, InputSampler, Touchpad, UiRect};
use crate::controller::motion::MotionIntegrator;
use crate::controller::orientation::OrientationResolver;
use crate::model::{DirectionalInput, ObjectPose, ScreenBounds};

/// Rectangle in window pixels, top-left origin
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelRect {
    pub min: Vec2,
    pub max: Vec2,
}

/// Where the touchpad images land on screen this frame
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct OverlayLayout {
    pub background: Option<PixelRect>,
    pub knob: Option<PixelRect>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct FrameStats {
    pub dt: f32,
    pub fps: f32,
    pub position: Vec3,
    pub input: DirectionalInput,
}

/// Everything the renderer needs for one frame
#[derive(Debug, Clone, Copy)]
pub struct FrameSnapshot {
    pub world_view_proj: Mat4,
    pub world_viewport: ScreenBounds,
    pub block_transform: Mat4,
    pub floor_transform: Mat4,
    pub overlay: OverlayLayout,
    pub ui_time: f64,
    pub stats: FrameStats,
}

/// Per-frame control loop: cameras, touchpad, motion and orientation
pub struct FrameLoop {
    pub cameras: DualCameraSystem,
    pub touchpad: Touchpad,
    pub integrator: MotionIntegrator,
    pub resolver: OrientationResolver,
    pub pose: ObjectPose,
    pub show_debug: bool,
    max_frame_dt: f32,
    ui_time: f64,

    // FPS bookkeeping
    fps: f32,
    frame_count: u32,
    fps_timer: f32,
}

impl FrameLoop {
    pub fn new(config: &DemoConfig, width: u32, height: u32, knob_size: Vec2) -> Self {
        let touchpad = Touchpad::new(
            UiRect { origin: config.touchpad_origin, size: config.touchpad_size },
            config.touchpad_deadzone,
            knob_size,
        );

        Self {
            cameras: DualCameraSystem::new(config, width, height),
            touchpad,
            integrator: MotionIntegrator::new(config.block_speed),
            resolver: OrientationResolver::new(),
            pose: ObjectPose::at(config.start_position),
            show_debug: config.show_debug,
            max_frame_dt: config.max_frame_dt,
            ui_time: 0.0,
            fps: 0.0,
            frame_count: 0,
            fps_timer: 0.0,
        }
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.cameras.on_resize(width, height);
    }

    /// Feed a pointer event to the overlay. Returns true when the touchpad took it.
    pub fn handle_event(&mut self, event: &InputEvent) -> bool {
        match *event {
            InputEvent::PointerDown { id, x, y } => match self.to_touchpad_local(x, y) {
                Some(local) => self.touchpad.touch_down(id, local),
                None => false,
            },
            InputEvent::PointerMove { id, x, y } => {
                if let Some(local) = self.to_touchpad_local(x, y) {
                    self.touchpad.touch_dragged(id, local);
                }
                self.touchpad.is_touched()
            }
            InputEvent::PointerUp { id, x, y } => {
                let was_touched = self.touchpad.is_touched();
                match self.to_touchpad_local(x, y) {
                    Some(local) => self.touchpad.touch_up(id, local),
                    None => self.touchpad.release(),
                }
                was_touched
            }
            InputEvent::FocusLost => {
                self.touchpad.release();
                false
            }
        }
    }

    fn to_touchpad_local(&self, px: f32, py: f32) -> Option<Vec2> {
        self.cameras
            .unproject_ui(px, py)
            .map(|world| self.touchpad.bounds.to_local(world))
    }

    /// Advance one frame: update cameras, sample the pad, move and turn the block
    pub fn advance(&mut self, dt: f32) -> FrameSnapshot {
        let dt = if dt.is_finite() { dt.clamp(0.0, self.max_frame_dt) } else { 0.0 };
        self.tick_fps(dt);

        self.cameras.update();

        let input = self.touchpad.sample();
        self.pose = self.integrator.integrate(input, dt, self.pose);
        self.pose = self.resolver.apply(input, self.pose);

        self.ui_time += dt as f64;

        FrameSnapshot {
            world_view_proj: self.cameras.world_view_proj(),
            world_viewport: self.cameras.world_screen_bounds(),
            block_transform: self.pose.transform(),
            floor_transform: Mat4::IDENTITY,
            overlay: self.overlay_layout(),
            ui_time: self.ui_time,
            stats: FrameStats {
                dt,
                fps: self.fps,
                position: self.pose.position,
                input,
            },
        }
    }

    fn tick_fps(&mut self, dt: f32) {
        self.frame_count += 1;
        self.fps_timer += dt;
        if self.fps_timer >= 1.0 {
            self.fps = self.frame_count as f32 / self.fps_timer;
            self.frame_count = 0;
            self.fps_timer = 0.0;
        }
    }

    /// Project the touchpad background and knob through the UI camera
    pub fn overlay_layout(&self) -> OverlayLayout {
        let bounds = self.touchpad.bounds;
        let knob_half = self.touchpad.knob_size / 2.0;
        let knob_center = self.touchpad.knob_world_position();

        OverlayLayout {
            background: self.project_rect(bounds.origin, bounds.origin + bounds.size),
            knob: self.project_rect(knob_center - knob_half, knob_center + knob_half),
        }
    }

    fn project_rect(&self, bottom_left: Vec2, top_right: Vec2) -> Option<PixelRect> {
        let bl = self.cameras.project_ui(bottom_left)?;
        let tr = self.cameras.project_ui(top_right)?;
        Some(PixelRect {
            min: Vec2::new(bl.x, tr.y),
            max: Vec2::new(tr.x, bl.y),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame_loop() -> FrameLoop {
        FrameLoop::new(&DemoConfig::default(), 800, 600, Vec2::new(64.0, 64.0))
    }

    #[test]
    fn idle_frames_do_not_move_the_block() {
        let mut fl = frame_loop();
        let start = fl.pose;
        for _ in 0..10 {
            fl.advance(1.0 / 60.0);
        }
        assert_eq!(fl.pose, start);
    }

    #[test]
    fn dragging_the_pad_moves_and_turns_the_block() {
        let mut fl = frame_loop();
        // pad center sits at UI (115, 115), which is pixel (115, 485) at 800x600
        assert!(fl.handle_event(&InputEvent::PointerDown { id: 0, x: 115.0, y: 485.0 }));
        assert!(fl.handle_event(&InputEvent::PointerMove { id: 0, x: 315.0, y: 485.0 }));

        let snap = fl.advance(0.1);
        assert!(snap.stats.input.x > 0.99);
        assert!(snap.stats.position.abs_diff_eq(Vec3::new(0.5, 2.0, 0.0), 1e-4));
        assert!((fl.pose.orientation * Vec3::NEG_Z).abs_diff_eq(Vec3::X, 1e-5));
    }

    #[test]
    fn release_stops_motion_and_keeps_facing() {
        let mut fl = frame_loop();
        fl.handle_event(&InputEvent::PointerDown { id: 3, x: 115.0, y: 485.0 });
        fl.handle_event(&InputEvent::PointerMove { id: 3, x: 115.0, y: 585.0 });
        fl.advance(0.05);
        let facing = fl.pose.orientation;
        assert!(fl.handle_event(&InputEvent::PointerUp { id: 3, x: 115.0, y: 585.0 }));

        let before = fl.pose.position;
        fl.advance(0.05);
        assert_eq!(fl.pose.position, before);
        assert_eq!(fl.pose.orientation, facing);
    }

    #[test]
    fn clicks_outside_the_pad_are_not_captured() {
        let mut fl = frame_loop();
        assert!(!fl.handle_event(&InputEvent::PointerDown { id: 0, x: 600.0, y: 100.0 }));
        assert!(!fl.touchpad.is_touched());
    }

    #[test]
    fn huge_frame_steps_are_clamped() {
        let mut fl = frame_loop();
        let snap = fl.advance(5.0);
        assert_eq!(snap.stats.dt, 0.1);
        assert_eq!(fl.advance(-1.0).stats.dt, 0.0);
    }

    #[test]
    fn overlay_sits_in_the_bottom_left_corner() {
        let fl = frame_loop();
        let bg = fl.overlay_layout().background.unwrap();
        assert!(bg.min.abs_diff_eq(Vec2::new(15.0, 385.0), 1e-3));
        assert!(bg.max.abs_diff_eq(Vec2::new(215.0, 585.0), 1e-3));
    }

    #[test]
    fn overlay_vanishes_for_degenerate_window() {
        let mut fl = frame_loop();
        fl.resize(0, 0);
        let snap = fl.advance(0.016);
        assert_eq!(snap.overlay, OverlayLayout::default());
        assert!(snap.world_viewport.is_empty());
    }
}
