use glam::{Vec2, Vec3, Vec4};

/// Every tunable of the demo. There is no config file; `Default` is the configuration.
#[derive(Debug, Clone)]
pub struct DemoConfig {
    // Motion
    pub block_speed: f32,
    pub start_position: Vec3,
    /// Upper bound for a single frame step, in seconds
    pub max_frame_dt: f32,

    // Geometry
    pub block_size: Vec3,
    pub block_color: Vec4,
    pub floor_size: Vec3,
    pub floor_color: Vec4,

    // World camera
    pub camera_fov_y_deg: f32,
    pub camera_near: f32,
    pub camera_far: f32,
    pub camera_position: Vec3,
    pub camera_target: Vec3,

    // Viewports
    pub min_world_width: f32,
    pub min_world_height: f32,
    pub ui_height_units: f32,

    // Lighting
    pub ambient_light: Vec4,
    pub sun_color: Vec3,
    pub sun_direction: Vec3,
    pub clear_color: [f64; 4],

    // Touchpad (UI world units, bottom-left origin)
    pub touchpad_origin: Vec2,
    pub touchpad_size: Vec2,
    pub touchpad_deadzone: f32,

    // Assets
    pub asset_root: &'static str,

    pub show_debug: bool,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            block_speed: 5.0,
            start_position: Vec3::new(0.0, 2.0, 0.0),
            max_frame_dt: 0.1,

            block_size: Vec3::splat(4.0),
            block_color: Vec4::new(0.0, 1.0, 0.0, 1.0),
            floor_size: Vec3::new(100.0, 0.1, 100.0),
            floor_color: Vec4::new(0.25, 0.25, 0.25, 1.0),

            camera_fov_y_deg: 67.0,
            camera_near: 1.0,
            camera_far: 300.0,
            camera_position: Vec3::new(0.0, 20.0, 10.0),
            camera_target: Vec3::ZERO,

            min_world_width: 800.0,
            min_world_height: 600.0,
            ui_height_units: 10.0,

            ambient_light: Vec4::new(0.4, 0.4, 0.4, 1.0),
            sun_color: Vec3::splat(0.8),
            sun_direction: Vec3::new(-1.0, -0.8, -0.2),
            clear_color: [0.294, 0.294, 0.294, 1.0],

            touchpad_origin: Vec2::new(15.0, 15.0),
            touchpad_size: Vec2::new(200.0, 200.0),
            touchpad_deadzone: 10.0,

            asset_root: "assets",

            show_debug: false,
        }
    }
}
