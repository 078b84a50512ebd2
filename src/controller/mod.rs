// CONTROLLER: Input, motion, cameras and the per-frame loop
pub mod input;
pub mod motion;
pub mod orientation;
pub mod cameras;
pub mod frame_loop;

pub use input::{InputEvent, InputSampler, Touchpad, UiRect};
pub use motion::MotionIntegrator;
pub use orientation::OrientationResolver;
pub use cameras::DualCameraSystem;
pub use frame_loop::{FrameLoop, FrameSnapshot, FrameStats, OverlayLayout, PixelRect};
