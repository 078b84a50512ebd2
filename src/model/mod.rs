// MODEL: Demo state and data
pub mod camera;
pub mod viewport;
pub mod pose;
pub mod scene;
pub mod skin;

pub use camera::{Camera, UiCamera, WorldCamera};
pub use viewport::{ExtendViewport, ScreenBounds};
pub use pose::{DirectionalInput, ObjectPose};
pub use scene::{Environment, SceneGeometry, SceneObject};
pub use skin::{AssetError, SkinDrawable, SkinImage, TouchpadSkin};
