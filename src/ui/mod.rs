pub mod controls;
pub mod picker;
pub mod surface;

pub use controls::PlayerControls;
pub use picker::{FilePicker, PickStatus};
pub use surface::VideoSurface;
