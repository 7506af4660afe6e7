pub mod config;
pub mod error;
pub mod player;
#[cfg(feature = "desktop")]
pub mod ui;

pub use config::PlayerConfig;
pub use error::{Error, Result};
pub use player::{PlaybackController, PlayerState, ViewState};
#[cfg(feature = "desktop")]
pub use ui::{PlayerControls, VideoSurface};
