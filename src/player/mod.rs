mod controller;
#[cfg(feature = "desktop")]
mod gst;
mod observer;
mod position;
mod session;
mod view;

pub use controller::{PlaybackController, PlayerState, Waker};
#[cfg(feature = "desktop")]
pub use gst::{GstBackend, GstSession};
pub use observer::PeriodicObserver;
pub use position::{positional_time, remaining_time};
pub use session::{
    MediaBackend, ObserverToken, PlaybackSession, PositionCallback, SeekTolerance, VideoFrame,
};
pub use view::{PlayIcon, PlayerView, ViewState};
