use std::path::Path;
use std::time::Duration;

use crate::error::Result;

/// Callback invoked by a session with the current position in seconds.
///
/// Runs on a thread owned by the session, never on the UI thread.
pub type PositionCallback = Box<dyn Fn(f64) + Send + 'static>;

/// Handle returned by [`PlaybackSession::add_periodic_observer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverToken(pub u64);

/// How far a seek may land from the requested position, in seconds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeekTolerance {
    pub before: f64,
    pub after: f64,
}

impl SeekTolerance {
    /// Land exactly on the requested position.
    pub const EXACT: Self = Self {
        before: 0.0,
        after: 0.0,
    };

    /// Let the backend pick whatever is cheapest, typically a keyframe.
    pub const ANY: Self = Self {
        before: f64::INFINITY,
        after: f64::INFINITY,
    };

    pub fn is_exact(&self) -> bool {
        self.before == 0.0 && self.after == 0.0
    }
}

/// A decoded frame ready for display, tightly packed RGBA8.
#[derive(Clone)]
pub struct VideoFrame {
    pub rgba: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Live binding to one loaded media asset.
///
/// Implemented by the external playback service. The controller only ever
/// queries it; it never caches the playing flag.
pub trait PlaybackSession {
    /// Whether the asset can be played at all.
    fn is_playable(&self) -> bool;

    /// Current playback rate, 0.0 when paused or stopped at the end.
    fn rate(&self) -> f64;

    fn play(&self);

    fn pause(&self);

    /// Last error reported by the session, if any.
    fn error(&self) -> Option<String>;

    /// Current position in seconds.
    fn position(&self) -> f64;

    /// Total duration in seconds.
    fn duration(&self) -> f64;

    /// Fire-and-forget seek; completion is not reported.
    fn seek(&self, seconds: f64, tolerance: SeekTolerance);

    /// Register a callback fired every `interval` with the current position.
    fn add_periodic_observer(&self, interval: Duration, callback: PositionCallback)
        -> ObserverToken;

    /// Deregister a callback. It must not fire after this returns.
    fn remove_observer(&self, token: ObserverToken);

    /// Latest frame produced since the previous call, if the session renders video.
    fn take_video_frame(&self) -> Option<VideoFrame> {
        None
    }

    /// Playing means a non-zero rate and no error.
    fn is_playing(&self) -> bool {
        self.rate() != 0.0 && self.error().is_none()
    }
}

/// Constructs playback sessions from local files.
pub trait MediaBackend {
    type Session: PlaybackSession + 'static;

    fn open(&self, path: &Path) -> Result<Self::Session>;
}
