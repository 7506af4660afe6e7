#![allow(dead_code)]

use anyhow::anyhow;
use egui_movie::player::{
    MediaBackend, ObserverToken, PeriodicObserver, PlaybackSession, PositionCallback,
    SeekTolerance,
};
use egui_movie::Result;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

/// Calls made on a fake session, in order.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Call {
    Play,
    Pause,
    Seek { to: f64, exact: bool },
}

enum Registration {
    Manual(PositionCallback),
    Live(PeriodicObserver),
}

struct FakeState {
    path: PathBuf,
    duration: f64,
    playable: bool,
    rate: f64,
    error: Option<String>,
    apply_seeks: bool,
    ignore_removal: bool,
    live: bool,
    calls: Vec<Call>,
    intervals: Vec<Duration>,
    observers: HashMap<ObserverToken, Registration>,
    next_token: u64,
}

/// Scriptable stand-in for the external playback service.
#[derive(Clone)]
pub struct FakeSession {
    state: Arc<Mutex<FakeState>>,
    position: Arc<Mutex<f64>>,
}

impl FakeSession {
    fn new(path: &Path, media: Media) -> Self {
        Self {
            state: Arc::new(Mutex::new(FakeState {
                path: path.to_path_buf(),
                duration: media.duration,
                playable: media.playable,
                rate: 0.0,
                error: None,
                apply_seeks: true,
                ignore_removal: media.ignore_removal,
                live: media.live,
                calls: Vec::new(),
                intervals: Vec::new(),
                observers: HashMap::new(),
                next_token: 0,
            })),
            position: Arc::new(Mutex::new(0.0)),
        }
    }

    pub fn path(&self) -> PathBuf {
        self.state.lock().path.clone()
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().calls.clone()
    }

    pub fn observer_count(&self) -> usize {
        self.state.lock().observers.len()
    }

    pub fn observer_intervals(&self) -> Vec<Duration> {
        self.state.lock().intervals.clone()
    }

    pub fn set_position(&self, position: f64) {
        *self.position.lock() = position;
    }

    /// Stop as if the end of the media was reached.
    pub fn finish(&self) {
        let duration = self.state.lock().duration;
        self.set_position(duration);
        self.state.lock().rate = 0.0;
    }

    /// Change the rate behind the controller's back.
    pub fn set_rate(&self, rate: f64) {
        self.state.lock().rate = rate;
    }

    pub fn fail(&self, message: &str) {
        self.state.lock().error = Some(message.to_owned());
    }

    /// Accept seeks without moving, like a session coalescing rapid seeks.
    pub fn ignore_seeks(&self) {
        self.state.lock().apply_seeks = false;
    }

    /// Fire every manual observer with the current position.
    pub fn fire_tick(&self) {
        let position = *self.position.lock();
        let state = self.state.lock();
        for registration in state.observers.values() {
            if let Registration::Manual(callback) = registration {
                callback(position);
            }
        }
    }
}

impl PlaybackSession for FakeSession {
    fn is_playable(&self) -> bool {
        self.state.lock().playable
    }

    fn rate(&self) -> f64 {
        self.state.lock().rate
    }

    fn play(&self) {
        let mut state = self.state.lock();
        state.rate = 1.0;
        state.calls.push(Call::Play);
    }

    fn pause(&self) {
        let mut state = self.state.lock();
        state.rate = 0.0;
        state.calls.push(Call::Pause);
    }

    fn error(&self) -> Option<String> {
        self.state.lock().error.clone()
    }

    fn position(&self) -> f64 {
        *self.position.lock()
    }

    fn duration(&self) -> f64 {
        self.state.lock().duration
    }

    fn seek(&self, seconds: f64, tolerance: SeekTolerance) {
        let apply = {
            let mut state = self.state.lock();
            state.calls.push(Call::Seek {
                to: seconds,
                exact: tolerance.is_exact(),
            });
            state.apply_seeks
        };
        if apply {
            self.set_position(seconds);
        }
    }

    fn add_periodic_observer(
        &self,
        interval: Duration,
        callback: PositionCallback,
    ) -> ObserverToken {
        let mut state = self.state.lock();
        let token = ObserverToken(state.next_token);
        state.next_token += 1;
        state.intervals.push(interval);

        let registration = if state.live {
            let position = Arc::clone(&self.position);
            Registration::Live(PeriodicObserver::spawn(
                interval,
                move || *position.lock(),
                callback,
            ))
        } else {
            Registration::Manual(callback)
        };
        state.observers.insert(token, registration);
        token
    }

    fn remove_observer(&self, token: ObserverToken) {
        let removed = {
            let mut state = self.state.lock();
            if state.ignore_removal {
                return;
            }
            state.observers.remove(&token)
        };
        drop(removed);
    }
}

#[derive(Debug, Clone, Copy)]
pub struct Media {
    pub duration: f64,
    pub playable: bool,
    pub ignore_removal: bool,
    pub live: bool,
}

impl Media {
    pub fn playable(duration: f64) -> Self {
        Self {
            duration,
            playable: true,
            ignore_removal: false,
            live: false,
        }
    }

    pub fn broken() -> Self {
        Self {
            playable: false,
            ..Self::playable(0.0)
        }
    }

    /// Keeps its callbacks even after they are deregistered.
    pub fn leaky(duration: f64) -> Self {
        Self {
            ignore_removal: true,
            ..Self::playable(duration)
        }
    }

    /// Reports positions from a real observer thread.
    pub fn live(duration: f64) -> Self {
        Self {
            live: true,
            ..Self::playable(duration)
        }
    }
}

/// Backend serving a fixed catalogue of files. Clones share the session log.
#[derive(Clone, Default)]
pub struct FakeBackend {
    media: HashMap<PathBuf, Media>,
    opened: Arc<Mutex<Vec<FakeSession>>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, path: &str, media: Media) -> Self {
        self.media.insert(PathBuf::from(path), media);
        self
    }

    /// Every session opened so far, oldest first.
    pub fn sessions(&self) -> Vec<FakeSession> {
        self.opened.lock().clone()
    }

    pub fn last_session(&self) -> FakeSession {
        self.opened
            .lock()
            .last()
            .cloned()
            .expect("no session opened")
    }
}

impl MediaBackend for FakeBackend {
    type Session = FakeSession;

    fn open(&self, path: &Path) -> Result<FakeSession> {
        let media = self
            .media
            .get(path)
            .copied()
            .ok_or_else(|| anyhow!("no such file: {}", path.display()))?;
        let session = FakeSession::new(path, media);
        self.opened.lock().push(session.clone());
        Ok(session)
    }
}
