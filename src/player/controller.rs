use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use std::path::Path;
use std::sync::Arc;

use super::position::{positional_time, remaining_time};
use super::session::{MediaBackend, ObserverToken, PlaybackSession, SeekTolerance, VideoFrame};
use super::view::{PlayIcon, PlayerView};
use crate::config::PlayerConfig;
use crate::error::{Error, Result};

/// Called from the observer thread after a tick is queued, to wake the UI.
pub type Waker = Box<dyn Fn() + Send + Sync>;

/// What the user can observe, always derived from the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayerState {
    Empty,
    Paused,
    Playing,
}

#[derive(Debug, Clone, Copy)]
struct Tick {
    generation: u64,
    position: f64,
}

/// Receiving end for ticks. Callbacks only hold a `Weak` to it.
struct Mailbox {
    sender: Sender<Tick>,
    waker: Mutex<Option<Waker>>,
}

impl Mailbox {
    fn post(&self, tick: Tick) {
        if self.sender.send(tick).is_ok() {
            if let Some(wake) = self.waker.lock().as_ref() {
                wake();
            }
        }
    }
}

struct ActiveSession<S: PlaybackSession> {
    session: S,
    observer: ObserverToken,
    /// `None` when the backend could not report a usable duration.
    duration: Option<f64>,
    generation: u64,
}

impl<S: PlaybackSession> ActiveSession<S> {
    /// Upper slider bound; an unknown duration pins the slider at zero.
    fn slider_max(&self) -> f64 {
        self.duration.unwrap_or(0.0)
    }
}

impl<S: PlaybackSession> Drop for ActiveSession<S> {
    fn drop(&mut self) {
        // Deregister before the session itself goes away.
        self.session.remove_observer(self.observer);
        log::info!("released session {}", self.generation);
    }
}

/// Drives one playback session and keeps the control bar in sync with it.
///
/// All methods run on the UI thread. Position ticks arrive from the session's
/// observer thread and are applied by [`PlaybackController::pump`].
pub struct PlaybackController<B: MediaBackend, V: PlayerView> {
    backend: B,
    view: V,
    config: PlayerConfig,
    active: Option<ActiveSession<B::Session>>,
    mailbox: Arc<Mailbox>,
    ticks: Receiver<Tick>,
    generation: u64,
}

impl<B: MediaBackend, V: PlayerView> PlaybackController<B, V> {
    pub fn new(backend: B, mut view: V, config: PlayerConfig) -> Self {
        let (sender, ticks) = unbounded();
        view.set_controls_enabled(false);
        view.set_load_enabled(true);

        Self {
            backend,
            view,
            config,
            active: None,
            mailbox: Arc::new(Mailbox {
                sender,
                waker: Mutex::new(None),
            }),
            ticks,
            generation: 0,
        }
    }

    /// Install a hook run whenever a tick is queued, e.g. a repaint request.
    pub fn set_waker(&self, waker: impl Fn() + Send + Sync + 'static) {
        *self.mailbox.waker.lock() = Some(Box::new(waker));
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    pub fn config(&self) -> &PlayerConfig {
        &self.config
    }

    pub fn session(&self) -> Option<&B::Session> {
        self.active.as_ref().map(|active| &active.session)
    }

    /// Duration of the loaded asset, captured at load time.
    ///
    /// `None` when nothing is loaded or the duration is unknown.
    pub fn duration(&self) -> Option<f64> {
        self.active.as_ref().and_then(|active| active.duration)
    }

    pub fn state(&self) -> PlayerState {
        match &self.active {
            None => PlayerState::Empty,
            Some(active) if active.session.is_playing() => PlayerState::Playing,
            Some(_) => PlayerState::Paused,
        }
    }

    /// Load `path` if its extension is allowed.
    pub fn open(&mut self, path: &Path) -> Result<()> {
        if !self.config.accepts(path) {
            log::warn!("ignoring {}: not a movie file", path.display());
            return Err(Error::UnsupportedExtension(path.to_path_buf()));
        }
        self.load(path)
    }

    /// Replace the current session with one bound to `path`.
    ///
    /// If the new asset cannot be played the controller ends up empty.
    pub fn load(&mut self, path: &Path) -> Result<()> {
        // The old callback must be gone before a new one is registered.
        self.active = None;

        let session = match self.backend.open(path) {
            Ok(session) => session,
            Err(err) => {
                log::warn!("failed to open {}: {err:#}", path.display());
                self.reset_view();
                return Err(err);
            }
        };

        if !session.is_playable() {
            log::warn!("{} is not playable", path.display());
            self.reset_view();
            return Err(Error::NotPlayable(path.to_path_buf()));
        }

        let duration = Some(session.duration()).filter(|d| d.is_finite() && *d > 0.0);
        let slider_max = duration.unwrap_or(0.0);

        self.generation += 1;
        let generation = self.generation;
        let mailbox = Arc::downgrade(&self.mailbox);
        let observer = session.add_periodic_observer(
            self.config.tick_interval,
            Box::new(move |position| {
                if let Some(mailbox) = mailbox.upgrade() {
                    mailbox.post(Tick {
                        generation,
                        position,
                    });
                }
            }),
        );

        log::info!(
            "loaded {} as session {generation} ({})",
            path.display(),
            duration.map_or("unknown duration".to_owned(), |d| format!("{d:.3}s"))
        );

        self.active = Some(ActiveSession {
            session,
            observer,
            duration,
            generation,
        });

        self.view.set_slider_bounds(0.0, slider_max);
        self.view.set_slider_value(0.0);
        self.view.set_elapsed_text(positional_time(0.0));
        self.view.set_remaining_text(positional_time(slider_max));
        self.view.set_play_icon(PlayIcon::Play);
        self.view.set_controls_enabled(true);
        Ok(())
    }

    /// Toggle between playing and paused.
    pub fn play_stop(&mut self) {
        let Some(active) = self.active.as_ref() else {
            return;
        };

        if active.session.is_playing() {
            active.session.pause();
            self.view.set_play_icon(PlayIcon::Play);
        } else {
            let at_end = active
                .duration
                .is_some_and(|duration| active.session.position() >= duration);
            if at_end {
                // Replay from the start once the end has been reached.
                active.session.seek(0.0, SeekTolerance::ANY);
            }
            active.session.play();
            self.view.set_play_icon(PlayIcon::Stop);
        }
    }

    /// Seek exactly to `target` seconds and update the labels right away.
    ///
    /// The labels do not wait for the seek. If the session coalesces rapid
    /// seeks they may disagree with it until the next tick.
    pub fn scrub(&mut self, target: f64) {
        let Some(active) = self.active.as_ref() else {
            return;
        };
        if target.is_nan() {
            return;
        }
        let duration = active.slider_max();
        let target = target.clamp(0.0, duration);

        active.session.seek(target, SeekTolerance::EXACT);

        self.view.set_slider_value(target);
        self.view.set_elapsed_text(positional_time(target));
        self.view.set_remaining_text(remaining_time(duration, target));
    }

    /// Apply a position report from the session.
    pub fn on_tick(&mut self, position: f64) {
        let Some(active) = self.active.as_ref() else {
            return;
        };
        let duration = active.duration;
        let slider_max = active.slider_max();
        let position = if position.is_nan() { 0.0 } else { position };
        let clamped = match duration {
            Some(duration) => position.clamp(0.0, duration),
            None => position.max(0.0),
        };

        self.view.set_slider_value(clamped.min(slider_max));
        self.view.set_elapsed_text(positional_time(clamped));
        self.view.set_remaining_text(remaining_time(slider_max, clamped));

        // The session does not announce completion; detect it here.
        // Without a known duration the end cannot be detected.
        if duration.is_some_and(|duration| position >= duration) {
            self.view.set_play_icon(PlayIcon::Play);
        }
    }

    /// Apply queued ticks for the current session. Returns how many applied.
    pub fn pump(&mut self) -> usize {
        let mut applied = 0;
        while let Ok(tick) = self.ticks.try_recv() {
            let current = self.active.as_ref().map(|active| active.generation);
            if current == Some(tick.generation) {
                self.on_tick(tick.position);
                applied += 1;
            } else {
                log::trace!("dropped tick from session {}", tick.generation);
            }
        }
        applied
    }

    /// Latest frame for the rendering surface.
    pub fn take_video_frame(&self) -> Option<VideoFrame> {
        self.active
            .as_ref()
            .and_then(|active| active.session.take_video_frame())
    }

    fn reset_view(&mut self) {
        self.view.set_slider_bounds(0.0, 0.0);
        self.view.set_slider_value(0.0);
        self.view.set_elapsed_text(positional_time(0.0));
        self.view.set_remaining_text(positional_time(0.0));
        self.view.set_play_icon(PlayIcon::Play);
        self.view.set_controls_enabled(false);
    }
}
