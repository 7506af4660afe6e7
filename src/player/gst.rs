use anyhow::{anyhow, Context as _};
use gstreamer as gst;
use gstreamer::prelude::*;
use gstreamer_app as gst_app;
use gstreamer_video as gst_video;
use gstreamer_video::prelude::*;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use super::observer::PeriodicObserver;
use super::session::{
    MediaBackend, ObserverToken, PlaybackSession, PositionCallback, SeekTolerance, VideoFrame,
};
use crate::error::Result;

/// How long to wait for the pipeline to preroll before giving up on the file.
const PREROLL_TIMEOUT_SECS: u64 = 5;

/// Opens sessions backed by a GStreamer `playbin`.
#[derive(Debug, Default, Clone, Copy)]
pub struct GstBackend;

impl MediaBackend for GstBackend {
    type Session = GstSession;

    fn open(&self, path: &Path) -> Result<GstSession> {
        Ok(GstSession::open(path)?)
    }
}

#[derive(Debug, Default)]
struct Status {
    eos: bool,
    error: Option<String>,
}

/// State shared with the observer threads.
struct Pipeline {
    playbin: gst::Element,
    duration: f64,
    status: Mutex<Status>,
}

impl Pipeline {
    /// Pick up end-of-stream and error messages posted since the last call.
    fn drain_bus(&self) {
        let Some(bus) = self.playbin.bus() else {
            return;
        };

        while let Some(msg) = bus.pop_filtered(&[gst::MessageType::Eos, gst::MessageType::Error])
        {
            match msg.view() {
                gst::MessageView::Eos(..) => {
                    log::debug!("end of stream");
                    self.status.lock().eos = true;
                    // Behave like a player whose rate drops to zero at the end.
                    if let Err(err) = self.playbin.set_state(gst::State::Paused) {
                        log::warn!("failed to pause at end of stream: {err}");
                    }
                }
                gst::MessageView::Error(err) => {
                    log::error!("playback error: {} ({:?})", err.error(), err.debug());
                    self.status.lock().error = Some(err.error().to_string());
                }
                _ => {}
            }
        }
    }

    fn position(&self) -> f64 {
        self.drain_bus();
        if self.status.lock().eos {
            return self.duration;
        }
        self.playbin
            .query_position::<gst::ClockTime>()
            .map_or(0.0, seconds)
    }
}

/// One loaded file played through `playbin`.
pub struct GstSession {
    pipeline: Arc<Pipeline>,
    frame: Arc<Mutex<Option<VideoFrame>>>,
    playable: bool,
    observers: Mutex<HashMap<ObserverToken, PeriodicObserver>>,
    next_token: AtomicU64,
}

impl GstSession {
    /// Build the pipeline for `path` and preroll it in the paused state.
    pub fn open(path: &Path) -> anyhow::Result<Self> {
        gst::init().context("failed to initialize GStreamer")?;

        let path = path
            .canonicalize()
            .with_context(|| format!("cannot resolve {}", path.display()))?;
        let uri = url::Url::from_file_path(&path)
            .map_err(|_| anyhow!("cannot build a file uri for {}", path.display()))?;

        let frame = Arc::new(Mutex::new(None));
        let appsink = gst_app::AppSink::builder()
            .caps(
                &gst_video::VideoCapsBuilder::new()
                    .format(gst_video::VideoFormat::Rgba)
                    .build(),
            )
            .max_buffers(1)
            .drop(true)
            .build();

        let sample_ref = Arc::clone(&frame);
        let preroll_ref = Arc::clone(&frame);
        appsink.set_callbacks(
            gst_app::AppSinkCallbacks::builder()
                .new_sample(move |sink| {
                    let sample = sink.pull_sample().map_err(|_| gst::FlowError::Eos)?;
                    store_frame(&sample, &sample_ref)
                })
                .new_preroll(move |sink| {
                    let sample = sink.pull_preroll().map_err(|_| gst::FlowError::Eos)?;
                    store_frame(&sample, &preroll_ref)
                })
                .build(),
        );

        let playbin = gst::ElementFactory::make("playbin")
            .property("uri", uri.as_str())
            .property("video-sink", &appsink)
            .build()
            .context("failed to create playbin")?;

        let prerolled = playbin.set_state(gst::State::Paused).is_ok()
            && preroll_succeeded(
                &playbin
                    .state(gst::ClockTime::from_seconds(PREROLL_TIMEOUT_SECS))
                    .0,
            );

        let duration = playbin
            .query_duration::<gst::ClockTime>()
            .map_or(0.0, seconds);

        let pipeline = Arc::new(Pipeline {
            playbin,
            duration,
            status: Mutex::new(Status::default()),
        });
        pipeline.drain_bus();

        let streams = pipeline.playbin.property::<i32>("n-video")
            + pipeline.playbin.property::<i32>("n-audio");
        let playable = prerolled && streams > 0 && pipeline.status.lock().error.is_none();

        log::debug!(
            "opened {uri}: prerolled={prerolled} streams={streams} duration={duration:.3}s"
        );

        Ok(Self {
            pipeline,
            frame,
            playable,
            observers: Mutex::new(HashMap::new()),
            next_token: AtomicU64::new(0),
        })
    }

    fn set_state(&self, state: gst::State) {
        if let Err(err) = self.pipeline.playbin.set_state(state) {
            log::error!("failed to switch to {state:?}: {err}");
            self.pipeline.status.lock().error = Some(err.to_string());
        }
    }
}

impl PlaybackSession for GstSession {
    fn is_playable(&self) -> bool {
        self.playable
    }

    fn rate(&self) -> f64 {
        self.pipeline.drain_bus();
        if self.pipeline.status.lock().eos {
            return 0.0;
        }

        let (_, current, pending) = self.pipeline.playbin.state(gst::ClockTime::ZERO);
        let effective = if pending == gst::State::VoidPending {
            current
        } else {
            pending
        };
        if effective == gst::State::Playing {
            1.0
        } else {
            0.0
        }
    }

    fn play(&self) {
        self.set_state(gst::State::Playing);
    }

    fn pause(&self) {
        self.set_state(gst::State::Paused);
    }

    fn error(&self) -> Option<String> {
        self.pipeline.drain_bus();
        self.pipeline.status.lock().error.clone()
    }

    fn position(&self) -> f64 {
        self.pipeline.position()
    }

    fn duration(&self) -> f64 {
        self.pipeline.duration
    }

    fn seek(&self, seconds: f64, tolerance: SeekTolerance) {
        let flags = seek_flags(tolerance);
        match self.pipeline.playbin.seek_simple(flags, clock_time(seconds)) {
            Ok(()) => self.pipeline.status.lock().eos = false,
            Err(err) => log::warn!("seek to {seconds:.3}s failed: {err}"),
        }
    }

    fn add_periodic_observer(
        &self,
        interval: Duration,
        callback: PositionCallback,
    ) -> ObserverToken {
        let token = ObserverToken(self.next_token.fetch_add(1, Ordering::Relaxed));
        let pipeline = Arc::clone(&self.pipeline);
        let observer = PeriodicObserver::spawn(interval, move || pipeline.position(), callback);
        self.observers.lock().insert(token, observer);
        token
    }

    fn remove_observer(&self, token: ObserverToken) {
        // Join outside the lock.
        let observer = self.observers.lock().remove(&token);
        drop(observer);
    }

    fn take_video_frame(&self) -> Option<VideoFrame> {
        self.frame.lock().take()
    }
}

impl Drop for GstSession {
    fn drop(&mut self) {
        let observers = std::mem::take(&mut *self.observers.lock());
        drop(observers);

        if let Err(err) = self.pipeline.playbin.set_state(gst::State::Null) {
            log::error!("failed to shut down pipeline: {err}");
        }
    }
}

fn store_frame(
    sample: &gst::Sample,
    slot: &Mutex<Option<VideoFrame>>,
) -> std::result::Result<gst::FlowSuccess, gst::FlowError> {
    let frame = rgba_frame(sample).ok_or(gst::FlowError::Error)?;
    *slot.lock() = Some(frame);
    Ok(gst::FlowSuccess::Ok)
}

/// A state query that timed out reports `Async`; only a finished preroll counts.
fn preroll_succeeded(
    result: &std::result::Result<gst::StateChangeSuccess, gst::StateChangeError>,
) -> bool {
    matches!(
        result,
        Ok(gst::StateChangeSuccess::Success | gst::StateChangeSuccess::NoPreroll)
    )
}

fn seek_flags(tolerance: SeekTolerance) -> gst::SeekFlags {
    gst::SeekFlags::FLUSH
        | if tolerance.is_exact() {
            gst::SeekFlags::ACCURATE
        } else {
            gst::SeekFlags::KEY_UNIT | gst::SeekFlags::SNAP_NEAREST
        }
}

/// Copy a sample into a tightly packed RGBA buffer, dropping row padding.
///
/// Strides come from the buffer's video meta when present, else from the caps.
fn rgba_frame(sample: &gst::Sample) -> Option<VideoFrame> {
    let caps = sample.caps()?;
    let info = gst_video::VideoInfo::from_caps(caps).ok()?;
    let buffer = sample.buffer()?;
    let frame = gst_video::VideoFrameRef::from_buffer_ref_readable(buffer, &info).ok()?;
    let data = frame.plane_data(0).ok()?;

    let width = frame.width() as usize;
    let height = frame.height() as usize;
    let stride = frame.plane_stride()[0] as usize;
    let row = width * 4;

    let mut rgba = Vec::with_capacity(row * height);
    for y in 0..height {
        let start = y * stride;
        rgba.extend_from_slice(data.get(start..start + row)?);
    }

    Some(VideoFrame {
        rgba,
        width: width as u32,
        height: height as u32,
    })
}

fn seconds(time: gst::ClockTime) -> f64 {
    time.nseconds() as f64 / 1_000_000_000.0
}

fn clock_time(seconds: f64) -> gst::ClockTime {
    gst::ClockTime::from_nseconds((seconds.max(0.0) * 1_000_000_000.0) as u64)
}
