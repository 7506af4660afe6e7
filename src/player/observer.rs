use crossbeam_channel::{bounded, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use super::session::PositionCallback;

/// Thread that reports the playback position at a fixed interval.
///
/// Dropping the handle stops the thread and waits for it, so the callback
/// cannot fire once the drop returns.
pub struct PeriodicObserver {
    // Never sent on; dropping it disconnects the worker's receiver.
    stop_sender: Option<Sender<()>>,
    worker: Option<JoinHandle<()>>,
}

impl PeriodicObserver {
    pub fn spawn<P>(interval: Duration, position: P, callback: PositionCallback) -> Self
    where
        P: Fn() -> f64 + Send + 'static,
    {
        let (stop_sender, stop_receiver) = bounded::<()>(0);

        let worker = thread::Builder::new()
            .name("position-observer".to_owned())
            .spawn(move || loop {
                match stop_receiver.recv_timeout(interval) {
                    Err(RecvTimeoutError::Timeout) => callback(position()),
                    Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                }
            });

        let worker = match worker {
            Ok(handle) => Some(handle),
            Err(err) => {
                log::error!("failed to spawn position observer: {err}");
                None
            }
        };

        Self {
            stop_sender: Some(stop_sender),
            worker,
        }
    }
}

impl Drop for PeriodicObserver {
    fn drop(&mut self) {
        self.stop_sender.take();

        if let Some(worker) = self.worker.take() {
            if let Err(err) = worker.join() {
                match err.downcast_ref::<String>() {
                    Some(e) => log::error!("position observer panicked: {e}"),
                    None => log::error!("position observer panicked with unknown reason"),
                }
            }
        }
    }
}
