use crossbeam_channel::{bounded, Receiver, TryRecvError};
use std::path::PathBuf;
use std::thread;

/// Outcome of polling a pending file selection.
#[derive(Debug, PartialEq)]
pub enum PickStatus {
    /// No selection was started.
    Idle,
    /// The dialog is still open.
    Pending,
    /// The dialog closed, with or without a file.
    Done(Option<PathBuf>),
}

/// Runs a file selection off the UI thread and hands back the result.
#[derive(Default)]
pub struct FilePicker {
    pending: Option<Receiver<Option<PathBuf>>>,
}

impl FilePicker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Start `pick` on a worker thread; `on_done` runs there after it returns.
    ///
    /// Returns false if a selection is already pending.
    pub fn start<P, D>(&mut self, pick: P, on_done: D) -> bool
    where
        P: FnOnce() -> Option<PathBuf> + Send + 'static,
        D: FnOnce() + Send + 'static,
    {
        if self.pending.is_some() {
            return false;
        }

        let (sender, receiver) = bounded(1);
        thread::spawn(move || {
            let _ = sender.send(pick());
            on_done();
        });
        self.pending = Some(receiver);
        true
    }

    pub fn poll(&mut self) -> PickStatus {
        let Some(receiver) = self.pending.as_ref() else {
            return PickStatus::Idle;
        };

        let picked = match receiver.try_recv() {
            Ok(picked) => picked,
            Err(TryRecvError::Empty) => return PickStatus::Pending,
            // Worker died without answering
            Err(TryRecvError::Disconnected) => None,
        };
        self.pending = None;
        PickStatus::Done(picked)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use std::time::{Duration, Instant};

    fn wait_done(picker: &mut FilePicker) -> PickStatus {
        let deadline = Instant::now() + Duration::from_secs(5);
        loop {
            match picker.poll() {
                PickStatus::Pending => {
                    assert!(Instant::now() < deadline, "selection never finished");
                    thread::sleep(Duration::from_millis(1));
                }
                status => return status,
            }
        }
    }

    #[test]
    fn stays_pending_until_the_dialog_closes() {
        let (release, gate) = unbounded::<()>();
        let mut picker = FilePicker::new();
        assert_eq!(picker.poll(), PickStatus::Idle);

        assert!(picker.start(
            move || {
                let _ = gate.recv();
                Some(PathBuf::from("/media/clip.mov"))
            },
            || {},
        ));

        assert!(picker.is_pending());
        assert_eq!(picker.poll(), PickStatus::Pending);
        // A second request while the first is open is refused.
        assert!(!picker.start(|| None, || {}));

        release.send(()).unwrap();
        assert_eq!(
            wait_done(&mut picker),
            PickStatus::Done(Some(PathBuf::from("/media/clip.mov")))
        );
        assert!(!picker.is_pending());
        assert_eq!(picker.poll(), PickStatus::Idle);
    }

    #[test]
    fn cancelled_dialog_finishes_without_a_file() {
        let (done_tx, done_rx) = unbounded();
        let mut picker = FilePicker::new();
        picker.start(|| None, move || {
            let _ = done_tx.send(());
        });

        assert_eq!(wait_done(&mut picker), PickStatus::Done(None));
        done_rx.recv_timeout(Duration::from_secs(5)).unwrap();
    }

    #[test]
    fn panicking_dialog_does_not_stay_pending() {
        let mut picker = FilePicker::new();
        picker.start(|| panic!("dialog backend crashed"), || {});
        assert_eq!(wait_done(&mut picker), PickStatus::Done(None));
    }
}
