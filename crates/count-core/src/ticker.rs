//! Periodic timer driving the status line
//!
//! The copy loop blocks in reads and writes, so status updates run on a
//! separate thread. Ticks are best-effort: a slow callback delays the next
//! one rather than queueing more.

use std::sync::mpsc::{self, RecvTimeoutError, Sender};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

/// Handle to a running timer thread
///
/// Dropping the handle disarms the timer and waits for the thread, so no
/// callback runs after the drop returns.
pub struct Ticker {
    stop: Option<Sender<()>>,
    handle: Option<JoinHandle<()>>,
}

impl Ticker {
    /// Call `on_tick` with the time elapsed since `started`, every `interval`
    pub fn start<F>(interval: Duration, started: Instant, mut on_tick: F) -> std::io::Result<Self>
    where
        F: FnMut(Duration) + Send + 'static,
    {
        let (stop_tx, stop_rx) = mpsc::channel::<()>();
        let handle = thread::Builder::new()
            .name("count-ticker".to_string())
            .spawn(move || {
                let mut next = started + interval;
                loop {
                    let wait = next.saturating_duration_since(Instant::now());
                    match stop_rx.recv_timeout(wait) {
                        Err(RecvTimeoutError::Timeout) => {
                            on_tick(started.elapsed());
                            // Skip missed ticks instead of bursting to catch up
                            let now = Instant::now();
                            next += interval;
                            if next <= now {
                                next = now + interval;
                            }
                        }
                        Ok(()) | Err(RecvTimeoutError::Disconnected) => break,
                    }
                }
                tracing::trace!("status timer stopped");
            })?;

        Ok(Self {
            stop: Some(stop_tx),
            handle: Some(handle),
        })
    }

    /// Stop the timer and wait for its thread to exit
    pub fn stop(mut self) {
        self.disarm();
    }

    fn disarm(&mut self) {
        if let Some(stop) = self.stop.take() {
            let _ = stop.send(());
        }
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                tracing::warn!("status timer thread panicked");
            }
        }
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.disarm();
    }
}
