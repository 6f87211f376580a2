//! Rate-Limiting Utilities
//!
//! The canonical debounce/throttle implementations for the crate; every
//! consumer uses these rather than rolling its own.

use std::time::{Duration, Instant};

/// Allows at most one call per window.
///
/// Synchronous: `allow` returns whether the caller may proceed now.
#[derive(Debug)]
pub struct Throttle {
    min_gap: Duration,
    last: Option<Instant>,
}

impl Throttle {
    /// Create a throttle permitting one call per `min_gap`.
    pub fn new(min_gap: Duration) -> Self {
        Self { min_gap, last: None }
    }

    /// Whether a call is allowed now. A true result consumes the window.
    pub fn allow(&mut self) -> bool {
        let now = Instant::now();
        match self.last {
            Some(last) if now.duration_since(last) < self.min_gap => false,
            _ => {
                self.last = Some(now);
                true
            }
        }
    }
}

/// Runs a callback after a quiet period, superseding any pending run.
///
/// Each `call` cancels the previously scheduled callback and schedules the
/// new one `delay` from now. Dropping the debouncer cancels any pending
/// run.
#[derive(Debug)]
pub struct Debouncer {
    delay: Duration,
    pending: Option<tokio::task::JoinHandle<()>>,
}

impl Debouncer {
    /// Create a debouncer with the given quiet period.
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    /// Schedule `f` to run after the quiet period, replacing any pending
    /// callback.
    pub fn call<F>(&mut self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        if let Some(task) = self.pending.take() {
            task.abort();
        }

        let delay = self.delay;
        self.pending = Some(tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            f();
        }));
    }

    /// Cancel any pending callback.
    pub fn cancel(&mut self) {
        if let Some(task) = self.pending.take() {
            task.abort();
        }
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}
