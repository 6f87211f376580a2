//! Performance Sampling
//!
//! Developer-facing event-rate measurement (frame rate, push event rate).
//! Each consumer constructs its own sampler owning its own counters, with
//! an explicit start/stop lifecycle; there is no process-wide sampling
//! state.

use std::time::{Duration, Instant};

/// Measures the rate of discrete events over fixed sampling windows.
#[derive(Debug)]
pub struct RateSampler {
    window: Duration,
    window_start: Option<Instant>,
    count: u64,
    last_rate: Option<f64>,
}

impl RateSampler {
    /// Default sampling window.
    pub const DEFAULT_WINDOW: Duration = Duration::from_secs(1);

    /// Create a sampler with the default one-second window.
    pub fn new() -> Self {
        Self::with_window(Self::DEFAULT_WINDOW)
    }

    /// Create a sampler with a custom window.
    pub fn with_window(window: Duration) -> Self {
        Self {
            window,
            window_start: None,
            count: 0,
            last_rate: None,
        }
    }

    /// Begin sampling. Resets counters; a second call restarts the window.
    pub fn start(&mut self) {
        self.window_start = Some(Instant::now());
        self.count = 0;
    }

    /// Whether the sampler is currently running.
    pub fn is_running(&self) -> bool {
        self.window_start.is_some()
    }

    /// Record one event.
    ///
    /// When the current window has elapsed, closes it, remembers its rate
    /// (events per second), starts the next window, and returns the closed
    /// window's rate. Returns `None` while the window is still open or the
    /// sampler is stopped.
    pub fn record(&mut self) -> Option<f64> {
        let started = self.window_start?;
        self.count += 1;

        let elapsed = started.elapsed();
        if elapsed < self.window {
            return None;
        }

        let rate = self.count as f64 / elapsed.as_secs_f64();
        self.last_rate = Some(rate);
        self.window_start = Some(Instant::now());
        self.count = 0;
        Some(rate)
    }

    /// Stop sampling and report the rate of the final partial window, if
    /// any events were recorded in it.
    pub fn stop(&mut self) -> Option<f64> {
        let started = self.window_start.take()?;
        let elapsed = started.elapsed();
        let count = std::mem::take(&mut self.count);

        if count == 0 || elapsed.is_zero() {
            return None;
        }

        let rate = count as f64 / elapsed.as_secs_f64();
        self.last_rate = Some(rate);
        Some(rate)
    }

    /// Rate of the most recently closed window.
    pub fn rate(&self) -> Option<f64> {
        self.last_rate
    }
}

impl Default for RateSampler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_running_until_started() {
        let mut sampler = RateSampler::new();
        assert!(!sampler.is_running());
        assert!(sampler.record().is_none());
        assert!(sampler.rate().is_none());
    }

    #[test]
    fn test_window_closes_and_reports_rate() {
        let mut sampler = RateSampler::with_window(Duration::from_millis(20));
        sampler.start();

        for _ in 0..9 {
            assert!(sampler.record().is_none());
        }
        std::thread::sleep(Duration::from_millis(25));

        let rate = sampler.record().expect("window should have closed");
        assert!(rate > 0.0);
        assert_eq!(sampler.rate(), Some(rate));
        // Next window starts fresh
        assert!(sampler.record().is_none());
    }

    #[test]
    fn test_stop_reports_partial_window() {
        let mut sampler = RateSampler::with_window(Duration::from_secs(60));
        sampler.start();
        sampler.record();
        sampler.record();
        std::thread::sleep(Duration::from_millis(10));

        let rate = sampler.stop().expect("partial window had events");
        assert!(rate > 0.0);
        assert!(!sampler.is_running());
    }

    #[test]
    fn test_stop_with_no_events_is_none() {
        let mut sampler = RateSampler::new();
        sampler.start();
        assert!(sampler.stop().is_none());
    }

    #[test]
    fn test_independent_samplers() {
        let mut a = RateSampler::with_window(Duration::from_secs(60));
        let mut b = RateSampler::with_window(Duration::from_secs(60));
        a.start();
        b.start();
        a.record();
        assert!(a.stop().is_some());
        assert!(b.stop().is_none());
    }
}
