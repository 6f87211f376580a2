//! Alert Gate and Sinks
//!
//! Deduplicates user-facing alerts per notification id for the lifetime of
//! the session: the same notification observed via push and again via poll
//! alerts exactly once. Delivery goes through capability-checked sinks so
//! hardware feedback stays a best-effort side effect, never a dependency.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::Mutex;
use tokio::sync::mpsc;

use crate::model::Notification;

/// A destination for user-facing alerts (haptic pulse, visual toast).
pub trait AlertSink: Send + Sync {
    /// Sink name, for logging
    fn name(&self) -> &str;

    /// Whether the sink can deliver on this device/session
    fn available(&self) -> bool;

    /// Deliver one alert. Best-effort: failures are swallowed.
    fn deliver(&self, notification: &Notification);
}

/// One-shot alert gate per notification id.
///
/// The consumed-id set lives in memory only; a new session alerts afresh.
pub struct AlertGate {
    seen: Mutex<HashSet<u64>>,
    sinks: Vec<Box<dyn AlertSink>>,
}

impl AlertGate {
    /// Create a gate delivering to the given sinks.
    pub fn new(sinks: Vec<Box<dyn AlertSink>>) -> Self {
        Self {
            seen: Mutex::new(HashSet::new()),
            sinks,
        }
    }

    /// First call for an id returns true and consumes it; every later call
    /// for the same id returns false.
    pub fn should_alert(&self, id: u64) -> bool {
        self.seen.lock().unwrap().insert(id)
    }

    /// Alert for a notification unless its id already alerted this session.
    /// Returns whether an alert fired.
    pub fn notify(&self, notification: &Notification) -> bool {
        if !self.should_alert(notification.id) {
            tracing::trace!(id = notification.id, "Alert suppressed, already fired");
            return false;
        }

        for sink in &self.sinks {
            if sink.available() {
                sink.deliver(notification);
            } else {
                tracing::trace!(sink = sink.name(), "Alert sink unavailable, skipping");
            }
        }
        true
    }
}

/// Best-effort device vibration.
///
/// Probes well-known sysfs vibrator interfaces at construction; when none
/// exists the sink reports unavailable and delivery is a no-op. Write
/// errors at delivery time are ignored.
pub struct HapticSink {
    device: Option<PathBuf>,
    pulse_ms: u32,
}

const VIBRATOR_PATHS: &[&str] = &[
    "/sys/class/timed_output/vibrator/enable",
    "/sys/class/leds/vibrator/duration",
];

impl HapticSink {
    /// Probe the device and create the sink.
    pub fn detect() -> Self {
        let device = VIBRATOR_PATHS
            .iter()
            .copied()
            .map(PathBuf::from)
            .find(|p| p.exists());

        if device.is_none() {
            tracing::debug!("No vibrator device found, haptic alerts disabled");
        }

        Self {
            device,
            pulse_ms: 40,
        }
    }

    #[cfg(test)]
    fn with_device(device: Option<PathBuf>) -> Self {
        Self {
            device,
            pulse_ms: 40,
        }
    }
}

impl AlertSink for HapticSink {
    fn name(&self) -> &str {
        "haptic"
    }

    fn available(&self) -> bool {
        self.device.is_some()
    }

    fn deliver(&self, _notification: &Notification) {
        if let Some(device) = &self.device {
            if let Err(e) = std::fs::write(device, self.pulse_ms.to_string()) {
                tracing::debug!(error = %e, "Haptic pulse failed");
            }
        }
    }
}

/// A transient visual toast for the embedding UI to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    pub title: String,
    pub message: String,
}

/// Forwards toasts over a channel to whatever renders them.
pub struct ToastSink {
    tx: mpsc::UnboundedSender<Toast>,
}

impl ToastSink {
    /// Create the sink together with the receiving end for the UI.
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Toast>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl AlertSink for ToastSink {
    fn name(&self) -> &str {
        "toast"
    }

    fn available(&self) -> bool {
        !self.tx.is_closed()
    }

    fn deliver(&self, notification: &Notification) {
        let _ = self.tx.send(Toast {
            title: notification.title.clone(),
            message: notification.message.clone(),
        });
    }
}
