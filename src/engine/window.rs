//! Rolling measurement window over aggregated occupancy samples.

use std::time::Duration;

use tokio::time::Instant;

/// The result of a measurement window reaching the end of its duration.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClosedWindow {
    /// The maximum aggregated sample observed during the window.
    pub max: u32,
    /// When the window was opened.
    pub started_at: Instant,
}

/// Tracks the rolling maximum of aggregated samples within a fixed-duration
/// measurement window.
///
/// The tracker owns the current window exclusively and replaces it wholesale
/// at closure; closure is decided inside [`observe`](Self::observe) rather
/// than by a background timer, which keeps the driver loop single-threaded
/// and deterministic.
#[derive(Debug)]
pub struct WindowTracker {
    started_at: Instant,
    duration: Duration,
    running_max: u32,
}

impl WindowTracker {
    /// Opens the first window at `now`.
    pub fn new(duration: Duration, now: Instant) -> Self {
        Self { started_at: now, duration, running_max: 0 }
    }

    /// Feeds one aggregated sample into the tracker.
    ///
    /// If the current window has run its full duration, it is closed and
    /// returned before the new sample is folded in, so a late sample opens
    /// the next window instead of silently extending the previous one. The
    /// very first window therefore has no prior closure to report, and the
    /// alerting decision always trails the current sample by one window.
    pub fn observe(&mut self, aggregate: u32, now: Instant) -> Option<ClosedWindow> {
        let closed = if now.duration_since(self.started_at) >= self.duration {
            let closed = ClosedWindow { max: self.running_max, started_at: self.started_at };
            self.started_at = now;
            self.running_max = 0;
            Some(closed)
        } else {
            None
        };

        self.running_max = self.running_max.max(aggregate);
        closed
    }
}
