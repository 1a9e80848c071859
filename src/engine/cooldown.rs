//! Escalation cooldown gating.

use std::time::Duration;

use tokio::time::Instant;

/// Suppresses repeated escalations for a configured duration.
///
/// The gate is armed by [`record_escalation`](Self::record_escalation) and
/// stays closed until the cooldown has fully elapsed. The cooldown duration
/// is configured independently of the measurement window, so windows keep
/// closing and being measured while the gate is closed.
#[derive(Debug)]
pub struct CooldownGate {
    duration: Duration,
    triggered_at: Option<Instant>,
}

impl CooldownGate {
    /// Creates an unarmed gate.
    pub fn new(duration: Duration) -> Self {
        Self { duration, triggered_at: None }
    }

    /// Returns whether an escalation may fire at `now`.
    ///
    /// Clears the armed state on the first call at or after expiry.
    pub fn may_escalate(&mut self, now: Instant) -> bool {
        match self.triggered_at {
            Some(triggered_at) if now.duration_since(triggered_at) < self.duration => false,
            Some(_) => {
                self.triggered_at = None;
                true
            }
            None => true,
        }
    }

    /// Arms the gate at `now`, opening a fresh cooldown period.
    pub fn record_escalation(&mut self, now: Instant) {
        self.triggered_at = Some(now);
    }

    /// Whether the gate is currently armed.
    pub fn is_active(&self) -> bool {
        self.triggered_at.is_some()
    }
}
