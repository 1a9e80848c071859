//! The alert event snapshot handed to notification channels.

use chrono::{DateTime, Utc};
use serde::Serialize;

/// An immutable snapshot describing one escalation.
///
/// Built by the sampler when a closed measurement window breaches the
/// threshold and the cooldown gate permits. Passed by value to every
/// notification channel (channels only ever read it) and used as the
/// template rendering context. Never persisted.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct AlertEvent {
    /// The closed window's maximum aggregated occupancy.
    pub aggregate: u32,
    /// The configured threshold the aggregate was compared against.
    pub threshold: u32,
    /// The cooldown period opened by this escalation, in seconds.
    pub cooldown_secs: u64,
    /// Wall-clock time at which the escalation fired.
    pub timestamp: DateTime<Utc>,
}
