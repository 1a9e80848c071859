//! Occupancy source interface and sampling primitives.

mod aggregator;
mod http;

pub use aggregator::aggregate_round;
use async_trait::async_trait;
pub use http::HttpOccupancyReader;
#[cfg(test)]
use mockall::automock;
use thiserror::Error;

use crate::models::source::SourceConfig;

/// Per-source, per-tick read failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum SourceError {
    /// The source produced no usable count this tick; the driver skips it
    /// for the round and retries it on the next one.
    #[error("source temporarily unavailable")]
    Unavailable,

    /// The source has permanently stopped producing counts; the driver
    /// removes it from future rounds.
    #[error("source reached end of stream")]
    EndOfStream,
}

/// A reader that returns the latest occupancy count for a monitored source.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait OccupancyReader: Send + Sync {
    /// Reads the current occupancy count for `source`.
    async fn read(&self, source: &SourceConfig) -> Result<u32, SourceError>;
}
