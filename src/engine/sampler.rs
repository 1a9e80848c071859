//! The sampling driver loop.

use std::sync::Arc;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use crate::{
    config::AppConfig,
    dispatcher::AlertDispatcher,
    engine::{cooldown::CooldownGate, window::WindowTracker},
    models::{alert::AlertEvent, source::SourceConfig},
    sampling::{aggregate_round, OccupancyReader, SourceError},
};

/// The sampling driver.
///
/// Runs the steady-state loop: read one round of counts, aggregate, feed the
/// measurement window, and on window closure evaluate the threshold against
/// the cooldown gate. Window and cooldown state are owned here and only ever
/// touched from this task, so no locking is involved anywhere in the loop.
pub struct Sampler {
    /// Shared application configuration.
    config: Arc<AppConfig>,
    /// The reader occupancy counts are fetched through.
    reader: Arc<dyn OccupancyReader>,
    /// Sources still producing counts; shrinks as sources end.
    sources: Vec<SourceConfig>,
    /// The current measurement window.
    window: WindowTracker,
    /// The escalation cooldown gate.
    cooldown: CooldownGate,
    /// The dispatcher escalations are handed to.
    dispatcher: Arc<AlertDispatcher>,
    /// A token used to signal a graceful shutdown.
    cancellation_token: CancellationToken,
}

impl Sampler {
    /// Creates a new sampler over the configured source list, opening the
    /// first measurement window immediately.
    pub fn new(
        config: Arc<AppConfig>,
        reader: Arc<dyn OccupancyReader>,
        dispatcher: Arc<AlertDispatcher>,
        cancellation_token: CancellationToken,
    ) -> Self {
        let now = Instant::now();
        Self {
            sources: config.sources.clone(),
            window: WindowTracker::new(config.window_secs, now),
            cooldown: CooldownGate::new(config.cooldown_secs),
            config,
            reader,
            dispatcher,
            cancellation_token,
        }
    }

    /// Starts the long-running sampling loop.
    ///
    /// The loop only ends on cancellation; a failed tick is logged by the
    /// tick itself and the loop moves on to the next one.
    pub async fn run(mut self) {
        loop {
            let tick_delay = tokio::time::sleep(self.config.sampling_interval_ms);

            tokio::select! {
                biased;

                _ = self.cancellation_token.cancelled() => {
                    tracing::info!("Sampler cancellation signal received, shutting down...");
                    break;
                }

                _ = tick_delay => {
                    self.tick(Instant::now()).await;
                }
            }
        }
        tracing::info!("Sampler has shut down.");
    }

    /// Performs one sampling tick.
    async fn tick(&mut self, now: Instant) {
        let round = self.collect_round().await;

        if self.sources.is_empty() {
            tracing::warn!("All sources reached end of stream; requesting shutdown.");
            self.cancellation_token.cancel();
        }

        let Some(aggregate) = aggregate_round(&round) else {
            tracing::debug!("No source produced a count this tick; skipping window update.");
            return;
        };

        tracing::trace!(aggregate, "Aggregated sampling round.");

        let Some(closed) = self.window.observe(aggregate, now) else {
            return;
        };

        tracing::info!(
            window_max = closed.max,
            threshold = self.config.threshold,
            "Measurement window closed."
        );

        if !self.config.threshold_mode.exceeded(closed.max, self.config.threshold) {
            return;
        }

        if !self.cooldown.may_escalate(now) {
            tracing::debug!(
                window_max = closed.max,
                "Threshold breached but cooldown is active; suppressing alert."
            );
            return;
        }

        let event = AlertEvent {
            aggregate: closed.max,
            threshold: self.config.threshold,
            cooldown_secs: self.config.cooldown_secs.as_secs(),
            timestamp: chrono::Utc::now(),
        };

        tracing::warn!(
            aggregate = event.aggregate,
            threshold = event.threshold,
            "Occupancy threshold breached; dispatching alert."
        );
        self.dispatcher.dispatch(event);
        self.cooldown.record_escalation(now);
    }

    /// Collects one sampling round across all active sources.
    ///
    /// A source that reports end of stream is removed from future rounds; an
    /// unavailable or timed-out source contributes nothing this round. Every
    /// read is bounded by the configured timeout so one hung source cannot
    /// stall the rest of the round.
    async fn collect_round(&mut self) -> Vec<u32> {
        let mut counts = Vec::with_capacity(self.sources.len());
        let mut ended = Vec::new();

        for source in &self.sources {
            let read = self.reader.read(source);
            match tokio::time::timeout(self.config.source_read_timeout_ms, read).await {
                Ok(Ok(count)) => counts.push(count),
                Ok(Err(SourceError::Unavailable)) => {
                    tracing::warn!(source = %source.id, "Source unavailable; skipping for this round.");
                }
                Ok(Err(SourceError::EndOfStream)) => {
                    tracing::warn!(source = %source.id, "Source reached end of stream; removing from future rounds.");
                    ended.push(source.id.clone());
                }
                Err(_) => {
                    tracing::warn!(
                        source = %source.id,
                        timeout = ?self.config.source_read_timeout_ms,
                        "Source read timed out; skipping for this round."
                    );
                }
            }
        }

        if !ended.is_empty() {
            self.sources.retain(|source| !ended.contains(&source.id));
        }

        counts
    }
}
