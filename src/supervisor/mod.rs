//! The Supervisor module manages the lifecycle of the Panoptes application.
//!
//! It acts as the top-level owner of the long-running pieces of the runtime:
//! the sampling driver and the alert dispatcher's in-flight notification
//! tasks.
//!
//! ## Responsibilities
//!
//! - **Initialization**: the `SupervisorBuilder` constructs and wires the
//!   services together from the startup configuration.
//! - **Lifecycle Management**: the `Supervisor` starts the sampling driver
//!   and monitors its health.
//! - **Graceful Shutdown**: it listens for shutdown signals (Ctrl+C or
//!   SIGTERM), stops sampling between ticks, and drains in-flight
//!   notifications within a bounded timeout.

mod builder;

use std::sync::Arc;

pub use builder::SupervisorBuilder;
use thiserror::Error;
use tokio::signal;

use crate::{
    channels::error::ChannelError, config::AppConfig, dispatcher::AlertDispatcher,
    engine::Sampler, sampling::OccupancyReader,
};

/// Represents the set of errors that can occur during the supervisor's
/// construction and operation.
#[derive(Debug, Error)]
pub enum SupervisorError {
    /// A required configuration was not provided to the `SupervisorBuilder`.
    #[error("Missing configuration for Supervisor")]
    MissingConfig,

    /// An occupancy reader was not provided to the `SupervisorBuilder`.
    #[error("Missing occupancy reader for Supervisor")]
    MissingReader,

    /// A channel configuration set was not provided to the
    /// `SupervisorBuilder`.
    #[error("Missing notification channels for Supervisor")]
    MissingChannels,

    /// A notification channel failed to construct from its configuration.
    #[error("Channel construction failed: {0}")]
    Channel(#[from] ChannelError),
}

/// The primary runtime manager for the application.
///
/// The Supervisor owns the sampling driver and the dispatcher and is
/// responsible for startup, shutdown, and health monitoring. Once `run` is
/// called, it becomes the main process loop for the entire application.
pub struct Supervisor {
    /// Shared application configuration.
    config: Arc<AppConfig>,

    /// The reader occupancy counts are fetched through.
    reader: Arc<dyn OccupancyReader>,

    /// The dispatcher escalations are handed to.
    dispatcher: Arc<AlertDispatcher>,

    /// A token used to signal a graceful shutdown to all supervised tasks.
    cancellation_token: tokio_util::sync::CancellationToken,

    /// A set of all spawned tasks that the supervisor is actively managing.
    join_set: tokio::task::JoinSet<()>,
}

impl Supervisor {
    /// Returns a new `SupervisorBuilder` instance.
    ///
    /// This is the public entry point for creating a supervisor.
    pub fn builder() -> SupervisorBuilder {
        SupervisorBuilder::new()
    }

    /// Starts the supervisor and all its managed services.
    ///
    /// 1. Spawns a signal handler for `SIGINT` (Ctrl+C) and `SIGTERM`.
    /// 2. Spawns the sampling driver as a long-running task.
    /// 3. Monitors task health and the shutdown signal.
    /// 4. On shutdown, waits for the driver to stop between ticks, then
    ///    drains in-flight notification tasks within the shutdown timeout.
    pub async fn run(mut self) -> Result<(), SupervisorError> {
        // Clone the token for the signal handler task.
        let cancellation_token = self.cancellation_token.clone();

        // Spawn a task to listen for shutdown signals.
        self.join_set.spawn(async move {
            let ctrl_c = signal::ctrl_c();
            #[cfg(unix)]
            let terminate = async {
                signal::unix::signal(signal::unix::SignalKind::terminate())
                    .expect("Failed to register SIGTERM handler")
                    .recv()
                    .await;
            };
            #[cfg(not(unix))]
            let terminate = std::future::pending::<()>();

            tokio::select! {
                _ = ctrl_c => tracing::info!("SIGINT (Ctrl+C) received, initiating graceful shutdown."),
                _ = terminate => tracing::info!("SIGTERM received, initiating graceful shutdown."),
            }

            // Notify all other tasks to begin shutting down.
            cancellation_token.cancel();
        });

        // Spawn the sampling driver.
        let sampler = Sampler::new(
            Arc::clone(&self.config),
            Arc::clone(&self.reader),
            Arc::clone(&self.dispatcher),
            self.cancellation_token.clone(),
        );
        self.join_set.spawn(async move {
            sampler.run().await;
        });

        tracing::info!(
            sources = self.config.sources.len(),
            channels = self.dispatcher.channel_count(),
            threshold = self.config.threshold,
            "Supervisor started; sampling."
        );

        // --- Main Supervisor Loop ---

        loop {
            tokio::select! {
                maybe_result = self.join_set.join_next() => {
                    match maybe_result {
                        Some(Ok(_)) => {
                            // Task completed, continue monitoring.
                        }
                        Some(Err(e)) => {
                            tracing::error!("A critical task failed: {:?}. Initiating shutdown.", e);
                            self.cancellation_token.cancel();
                        }
                        None => {
                            // All tasks have completed.
                            break;
                        }
                    }
                }
                _ = self.cancellation_token.cancelled() => {
                    // Cancellation requested, break the loop.
                    break;
                }
            }
        }

        // --- Graceful Shutdown ---

        self.join_set.shutdown().await;
        tracing::info!("All supervised tasks have completed.");

        // Drain in-flight notifications, bounded by the shutdown timeout.
        let shutdown_timeout = self.config.shutdown_timeout_secs;
        if tokio::time::timeout(shutdown_timeout, self.dispatcher.shutdown()).await.is_err() {
            tracing::warn!(
                "In-flight notifications did not finish within {:?}. Continuing shutdown.",
                shutdown_timeout
            );
        }

        tracing::info!("Supervisor shutdown complete.");
        Ok(())
    }
}
