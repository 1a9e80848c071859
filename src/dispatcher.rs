//! # Alert dispatcher
//!
//! Fans one alert event out to every configured notification channel as
//! independent fire-and-forget tasks. A slow or failing channel can neither
//! delay the sampling loop nor affect the other channels: each task logs its
//! own outcome, and the only state crossing the task boundary is an owned
//! copy of the immutable event snapshot.

use std::sync::Arc;

use tokio_util::task::TaskTracker;

use crate::{channels::NotificationChannel, models::alert::AlertEvent};

/// Fans alert events out to the configured notification channels.
pub struct AlertDispatcher {
    channels: Vec<(String, Arc<dyn NotificationChannel>)>,
    tasks: TaskTracker,
}

impl AlertDispatcher {
    /// Creates a dispatcher over an already-built channel set.
    pub fn new(channels: Vec<(String, Arc<dyn NotificationChannel>)>) -> Self {
        Self { channels, tasks: TaskTracker::new() }
    }

    /// Triggers every channel for `event` without awaiting delivery.
    ///
    /// Returns as soon as the per-channel tasks are spawned; outcomes are
    /// logged by the tasks themselves and in-flight deliveries are only
    /// drained at [`shutdown`](Self::shutdown).
    pub fn dispatch(&self, event: AlertEvent) {
        for (name, channel) in &self.channels {
            let name = name.clone();
            let channel = Arc::clone(channel);
            let event = event.clone();

            self.tasks.spawn(async move {
                match channel.notify(&event).await {
                    Ok(()) => {
                        tracing::debug!(channel = %name, "Notification delivered.");
                    }
                    Err(e) => {
                        tracing::error!(channel = %name, error = %e, "Notification failed.");
                    }
                }
            });
        }
    }

    /// Number of configured channels.
    pub fn channel_count(&self) -> usize {
        self.channels.len()
    }

    /// Waits for all in-flight notification tasks to finish.
    pub async fn shutdown(&self) {
        tracing::info!("Shutting down alert dispatcher...");
        self.tasks.close();
        self.tasks.wait().await;
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::test_helpers::{FailingChannel, RecordingChannel};

    fn event() -> AlertEvent {
        AlertEvent { aggregate: 4, threshold: 3, cooldown_secs: 120, timestamp: Utc::now() }
    }

    #[tokio::test]
    async fn dispatch_reaches_every_channel() {
        let first = Arc::new(RecordingChannel::new());
        let second = Arc::new(RecordingChannel::new());
        let dispatcher = AlertDispatcher::new(vec![
            ("first".to_string(), first.clone() as Arc<dyn NotificationChannel>),
            ("second".to_string(), second.clone() as Arc<dyn NotificationChannel>),
        ]);

        dispatcher.dispatch(event());
        dispatcher.shutdown().await;

        assert_eq!(first.events().len(), 1);
        assert_eq!(second.events().len(), 1);
    }

    #[tokio::test]
    async fn failing_channel_does_not_affect_the_others() {
        let recording = Arc::new(RecordingChannel::new());
        let dispatcher = AlertDispatcher::new(vec![
            ("failing".to_string(), Arc::new(FailingChannel) as Arc<dyn NotificationChannel>),
            ("recording".to_string(), recording.clone() as Arc<dyn NotificationChannel>),
        ]);

        dispatcher.dispatch(event());
        dispatcher.shutdown().await;

        assert_eq!(recording.events().len(), 1);
    }

    #[tokio::test]
    async fn dispatch_with_no_channels_is_a_no_op() {
        let dispatcher = AlertDispatcher::new(vec![]);
        dispatcher.dispatch(event());
        dispatcher.shutdown().await;
        assert_eq!(dispatcher.channel_count(), 0);
    }
}
