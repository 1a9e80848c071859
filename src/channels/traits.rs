use crate::{channels::error::ChannelError, models::alert::AlertEvent};

/// A trait representing a notification channel that can deliver an alert
/// event.
#[async_trait::async_trait]
pub trait NotificationChannel: Send + Sync {
    /// Delivers one alert event through this channel.
    async fn notify(&self, event: &AlertEvent) -> Result<(), ChannelError>;
}
