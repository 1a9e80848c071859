//! # Notification channels
//!
//! This module defines the channels alert events are delivered through and
//! how they are constructed from configuration.
//!
//! ## Core Components
//!
//! - **`NotificationChannel` Trait**: a generic interface over delivery of a
//!   single [`AlertEvent`](crate::models::alert::AlertEvent), allowing a
//!   unified dispatch mechanism.
//! - **`build_channels`**: turns the validated channel configurations loaded
//!   at startup into the runtime channel set.
//!
//! ## Workflow
//!
//! 1. Channel configurations are loaded and validated at application startup.
//! 2. For each configuration, a corresponding `NotificationChannel`
//!    implementation (e.g., `StdoutChannel`, `EmailChannel`) is constructed;
//!    construction failures (bad address, bad method) are startup-fatal.
//! 3. When an escalation fires, the dispatcher invokes every channel's
//!    `notify` concurrently with the event snapshot.

mod email;
pub mod error;
mod stdout;
pub mod template;
mod tone;
mod traits;
mod webhook;

use std::sync::Arc;

pub use email::EmailChannel;
use error::ChannelError;
pub use stdout::StdoutChannel;
use template::TemplateService;
pub use tone::ToneChannel;
pub use traits::NotificationChannel;
pub use webhook::WebhookChannel;

use crate::models::channel::{ChannelConfig, ChannelTypeConfig};

/// Builds the runtime channel set from validated configurations.
///
/// Returns `(name, channel)` pairs in configuration order; the name is only
/// used for logging dispatch outcomes.
pub fn build_channels(
    configs: &[ChannelConfig],
    http_client: reqwest::Client,
) -> Result<Vec<(String, Arc<dyn NotificationChannel>)>, ChannelError> {
    let template_service = Arc::new(TemplateService::new());
    let mut channels: Vec<(String, Arc<dyn NotificationChannel>)> =
        Vec::with_capacity(configs.len());

    for config in configs {
        let channel: Arc<dyn NotificationChannel> = match &config.config {
            ChannelTypeConfig::Stdout(c) =>
                Arc::new(StdoutChannel::new(c.clone(), template_service.clone())),
            ChannelTypeConfig::Tone(c) => Arc::new(ToneChannel::new(c.clone())),
            ChannelTypeConfig::Email(c) =>
                Arc::new(EmailChannel::new(c.clone(), template_service.clone())?),
            ChannelTypeConfig::Webhook(c) => Arc::new(WebhookChannel::new(
                c.clone(),
                http_client.clone(),
                template_service.clone(),
            )?),
        };
        channels.push((config.name.clone(), channel));
    }

    Ok(channels)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::channel::{StdoutConfig, ToneConfig},
        test_helpers::ChannelConfigBuilder,
    };

    #[test]
    fn builds_channels_in_configuration_order() {
        let configs = vec![
            ChannelConfigBuilder::new("console")
                .stdout_config(StdoutConfig::default())
                .build(),
            ChannelConfigBuilder::new("bell").tone_config(ToneConfig::default()).build(),
        ];

        let channels = build_channels(&configs, reqwest::Client::new()).unwrap();
        assert_eq!(channels.len(), 2);
        assert_eq!(channels[0].0, "console");
        assert_eq!(channels[1].0, "bell");
    }

    #[test]
    fn construction_failure_surfaces_as_an_error() {
        let configs = vec![ChannelConfigBuilder::new("mail")
            .email_config("smtp.example.com", "not an address", &["ops@example.com"])
            .build()];

        let result = build_channels(&configs, reqwest::Client::new());
        assert!(matches!(result, Err(ChannelError::Address(_))));
    }
}
