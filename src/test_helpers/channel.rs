use std::sync::Mutex;

use crate::{
    channels::{error::ChannelError, NotificationChannel},
    models::{
        alert::AlertEvent,
        channel::{
            ChannelConfig, ChannelTypeConfig, EmailConfig, StdoutConfig, ToneConfig,
            WebhookConfig,
        },
        notification::NotificationMessage,
    },
};

/// A builder for creating `ChannelConfig` instances in tests.
pub struct ChannelConfigBuilder {
    name: String,
    config: Option<ChannelTypeConfig>,
}

impl ChannelConfigBuilder {
    /// Creates a builder for a channel with the given name.
    pub fn new(name: &str) -> Self {
        Self { name: name.to_string(), config: None }
    }

    /// Uses a standard-output channel configuration.
    pub fn stdout_config(mut self, config: StdoutConfig) -> Self {
        self.config = Some(ChannelTypeConfig::Stdout(config));
        self
    }

    /// Uses a tone channel configuration.
    pub fn tone_config(mut self, config: ToneConfig) -> Self {
        self.config = Some(ChannelTypeConfig::Tone(config));
        self
    }

    /// Uses an email channel configuration with the given relay, sender, and
    /// recipients.
    pub fn email_config(mut self, smtp_host: &str, from: &str, to: &[&str]) -> Self {
        self.config = Some(ChannelTypeConfig::Email(EmailConfig {
            smtp_host: smtp_host.to_string(),
            smtp_port: 587,
            username: None,
            password: None,
            from: from.to_string(),
            to: to.iter().map(|address| address.to_string()).collect(),
            message: NotificationMessage {
                title: "Occupancy alert".to_string(),
                body: "Peak {{ aggregate }} over {{ threshold }}".to_string(),
            },
            attachments: vec![],
        }));
        self
    }

    /// Uses a webhook channel configuration targeting the given URL.
    pub fn webhook_config(mut self, url: &str) -> Self {
        self.config = Some(ChannelTypeConfig::Webhook(WebhookConfig {
            url: url.parse().unwrap(),
            method: None,
            headers: None,
            message: NotificationMessage {
                title: "Occupancy alert".to_string(),
                body: "Peak {{ aggregate }} over {{ threshold }}".to_string(),
            },
        }));
        self
    }

    /// Builds the channel configuration.
    pub fn build(self) -> ChannelConfig {
        ChannelConfig { name: self.name, config: self.config.expect("channel type not set") }
    }
}

/// A channel that records every event it receives.
#[derive(Default)]
pub struct RecordingChannel {
    events: Mutex<Vec<AlertEvent>>,
}

impl RecordingChannel {
    /// Creates an empty recording channel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of the events received so far.
    pub fn events(&self) -> Vec<AlertEvent> {
        self.events.lock().unwrap().clone()
    }
}

#[async_trait::async_trait]
impl NotificationChannel for RecordingChannel {
    async fn notify(&self, event: &AlertEvent) -> Result<(), ChannelError> {
        self.events.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// A channel that always fails, standing in for a broken transport.
pub struct FailingChannel;

#[async_trait::async_trait]
impl NotificationChannel for FailingChannel {
    async fn notify(&self, _event: &AlertEvent) -> Result<(), ChannelError> {
        Err(ChannelError::ConfigError("channel wired to fail".to_string()))
    }
}
