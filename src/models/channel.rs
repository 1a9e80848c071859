//! This module defines the data structures for notification channel
//! configurations.

use std::{collections::HashMap, path::PathBuf, time::Duration};

use serde::Deserialize;
use thiserror::Error;
use url::Url;

use crate::{
    config::{deserialize_duration_from_ms, Loadable, LoaderError},
    models::notification::NotificationMessage,
};

/// Provides the default SMTP submission port.
fn default_smtp_port() -> u16 {
    587
}

/// Provides the default number of tone repeats.
fn default_tone_repeats() -> u32 {
    3
}

/// Provides the default spacing between tone repeats.
fn default_tone_interval() -> Duration {
    Duration::from_millis(250)
}

/// Configuration for the standard-output channel.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
pub struct StdoutConfig {
    /// Optional message template; the raw event context is printed when
    /// absent.
    #[serde(default)]
    pub message: Option<NotificationMessage>,
}

/// Configuration for the SMTP email channel.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct EmailConfig {
    /// SMTP relay host.
    pub smtp_host: String,

    /// SMTP relay port.
    #[serde(default = "default_smtp_port")]
    pub smtp_port: u16,

    /// Username for authenticated relays.
    #[serde(default)]
    pub username: Option<String>,

    /// Password for authenticated relays.
    #[serde(default)]
    pub password: Option<String>,

    /// Sender address.
    pub from: String,

    /// Recipient addresses.
    pub to: Vec<String>,

    /// Subject and body templates.
    pub message: NotificationMessage,

    /// Optional image attachments, read from disk at send time.
    #[serde(default)]
    pub attachments: Vec<PathBuf>,
}

/// Configuration for the audible-tone channel.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct ToneConfig {
    /// Number of bell strikes per alert.
    #[serde(default = "default_tone_repeats")]
    pub repeats: u32,

    /// Spacing between strikes.
    #[serde(
        deserialize_with = "deserialize_duration_from_ms",
        default = "default_tone_interval"
    )]
    pub interval_ms: Duration,
}

impl Default for ToneConfig {
    fn default() -> Self {
        Self { repeats: default_tone_repeats(), interval_ms: default_tone_interval() }
    }
}

/// Configuration for the generic webhook channel.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct WebhookConfig {
    /// Target URL.
    pub url: Url,

    /// HTTP method; POST when absent.
    #[serde(default)]
    pub method: Option<String>,

    /// Extra request headers.
    #[serde(default)]
    pub headers: Option<HashMap<String, String>>,

    /// Title and body templates for the JSON payload.
    pub message: NotificationMessage,
}

/// The type of channel configuration.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum ChannelTypeConfig {
    /// Prints rendered messages to standard output.
    Stdout(StdoutConfig),
    /// Sends mail through an SMTP relay.
    Email(EmailConfig),
    /// Sounds the terminal bell.
    Tone(ToneConfig),
    /// Posts a JSON payload to an HTTP endpoint.
    Webhook(WebhookConfig),
}

/// Error types for channel configuration validation.
#[derive(Debug, Clone, Error)]
pub enum ChannelTypeConfigError {
    /// Error for an empty message title.
    #[error("Message title cannot be empty.")]
    EmptyTitle,

    /// Error for an empty SMTP host.
    #[error("SMTP host cannot be empty.")]
    EmptySmtpHost,

    /// Error for an email channel without recipients.
    #[error("Email channel must declare at least one recipient.")]
    NoRecipients,

    /// Error for a tone channel configured to strike zero times.
    #[error("Tone repeats must be greater than zero.")]
    ZeroRepeats,

    /// Error for an unsupported webhook HTTP method.
    #[error("Invalid webhook HTTP method: {0}")]
    InvalidMethod(String),
}

impl ChannelTypeConfig {
    /// Validates the channel configuration.
    pub fn validate(&self) -> Result<(), ChannelTypeConfigError> {
        match self {
            // Standard output requires no validation.
            ChannelTypeConfig::Stdout(_) => Ok(()),

            ChannelTypeConfig::Email(config) => {
                if config.smtp_host.is_empty() {
                    return Err(ChannelTypeConfigError::EmptySmtpHost);
                }
                if config.to.is_empty() {
                    return Err(ChannelTypeConfigError::NoRecipients);
                }
                if config.message.title.is_empty() {
                    return Err(ChannelTypeConfigError::EmptyTitle);
                }
                Ok(())
            }

            ChannelTypeConfig::Tone(config) => {
                if config.repeats == 0 {
                    return Err(ChannelTypeConfigError::ZeroRepeats);
                }
                Ok(())
            }

            ChannelTypeConfig::Webhook(config) => {
                if config.message.title.is_empty() {
                    return Err(ChannelTypeConfigError::EmptyTitle);
                }
                if let Some(method) = &config.method {
                    reqwest::Method::from_bytes(method.as_bytes())
                        .map_err(|_| ChannelTypeConfigError::InvalidMethod(method.clone()))?;
                }
                Ok(())
            }
        }
    }
}

/// Represents a single channel configuration from the YAML file.
#[derive(Debug, Clone, Deserialize)]
pub struct ChannelConfig {
    /// The unique name of the channel, used in logs.
    pub name: String,

    /// The specific configuration for the channel type.
    #[serde(flatten)]
    pub config: ChannelTypeConfig,
}

/// Errors that can occur while loading channel configurations.
#[derive(Debug, Error)]
pub enum ChannelConfigError {
    /// An error occurred during the loading process.
    #[error("Failed to load channel configuration.")]
    Loader(#[from] LoaderError),

    /// An error occurred during validation.
    #[error("Failed to validate channel configuration.")]
    Validation(#[from] ChannelTypeConfigError),
}

impl Loadable for ChannelConfig {
    type Error = ChannelConfigError;

    const KEY: &'static str = "channels";

    fn validate(&mut self) -> Result<(), Self::Error> {
        self.config.validate().map_err(ChannelConfigError::Validation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Helper to create a default notification message
    fn notification_message() -> NotificationMessage {
        NotificationMessage { title: "Test Title".to_string(), body: "Test Body".to_string() }
    }

    fn email_config() -> EmailConfig {
        EmailConfig {
            smtp_host: "smtp.example.com".to_string(),
            smtp_port: 587,
            username: None,
            password: None,
            from: "alerts@example.com".to_string(),
            to: vec!["ops@example.com".to_string()],
            message: notification_message(),
            attachments: vec![],
        }
    }

    #[test]
    fn test_validate_stdout_ok() {
        let config = ChannelTypeConfig::Stdout(StdoutConfig { message: None });
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_email_ok() {
        let config = ChannelTypeConfig::Email(email_config());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_email_no_recipients() {
        let mut email = email_config();
        email.to.clear();
        let result = ChannelTypeConfig::Email(email).validate();
        assert!(matches!(result, Err(ChannelTypeConfigError::NoRecipients)));
    }

    #[test]
    fn test_validate_email_empty_host() {
        let mut email = email_config();
        email.smtp_host.clear();
        let result = ChannelTypeConfig::Email(email).validate();
        assert!(matches!(result, Err(ChannelTypeConfigError::EmptySmtpHost)));
    }

    #[test]
    fn test_validate_email_empty_title() {
        let mut email = email_config();
        email.message.title.clear();
        let result = ChannelTypeConfig::Email(email).validate();
        assert!(matches!(result, Err(ChannelTypeConfigError::EmptyTitle)));
    }

    #[test]
    fn test_validate_tone_zero_repeats() {
        let config =
            ChannelTypeConfig::Tone(ToneConfig { repeats: 0, ..ToneConfig::default() });
        let result = config.validate();
        assert!(matches!(result, Err(ChannelTypeConfigError::ZeroRepeats)));
    }

    #[test]
    fn test_validate_webhook_invalid_method() {
        let config = ChannelTypeConfig::Webhook(WebhookConfig {
            url: Url::parse("http://localhost/hook").unwrap(),
            method: Some("SEND IT".to_string()),
            headers: None,
            message: notification_message(),
        });
        let result = config.validate();
        assert!(matches!(result, Err(ChannelTypeConfigError::InvalidMethod(_))));
    }

    #[test]
    fn test_channel_config_deserializes_flattened_type() {
        let yaml = r#"
name: console
stdout:
  message:
    title: "Occupancy alert"
    body: "Peak {{ aggregate }}"
"#;
        let config: ChannelConfig = serde_yaml_from_str(yaml);
        assert_eq!(config.name, "console");
        assert!(matches!(config.config, ChannelTypeConfig::Stdout(_)));
    }

    // The config crate is the production YAML front end; going through
    // serde_json here keeps the test free of extra dev-dependencies.
    fn serde_yaml_from_str(yaml: &str) -> ChannelConfig {
        let value = config::Config::builder()
            .add_source(config::File::from_str(yaml, config::FileFormat::Yaml))
            .build()
            .unwrap();
        value.try_deserialize().unwrap()
    }
}
