//! Error types for notification channels.

use thiserror::Error;

use crate::channels::template::TemplateServiceError;

/// Defines the possible errors that can occur within a notification channel.
///
/// These are transient and per-notification: the dispatch task logs them and
/// the sampling loop never observes them.
#[derive(Debug, Error)]
pub enum ChannelError {
    /// An error related to invalid or missing configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An error related to the template rendering process.
    #[error("Template rendering error: {0}")]
    TemplateError(#[from] TemplateServiceError),

    /// An error that occurs when serializing the alert event context.
    #[error("Failed to serialize alert context: {0}")]
    ContextError(#[from] serde_json::Error),

    /// An error from the underlying HTTP client.
    #[error("Request error: {0}")]
    RequestError(#[from] reqwest::Error),

    /// The webhook endpoint answered with a non-success status.
    #[error("Webhook endpoint answered {0}")]
    ResponseStatus(reqwest::StatusCode),

    /// An error while assembling the email message.
    #[error("Email build error: {0}")]
    EmailBuild(#[from] lettre::error::Error),

    /// An email address failed to parse.
    #[error("Invalid email address: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// An error from the SMTP transport.
    #[error("SMTP transport error: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),

    /// An error while writing the audible tone.
    #[error("Tone output error: {0}")]
    Io(#[from] std::io::Error),
}
