//! Data models for notifications.

use serde::Deserialize;

/// A message to be sent in a notification, with a title and body.
///
/// Both fields are templates rendered against the alert event context.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
pub struct NotificationMessage {
    /// The title of the notification message.
    pub title: String,
    /// The body content of the notification message.
    pub body: String,
}
