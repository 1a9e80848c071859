//! Data models for Panoptes.

pub mod alert;
pub mod channel;
pub mod notification;
pub mod source;

pub use alert::AlertEvent;
pub use notification::NotificationMessage;
