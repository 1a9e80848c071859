//! Shared helpers for unit and integration tests: configuration builders, a
//! scripted occupancy reader, and recording/failing notification channels.

mod channel;
mod config;
mod reader;

pub use channel::{ChannelConfigBuilder, FailingChannel, RecordingChannel};
pub use config::AppConfigBuilder;
pub use reader::FakeReader;
