use std::sync::Arc;

use super::{Supervisor, SupervisorError};
use crate::{
    channels::build_channels, config::AppConfig, dispatcher::AlertDispatcher,
    models::channel::ChannelConfig, sampling::OccupancyReader,
};

/// Assembles a [`Supervisor`] from its required parts.
///
/// Channel construction happens here, so a misconfigured channel surfaces
/// before the sampling loop is ever entered.
#[derive(Default)]
pub struct SupervisorBuilder {
    config: Option<AppConfig>,
    reader: Option<Arc<dyn OccupancyReader>>,
    channel_configs: Option<Vec<ChannelConfig>>,
    http_client: Option<reqwest::Client>,
}

impl SupervisorBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the application configuration.
    pub fn config(mut self, config: AppConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets the occupancy reader.
    pub fn reader(mut self, reader: Arc<dyn OccupancyReader>) -> Self {
        self.reader = Some(reader);
        self
    }

    /// Sets the channel configurations.
    pub fn channels(mut self, channel_configs: Vec<ChannelConfig>) -> Self {
        self.channel_configs = Some(channel_configs);
        self
    }

    /// Sets the HTTP client shared by webhook channels.
    pub fn http_client(mut self, http_client: reqwest::Client) -> Self {
        self.http_client = Some(http_client);
        self
    }

    /// Validates the assembled parts and builds the supervisor.
    pub fn build(self) -> Result<Supervisor, SupervisorError> {
        let config = self.config.ok_or(SupervisorError::MissingConfig)?;
        let reader = self.reader.ok_or(SupervisorError::MissingReader)?;
        let channel_configs = self.channel_configs.ok_or(SupervisorError::MissingChannels)?;
        let http_client = self.http_client.unwrap_or_default();

        let channels = build_channels(&channel_configs, http_client)?;
        let dispatcher = Arc::new(AlertDispatcher::new(channels));

        Ok(Supervisor {
            config: Arc::new(config),
            reader,
            dispatcher,
            cancellation_token: tokio_util::sync::CancellationToken::new(),
            join_set: tokio::task::JoinSet::new(),
        })
    }
}
