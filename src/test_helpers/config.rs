use std::time::Duration;

use url::Url;

use crate::{
    config::{AppConfig, ThresholdMode},
    models::source::SourceConfig,
};

/// A builder for creating `AppConfig` instances in tests.
#[derive(Default)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    /// Creates a builder with all-zero durations and no sources.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the escalation threshold.
    pub fn threshold(mut self, threshold: u32) -> Self {
        self.config.threshold = threshold;
        self
    }

    /// Sets the threshold comparison mode.
    pub fn threshold_mode(mut self, mode: ThresholdMode) -> Self {
        self.config.threshold_mode = mode;
        self
    }

    /// Sets the sampling interval in milliseconds.
    pub fn sampling_interval(mut self, interval_ms: u64) -> Self {
        self.config.sampling_interval_ms = Duration::from_millis(interval_ms);
        self
    }

    /// Sets the measurement window length in seconds.
    pub fn window(mut self, secs: u64) -> Self {
        self.config.window_secs = Duration::from_secs(secs);
        self
    }

    /// Sets the cooldown length in seconds.
    pub fn cooldown(mut self, secs: u64) -> Self {
        self.config.cooldown_secs = Duration::from_secs(secs);
        self
    }

    /// Sets the per-source read timeout in milliseconds.
    pub fn source_read_timeout(mut self, timeout_ms: u64) -> Self {
        self.config.source_read_timeout_ms = Duration::from_millis(timeout_ms);
        self
    }

    /// Appends a monitored source.
    pub fn source(mut self, id: &str, url: &str) -> Self {
        self.config
            .sources
            .push(SourceConfig { id: id.to_string(), url: Url::parse(url).unwrap() });
        self
    }

    /// Builds the configuration.
    pub fn build(self) -> AppConfig {
        self.config
    }
}
