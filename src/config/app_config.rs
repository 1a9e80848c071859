use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;

use super::helpers::{deserialize_duration_from_ms, deserialize_duration_from_seconds};
use crate::models::source::SourceConfig;

/// Provides the default value for sampling_interval_ms.
fn default_sampling_interval() -> Duration {
    Duration::from_millis(1000)
}

/// Provides the default value for source_read_timeout_ms.
fn default_source_read_timeout() -> Duration {
    Duration::from_millis(2000)
}

/// Provides the default value for shutdown_timeout_secs.
fn default_shutdown_timeout() -> Duration {
    Duration::from_secs(30)
}

/// How a closed window's maximum is compared against the threshold.
///
/// `above` is the documented behavior; `at_or_above` exists for compatibility
/// with deployments that expect an inclusive comparison.
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum ThresholdMode {
    /// Escalate when the maximum is strictly greater than the threshold.
    #[default]
    Above,
    /// Escalate when the maximum is greater than or equal to the threshold.
    AtOrAbove,
}

impl ThresholdMode {
    /// Applies the configured comparison.
    pub fn exceeded(&self, max: u32, threshold: u32) -> bool {
        match self {
            ThresholdMode::Above => max > threshold,
            ThresholdMode::AtOrAbove => max >= threshold,
        }
    }
}

/// Application configuration for Panoptes.
///
/// Assembled once at startup and passed into the supervisor; nothing mutates
/// it afterwards.
#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    /// Occupancy level a closed window's maximum is compared against.
    pub threshold: u32,

    /// Comparison applied between the window maximum and the threshold.
    #[serde(default)]
    pub threshold_mode: ThresholdMode,

    /// The interval between sampling ticks.
    #[serde(
        deserialize_with = "deserialize_duration_from_ms",
        default = "default_sampling_interval"
    )]
    pub sampling_interval_ms: Duration,

    /// The length of one measurement window.
    #[serde(deserialize_with = "deserialize_duration_from_seconds")]
    pub window_secs: Duration,

    /// The escalation suppression period opened by each alert.
    #[serde(deserialize_with = "deserialize_duration_from_seconds")]
    pub cooldown_secs: Duration,

    /// Upper bound on a single source read.
    #[serde(
        deserialize_with = "deserialize_duration_from_ms",
        default = "default_source_read_timeout"
    )]
    pub source_read_timeout_ms: Duration,

    /// The maximum time to wait for graceful shutdown.
    #[serde(
        deserialize_with = "deserialize_duration_from_seconds",
        default = "default_shutdown_timeout"
    )]
    pub shutdown_timeout_secs: Duration,

    /// Ordered list of monitored sources.
    pub sources: Vec<SourceConfig>,

    /// Path to the channel configuration file.
    #[serde(skip_deserializing)]
    pub channel_config_path: PathBuf,
}

impl AppConfig {
    /// Creates a new `AppConfig` by reading from the configuration directory.
    ///
    /// Reads `app.yaml` from the directory (default `configs`), applies
    /// `PANOPTES__`-prefixed environment overrides, and resolves the channel
    /// configuration path relative to the same directory. Any missing or
    /// malformed required value is an error here, before the sampling loop
    /// ever starts.
    pub fn new(config_dir: Option<&str>) -> Result<Self, ConfigError> {
        let config_dir_str = config_dir.unwrap_or("configs");
        let s = Config::builder()
            .add_source(File::with_name(&format!("{}/app.yaml", config_dir_str)))
            .add_source(Environment::with_prefix("PANOPTES").separator("__"))
            .build()?;
        let mut config: Self = s.try_deserialize()?;

        if config.sources.is_empty() {
            return Err(ConfigError::Message(
                "at least one source must be configured".to_string(),
            ));
        }

        config.channel_config_path = Path::new(config_dir_str).join("channels.yaml");

        Ok(config)
    }
}
