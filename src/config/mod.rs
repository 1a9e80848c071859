//! Configuration module for Panoptes.

mod app_config;
mod helpers;
mod loader;

pub use app_config::{AppConfig, ThresholdMode};
pub use helpers::{deserialize_duration_from_ms, deserialize_duration_from_seconds};
pub use loader::{ConfigLoader, Loadable, LoaderError};
