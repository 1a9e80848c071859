//! Generic configuration loader for loading items from a YAML file.

use std::{fs, path::PathBuf};

use config::{Config, File, FileFormat};
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// Failed to read the configuration file from disk.
    #[error("Failed to read configuration file: {0}")]
    IoError(#[from] std::io::Error),

    /// Failed to parse the configuration file contents.
    #[error("Failed to parse configuration: {0}")]
    ParseError(#[from] config::ConfigError),

    /// The configuration file is not a YAML file.
    #[error("Unsupported configuration format")]
    UnsupportedFormat,
}

/// A configuration item that lives in a keyed list in a YAML file and knows
/// how to validate itself after deserialization.
pub trait Loadable: DeserializeOwned {
    /// The error produced by validation; loader errors must convert into it.
    type Error: From<LoaderError>;

    /// The top-level key holding the list of items (e.g., "channels").
    const KEY: &'static str;

    /// Validates the freshly-deserialized item.
    fn validate(&mut self) -> Result<(), Self::Error>;
}

/// A generic loader for YAML files.
pub struct ConfigLoader {
    path: PathBuf,
}

impl ConfigLoader {
    /// Creates a new `ConfigLoader`.
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    /// Loads and validates every item under `T::KEY`.
    pub fn load_all<T: Loadable>(&self) -> Result<Vec<T>, T::Error> {
        let mut items: Vec<T> = self.load(T::KEY)?;
        for item in &mut items {
            item.validate()?;
        }
        Ok(items)
    }

    /// Loads a vector of items from the YAML file without validation.
    fn load<T: DeserializeOwned>(&self, key: &str) -> Result<Vec<T>, LoaderError> {
        if !self.is_yaml_file() {
            return Err(LoaderError::UnsupportedFormat);
        }

        let config_str = fs::read_to_string(&self.path)?;

        let config = Config::builder()
            .add_source(File::from_str(&config_str, FileFormat::Yaml))
            .build()?;

        let items = config.get(key)?;

        Ok(items)
    }

    /// Checks if the file has a YAML extension.
    fn is_yaml_file(&self) -> bool {
        matches!(self.path.extension().and_then(|ext| ext.to_str()), Some("yaml") | Some("yml"))
    }
}
