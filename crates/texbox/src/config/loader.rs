//! Configuration file loading for texbox
//!
//! Handles loading and parsing configuration files using the config crate.
//! Environment variables prefixed with `TEXBOX_` override file values.

use std::path::Path;

use config::{Config as ConfigBuilder, Environment, File, FileFormat};

use crate::config::{Config, ConfigError, ENV_PREFIX};

impl Config {
    /// Load configuration from an optional file plus `TEXBOX_*` environment overrides
    ///
    /// Keys missing from both sources fall back to their defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut builder = ConfigBuilder::builder();
        if let Some(path) = path {
            std::fs::metadata(path).map_err(|source| ConfigError::ReadFile {
                path: path.to_path_buf(),
                source,
            })?;
            builder = builder.add_source(File::from(path));
        }
        let config = builder
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        std::fs::metadata(path).map_err(|source| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source,
        })?;
        let config = ConfigBuilder::builder()
            .add_source(File::from(path))
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string
    pub fn parse_toml(content: &str) -> Result<Self, ConfigError> {
        let config = ConfigBuilder::builder()
            .add_source(File::from_str(content, FileFormat::Toml))
            .build()?;

        let config: Config = config.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration
    fn validate(&self) -> Result<(), ConfigError> {
        self.listen_addr()?;

        if !self.compile_timeout.is_finite() || self.compile_timeout < 0.0 {
            return Err(ConfigError::Invalid(format!(
                "compile_timeout must be a non-negative number of seconds, got {}",
                self.compile_timeout
            )));
        }

        if self.max_body_bytes == 0 {
            return Err(ConfigError::Invalid(
                "max_body_bytes must be greater than zero".to_string(),
            ));
        }

        if let Some(ref dir) = self.tex_bin_dir
            && dir.as_os_str().is_empty()
        {
            return Err(ConfigError::Invalid(
                "tex_bin_dir must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
