//! Server configuration loading
//!
//! Values come from an optional TOML file; every key has a default so an
//! empty or missing file yields a working server.

use fileshift_image::{ConvertOptions, DEFAULT_JPEG_QUALITY};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Largest accepted request body for uploads (20 MiB).
pub const DEFAULT_MAX_UPLOAD_BYTES: usize = 20 << 20;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The config file could not be read
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        /// File that failed
        path: PathBuf,
        /// Underlying IO error
        source: std::io::Error,
    },

    /// The config file is not valid TOML for this schema
    #[error("Failed to parse config file {}: {source}", path.display())]
    Parse {
        /// File that failed
        path: PathBuf,
        /// Underlying TOML error
        source: toml::de::Error,
    },

    /// A value is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Address to bind
    pub bind: String,

    /// Port to listen on
    pub port: u16,

    /// Request body cap for `/transform`
    pub max_upload_bytes: usize,

    /// JPEG quality (1-100)
    pub jpeg_quality: u8,

    /// Wrap all routes in the permissive CORS layer
    pub cors_enabled: bool,

    /// Path the configuration was loaded from
    #[serde(skip)]
    pub path: Option<PathBuf>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: "0.0.0.0".to_string(),
            port: 8080,
            max_upload_bytes: DEFAULT_MAX_UPLOAD_BYTES,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            cors_enabled: true,
            path: None,
        }
    }
}

impl ServerConfig {
    /// Load configuration from a file path, a standard location, or defaults
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let config_path = path.map(Path::to_path_buf).or_else(find_config_file);

        let Some(config_path) = config_path else {
            return Ok(Self::default());
        };

        let content = std::fs::read_to_string(&config_path).map_err(|source| ConfigError::Read {
            path: config_path.clone(),
            source,
        })?;

        let mut config: ServerConfig =
            toml::from_str(&content).map_err(|source| ConfigError::Parse {
                path: config_path.clone(),
                source,
            })?;
        config.path = Some(config_path);
        Ok(config)
    }

    /// Check value ranges
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(1..=100).contains(&self.jpeg_quality) {
            return Err(ConfigError::Invalid(format!(
                "jpeg_quality must be between 1 and 100, got {}",
                self.jpeg_quality
            )));
        }
        if self.max_upload_bytes == 0 {
            return Err(ConfigError::Invalid("max_upload_bytes must be greater than 0".into()));
        }
        Ok(())
    }

    /// `bind:port` socket address string
    pub fn addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }

    /// Converter options derived from this configuration
    pub fn convert_options(&self) -> ConvertOptions {
        ConvertOptions {
            jpeg_quality: self.jpeg_quality,
        }
    }
}

/// Find configuration file in standard locations
fn find_config_file() -> Option<PathBuf> {
    let candidates = ["fileshift.toml", ".config/fileshift.toml"];

    candidates
        .into_iter()
        .map(PathBuf::from)
        .find(|candidate| candidate.exists())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_config_default() {
        let config = ServerConfig::default();
        assert_eq!(config.port, 8080);
        assert_eq!(config.max_upload_bytes, 20 * 1024 * 1024);
        assert_eq!(config.jpeg_quality, 90);
        assert!(config.cors_enabled);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_load_partial_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = 9090\njpeg_quality = 75").unwrap();

        let config = ServerConfig::load(Some(file.path())).unwrap();
        assert_eq!(config.port, 9090);
        assert_eq!(config.jpeg_quality, 75);
        assert_eq!(config.bind, "0.0.0.0");
        assert_eq!(config.path.as_deref(), Some(file.path()));
        assert_eq!(config.convert_options().jpeg_quality, 75);
    }

    #[test]
    fn test_config_load_missing_file() {
        let err = ServerConfig::load(Some(Path::new("/nonexistent/fileshift.toml"))).unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_config_load_bad_toml() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = \"not a number\"").unwrap();

        let err = ServerConfig::load(Some(file.path())).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn test_validate_rejects_out_of_range() {
        let config = ServerConfig { jpeg_quality: 0, ..ServerConfig::default() };
        assert!(config.validate().is_err());

        let config = ServerConfig { max_upload_bytes: 0, ..ServerConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_addr() {
        let config = ServerConfig {
            bind: "127.0.0.1".into(),
            port: 3000,
            ..ServerConfig::default()
        };
        assert_eq!(config.addr(), "127.0.0.1:3000");
    }
}
