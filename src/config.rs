// SPDX-License-Identifier: GPL-3.0-only

use crate::constants::{app_info, defaults};
use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};

/// Scanner configuration, read from `config.toml`
///
/// Every field is optional in the file; missing fields take their defaults.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Column that holds the asset identifier (case-sensitive)
    pub key_column: String,
    /// Where the dataset comes from: an http(s) URL or a file path
    pub dataset_source: String,
    /// V4L2 device node of the camera
    pub camera_device: String,
    /// Requested capture width
    pub frame_width: u32,
    /// Requested capture height
    pub frame_height: u32,
    /// Timeout for fetching the dataset, in seconds
    pub load_timeout_secs: u64,
    /// Frames are downscaled to this size before QR decoding
    pub decode_max_dimension: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            key_column: defaults::KEY_COLUMN.to_string(),
            dataset_source: String::new(),
            camera_device: defaults::CAMERA_DEVICE.to_string(),
            frame_width: defaults::FRAME_WIDTH,
            frame_height: defaults::FRAME_HEIGHT,
            load_timeout_secs: defaults::LOAD_TIMEOUT_SECS,
            decode_max_dimension: defaults::DECODE_MAX_DIMENSION,
        }
    }
}

impl Config {
    /// Default config file location (`$XDG_CONFIG_HOME/assetscan/config.toml`)
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(app_info::APP_DIR).join("config.toml"))
    }

    /// Load the config
    ///
    /// An explicit `path` must exist. Without one, the default location is
    /// tried and a missing file yields the defaults.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let (path, required) = match path {
            Some(p) => (p.to_path_buf(), true),
            None => match Self::default_path() {
                Some(p) => (p, false),
                None => {
                    debug!("No config directory on this system, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        if !required && !path.exists() {
            debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;

        let config = Self::from_toml_str(&content, &path.display().to_string())?;
        info!(path = %path.display(), "Loaded config");
        Ok(config)
    }

    /// Parse config from TOML text; `origin` is only used in error messages
    pub fn from_toml_str(content: &str, origin: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            path: origin.to_string(),
            message: e.to_string(),
        })
    }

    /// Apply command-line overrides on top of the file values
    pub fn with_overrides(
        mut self,
        dataset: Option<String>,
        key_column: Option<String>,
        device: Option<String>,
    ) -> Self {
        if let Some(dataset) = dataset {
            self.dataset_source = dataset;
        }
        if let Some(key_column) = key_column {
            self.key_column = key_column;
        }
        if let Some(device) = device {
            self.camera_device = device;
        }
        self
    }

    /// Dataset download timeout
    pub fn load_timeout(&self) -> Duration {
        Duration::from_secs(self.load_timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::from_toml_str(
            "dataset_source = \"https://example.test/sheet.csv\"\n",
            "inline",
        )
        .unwrap();
        assert_eq!(config.dataset_source, "https://example.test/sheet.csv");
        assert_eq!(config.key_column, "assetname");
        assert_eq!(config.frame_width, 400);
        assert_eq!(config.frame_height, 300);
    }

    #[test]
    fn test_invalid_toml_reports_origin() {
        let err = Config::from_toml_str("frame_width = \"wide\"", "bad.toml").unwrap_err();
        assert!(err.to_string().contains("bad.toml"));
    }

    #[test]
    fn test_overrides_replace_only_given_values() {
        let config = Config::default().with_overrides(
            Some("assets.csv".to_string()),
            None,
            Some("/dev/video2".to_string()),
        );
        assert_eq!(config.dataset_source, "assets.csv");
        assert_eq!(config.key_column, "assetname");
        assert_eq!(config.camera_device, "/dev/video2");
    }

    #[test]
    fn test_explicit_missing_path_is_error() {
        let result = Config::load(Some(Path::new("/nonexistent/assetscan/config.toml")));
        assert!(matches!(result, Err(ConfigError::Read { .. })));
    }
}
