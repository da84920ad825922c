// SPDX-License-Identifier: MPL-2.0

//! Error types for the asset scanner

use crate::backends::camera::BackendError;
use thiserror::Error;

/// Result type alias using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Result type alias for dataset loading
pub type DatasetResult<T> = Result<T, DatasetError>;

/// Main application error type
#[derive(Debug, Error)]
pub enum AppError {
    /// Dataset could not be loaded
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),
    /// Configuration file problems
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),
    /// Camera backend errors
    #[error("Camera error: {0}")]
    Camera(#[from] BackendError),
    /// Terminal or filesystem errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Reasons the dataset provider failed to deliver a table
///
/// Any of these puts the session into the load-failure state, which disables
/// scanning until the program is restarted.
#[derive(Debug, Error)]
pub enum DatasetError {
    /// No dataset source was configured
    #[error("no dataset source configured")]
    NoSource,
    /// Remote host could not be reached or timed out
    #[error("dataset unreachable: {0}")]
    Unreachable(String),
    /// Remote host answered with a non-success status
    #[error("dataset request failed with HTTP {0}")]
    Http(u16),
    /// Local dataset file could not be read
    #[error("could not read dataset file: {0}")]
    Io(#[from] std::io::Error),
    /// Content is not valid CSV
    #[error("malformed CSV: {0}")]
    Parse(String),
    /// Header row missing or empty
    #[error("dataset has no columns")]
    NoColumns,
    /// Header present but no data rows
    #[error("dataset has no rows")]
    NoRows,
}

impl From<csv::Error> for DatasetError {
    fn from(err: csv::Error) -> Self {
        DatasetError::Parse(err.to_string())
    }
}

impl From<reqwest::Error> for DatasetError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => DatasetError::Http(status.as_u16()),
            None => DatasetError::Unreachable(err.to_string()),
        }
    }
}

/// Configuration file errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file exists but could not be read
    #[error("could not read {path}: {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },
    /// Config file is not valid TOML for [`crate::Config`]
    #[error("invalid config {path}: {message}")]
    Parse { path: String, message: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dataset_error_wraps_into_app_error() {
        let err: AppError = DatasetError::NoRows.into();
        assert!(matches!(err, AppError::Dataset(DatasetError::NoRows)));
        assert_eq!(err.to_string(), "Dataset error: dataset has no rows");
    }

    #[test]
    fn test_http_error_message() {
        assert_eq!(
            DatasetError::Http(404).to_string(),
            "dataset request failed with HTTP 404"
        );
    }
}
