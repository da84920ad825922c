// SPDX-License-Identifier: GPL-3.0-only

//! Dataset retrieval
//!
//! The locator from the config is opaque to the rest of the app. Here it is
//! split into a remote URL (fetched with reqwest) or a local file path.

use crate::dataset::{Table, parse_csv};
use crate::errors::{DatasetError, DatasetResult};
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, info};

/// Where the CSV text comes from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DatasetSource {
    /// Published sheet or any other CSV over http(s)
    Http(String),
    /// CSV file on disk
    File(PathBuf),
}

impl DatasetSource {
    /// Interpret a configured locator
    pub fn parse(locator: &str) -> DatasetResult<Self> {
        let locator = locator.trim();
        if locator.is_empty() {
            return Err(DatasetError::NoSource);
        }

        if locator.starts_with("http://") || locator.starts_with("https://") {
            Ok(Self::Http(locator.to_string()))
        } else {
            Ok(Self::File(PathBuf::from(locator)))
        }
    }

    /// Fetch the raw CSV text
    pub async fn fetch(&self, timeout: Duration) -> DatasetResult<String> {
        match self {
            Self::Http(url) => {
                debug!(url = %url, ?timeout, "Requesting dataset");
                let client = reqwest::Client::builder()
                    .timeout(timeout)
                    .build()
                    .map_err(|e| DatasetError::Unreachable(e.to_string()))?;

                let response = client.get(url).send().await?.error_for_status()?;
                Ok(response.text().await?)
            }
            Self::File(path) => {
                debug!(path = %path.display(), "Reading dataset file");
                Ok(tokio::fs::read_to_string(path).await?)
            }
        }
    }
}

/// Fetch and parse the dataset named by `locator`
pub async fn load_table(locator: &str, timeout: Duration) -> DatasetResult<Table> {
    let source = DatasetSource::parse(locator)?;
    let content = source.fetch(timeout).await?;
    let table = parse_csv(&content)?;

    info!(
        rows = table.row_count(),
        columns = ?table.columns(),
        "Dataset loaded"
    );
    Ok(table)
}

/// Blocking wrapper around [`load_table`] for startup
///
/// Runs the fetch on a dedicated tokio runtime; this is the only place the
/// app waits on I/O before scanning starts.
pub fn load_table_blocking(locator: &str, timeout: Duration) -> DatasetResult<Table> {
    let rt = tokio::runtime::Runtime::new()?;
    rt.block_on(load_table(locator, timeout))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_locator() {
        assert_eq!(
            DatasetSource::parse("https://docs.test/pub?output=csv").unwrap(),
            DatasetSource::Http("https://docs.test/pub?output=csv".to_string())
        );
        assert_eq!(
            DatasetSource::parse("assets.csv").unwrap(),
            DatasetSource::File(PathBuf::from("assets.csv"))
        );
        assert!(matches!(
            DatasetSource::parse("   "),
            Err(DatasetError::NoSource)
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = load_table_blocking("/nonexistent/assets.csv", Duration::from_secs(1));
        assert!(matches!(result, Err(DatasetError::Io(_))));
    }
}
