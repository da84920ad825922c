// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for loading datasets from disk

use assetscan::app::frame_processor::RqrrDecoder;
use assetscan::app::{ResolutionResult, ScanState, Session};
use assetscan::dataset::{CellValue, load_table_blocking};
use assetscan::Config;
use assetscan::errors::{AppError, DatasetError};
use std::io::Write;
use std::time::Duration;

const TIMEOUT: Duration = Duration::from_secs(5);

fn csv_file(content: &str) -> tempfile::NamedTempFile {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile().unwrap();
    file.write_all(content.as_bytes()).unwrap();
    file
}

#[test]
fn test_load_table_from_file() {
    let file = csv_file("assetname,info,photo\nA1,Widget,https://x.test/a1.jpg\nA2, spaced ,\n");
    let table = load_table_blocking(&file.path().display().to_string(), TIMEOUT).unwrap();

    assert_eq!(table.columns(), ["assetname", "info", "photo"]);
    assert_eq!(table.row_count(), 2);
    assert_eq!(table.rows()[1].get("info"), CellValue::Value(" spaced "));
    assert_eq!(table.rows()[1].get("photo"), CellValue::Empty);
}

#[test]
fn test_missing_file_fails_to_load() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.csv");

    let result = load_table_blocking(&path.display().to_string(), TIMEOUT);
    assert!(matches!(result, Err(DatasetError::Io(_))));
}

#[test]
fn test_empty_locator_is_no_source() {
    assert!(matches!(
        load_table_blocking("", TIMEOUT),
        Err(DatasetError::NoSource)
    ));
}

#[test]
fn test_session_from_config_with_file_dataset() {
    let file = csv_file("assetname,info\nA1,Widget\n");
    let config = Config::default().with_overrides(
        Some(file.path().display().to_string()),
        None,
        None,
    );

    let session = Session::from_config(&config);

    assert!(session.is_scanning_enabled());
    assert_eq!(session.scan_state(), ScanState::Scanning);
    assert!(matches!(session.lookup("A1"), Ok(ResolutionResult::Found(_))));
    assert!(matches!(
        session.lookup("a1"),
        Ok(ResolutionResult::NotFound(_))
    ));
}

#[test]
fn test_header_only_file_disables_scanning() {
    let file = csv_file("assetname,info\n");
    let load = load_table_blocking(&file.path().display().to_string(), TIMEOUT);

    let session = Session::new(load, "assetname", Box::new(RqrrDecoder::new()));

    assert!(!session.is_scanning_enabled());
    assert!(matches!(session.load_failure(), Some(DatasetError::NoRows)));
}

#[test]
fn test_try_from_config_returns_load_error() {
    let config = Config::default();

    let err = match Session::try_from_config(&config) {
        Ok(_) => panic!("a session without a dataset source should not start"),
        Err(e) => AppError::from(e),
    };

    assert!(matches!(err, AppError::Dataset(DatasetError::NoSource)));
    assert_eq!(err.to_string(), "Dataset error: no dataset source configured");
}

#[test]
fn test_try_from_config_with_rows_starts_scanning() {
    let file = csv_file("assetname,info\nA1,Widget\n");
    let config = Config::default().with_overrides(
        Some(file.path().display().to_string()),
        None,
        None,
    );

    let session = Session::try_from_config(&config).unwrap();
    assert!(session.is_scanning_enabled());
    assert!(session.load_failure().is_none());
}
