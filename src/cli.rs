// SPDX-License-Identifier: GPL-3.0-only

//! Non-interactive commands
//!
//! - Listing available cameras
//! - Looking up a single identifier
//! - Scanning still images

use assetscan::Config;
use assetscan::Session;
use assetscan::app::{FrameOutcome, Presenter, ResultsRegion};
use assetscan::backends::camera::{FrameSource, ImageFileSource, enumerate_cameras};
use assetscan::constants::messages;
use assetscan::errors::{AppError, AppResult};
use std::path::PathBuf;
use tracing::info;

/// List all available cameras
pub fn list_cameras() -> AppResult<()> {
    let cameras = enumerate_cameras();

    if cameras.is_empty() {
        println!("No cameras found.");
        return Ok(());
    }

    println!("Available cameras:");
    println!();
    for camera in &cameras {
        println!("  [{}] {}", camera.index, camera.name);
        println!("      Device: {}", camera.path);
    }

    Ok(())
}

/// Resolve one identifier against the configured dataset
pub fn lookup(config: &Config, id: &str, json: bool) -> AppResult<()> {
    let session = start_session(config)?;

    let mut presenter = Presenter::new();
    presenter.render(session.lookup(id), session.key_column());

    if json {
        println!("{}", results_json(id, presenter.results()));
    } else {
        print_results(presenter.results());
    }

    Ok(())
}

/// Run image files through a scanning session, resetting after each match
pub fn decode_images(
    config: &Config,
    images: Vec<PathBuf>,
    json: bool,
) -> AppResult<()> {
    let mut session = start_session(config)?;
    let mut source = ImageFileSource::new(images);
    let mut matches = 0usize;

    while let Some(frame) = source.try_next_frame() {
        let path = source
            .current_path()
            .map(|p| p.display().to_string())
            .unwrap_or_default();

        match session.on_camera_frame(&frame) {
            FrameOutcome::Decoded(code) => {
                matches += 1;
                if json {
                    println!("{}", results_json(code.as_str(), session.presenter().results()));
                } else {
                    println!("{}", path);
                    println!("  {}", session.presenter().status());
                    print_results(session.presenter().results());
                    println!();
                }
                session.reset();
            }
            FrameOutcome::Invalid => eprintln!("{}: unusable image", path),
            FrameOutcome::Miss | FrameOutcome::Skipped => {
                if !json {
                    println!("{}: no code found", path);
                    println!();
                }
            }
        }
    }

    info!(matches, "Finished decoding images");
    Ok(())
}

/// Start a session, failing early when the dataset could not be loaded
fn start_session(config: &Config) -> AppResult<Session> {
    Session::try_from_config(config).map_err(|e| {
        eprintln!("{}", messages::STATUS_LOAD_FAILURE);
        AppError::from(e)
    })
}

fn print_results(results: &ResultsRegion) {
    let mut link_number = 0;
    for (line, item) in results.lines().iter().zip(items_or_none(results)) {
        match item {
            Some(item) if item.url().is_some() => {
                link_number += 1;
                println!("  [{}] {}", link_number, line);
            }
            _ => println!("  {}", line),
        }
    }
}

/// One entry per line of `results`, `Some` for display items
fn items_or_none(
    results: &ResultsRegion,
) -> Box<dyn Iterator<Item = Option<&assetscan::DisplayItem>> + '_> {
    match results {
        ResultsRegion::Items(items) => Box::new(items.iter().map(Some)),
        _ => Box::new(std::iter::repeat(None)),
    }
}

fn results_json(id: &str, results: &ResultsRegion) -> serde_json::Value {
    match results {
        ResultsRegion::Items(items) => serde_json::json!({
            "id": id,
            "found": true,
            "items": items,
        }),
        ResultsRegion::NotFound(_) => serde_json::json!({
            "id": id,
            "found": false,
        }),
        other => serde_json::json!({
            "id": id,
            "error": other.lines().join(" "),
        }),
    }
}
