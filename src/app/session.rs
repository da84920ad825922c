// SPDX-License-Identifier: GPL-3.0-only

//! Scanner session
//!
//! A [`Session`] owns everything that changes while scanning: the loaded
//! table, the scan state and what the presenter shows. Frames, resets and
//! lookups all go through it on a single thread.

use crate::app::frame_processor::{QrDecoder, RqrrDecoder};
use crate::app::presenter::Presenter;
use crate::app::resolver::{ResolutionResult, ResolveError, resolve};
use crate::app::scan_controller::{FrameOutcome, ScanController, ScanState};
use crate::backends::camera::CameraFrame;
use crate::config::Config;
use crate::dataset::{Table, load_table_blocking};
use crate::errors::{DatasetError, DatasetResult};
use tracing::{debug, info, warn};

pub struct Session {
    table: Option<Table>,
    load_failure: Option<DatasetError>,
    key_column: String,
    controller: ScanController,
    presenter: Presenter,
}

impl Session {
    /// Start a session from the result of loading the dataset
    ///
    /// A failed load, or a table with no rows, disables scanning for the
    /// lifetime of the session.
    pub fn new(
        load: DatasetResult<Table>,
        key_column: impl Into<String>,
        decoder: Box<dyn QrDecoder>,
    ) -> Self {
        let key_column = key_column.into();
        let mut presenter = Presenter::new();

        let load = load.and_then(|table| {
            if table.is_empty() {
                Err(DatasetError::NoRows)
            } else {
                Ok(table)
            }
        });

        let (table, load_failure) = match load {
            Ok(table) => {
                info!(
                    rows = table.row_count(),
                    columns = ?table.columns(),
                    "Dataset ready"
                );
                if !table.has_column(&key_column) {
                    warn!(
                        key_column = %key_column,
                        columns = ?table.columns(),
                        "Key column not found in dataset, every lookup will fail"
                    );
                }
                (Some(table), None)
            }
            Err(e) => {
                warn!(error = %e, "Dataset load failed, scanning disabled");
                presenter.show_load_failure(e.to_string());
                (None, Some(e))
            }
        };

        Self {
            table,
            load_failure,
            key_column,
            controller: ScanController::new(decoder),
            presenter,
        }
    }

    /// Load the configured dataset and start a session with the rqrr decoder
    ///
    /// Blocks until the dataset has been fetched or the load timed out.
    pub fn from_config(config: &Config) -> Self {
        let load = load_table_blocking(&config.dataset_source, config.load_timeout());
        let decoder = RqrrDecoder::with_max_dimension(config.decode_max_dimension);
        Self::new(load, config.key_column.clone(), Box::new(decoder))
    }

    /// Like [`Session::from_config`], but a dataset that failed to load is
    /// returned as the error instead of disabling scanning
    pub fn try_from_config(config: &Config) -> DatasetResult<Self> {
        let mut session = Self::from_config(config);
        match session.load_failure.take() {
            Some(e) => Err(e),
            None => Ok(session),
        }
    }

    /// Process one frame to completion
    ///
    /// On a decode the code is resolved and rendered before this returns.
    pub fn on_frame(&mut self, pixels: &[u8], width: u32, height: u32) -> FrameOutcome {
        if !self.is_scanning_enabled() {
            return FrameOutcome::Skipped;
        }

        let outcome = self.controller.on_frame(pixels, width, height);
        if let FrameOutcome::Decoded(code) = &outcome {
            self.presenter.show_code(code.as_str());
            let result = self.lookup(code.as_str());
            self.presenter.render(result, &self.key_column);
        }
        outcome
    }

    pub fn on_camera_frame(&mut self, frame: &CameraFrame) -> FrameOutcome {
        let pixels = frame.packed_pixels();
        self.on_frame(&pixels, frame.width, frame.height)
    }

    /// Resolve an identifier against the session's table without touching
    /// scan state
    pub fn lookup(&self, identifier: &str) -> Result<ResolutionResult, ResolveError> {
        resolve(identifier, self.table.as_ref(), &self.key_column)
    }

    /// Invoke the pending reset action
    ///
    /// Returns `false` when there was nothing to reset.
    pub fn reset(&mut self) -> bool {
        let Some(action) = self.presenter.take_reset_action() else {
            debug!("Reset requested with no pending result");
            return false;
        };

        debug!(cycle = action.cycle(), "Resetting scanner");
        self.controller.rearm();
        self.presenter.clear();
        true
    }

    pub fn scan_state(&self) -> ScanState {
        self.controller.state()
    }

    /// Scanning is on for the whole session unless the dataset failed to load
    pub fn is_scanning_enabled(&self) -> bool {
        self.table.is_some()
    }

    pub fn presenter(&self) -> &Presenter {
        &self.presenter
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    pub fn load_failure(&self) -> Option<&DatasetError> {
        self.load_failure.as_ref()
    }

    pub fn key_column(&self) -> &str {
        &self.key_column
    }
}
