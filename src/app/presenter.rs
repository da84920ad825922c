// SPDX-License-Identifier: GPL-3.0-only

//! Result presentation
//!
//! Holds what the user sees: a status line, the results region, and the
//! single-use reset action that appears after each match.

use crate::app::resolver::{DisplayItem, ResolutionResult, ResolveError, display_items};
use crate::constants::messages;
use tracing::debug;

/// Text of the status line
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusLine {
    /// Waiting for the dataset; shown before a session exists
    Loading,
    /// Scanning, nothing found yet
    Idle,
    /// A code was decoded
    Found(String),
    /// The dataset could not be loaded; scanning is off for the session
    DatasetLoadFailure(String),
}

impl std::fmt::Display for StatusLine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            StatusLine::Loading => f.write_str(messages::STATUS_LOADING),
            StatusLine::Idle => f.write_str(messages::STATUS_IDLE),
            StatusLine::Found(code) => write!(f, "✅ Code Found: {}", code),
            StatusLine::DatasetLoadFailure(_) => f.write_str(messages::STATUS_LOAD_FAILURE),
        }
    }
}

/// Contents of the results region
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ResultsRegion {
    /// Nothing scanned yet in this cycle
    #[default]
    Idle,
    /// Details of a found asset
    Items(Vec<DisplayItem>),
    /// Identifier with no matching row
    NotFound(String),
    /// Resolver had no table
    NoDataset,
    /// Key column missing from the table
    ConfigurationError(String),
}

impl ResultsRegion {
    /// Lines to show, in order
    pub fn lines(&self) -> Vec<String> {
        match self {
            ResultsRegion::Idle => vec![messages::RESULTS_IDLE.to_string()],
            ResultsRegion::Items(items) => items.iter().map(|item| item.to_string()).collect(),
            ResultsRegion::NotFound(id) => {
                vec![format!("❌ Asset \"{}\" not found in the dataset.", id)]
            }
            ResultsRegion::NoDataset => vec![messages::RESULTS_NO_DATASET.to_string()],
            ResultsRegion::ConfigurationError(detail) => vec![format!("Error: {}", detail)],
        }
    }

    /// URLs of the link items, in display order
    pub fn links(&self) -> Vec<&str> {
        match self {
            ResultsRegion::Items(items) => items.iter().filter_map(DisplayItem::url).collect(),
            _ => Vec::new(),
        }
    }
}

/// Reset control for one match cycle
///
/// Not `Clone`: taking it out of the presenter is the only way to reset,
/// so each cycle can be reset once.
#[derive(Debug, PartialEq, Eq)]
pub struct ResetAction {
    cycle: u64,
}

impl ResetAction {
    /// Match cycle this action belongs to (1-based)
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub fn label(&self) -> &'static str {
        messages::RESET_LABEL
    }
}

/// Status line, results region and reset action
#[derive(Debug)]
pub struct Presenter {
    status: StatusLine,
    results: ResultsRegion,
    reset_action: Option<ResetAction>,
    cycles: u64,
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}

impl Presenter {
    pub fn new() -> Self {
        Self {
            status: StatusLine::Idle,
            results: ResultsRegion::Idle,
            reset_action: None,
            cycles: 0,
        }
    }

    pub fn status(&self) -> &StatusLine {
        &self.status
    }

    pub fn results(&self) -> &ResultsRegion {
        &self.results
    }

    /// Pending reset action, if a result is on screen
    pub fn reset_action(&self) -> Option<&ResetAction> {
        self.reset_action.as_ref()
    }

    /// Show the load failure; no reset action is offered
    pub fn show_load_failure(&mut self, reason: impl Into<String>) {
        self.status = StatusLine::DatasetLoadFailure(reason.into());
        self.results = ResultsRegion::Idle;
        self.reset_action = None;
    }

    /// Announce a decoded code in the status line
    pub fn show_code(&mut self, code: &str) {
        self.status = StatusLine::Found(code.to_string());
    }

    /// Replace the results region with a lookup outcome and offer a reset
    pub fn render(&mut self, outcome: Result<ResolutionResult, ResolveError>, key_column: &str) {
        self.results = match outcome {
            Ok(ResolutionResult::Found(row)) => ResultsRegion::Items(display_items(&row, key_column)),
            Ok(ResolutionResult::NotFound(id)) => ResultsRegion::NotFound(id),
            Err(ResolveError::NoDataset) => ResultsRegion::NoDataset,
            Err(e @ ResolveError::MissingKeyColumn { .. }) => {
                ResultsRegion::ConfigurationError(e.to_string())
            }
        };

        self.cycles += 1;
        self.reset_action = Some(ResetAction {
            cycle: self.cycles,
        });
        debug!(cycle = self.cycles, "Rendered result");
    }

    /// Remove the reset action so it can be invoked
    pub fn take_reset_action(&mut self) -> Option<ResetAction> {
        self.reset_action.take()
    }

    /// Restore the idle status and clear the results region
    pub fn clear(&mut self) {
        self.status = StatusLine::Idle;
        self.results = ResultsRegion::Idle;
        self.reset_action = None;
    }
}
