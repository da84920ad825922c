// SPDX-License-Identifier: GPL-3.0-only

//! assetscan - scan asset QR codes and look them up in a CSV dataset
//!
//! # Architecture
//!
//! - [`dataset`]: loading the table from a URL or file
//! - [`backends`]: frame sources (V4L2 camera, still images)
//! - [`app`]: decoding, the scan state machine, lookup and presentation
//! - [`terminal`]: interactive scanner in the terminal
//! - [`config`]: user configuration handling

pub mod app;
pub mod backends;
pub mod config;
pub mod constants;
pub mod dataset;
pub mod errors;
pub mod terminal;

// Re-export commonly used types
pub use app::{DisplayItem, FrameOutcome, ResolutionResult, ScanState, Session};
pub use config::Config;
pub use errors::{AppError, AppResult};
