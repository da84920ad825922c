// SPDX-License-Identifier: GPL-3.0-only

//! Scanner core
//!
//! - `frame_processor`: QR decoding of a single frame
//! - `scan_controller`: scanning/matched state machine
//! - `resolver`: key column lookup and display items
//! - `presenter`: status line, results region and reset action
//! - `session`: owns the above for one run

pub mod frame_processor;
pub mod presenter;
pub mod resolver;
pub mod scan_controller;
pub mod session;

pub use presenter::{Presenter, ResetAction, ResultsRegion, StatusLine};
pub use resolver::{DisplayItem, ResolutionResult, ResolveError, display_items, resolve};
pub use scan_controller::{FrameOutcome, ScanController, ScanState};
pub use session::Session;
