// SPDX-License-Identifier: MPL-2.0

//! Frame sources
//!
//! ```text
//! ┌──────────────────────┐
//! │   Session / UI loop  │  ← pulls frames, never blocks
//! └──────────┬───────────┘
//!            │ try_next_frame()
//!            ▼
//! ┌──────────────────────┐
//! │  FrameSource trait   │
//! └──────────┬───────────┘
//!       ┌────┴─────┐
//!       ▼          ▼
//!   ┌───────┐  ┌────────┐
//!   │ V4L2  │  │ Images │
//!   └───────┘  └────────┘
//! ```

pub mod file_source;
pub mod format_converters;
pub mod frame_loop;
pub mod types;
pub mod v4l2;

pub use file_source::ImageFileSource;
pub use types::*;
pub use v4l2::{V4l2Camera, enumerate_cameras};

/// Something that produces camera frames
pub trait FrameSource {
    /// Next frame if one is ready; must not block
    fn try_next_frame(&mut self) -> Option<CameraFrame>;

    /// Why the source will never produce another frame, if it has stopped
    fn stopped_reason(&self) -> Option<String> {
        None
    }
}
