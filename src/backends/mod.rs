// SPDX-License-Identifier: MPL-2.0

//! Backend abstraction layer for frame capture
//!
//! - [`camera`]: frame sources (V4L2 camera, still images)

pub mod camera;
