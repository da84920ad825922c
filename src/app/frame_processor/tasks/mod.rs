// SPDX-License-Identifier: GPL-3.0-only

//! Frame processing tasks
//!
//! This module contains the decoder abstraction and its implementation.

pub mod qr_detector;

pub use qr_detector::{QrDecoder, RqrrDecoder};
