// SPDX-License-Identifier: MPL-2.0

//! Frame processor module for QR decoding
//!
//! This module turns raw frame pixels into decoded QR payloads. The scan
//! controller only sees the [`QrDecoder`] trait; [`RqrrDecoder`] is the
//! production implementation.

pub mod tasks;
pub mod types;

pub use tasks::qr_detector::{self, QrDecoder, RqrrDecoder};
pub use types::{DecodeError, DecodeOptions, DecodedCode, FrameLayout, FrameView, InversionAttempts};
