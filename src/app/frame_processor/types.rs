// SPDX-License-Identifier: MPL-2.0

//! Core types for frame processing
//!
//! These types describe the decoder's input (a validated view of one frame)
//! and its output (the decoded payload).

use thiserror::Error;

/// How the pixel buffer of a frame is laid out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameLayout {
    /// 4 bytes per pixel, RGBA order
    Rgba,
    /// 1 byte per pixel luminance
    Luma,
}

/// A frame whose buffer size has been checked against its dimensions
#[derive(Debug, Clone, Copy)]
pub struct FrameView<'a> {
    pub pixels: &'a [u8],
    pub width: u32,
    pub height: u32,
    pub layout: FrameLayout,
}

impl<'a> FrameView<'a> {
    /// Validate a raw buffer
    ///
    /// Both dimensions must be positive and the buffer must hold exactly
    /// `width * height` RGBA or luminance pixels; anything else is `None`.
    pub fn new(pixels: &'a [u8], width: u32, height: u32) -> Option<Self> {
        if width == 0 || height == 0 {
            return None;
        }

        let pixel_count = (width as usize).checked_mul(height as usize)?;
        let layout = if Some(pixels.len()) == pixel_count.checked_mul(4) {
            FrameLayout::Rgba
        } else if pixels.len() == pixel_count {
            FrameLayout::Luma
        } else {
            return None;
        };

        Some(Self {
            pixels,
            width,
            height,
            layout,
        })
    }
}

/// Which polarities the decoder tries
///
/// Only dark codes on a light background are read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InversionAttempts {
    #[default]
    DontInvert,
}

/// Options passed to the decoder with every frame
///
/// The scanner always uses the default, which does not try inverted codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DecodeOptions {
    pub inversion_attempts: InversionAttempts,
}

/// Text payload of a decoded QR code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedCode(String);

impl DecodedCode {
    pub fn new(data: impl Into<String>) -> Self {
        Self(data.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl std::fmt::Display for DecodedCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// A code was located but could not be read
#[derive(Debug, Clone, Error)]
#[error("QR code found but not decodable: {0}")]
pub struct DecodeError(pub String);
