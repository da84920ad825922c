// SPDX-License-Identifier: GPL-3.0-only

//! QR code decoding task
//!
//! This module implements QR decoding using the rqrr crate. Frames are
//! converted to luminance and downscaled before grid detection; the first
//! grid that decodes wins.

use crate::app::frame_processor::types::{
    DecodeError, DecodeOptions, DecodedCode, FrameLayout, FrameView, InversionAttempts,
};
use crate::backends::camera::format_converters::{downscale_luma, rgba_to_luma};
use std::borrow::Cow;
use tracing::{debug, trace};

/// Something that can find and read one QR code in a frame
pub trait QrDecoder {
    /// Decode the first readable code in `frame`
    ///
    /// `Ok(None)` means no code was found. `Err` means a code was located
    /// but could not be read; callers treat both the same way.
    fn decode(
        &self,
        frame: &FrameView<'_>,
        options: DecodeOptions,
    ) -> Result<Option<DecodedCode>, DecodeError>;
}

/// QR decoder backed by rqrr
///
/// Optimized for real-time processing with frame downscaling.
pub struct RqrrDecoder {
    /// Maximum dimension for processing (frames are downscaled to this)
    max_dimension: u32,
}

impl Default for RqrrDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl RqrrDecoder {
    /// Create a new decoder with default settings
    pub fn new() -> Self {
        Self::with_max_dimension(crate::constants::defaults::DECODE_MAX_DIMENSION)
    }

    /// Create a decoder with custom max dimension
    pub fn with_max_dimension(max_dimension: u32) -> Self {
        Self {
            max_dimension: max_dimension.max(1),
        }
    }
}

impl QrDecoder for RqrrDecoder {
    fn decode(
        &self,
        frame: &FrameView<'_>,
        options: DecodeOptions,
    ) -> Result<Option<DecodedCode>, DecodeError> {
        let start = std::time::Instant::now();

        let luma: Cow<'_, [u8]> = match frame.layout {
            FrameLayout::Rgba => Cow::Owned(rgba_to_luma(frame.pixels)),
            FrameLayout::Luma => Cow::Borrowed(frame.pixels),
        };

        let (luma, width, height) =
            prepare_luma(luma, frame.width, frame.height, self.max_dimension);

        trace!(
            width,
            height,
            conversion_ms = start.elapsed().as_millis(),
            "Prepared luminance image"
        );

        // Light-on-dark codes are not attempted
        let InversionAttempts::DontInvert = options.inversion_attempts;
        let code = decode_luma(&luma, width, height)?;
        if let Some(code) = &code {
            debug!(
                content = %code,
                total_ms = start.elapsed().as_millis(),
                "Decoded QR code"
            );
        }
        Ok(code)
    }
}

/// Downscale so that neither side exceeds `max_dimension`
fn prepare_luma(
    luma: Cow<'_, [u8]>,
    width: u32,
    height: u32,
    max_dimension: u32,
) -> (Cow<'_, [u8]>, u32, u32) {
    if width <= max_dimension && height <= max_dimension {
        return (luma, width, height);
    }

    let scale = (width as f32 / max_dimension as f32).max(height as f32 / max_dimension as f32);
    let new_width = ((width as f32 / scale) as u32).max(1);
    let new_height = ((height as f32 / scale) as u32).max(1);

    let scaled = downscale_luma(&luma, width, height, new_width, new_height);
    (Cow::Owned(scaled), new_width, new_height)
}

fn decode_luma(
    luma: &[u8],
    width: u32,
    height: u32,
) -> Result<Option<DecodedCode>, DecodeError> {
    let w = width as usize;
    let mut prepared =
        rqrr::PreparedImage::prepare_from_greyscale(w, height as usize, |x, y| luma[y * w + x]);

    let grids = prepared.detect_grids();
    trace!(count = grids.len(), "QR grid detection complete");

    let mut last_error = None;
    for grid in grids {
        match grid.decode() {
            Ok((_meta, content)) if !content.is_empty() => {
                return Ok(Some(DecodedCode::new(content)));
            }
            Ok(_) => debug!("Decoded QR code with empty payload"),
            Err(e) => {
                debug!(error = ?e, "Failed to decode QR grid");
                last_error = Some(DecodeError(format!("{:?}", e)));
            }
        }
    }

    match last_error {
        Some(e) => Err(e),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_frame_has_no_code() {
        let decoder = RqrrDecoder::new();
        let pixels = vec![255u8; 64 * 48 * 4];
        let frame = FrameView::new(&pixels, 64, 48).unwrap();
        assert!(matches!(
            decoder.decode(&frame, DecodeOptions::default()),
            Ok(None)
        ));
    }

    #[test]
    fn test_luma_frame_accepted() {
        let decoder = RqrrDecoder::new();
        let pixels = vec![0u8; 32 * 32];
        let frame = FrameView::new(&pixels, 32, 32).unwrap();
        assert!(decoder.decode(&frame, DecodeOptions::default()).is_ok());
    }

    #[test]
    fn test_prepare_luma_downscales_long_side() {
        let luma = vec![128u8; 1280 * 720];
        let (scaled, w, h) = prepare_luma(Cow::Borrowed(&luma), 1280, 720, 640);
        assert_eq!((w, h), (640, 360));
        assert_eq!(scaled.len(), 640 * 360);
    }

    #[test]
    fn test_prepare_luma_keeps_small_frames() {
        let luma = vec![128u8; 400 * 300];
        let (scaled, w, h) = prepare_luma(Cow::Borrowed(&luma), 400, 300, 640);
        assert_eq!((w, h), (400, 300));
        assert!(matches!(scaled, Cow::Borrowed(_)));
    }
}
