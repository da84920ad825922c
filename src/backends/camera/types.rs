// SPDX-License-Identifier: GPL-3.0-only
// Shared types for camera backend abstraction

//! Shared types for frame sources

use std::borrow::Cow;
use std::sync::Arc;
use std::time::Instant;
use thiserror::Error;

/// Camera device information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CameraDevice {
    /// Human-readable name (V4L2 card name)
    pub name: String,
    /// Device node, e.g. `/dev/video0`
    pub path: String,
    /// V4L2 node index
    pub index: usize,
}

/// Pixel layout of a [`CameraFrame`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// 8-bit RGBA, 4 bytes per pixel
    RGBA,
    /// 8-bit luminance, 1 byte per pixel
    Gray8,
}

impl PixelFormat {
    /// Bytes used by one pixel
    pub fn bytes_per_pixel(&self) -> u32 {
        match self {
            PixelFormat::RGBA => 4,
            PixelFormat::Gray8 => 1,
        }
    }
}

/// A single frame from a frame source
#[derive(Debug, Clone)]
pub struct CameraFrame {
    pub width: u32,
    pub height: u32,
    /// Pixel data, `stride` bytes per row
    pub data: Arc<[u8]>,
    /// Pixel format of the data
    pub format: PixelFormat,
    /// Row stride (bytes per row, may include padding)
    pub stride: u32,
    /// Timestamp when frame was captured
    pub captured_at: Instant,
}

impl CameraFrame {
    /// Wrap a tightly packed RGBA buffer
    pub fn from_rgba(width: u32, height: u32, data: Vec<u8>) -> Self {
        Self {
            width,
            height,
            data: Arc::from(data),
            format: PixelFormat::RGBA,
            stride: width * 4,
            captured_at: Instant::now(),
        }
    }

    /// Pixel data without stride padding
    ///
    /// Borrows when rows are already packed. Rows that run past the end of
    /// `data` are left out, so a truncated frame yields a short buffer.
    pub fn packed_pixels(&self) -> Cow<'_, [u8]> {
        let row_len = (self.width * self.format.bytes_per_pixel()) as usize;
        let stride = self.stride as usize;
        let height = self.height as usize;

        if stride == row_len {
            let len = (row_len * height).min(self.data.len());
            return Cow::Borrowed(&self.data[..len]);
        }

        let mut result = Vec::with_capacity(row_len * height);
        for y in 0..height {
            let row_start = y * stride;
            let row_end = row_start + row_len;
            if row_end <= self.data.len() {
                result.extend_from_slice(&self.data[row_start..row_end]);
            }
        }
        Cow::Owned(result)
    }
}

/// Frame receiver type for capture threads
pub type FrameReceiver = futures::channel::mpsc::Receiver<CameraFrame>;

/// Frame sender type for capture threads
pub type FrameSender = futures::channel::mpsc::Sender<CameraFrame>;

/// Result type for backend operations
pub type BackendResult<T> = Result<T, BackendError>;

/// Error types for backend operations
#[derive(Debug, Clone, Error)]
pub enum BackendError {
    /// Camera device not found or not openable
    #[error("Device not found: {0}")]
    DeviceNotFound(String),
    /// Device refused every supported pixel format
    #[error("Format not supported: {0}")]
    FormatNotSupported(String),
    /// Failed to start streaming
    #[error("Initialization failed: {0}")]
    InitializationFailed(String),
    /// File could not be turned into a frame
    #[error("Unsupported file: {0}")]
    UnsupportedFile(String),
    /// General I/O error
    #[error("I/O error: {0}")]
    IoError(String),
}

impl From<std::io::Error> for BackendError {
    fn from(err: std::io::Error) -> Self {
        BackendError::IoError(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_packed_pixels_strips_stride_padding() {
        let data: Vec<u8> = vec![
            255, 0, 0, 255, // Red pixel
            0, 255, 0, 255, // Green pixel
            0, 0,           // stride padding
            0, 0, 255, 255, // Blue pixel
            255, 255, 255, 255, // White pixel
            0, 0,           // stride padding
        ];

        let frame = CameraFrame {
            width: 2,
            height: 2,
            data: Arc::from(data.as_slice()),
            format: PixelFormat::RGBA,
            stride: 10,
            captured_at: Instant::now(),
        };

        let result = frame.packed_pixels();
        assert_eq!(result.len(), 16);
        assert_eq!(&result[0..4], &[255, 0, 0, 255]);
        assert_eq!(&result[4..8], &[0, 255, 0, 255]);
        assert_eq!(&result[8..12], &[0, 0, 255, 255]);
        assert_eq!(&result[12..16], &[255, 255, 255, 255]);
    }

    #[test]
    fn test_packed_pixels_borrows_tight_rows() {
        let frame = CameraFrame::from_rgba(2, 1, vec![1, 2, 3, 4, 5, 6, 7, 8]);
        assert!(matches!(frame.packed_pixels(), Cow::Borrowed(_)));
    }

    #[test]
    fn test_truncated_frame_yields_short_buffer() {
        let frame = CameraFrame {
            width: 2,
            height: 2,
            data: Arc::from(vec![0u8; 5].as_slice()),
            format: PixelFormat::Gray8,
            stride: 4,
            captured_at: Instant::now(),
        };
        // Only the first row fits
        assert_eq!(frame.packed_pixels().len(), 2);
    }
}
