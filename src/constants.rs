// SPDX-License-Identifier: GPL-3.0-only

//! Application-wide constants

use std::time::Duration;

/// Defaults for values that can be set in the config file
pub mod defaults {
    /// Column holding the asset identifier (case-sensitive)
    pub const KEY_COLUMN: &str = "assetname";

    /// Camera device opened by the scanner
    pub const CAMERA_DEVICE: &str = "/dev/video0";

    /// Requested capture width
    pub const FRAME_WIDTH: u32 = 400;

    /// Requested capture height
    pub const FRAME_HEIGHT: u32 = 300;

    /// Timeout for the one-time dataset download
    pub const LOAD_TIMEOUT_SECS: u64 = 30;

    /// Frames larger than this are downscaled before decoding
    pub const DECODE_MAX_DIMENSION: u32 = 640;
}

/// User-facing messages for the status line and results region
pub mod messages {
    /// Status line while waiting for a code
    pub const STATUS_IDLE: &str = "Point a QR code at the camera.";

    /// Status line before the dataset has finished loading
    pub const STATUS_LOADING: &str = "Loading dataset...";

    /// Status line when the dataset could not be loaded
    pub const STATUS_LOAD_FAILURE: &str =
        "Error: Could not load dataset. Check the dataset source and that it is published as CSV.";

    /// Results region before anything was scanned
    pub const RESULTS_IDLE: &str = "Scan a code to see related links here.";

    /// Results region when the resolver has no table to search
    pub const RESULTS_NO_DATASET: &str = "Error: No dataset available to search.";

    /// Label of the reset control
    pub const RESET_LABEL: &str = "Scan Another Code";
}

/// Camera capture constants
pub mod capture {
    /// Number of mmap buffers requested from the V4L2 driver
    pub const BUFFER_COUNT: u32 = 4;

    /// Capacity of the capture thread -> UI frame channel
    pub const FRAME_CHANNEL_CAPACITY: usize = 4;

    /// Pixel formats tried in order of preference
    pub const PREFERRED_FOURCCS: &[&[u8; 4]] = &[b"YUYV", b"MJPG"];
}

/// Timing constants
pub mod timing {
    use super::Duration;

    /// Input poll timeout in the terminal loop (~60 fps redraw)
    pub const INPUT_POLL: Duration = Duration::from_millis(16);

    /// Back-off after a failed dequeue in the capture thread
    pub const CAPTURE_RETRY_DELAY: Duration = Duration::from_millis(10);

    /// Frame counter modulo for periodic logging
    pub const FRAME_LOG_INTERVAL: u64 = 30;
}

/// Supported still image formats for the `decode` command
pub mod file_formats {
    /// Supported image file extensions
    pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "gif", "bmp", "webp"];

    /// Check if a file extension is a supported image format
    pub fn is_image_extension(ext: &str) -> bool {
        IMAGE_EXTENSIONS.contains(&ext.to_lowercase().as_str())
    }
}

/// Application information utilities
pub mod app_info {
    /// Get the application version from build-time environment
    pub fn version() -> &'static str {
        env!("GIT_VERSION")
    }

    /// Name used for the config directory
    pub const APP_DIR: &str = "assetscan";
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_extensions_case_insensitive() {
        assert!(file_formats::is_image_extension("PNG"));
        assert!(file_formats::is_image_extension("jpeg"));
        assert!(!file_formats::is_image_extension("mp4"));
    }
}
