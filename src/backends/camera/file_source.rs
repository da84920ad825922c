// SPDX-License-Identifier: GPL-3.0-only

//! Still images as a frame source
//!
//! Each file becomes one RGBA frame. Used by the `decode` command to run
//! photos of asset labels through the same scan path as the camera.

use crate::backends::camera::FrameSource;
use crate::backends::camera::types::{BackendError, BackendResult, CameraFrame};
use crate::constants::file_formats;
use std::collections::VecDeque;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Load an image file as an RGBA frame
pub fn load_image_as_frame(path: &Path) -> BackendResult<CameraFrame> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .unwrap_or_default();

    if !file_formats::is_image_extension(&extension) {
        return Err(BackendError::UnsupportedFile(format!(
            "{}: unsupported format '{}'",
            path.display(),
            extension
        )));
    }

    let img = image::open(path)
        .map_err(|e| BackendError::UnsupportedFile(format!("{}: {}", path.display(), e)))?;
    let rgba = img.to_rgba8();
    let (width, height) = rgba.dimensions();

    debug!(path = %path.display(), width, height, "Loaded image frame");
    Ok(CameraFrame::from_rgba(width, height, rgba.into_raw()))
}

/// Frame source over a list of image files, one frame per file
pub struct ImageFileSource {
    pending: VecDeque<PathBuf>,
    current: Option<PathBuf>,
}

impl ImageFileSource {
    pub fn new(paths: Vec<PathBuf>) -> Self {
        Self {
            pending: paths.into(),
            current: None,
        }
    }

    /// File the last returned frame came from
    pub fn current_path(&self) -> Option<&Path> {
        self.current.as_deref()
    }
}

impl FrameSource for ImageFileSource {
    /// Next loadable image; unreadable files are logged and skipped
    fn try_next_frame(&mut self) -> Option<CameraFrame> {
        while let Some(path) = self.pending.pop_front() {
            match load_image_as_frame(&path) {
                Ok(frame) => {
                    self.current = Some(path);
                    return Some(frame);
                }
                Err(e) => warn!(error = %e, "Skipping image"),
            }
        }
        self.current = None;
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_extension() {
        let result = load_image_as_frame(Path::new("clip.mp4"));
        assert!(matches!(result, Err(BackendError::UnsupportedFile(_))));
    }

    #[test]
    fn test_source_skips_unreadable_files() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("white.png");
        image::RgbaImage::from_pixel(3, 2, image::Rgba([255, 255, 255, 255]))
            .save(&good)
            .unwrap();

        let mut source = ImageFileSource::new(vec![dir.path().join("missing.png"), good.clone()]);

        let frame = source.try_next_frame().unwrap();
        assert_eq!((frame.width, frame.height), (3, 2));
        assert_eq!(source.current_path(), Some(good.as_path()));
        assert!(source.try_next_frame().is_none());
        assert!(source.current_path().is_none());
    }
}
