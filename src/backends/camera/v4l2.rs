// SPDX-License-Identifier: GPL-3.0-only

//! V4L2 camera capture
//!
//! Opens a `/dev/video*` node, negotiates YUYV or MJPEG at the requested
//! size, and streams RGBA frames from a capture thread.

use crate::backends::camera::FrameSource;
use crate::backends::camera::format_converters::{mjpeg_to_rgba, yuyv_to_rgba};
use crate::backends::camera::frame_loop::{CaptureLoopController, LoopAction, run_until_stopped};
use crate::backends::camera::types::{
    BackendError, BackendResult, CameraDevice, CameraFrame, FrameReceiver, FrameSender,
};
use crate::constants::{capture, timing};
use futures::channel::mpsc;
use std::sync::atomic::AtomicBool;
use tracing::{debug, info, trace, warn};
use v4l::FourCC;
use v4l::buffer::Type;
use v4l::io::traits::CaptureStream;
use v4l::prelude::*;
use v4l::video::Capture;

/// List V4L2 video nodes
pub fn enumerate_cameras() -> Vec<CameraDevice> {
    v4l::context::enum_devices()
        .into_iter()
        .map(|node| CameraDevice {
            name: node
                .name()
                .unwrap_or_else(|| format!("Video device {}", node.index())),
            path: node.path().display().to_string(),
            index: node.index(),
        })
        .collect()
}

/// Format agreed with the driver
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct NegotiatedFormat {
    width: u32,
    height: u32,
    fourcc: FourCC,
}

/// Live camera feed
pub struct V4l2Camera {
    device_path: String,
    receiver: FrameReceiver,
    capture: CaptureLoopController,
}

impl V4l2Camera {
    /// Open `device_path` and start streaming
    ///
    /// The format is negotiated here so that an unusable device is reported
    /// to the caller; the capture thread then reopens the device with it.
    pub fn open(device_path: &str, width: u32, height: u32) -> BackendResult<Self> {
        let mut dev = Device::with_path(device_path)
            .map_err(|e| BackendError::DeviceNotFound(format!("{}: {}", device_path, e)))?;
        let format = negotiate_format(&mut dev, width, height)?;
        drop(dev);

        info!(
            device = device_path,
            width = format.width,
            height = format.height,
            fourcc = ?format.fourcc,
            "Negotiated camera format"
        );

        let (sender, receiver) = mpsc::channel(capture::FRAME_CHANNEL_CAPACITY);
        let path = device_path.to_string();
        let capture = CaptureLoopController::spawn("v4l2-capture", move |stop| {
            capture_loop(&path, format, sender, &stop)
        });

        Ok(Self {
            device_path: device_path.to_string(),
            receiver,
            capture,
        })
    }

    pub fn device_path(&self) -> &str {
        &self.device_path
    }
}

impl FrameSource for V4l2Camera {
    fn try_next_frame(&mut self) -> Option<CameraFrame> {
        // Non-blocking receive
        self.receiver.try_recv().ok()
    }

    fn stopped_reason(&self) -> Option<String> {
        if self.capture.is_running() {
            return None;
        }
        Some(
            self.capture
                .failure()
                .unwrap_or_else(|| "capture thread exited".to_string()),
        )
    }
}

fn negotiate_format(dev: &mut Device, width: u32, height: u32) -> BackendResult<NegotiatedFormat> {
    for wanted in capture::PREFERRED_FOURCCS {
        let fourcc = FourCC::new(wanted);
        let mut format = dev
            .format()
            .map_err(|e| BackendError::InitializationFailed(format!("query format: {}", e)))?;
        format.width = width;
        format.height = height;
        format.fourcc = fourcc;

        match dev.set_format(&format) {
            Ok(actual) if actual.fourcc == fourcc => {
                return Ok(NegotiatedFormat {
                    width: actual.width,
                    height: actual.height,
                    fourcc,
                });
            }
            Ok(actual) => {
                debug!(wanted = ?fourcc, got = ?actual.fourcc, "Driver substituted pixel format");
            }
            Err(e) => {
                debug!(wanted = ?fourcc, error = %e, "Driver rejected pixel format");
            }
        }
    }

    Err(BackendError::FormatNotSupported(
        "device offers neither YUYV nor MJPG".to_string(),
    ))
}

/// Capture loop running on the capture thread
fn capture_loop(
    device_path: &str,
    negotiated: NegotiatedFormat,
    mut sender: FrameSender,
    stop: &AtomicBool,
) -> Result<(), String> {
    let mut dev = Device::with_path(device_path)
        .map_err(|e| format!("Failed to open V4L2 device {}: {}", device_path, e))?;

    let mut format = dev
        .format()
        .map_err(|e| format!("Failed to query format: {}", e))?;
    format.width = negotiated.width;
    format.height = negotiated.height;
    format.fourcc = negotiated.fourcc;
    dev.set_format(&format)
        .map_err(|e| format!("Failed to set format: {}", e))?;

    let mut stream = MmapStream::with_buffers(&mut dev, Type::VideoCapture, capture::BUFFER_COUNT)
        .map_err(|e| format!("Failed to create buffer stream: {}", e))?;

    info!(device = device_path, "V4L2 capture stream started");

    let mut frame_num: u64 = 0;
    run_until_stopped(stop, || {
        match stream.next() {
            Ok((buf, _meta)) => {
                frame_num += 1;
                let Some(frame) = convert_buffer(buf, negotiated) else {
                    return LoopAction::Continue;
                };

                if let Err(e) = sender.try_send(frame) {
                    if e.is_disconnected() {
                        debug!("Frame receiver gone, ending capture");
                        return LoopAction::Stop;
                    }
                    if frame_num % timing::FRAME_LOG_INTERVAL == 0 {
                        debug!(frame = frame_num, "Frame dropped (channel full)");
                    }
                }
            }
            Err(e) => {
                warn!(error = %e, "Failed to capture frame");
                std::thread::sleep(timing::CAPTURE_RETRY_DELAY);
            }
        }
        LoopAction::Continue
    });

    info!(device = device_path, frames = frame_num, "V4L2 capture loop ended");
    Ok(())
}

/// Turn one driver buffer into an RGBA frame
fn convert_buffer(buf: &[u8], format: NegotiatedFormat) -> Option<CameraFrame> {
    let (width, height) = (format.width, format.height);

    if format.fourcc == FourCC::new(b"YUYV") {
        let expected = (width * height * 2) as usize;
        if buf.len() < expected {
            trace!(got = buf.len(), expected, "Short YUYV buffer");
            return None;
        }
        return Some(CameraFrame::from_rgba(
            width,
            height,
            yuyv_to_rgba(buf, width, height),
        ));
    }

    match mjpeg_to_rgba(buf) {
        Ok((rgba, w, h)) => Some(CameraFrame::from_rgba(w, h, rgba)),
        Err(e) => {
            debug!(error = %e, "Failed to decode MJPEG frame");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_convert_short_yuyv_buffer_is_dropped() {
        let format = NegotiatedFormat {
            width: 4,
            height: 2,
            fourcc: FourCC::new(b"YUYV"),
        };
        assert!(convert_buffer(&[128u8; 8], format).is_none());

        let frame = convert_buffer(&[128u8; 16], format).unwrap();
        assert_eq!(frame.data.len(), 4 * 2 * 4);
    }

    #[test]
    fn test_convert_bad_mjpeg_is_dropped() {
        let format = NegotiatedFormat {
            width: 4,
            height: 2,
            fourcc: FourCC::new(b"MJPG"),
        };
        assert!(convert_buffer(&[0u8; 32], format).is_none());
    }
}
