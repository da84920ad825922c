// SPDX-License-Identifier: GPL-3.0-only
//! Thread lifecycle management for capture loops
//!
//! Camera capture blocks on the driver, so it runs on its own thread and
//! hands finished frames to the UI thread over a channel. This module owns
//! that thread: start, stop signal, join on drop.

use std::sync::{Arc, Mutex};
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use tracing::{debug, info, warn};

/// Action returned by a loop iteration to control loop behavior
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopAction {
    /// Continue running the loop
    Continue,
    /// Stop the loop gracefully
    Stop,
}

/// Run `iteration` until it returns [`LoopAction::Stop`] or `stop` is set
///
/// The stop flag is checked before every iteration.
pub fn run_until_stopped<F>(stop: &AtomicBool, mut iteration: F)
where
    F: FnMut() -> LoopAction,
{
    while !stop.load(Ordering::SeqCst) {
        if iteration() == LoopAction::Stop {
            break;
        }
    }
}

/// Controller for a capture loop running in a separate thread
///
/// # Example
///
/// ```ignore
/// let controller = CaptureLoopController::spawn("camera-capture", |stop| {
///     let mut stream = open_stream()?;
///     run_until_stopped(&stop, || {
///         forward(stream.next());
///         LoopAction::Continue
///     });
///     Ok(())
/// });
///
/// // Dropping the controller stops and joins the thread
/// drop(controller);
/// ```
pub struct CaptureLoopController {
    /// Thread handle for joining
    thread_handle: Option<JoinHandle<()>>,
    /// Signal to stop the loop
    stop_signal: Arc<AtomicBool>,
    /// Error returned by the body, once it has failed
    failure: Arc<Mutex<Option<String>>>,
    /// Name for logging
    name: String,
}

impl CaptureLoopController {
    /// Start `body` on a new thread
    ///
    /// The body receives the stop signal and is expected to return soon
    /// after it is set. Devices and streams should be opened inside the
    /// body so they never leave the capture thread. An `Err` from the body
    /// is logged and ends the thread.
    pub fn spawn<F>(name: &str, body: F) -> Self
    where
        F: FnOnce(Arc<AtomicBool>) -> Result<(), String> + Send + 'static,
    {
        let stop_signal = Arc::new(AtomicBool::new(false));
        let stop_signal_clone = Arc::clone(&stop_signal);
        let failure = Arc::new(Mutex::new(None));
        let failure_clone = Arc::clone(&failure);
        let name_clone = name.to_string();

        info!(name = %name, "Starting capture loop");

        let thread_handle = thread::spawn(move || {
            debug!(name = %name_clone, "Capture loop thread started");

            match body(stop_signal_clone) {
                Ok(()) => info!(name = %name_clone, "Capture loop thread exiting"),
                Err(e) => {
                    warn!(name = %name_clone, error = %e, "Capture loop failed");
                    if let Ok(mut slot) = failure_clone.lock() {
                        *slot = Some(e);
                    }
                }
            }
        });

        Self {
            thread_handle: Some(thread_handle),
            stop_signal,
            failure,
            name: name.to_string(),
        }
    }

    /// Check if the loop is still running
    pub fn is_running(&self) -> bool {
        self.thread_handle
            .as_ref()
            .map(|h| !h.is_finished())
            .unwrap_or(false)
    }

    /// Error the body returned, if it failed
    pub fn failure(&self) -> Option<String> {
        self.failure.lock().ok().and_then(|slot| slot.clone())
    }

    /// Signal the loop to stop (non-blocking)
    pub fn request_stop(&self) {
        debug!(name = %self.name, "Requesting capture loop stop");
        self.stop_signal.store(true, Ordering::SeqCst);
    }

    /// Stop the loop and wait for the thread to finish
    pub fn stop(&mut self) {
        self.request_stop();
        self.join();
    }

    /// Wait for the thread to finish without sending stop signal
    pub fn join(&mut self) {
        if let Some(handle) = self.thread_handle.take() {
            debug!(name = %self.name, "Waiting for capture loop thread to finish");
            if let Err(e) = handle.join() {
                warn!(name = %self.name, "Capture loop thread panicked: {:?}", e);
            } else {
                debug!(name = %self.name, "Capture loop thread finished");
            }
        }
    }
}

impl Drop for CaptureLoopController {
    fn drop(&mut self) {
        if self.thread_handle.is_some() {
            debug!(name = %self.name, "CaptureLoopController dropped, stopping loop");
            self.stop();
        }
    }
}
