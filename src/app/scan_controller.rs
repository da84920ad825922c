// SPDX-License-Identifier: GPL-3.0-only

//! Scan state machine
//!
//! `Scanning --[decode success]--> Matched --[rearm]--> Scanning`
//!
//! While matched, frames are not handed to the decoder at all; that is the
//! only debounce the scanner needs.

use crate::app::frame_processor::{DecodeOptions, DecodedCode, FrameView, QrDecoder};
use tracing::{debug, info, trace};

/// Whether new frames are decoded
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ScanState {
    /// Every frame is submitted to the decoder
    #[default]
    Scanning,
    /// A code was decoded; frames are ignored until reset
    Matched,
}

/// What happened to one frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FrameOutcome {
    /// Not submitted: scanning is matched or disabled
    Skipped,
    /// Dimensions do not fit the buffer; dropped silently
    Invalid,
    /// Decoder found nothing readable
    Miss,
    /// A payload was decoded and the controller is now matched
    Decoded(DecodedCode),
}

impl FrameOutcome {
    pub fn is_decoded(&self) -> bool {
        matches!(self, FrameOutcome::Decoded(_))
    }
}

/// Drives the decoder and owns the [`ScanState`]
pub struct ScanController {
    decoder: Box<dyn QrDecoder>,
    state: ScanState,
    frames_decoded: u64,
}

impl ScanController {
    pub fn new(decoder: Box<dyn QrDecoder>) -> Self {
        Self {
            decoder,
            state: ScanState::Scanning,
            frames_decoded: 0,
        }
    }

    pub fn state(&self) -> ScanState {
        self.state
    }

    /// Process one frame
    ///
    /// Decoder errors count as a miss; they never change state.
    pub fn on_frame(&mut self, pixels: &[u8], width: u32, height: u32) -> FrameOutcome {
        if self.state == ScanState::Matched {
            return FrameOutcome::Skipped;
        }

        let Some(frame) = FrameView::new(pixels, width, height) else {
            trace!(len = pixels.len(), width, height, "Frame size mismatch, skipping");
            return FrameOutcome::Invalid;
        };

        self.frames_decoded += 1;
        match self.decoder.decode(&frame, DecodeOptions::default()) {
            Ok(Some(code)) if !code.is_empty() => {
                info!(code = %code, frames = self.frames_decoded, "QR code matched");
                self.state = ScanState::Matched;
                self.frames_decoded = 0;
                FrameOutcome::Decoded(code)
            }
            Ok(_) => FrameOutcome::Miss,
            Err(e) => {
                debug!(error = %e, "Decode failed, treating as miss");
                FrameOutcome::Miss
            }
        }
    }

    /// Return to scanning after a match
    pub fn rearm(&mut self) {
        if self.state == ScanState::Matched {
            debug!("Scanner re-armed");
        }
        self.state = ScanState::Scanning;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::frame_processor::DecodeError;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    /// Replays a fixed list of decoder answers and counts calls
    struct Scripted {
        answers: RefCell<Vec<Result<Option<DecodedCode>, DecodeError>>>,
        calls: Rc<Cell<usize>>,
    }

    impl QrDecoder for Scripted {
        fn decode(
            &self,
            _frame: &FrameView<'_>,
            options: DecodeOptions,
        ) -> Result<Option<DecodedCode>, DecodeError> {
            assert_eq!(options, DecodeOptions::default());
            self.calls.set(self.calls.get() + 1);
            let mut answers = self.answers.borrow_mut();
            if answers.is_empty() {
                Ok(None)
            } else {
                answers.remove(0)
            }
        }
    }

    fn controller(
        answers: Vec<Result<Option<DecodedCode>, DecodeError>>,
    ) -> (ScanController, Rc<Cell<usize>>) {
        let calls = Rc::new(Cell::new(0));
        let decoder = Scripted {
            answers: RefCell::new(answers),
            calls: Rc::clone(&calls),
        };
        (ScanController::new(Box::new(decoder)), calls)
    }

    const FRAME: [u8; 16] = [0; 16];

    #[test]
    fn test_match_stops_submission() {
        let (mut ctl, calls) = controller(vec![Ok(Some(DecodedCode::new("A1")))]);

        assert_eq!(
            ctl.on_frame(&FRAME, 2, 2),
            FrameOutcome::Decoded(DecodedCode::new("A1"))
        );
        assert_eq!(ctl.state(), ScanState::Matched);

        assert_eq!(ctl.on_frame(&FRAME, 2, 2), FrameOutcome::Skipped);
        assert_eq!(calls.get(), 1);
    }

    #[test]
    fn test_errors_and_empty_payloads_are_misses() {
        let (mut ctl, _) = controller(vec![
            Err(DecodeError("bad ecc".to_string())),
            Ok(Some(DecodedCode::new(""))),
            Ok(None),
        ]);

        for _ in 0..3 {
            assert_eq!(ctl.on_frame(&FRAME, 2, 2), FrameOutcome::Miss);
            assert_eq!(ctl.state(), ScanState::Scanning);
        }
    }

    #[test]
    fn test_invalid_frames_never_reach_decoder() {
        let (mut ctl, calls) = controller(Vec::new());

        assert_eq!(ctl.on_frame(&FRAME, 0, 4), FrameOutcome::Invalid);
        assert_eq!(ctl.on_frame(&FRAME, 3, 3), FrameOutcome::Invalid);
        assert_eq!(ctl.on_frame(&[], 2, 2), FrameOutcome::Invalid);
        assert_eq!(calls.get(), 0);
        assert_eq!(ctl.state(), ScanState::Scanning);
    }

    #[test]
    fn test_rearm_resumes_decoding() {
        let (mut ctl, calls) = controller(vec![
            Ok(Some(DecodedCode::new("A1"))),
            Ok(Some(DecodedCode::new("A2"))),
        ]);

        ctl.on_frame(&FRAME, 2, 2);
        ctl.rearm();
        assert_eq!(ctl.state(), ScanState::Scanning);
        assert_eq!(
            ctl.on_frame(&FRAME, 2, 2),
            FrameOutcome::Decoded(DecodedCode::new("A2"))
        );
        assert_eq!(calls.get(), 2);
    }
}
