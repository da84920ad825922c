// SPDX-License-Identifier: GPL-3.0-only

//! Integration tests for the scanning session

use assetscan::app::frame_processor::{
    DecodeError, DecodeOptions, DecodedCode, FrameView, InversionAttempts, QrDecoder,
};
use assetscan::app::{DisplayItem, FrameOutcome, ResultsRegion, ScanState, Session, StatusLine};
use assetscan::dataset::Table;
use assetscan::errors::DatasetError;
use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::rc::Rc;

/// Decoder that replays a script of results and counts its calls
struct ScriptedDecoder {
    script: RefCell<VecDeque<Option<&'static str>>>,
    calls: Rc<Cell<usize>>,
}

impl QrDecoder for ScriptedDecoder {
    fn decode(
        &self,
        _frame: &FrameView<'_>,
        options: DecodeOptions,
    ) -> Result<Option<DecodedCode>, DecodeError> {
        assert_eq!(options.inversion_attempts, InversionAttempts::DontInvert);
        self.calls.set(self.calls.get() + 1);
        Ok(self
            .script
            .borrow_mut()
            .pop_front()
            .flatten()
            .map(DecodedCode::new))
    }
}

fn scripted(script: &[Option<&'static str>]) -> (Box<dyn QrDecoder>, Rc<Cell<usize>>) {
    let calls = Rc::new(Cell::new(0));
    let decoder = ScriptedDecoder {
        script: RefCell::new(script.iter().copied().collect()),
        calls: calls.clone(),
    };
    (Box::new(decoder), calls)
}

fn asset_table(info: &str) -> Table {
    Table::from_cells(
        &["assetname", "info", "photo"],
        &[&["A1", info, "https://x.test/a1.jpg"]],
    )
    .unwrap()
}

/// A 4x4 RGBA frame
fn frame() -> Vec<u8> {
    vec![255u8; 4 * 4 * 4]
}

#[test]
fn test_match_renders_text_and_link() {
    let (decoder, _) = scripted(&[Some("A1")]);
    let mut session = Session::new(Ok(asset_table("Widget")), "assetname", decoder);

    let outcome = session.on_frame(&frame(), 4, 4);

    assert_eq!(outcome, FrameOutcome::Decoded(DecodedCode::new("A1")));
    assert_eq!(session.scan_state(), ScanState::Matched);
    assert_eq!(session.presenter().status(), &StatusLine::Found("A1".into()));
    assert_eq!(
        session.presenter().results(),
        &ResultsRegion::Items(vec![
            DisplayItem::Text {
                label: "info".into(),
                value: "Widget".into(),
            },
            DisplayItem::Link {
                label: "photo".into(),
                url: "https://x.test/a1.jpg".into(),
            },
        ])
    );
}

#[test]
fn test_unknown_code_renders_not_found() {
    let (decoder, _) = scripted(&[Some("A2")]);
    let mut session = Session::new(Ok(asset_table("Widget")), "assetname", decoder);

    session.on_frame(&frame(), 4, 4);

    assert_eq!(
        session.presenter().results(),
        &ResultsRegion::NotFound("A2".into())
    );
    assert_eq!(
        session.presenter().results().lines(),
        vec!["❌ Asset \"A2\" not found in the dataset."]
    );
}

#[test]
fn test_empty_cell_produces_no_item() {
    let (decoder, _) = scripted(&[Some("A1")]);
    let mut session = Session::new(Ok(asset_table("")), "assetname", decoder);

    session.on_frame(&frame(), 4, 4);

    assert_eq!(
        session.presenter().results(),
        &ResultsRegion::Items(vec![DisplayItem::Link {
            label: "photo".into(),
            url: "https://x.test/a1.jpg".into(),
        }])
    );
}

#[test]
fn test_zero_rows_never_enables_scanning() {
    let (decoder, calls) = scripted(&[Some("A1")]);
    let empty = Table::from_cells(&["assetname", "info", "photo"], &[]).unwrap();
    let mut session = Session::new(Ok(empty), "assetname", decoder);

    assert!(!session.is_scanning_enabled());
    assert_eq!(session.on_frame(&frame(), 4, 4), FrameOutcome::Skipped);
    assert_eq!(calls.get(), 0);
    assert_eq!(
        session.presenter().status().to_string(),
        "Error: Could not load dataset. Check the dataset source and that it is published as CSV."
    );
    assert!(!session.reset());
}

#[test]
fn test_provider_error_is_load_failure() {
    let (decoder, calls) = scripted(&[Some("A1")]);
    let mut session = Session::new(
        Err(DatasetError::Unreachable("timed out".into())),
        "assetname",
        decoder,
    );

    session.on_frame(&frame(), 4, 4);

    assert_eq!(calls.get(), 0);
    assert!(session.table().is_none());
    assert!(matches!(
        session.presenter().status(),
        StatusLine::DatasetLoadFailure(_)
    ));
}

#[test]
fn test_reset_resumes_decoding() {
    let (decoder, calls) = scripted(&[Some("A1"), None, Some("A1")]);
    let mut session = Session::new(Ok(asset_table("Widget")), "assetname", decoder);

    session.on_frame(&frame(), 4, 4);
    assert_eq!(session.on_frame(&frame(), 4, 4), FrameOutcome::Skipped);
    assert_eq!(calls.get(), 1);

    assert!(session.reset());
    assert_eq!(session.scan_state(), ScanState::Scanning);
    assert_eq!(session.presenter().results(), &ResultsRegion::Idle);
    assert_eq!(session.presenter().status(), &StatusLine::Idle);
    assert!(session.presenter().reset_action().is_none());

    assert_eq!(session.on_frame(&frame(), 4, 4), FrameOutcome::Miss);
    assert!(session.on_frame(&frame(), 4, 4).is_decoded());
    assert_eq!(calls.get(), 3);
}

#[test]
fn test_reset_after_not_found_resumes_decoding() {
    let (decoder, calls) = scripted(&[Some("A2"), Some("A1")]);
    let mut session = Session::new(Ok(asset_table("Widget")), "assetname", decoder);

    session.on_frame(&frame(), 4, 4);
    assert_eq!(
        session.presenter().results(),
        &ResultsRegion::NotFound("A2".into())
    );
    assert_eq!(session.scan_state(), ScanState::Matched);

    assert!(session.reset());
    assert_eq!(session.scan_state(), ScanState::Scanning);
    assert_eq!(session.presenter().results(), &ResultsRegion::Idle);
    assert_eq!(session.presenter().status(), &StatusLine::Idle);

    assert!(session.on_frame(&frame(), 4, 4).is_decoded());
    assert_eq!(calls.get(), 2);
}

#[test]
fn test_second_reset_is_noop() {
    let (decoder, _) = scripted(&[Some("A1")]);
    let mut session = Session::new(Ok(asset_table("Widget")), "assetname", decoder);

    session.on_frame(&frame(), 4, 4);
    assert!(session.reset());
    assert!(!session.reset());
    assert_eq!(session.scan_state(), ScanState::Scanning);
    assert_eq!(session.presenter().results(), &ResultsRegion::Idle);
}

#[test]
fn test_reset_action_cycles_count_up() {
    let (decoder, _) = scripted(&[Some("A1"), Some("A2")]);
    let mut session = Session::new(Ok(asset_table("Widget")), "assetname", decoder);

    session.on_frame(&frame(), 4, 4);
    assert_eq!(session.presenter().reset_action().map(|a| a.cycle()), Some(1));
    session.reset();
    session.on_frame(&frame(), 4, 4);
    assert_eq!(session.presenter().reset_action().map(|a| a.cycle()), Some(2));
}

#[test]
fn test_invalid_frame_is_dropped_without_decoding() {
    let (decoder, calls) = scripted(&[Some("A1")]);
    let mut session = Session::new(Ok(asset_table("Widget")), "assetname", decoder);

    assert_eq!(session.on_frame(&[0u8; 10], 4, 4), FrameOutcome::Invalid);
    assert_eq!(session.on_frame(&[], 0, 0), FrameOutcome::Invalid);
    assert_eq!(calls.get(), 0);
    assert_eq!(session.scan_state(), ScanState::Scanning);
}

#[test]
fn test_missing_key_column_reported_per_lookup() {
    let (decoder, _) = scripted(&[Some("A1")]);
    let mut session = Session::new(Ok(asset_table("Widget")), "Asset Name", decoder);

    assert!(session.is_scanning_enabled());
    session.on_frame(&frame(), 4, 4);

    match session.presenter().results() {
        ResultsRegion::ConfigurationError(detail) => {
            assert!(detail.contains("\"Asset Name\""));
            assert!(detail.contains("assetname, info, photo"));
        }
        other => panic!("expected configuration error, got {other:?}"),
    }
    assert_eq!(session.scan_state(), ScanState::Matched);
}
