#![cfg(feature = "input-parser")]

//! JSON-driven session scenarios, the way a JS host feeds the adapter.
//!
//! Run:
//!   cargo test -p scrollfence-web --features input-parser --test json_session

use pretty_assertions::assert_eq;
use scrollfence_core::coordinator::{DispatchSource, Verdict};
use scrollfence_web::path_snapshot::WebNodeId;
use scrollfence_web::{
    DispatchPhase, HostCommand, LayoutSnapshot, ScrollFenceSession, SessionConfig, SessionError,
};

const MODAL_PATH: &str = r#"[
    {"id":7,"tag":"li"},
    {"id":3,"tag":"dialog","overflow_y":"auto",
     "scroll_top":0,"scroll_height":600,"client_height":200},
    {"id":1,"tag":"body"}]"#;

fn session() -> ScrollFenceSession {
    let mut session = ScrollFenceSession::new(
        SessionConfig {
            excluded: vec![Some(WebNodeId(3))],
            ..SessionConfig::default()
        },
        LayoutSnapshot::new(1280.0, 1265.0),
    )
    .unwrap();
    session.enable();
    session.drain_commands();
    session
}

fn wheel_json(dy: f64, region: Option<u32>) -> String {
    let region = region.map_or_else(|| "null".to_owned(), |id| id.to_string());
    format!(
        r#"{{"kind":"wheel","target":7,"dx":0,"dy":{dy},"cancelable":true,"region":{region},"path":{MODAL_PATH}}}"#
    )
}

#[test]
fn wheel_into_open_edge_is_allowed() {
    let mut session = session();
    let entry = session.dispatch_json(&wheel_json(40.0, None)).unwrap().unwrap();
    assert_eq!(entry.verdict, Verdict::Allow);
    assert_eq!(entry.source, Some(DispatchSource::ExclusionRegion));
    assert!(session.drain_commands().is_empty());
}

#[test]
fn wheel_past_top_edge_is_prevented() {
    let mut session = session();
    let entry = session.dispatch_json(&wheel_json(-40.0, None)).unwrap().unwrap();
    assert_eq!(entry.verdict, Verdict::Cancel);
    assert_eq!(
        session.drain_commands(),
        vec![HostCommand::PreventDefault {
            sequence: entry.sequence
        }]
    );
}

#[test]
fn capture_then_document_in_one_frame() {
    let mut session = session();
    let capture = session
        .dispatch_json(&wheel_json(-40.0, Some(3)))
        .unwrap()
        .unwrap();
    assert_eq!(capture.phase, DispatchPhase::Capture);
    let document = session.dispatch_json(&wheel_json(-40.0, None)).unwrap().unwrap();
    assert_eq!(document.source, Some(DispatchSource::Queued));
    session.end_frame();

    // Next frame recomputes instead of reusing.
    let next = session.dispatch_json(&wheel_json(-40.0, None)).unwrap().unwrap();
    assert_eq!(next.source, Some(DispatchSource::ExclusionRegion));
}

#[test]
fn pinch_touch_is_cancelled() {
    let mut session = session();
    session
        .dispatch_json(r#"{"kind":"touchstart","target":7,"changed":[{"x":10,"y":10}]}"#)
        .unwrap();
    let json = format!(
        r#"{{"kind":"touchmove","target":7,"cancelable":true,
            "touches":[{{"x":10,"y":10}},{{"x":60,"y":90}}],
            "changed":[{{"x":60,"y":90}}],"path":{MODAL_PATH}}}"#
    );
    let entry = session.dispatch_json(&json).unwrap().unwrap();
    assert_eq!(entry.verdict, Verdict::Cancel);
}

#[test]
fn unknown_event_kind_is_skipped() {
    let mut session = session();
    assert_eq!(
        session
            .dispatch_json(r#"{"kind":"pointermove","target":7}"#)
            .unwrap(),
        None
    );
    assert_eq!(session.log().count(), 0);
}

#[test]
fn malformed_event_surfaces_parse_error() {
    let mut session = session();
    let err = session.dispatch_json(r#"{"kind":"wheel"}"#).unwrap_err();
    assert!(matches!(err, SessionError::Parse(_)));
    assert_eq!(err.to_string(), "missing required field: target");
}
