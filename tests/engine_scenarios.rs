// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Mxstream-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Mxstream and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use mxstream::format::{is_enveloped, unwrap, wrap};
use mxstream::model::{Cell, EditOp, IdSet};
use mxstream::ops::{apply_edits, repair};
use mxstream::session::EditorSession;
use mxstream::stream::{decode_bytes, EventStream, StreamDecoder, StreamEvent};

#[test]
fn dangling_target_is_stripped() {
    let valid: IdSet = ["a"].into_iter().collect();
    let repaired = repair(
        vec![Cell::new(r#"<mxCell id="e1" edge="1" source="a" target="zzz"/>"#)],
        &valid,
    );
    assert_eq!(repaired, vec![Cell::new(r#"<mxCell id="e1" edge="1" source="a"/>"#)]);
}

#[test]
fn update_and_add_against_bare_fragments() {
    let out = apply_edits(
        r#"<mxCell id="n1"/>"#,
        &[
            EditOp::Update {
                cell_id: "n1".to_owned(),
                new_xml: r#"<mxCell id="n1" value="x"/>"#.to_owned(),
            },
            EditOp::Add { new_xml: r#"<mxCell id="n2"/>"#.to_owned() },
        ],
    );
    assert_eq!(out, "<mxCell id=\"n1\" value=\"x\"/>\n<mxCell id=\"n2\"/>");
}

#[test]
fn display_frame_with_valued_layer_id_yields_one_diagram() {
    for escaped in [r#"<node id=\"1\" value=\"ok\"/>"#, r#"<mxCell id=\"1\" value=\"ok\"/>"#] {
        let frame = format!(
            "data: {{\"type\":\"tool-call\",\"toolName\":\"display_diagram\",\"input\":{{\"xml\":\"{escaped}\"}}}}\n"
        );
        let events = decode_bytes(frame.as_bytes(), None);
        assert_eq!(events.len(), 1, "{events:?}");
        let StreamEvent::Diagram { xml } = &events[0] else {
            panic!("expected diagram event, got {events:?}");
        };
        assert!(xml.contains(r#"id="1""#) && xml.contains(r#"value="ok""#), "{xml}");
    }
}

#[test]
fn valued_layer_id_cell_survives_the_editor_envelope() {
    let xml = r#"<mxCell id="1" value="ok"/>"#;
    assert_eq!(unwrap(&wrap(xml)), xml);
}

#[test]
fn done_sentinel_is_silent() {
    assert!(decode_bytes(b"data: [DONE]\n", None).is_empty());
}

#[tokio::test]
async fn full_session_round_trip() {
    let mut session = EditorSession::with_session_id("session-test");

    let first = concat!(
        "data: {\"type\":\"start\"}\n",
        "data: {\"type\":\"tool-call\",\"toolName\":\"display_diagram\",\"input\":{\"xml\":",
        "\"<mxCell id=\\\"a\\\" value=\\\"A\\\" vertex=\\\"1\\\" parent=\\\"1\\\"/>",
        "<mxCell id=\\\"b\\\" value=\\\"B\\\" vertex=\\\"1\\\" parent=\\\"1\\\"/>",
        "<mxCell id=\\\"e\\\" edge=\\\"1\\\" source=\\\"a\\\" target=\\\"b\\\" parent=\\\"1\\\"/>\"}}\n",
        "data: [DONE]\n",
    );
    let mut events = session.decode(first.as_bytes());
    let mut shown = None;
    while let Some(event) = events.next_event().await {
        shown = session.absorb(&event).or(shown);
    }
    let shown = shown.expect("editor document");
    assert!(is_enveloped(&shown));
    assert_eq!(unwrap(&shown), session.current());

    let request = session.request("remove B");
    assert_eq!(request.xml, session.current());

    let second = "data: {\"type\":\"tool-call\",\"toolName\":\"edit_diagram\",\"input\":{\"operations\":[{\"operation\":\"delete\",\"cell_id\":\"b\"}]}}\n";
    let events = session.decode(second.as_bytes()).collect_events().await;
    for event in &events {
        session.absorb(event);
    }
    assert_eq!(
        session.current(),
        "<mxCell id=\"a\" value=\"A\" vertex=\"1\" parent=\"1\"/>\n<mxCell id=\"e\" edge=\"1\" source=\"a\" parent=\"1\"/>"
    );
}

#[tokio::test]
async fn event_stream_over_a_byte_slice_without_trailing_newline() {
    let stream = b"data: {\"type\":\"error\",\"message\":\"overloaded\"}";
    let events = EventStream::new(&stream[..], StreamDecoder::new()).collect_events().await;
    assert_eq!(events, vec![StreamEvent::Error { message: "overloaded".to_owned() }]);
}
