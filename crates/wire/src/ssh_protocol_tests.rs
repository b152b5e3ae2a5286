// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn parses_cmd_frame() {
    let json = r#"{"type":"cmd","cmd":"bHMgLWxh"}"#;
    let frame: ClientFrame = serde_json::from_str(json).unwrap();
    assert_eq!(frame, ClientFrame::Cmd { cmd: "bHMgLWxh".to_string() });
}

#[test]
fn parses_resize_frame() {
    let json = r#"{"type":"resize","cols":80,"rows":24}"#;
    let frame: ClientFrame = serde_json::from_str(json).unwrap();
    assert_eq!(frame, ClientFrame::Resize { cols: 80, rows: 24 });
}

#[test]
fn parses_heartbeat_frame_with_default_data() {
    let json = r#"{"type":"heartbeat"}"#;
    let frame: ClientFrame = serde_json::from_str(json).unwrap();
    assert_eq!(frame, ClientFrame::Heartbeat { data: String::new() });
}
