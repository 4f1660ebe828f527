// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn ok_response_serializes_with_result_tag() {
    let response = Response::ok(ResponseData::SessionId { session_id: "sess-abc".into() });
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["result"], "OK");
    assert_eq!(json["data"]["session_id"], "sess-abc");
}

#[test]
fn error_response_carries_kind_and_message() {
    let response = Response::error("Unbound", "unbound name 'x'");
    let json = serde_json::to_value(&response).unwrap();
    assert_eq!(json["result"], "ERROR");
    assert_eq!(json["kind"], "Unbound");
    assert!(!response.is_ok());
}
