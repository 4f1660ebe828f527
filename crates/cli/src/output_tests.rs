// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn format_time_ago_handles_zero_as_never() {
    assert_eq!(format_time_ago(0), "-");
}

#[test]
fn format_time_ago_reports_seconds_for_recent_timestamps() {
    let now_ms = std::time::SystemTime::now().duration_since(std::time::UNIX_EPOCH).unwrap().as_millis() as u64;
    let ago = format_time_ago(now_ms - 5_000);
    assert!(ago.ends_with('s'), "expected a seconds suffix, got {ago}");
}

#[test]
fn wire_value_text_renders_scalars_directly() {
    assert_eq!(wire_value_text(&WireValue::Integer(5)), "5");
    assert_eq!(wire_value_text(&WireValue::Bool(true)), "true");
    assert_eq!(wire_value_text(&WireValue::String("hi".into())), "hi");
    assert_eq!(wire_value_text(&WireValue::Null), "null");
}

#[test]
fn wire_value_text_renders_compound_values_as_json() {
    let array = WireValue::Array(vec![WireValue::Integer(1), WireValue::Integer(2)]);
    assert_eq!(wire_value_text(&array), "[1,2]");
}
