// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

use super::*;

#[test]
fn converts_scalars() {
    assert_eq!(WireValue::from(&Value::Integer(3)), WireValue::Integer(3));
    assert_eq!(WireValue::from(&Value::String("hi".into())), WireValue::String("hi".into()));
    assert_eq!(WireValue::from(&Value::Null), WireValue::Null);
}

#[test]
fn converts_arrays_recursively() {
    let value = Value::Array(vec![Value::Integer(1), Value::Bool(true)]);
    assert_eq!(WireValue::from(&value), WireValue::Array(vec![WireValue::Integer(1), WireValue::Bool(true)]));
}

#[test]
fn serializes_as_plain_json() {
    let value = WireValue::Array(vec![WireValue::Integer(1), WireValue::String("x".into())]);
    let json = serde_json::to_string(&value).unwrap();
    assert_eq!(json, r#"[1,"x"]"#);
}
