// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! JSON-safe mirror of [`chariot_lang::Value`]. Functions, host object
//! references, and opaque handles have no meaningful wire representation,
//! so they collapse to a descriptive string rather than round-tripping.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use chariot_lang::Value;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum WireValue {
    Integer(i64),
    Float(f64),
    Bool(bool),
    String(String),
    Array(Vec<WireValue>),
    Map(IndexMap<String, WireValue>),
    Null,
}

impl From<&Value> for WireValue {
    fn from(value: &Value) -> Self {
        match value {
            Value::Integer(i) => WireValue::Integer(*i),
            Value::Float(f) => WireValue::Float(*f),
            Value::String(s) => WireValue::String(s.clone()),
            Value::Bool(b) => WireValue::Bool(*b),
            Value::Null => WireValue::Null,
            Value::Array(items) => WireValue::Array(items.iter().map(WireValue::from).collect()),
            Value::Map(map) => WireValue::Map(map.iter().map(|(k, v)| (k.clone(), WireValue::from(v))).collect()),
            other => WireValue::String(other.to_string()),
        }
    }
}

impl From<Value> for WireValue {
    fn from(value: Value) -> Self {
        WireValue::from(&value)
    }
}

#[cfg(test)]
#[path = "wire_value_tests.rs"]
mod tests;
