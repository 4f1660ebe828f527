// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Responses `chariotd` sends back. Every reply has the uniform shape
//! `{"result": "OK"|"ERROR", ...}`; the payload varies with `data`.

use serde::{Deserialize, Serialize};

use crate::wire_value::WireValue;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum JobState {
    Queued,
    Running,
    Completed,
    Failed,
    Canceled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogLine {
    pub seq: u64,
    pub level: String,
    pub message: String,
    pub timestamp_ms: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ListenerStatus {
    Stopped,
    Running,
    Error,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListenerInfo {
    pub name: String,
    pub status: ListenerStatus,
    pub auto_start: bool,
    pub is_healthy: bool,
    pub start_time_ms: Option<u64>,
    pub last_active_ms: Option<u64>,
    pub error: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionInfo {
    pub name: String,
    pub params: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeInspection {
    pub variable_names: Vec<String>,
    pub function_names: Vec<String>,
    pub host_object_names: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind")]
pub enum ResponseData {
    Empty,
    SessionId { session_id: String },
    Value { value: WireValue },
    JobStarted { job_id: String },
    JobStatus { state: JobState, value: Option<WireValue>, error: Option<String> },
    LogLines { lines: Vec<LogLine>, next_after_seq: Option<u64>, done: bool },
    FunctionNames { names: Vec<String> },
    FunctionDetail { params: Vec<String>, body_source: String },
    FunctionList { functions: Vec<FunctionInfo> },
    ListenerList { listeners: Vec<ListenerInfo> },
    RuntimeInspection(RuntimeInspection),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "result")]
pub enum Response {
    #[serde(rename = "OK")]
    Ok { data: ResponseData },
    #[serde(rename = "ERROR")]
    Error { message: String, kind: String },
}

impl Response {
    pub fn ok(data: ResponseData) -> Self {
        Response::Ok { data }
    }

    pub fn error(kind: impl Into<String>, message: impl Into<String>) -> Self {
        Response::Error { kind: kind.into(), message: message.into() }
    }

    pub fn is_ok(&self) -> bool {
        matches!(self, Response::Ok { .. })
    }
}

#[cfg(test)]
#[path = "response_tests.rs"]
mod tests;
