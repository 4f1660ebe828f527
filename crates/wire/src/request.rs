// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Requests a client may send to `chariotd` over the session socket.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Request {
    Login { client_name: String, credentials: Option<String> },
    Logout { session_id: String },
    Execute { session_id: String, source: String },
    ExecuteAsync { session_id: String, source: String },
    StreamLogs { session_id: String, job_id: String, after_seq: Option<u64> },
    Result { session_id: String, job_id: String },
    CancelJob { session_id: String, job_id: String },
    InspectRuntime { session_id: String },
    ListFunctions { session_id: String },
    GetFunction { session_id: String, name: String },
    SaveFunctions { session_id: String, name: String, params: Vec<String>, body_source: String },
    LoadFunctions { session_id: String },
    DeleteFunction { session_id: String, name: String },
    ListenerList { session_id: String },
    ListenerCreate {
        session_id: String,
        name: String,
        script: String,
        on_start: String,
        on_exit: String,
        auto_start: bool,
    },
    ListenerDelete { session_id: String, name: String },
    ListenerStart { session_id: String, name: String },
    ListenerStop { session_id: String, name: String },
}
