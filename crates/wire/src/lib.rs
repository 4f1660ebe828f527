// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! chariot-wire: the Runtime Control API's request/response types and its
//! length-prefixed JSON framing over the session socket.

pub mod codec;
pub mod error;
pub mod request;
pub mod response;
pub mod wire_value;

pub use codec::{decode, encode, read_message, read_request, write_message, write_response, MAX_FRAME_BYTES};
pub use error::ProtocolError;
pub use request::Request;
pub use response::{FunctionInfo, JobState, ListenerInfo, ListenerStatus, LogLine, Response, ResponseData, RuntimeInspection};
pub use wire_value::WireValue;
