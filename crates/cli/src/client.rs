// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Thin async client for the Runtime Control API socket. Every call opens
//! a fresh connection, writes one `Request`, reads one `Response`, and
//! disconnects, matching the daemon's one-request-per-connection model.

use std::path::PathBuf;

use chariot_wire::{
    read_message, write_message, FunctionInfo, JobState, ListenerInfo, LogLine, ProtocolError, Request, Response,
    ResponseData, RuntimeInspection, WireValue,
};
use thiserror::Error;
use tokio::net::UnixStream;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("could not reach chariotd at {path}: {source}")]
    Connect { path: PathBuf, #[source] source: std::io::Error },
    #[error(transparent)]
    Protocol(#[from] ProtocolError),
    #[error("{kind}: {message}")]
    Server { kind: String, message: String },
    #[error("unexpected response from chariotd: {0:?}")]
    Unexpected(Response),
}

pub struct DaemonClient {
    socket_path: PathBuf,
}

impl DaemonClient {
    pub fn new(socket_path: PathBuf) -> Self {
        Self { socket_path }
    }

    async fn connect(&self) -> Result<UnixStream, ClientError> {
        UnixStream::connect(&self.socket_path)
            .await
            .map_err(|source| ClientError::Connect { path: self.socket_path.clone(), source })
    }

    async fn send(&self, request: &Request) -> Result<Response, ClientError> {
        let mut stream = self.connect().await?;
        write_message(&mut stream, request).await?;
        let response = read_message(&mut stream).await?;
        Ok(response)
    }

    fn reject<T>(response: Response) -> Result<T, ClientError> {
        match response {
            Response::Error { kind, message } => Err(ClientError::Server { kind, message }),
            other => Err(ClientError::Unexpected(other)),
        }
    }

    fn ok_data(response: Response) -> Result<ResponseData, ClientError> {
        match response {
            Response::Ok { data } => Ok(data),
            other => Self::reject(other),
        }
    }

    pub async fn login(&self, client_name: &str, credentials: Option<String>) -> Result<String, ClientError> {
        let response = self.send(&Request::Login { client_name: client_name.to_string(), credentials }).await?;
        match Self::ok_data(response)? {
            ResponseData::SessionId { session_id } => Ok(session_id),
            other => Self::reject(Response::Ok { data: other }),
        }
    }

    pub async fn logout(&self, session_id: &str) -> Result<(), ClientError> {
        let response = self.send(&Request::Logout { session_id: session_id.to_string() }).await?;
        match Self::ok_data(response)? {
            ResponseData::Empty => Ok(()),
            other => Self::reject(Response::Ok { data: other }),
        }
    }

    pub async fn execute(&self, session_id: &str, source: &str) -> Result<WireValue, ClientError> {
        let response = self.send(&Request::Execute { session_id: session_id.to_string(), source: source.to_string() }).await?;
        match Self::ok_data(response)? {
            ResponseData::Value { value } => Ok(value),
            other => Self::reject(Response::Ok { data: other }),
        }
    }

    pub async fn execute_async(&self, session_id: &str, source: &str) -> Result<String, ClientError> {
        let response =
            self.send(&Request::ExecuteAsync { session_id: session_id.to_string(), source: source.to_string() }).await?;
        match Self::ok_data(response)? {
            ResponseData::JobStarted { job_id } => Ok(job_id),
            other => Self::reject(Response::Ok { data: other }),
        }
    }

    pub async fn stream_logs(
        &self,
        session_id: &str,
        job_id: &str,
        after_seq: Option<u64>,
    ) -> Result<(Vec<LogLine>, Option<u64>, bool), ClientError> {
        let response =
            self.send(&Request::StreamLogs { session_id: session_id.to_string(), job_id: job_id.to_string(), after_seq }).await?;
        match Self::ok_data(response)? {
            ResponseData::LogLines { lines, next_after_seq, done } => Ok((lines, next_after_seq, done)),
            other => Self::reject(Response::Ok { data: other }),
        }
    }

    pub async fn result(
        &self,
        session_id: &str,
        job_id: &str,
    ) -> Result<(JobState, Option<WireValue>, Option<String>), ClientError> {
        let response = self.send(&Request::Result { session_id: session_id.to_string(), job_id: job_id.to_string() }).await?;
        match Self::ok_data(response)? {
            ResponseData::JobStatus { state, value, error } => Ok((state, value, error)),
            other => Self::reject(Response::Ok { data: other }),
        }
    }

    pub async fn cancel_job(&self, session_id: &str, job_id: &str) -> Result<(), ClientError> {
        let response = self.send(&Request::CancelJob { session_id: session_id.to_string(), job_id: job_id.to_string() }).await?;
        match Self::ok_data(response)? {
            ResponseData::Empty => Ok(()),
            other => Self::reject(Response::Ok { data: other }),
        }
    }

    pub async fn inspect_runtime(&self, session_id: &str) -> Result<RuntimeInspection, ClientError> {
        let response = self.send(&Request::InspectRuntime { session_id: session_id.to_string() }).await?;
        match Self::ok_data(response)? {
            ResponseData::RuntimeInspection(report) => Ok(report),
            other => Self::reject(Response::Ok { data: other }),
        }
    }

    pub async fn list_functions(&self, session_id: &str) -> Result<Vec<String>, ClientError> {
        let response = self.send(&Request::ListFunctions { session_id: session_id.to_string() }).await?;
        match Self::ok_data(response)? {
            ResponseData::FunctionNames { names } => Ok(names),
            other => Self::reject(Response::Ok { data: other }),
        }
    }

    pub async fn get_function(&self, session_id: &str, name: &str) -> Result<(Vec<String>, String), ClientError> {
        let response = self.send(&Request::GetFunction { session_id: session_id.to_string(), name: name.to_string() }).await?;
        match Self::ok_data(response)? {
            ResponseData::FunctionDetail { params, body_source } => Ok((params, body_source)),
            other => Self::reject(Response::Ok { data: other }),
        }
    }

    pub async fn save_function(
        &self,
        session_id: &str,
        name: &str,
        params: Vec<String>,
        body_source: &str,
    ) -> Result<(), ClientError> {
        let response = self
            .send(&Request::SaveFunctions {
                session_id: session_id.to_string(),
                name: name.to_string(),
                params,
                body_source: body_source.to_string(),
            })
            .await?;
        match Self::ok_data(response)? {
            ResponseData::Empty => Ok(()),
            other => Self::reject(Response::Ok { data: other }),
        }
    }

    pub async fn load_functions(&self, session_id: &str) -> Result<Vec<FunctionInfo>, ClientError> {
        let response = self.send(&Request::LoadFunctions { session_id: session_id.to_string() }).await?;
        match Self::ok_data(response)? {
            ResponseData::FunctionList { functions } => Ok(functions),
            other => Self::reject(Response::Ok { data: other }),
        }
    }

    pub async fn delete_function(&self, session_id: &str, name: &str) -> Result<(), ClientError> {
        let response = self.send(&Request::DeleteFunction { session_id: session_id.to_string(), name: name.to_string() }).await?;
        match Self::ok_data(response)? {
            ResponseData::Empty => Ok(()),
            other => Self::reject(Response::Ok { data: other }),
        }
    }

    pub async fn listener_list(&self, session_id: &str) -> Result<Vec<ListenerInfo>, ClientError> {
        let response = self.send(&Request::ListenerList { session_id: session_id.to_string() }).await?;
        match Self::ok_data(response)? {
            ResponseData::ListenerList { listeners } => Ok(listeners),
            other => Self::reject(Response::Ok { data: other }),
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn listener_create(
        &self,
        session_id: &str,
        name: &str,
        script: String,
        on_start: String,
        on_exit: String,
        auto_start: bool,
    ) -> Result<Vec<ListenerInfo>, ClientError> {
        let response = self
            .send(&Request::ListenerCreate {
                session_id: session_id.to_string(),
                name: name.to_string(),
                script,
                on_start,
                on_exit,
                auto_start,
            })
            .await?;
        match Self::ok_data(response)? {
            ResponseData::ListenerList { listeners } => Ok(listeners),
            other => Self::reject(Response::Ok { data: other }),
        }
    }

    pub async fn listener_delete(&self, session_id: &str, name: &str) -> Result<(), ClientError> {
        let response = self.send(&Request::ListenerDelete { session_id: session_id.to_string(), name: name.to_string() }).await?;
        match Self::ok_data(response)? {
            ResponseData::Empty => Ok(()),
            other => Self::reject(Response::Ok { data: other }),
        }
    }

    pub async fn listener_start(&self, session_id: &str, name: &str) -> Result<Vec<ListenerInfo>, ClientError> {
        let response = self.send(&Request::ListenerStart { session_id: session_id.to_string(), name: name.to_string() }).await?;
        match Self::ok_data(response)? {
            ResponseData::ListenerList { listeners } => Ok(listeners),
            other => Self::reject(Response::Ok { data: other }),
        }
    }

    pub async fn listener_stop(&self, session_id: &str, name: &str) -> Result<Vec<ListenerInfo>, ClientError> {
        let response = self.send(&Request::ListenerStop { session_id: session_id.to_string(), name: name.to_string() }).await?;
        match Self::ok_data(response)? {
            ResponseData::ListenerList { listeners } => Ok(listeners),
            other => Self::reject(Response::Ok { data: other }),
        }
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
