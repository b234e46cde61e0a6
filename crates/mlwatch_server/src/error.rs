//! Error types for the servers and the agent.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mlwatch_core::CoreError;
use mlwatch_forward::ForwardError;
use serde::Serialize;
use std::net::SocketAddr;
use thiserror::Error;

/// Result type for server operations.
pub type ServerResult<T> = Result<T, ServerError>;

/// Errors that can occur while serving or running an agent.
#[derive(Error, Debug)]
pub enum ServerError {
    /// The listener could not bind.
    #[error("failed to bind {addr}: {source}")]
    Bind {
        /// Requested address.
        addr: SocketAddr,
        /// Underlying failure.
        #[source]
        source: std::io::Error,
    },

    /// Malformed request body.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// I/O error.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Tailing failed.
    #[error(transparent)]
    Core(#[from] CoreError),

    /// Forwarder setup or shutdown failed.
    #[error(transparent)]
    Forward(#[from] ForwardError),

    /// A server task panicked or was cancelled.
    #[error("task failed: {0}")]
    TaskFailed(String),
}

impl ServerError {
    /// Returns true if this is a client error (4xx).
    pub fn is_client_error(&self) -> bool {
        matches!(self, ServerError::InvalidRequest(_))
    }

    fn status(&self) -> StatusCode {
        if self.is_client_error() {
            StatusCode::BAD_REQUEST
        } else {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    error: String,
    status: u16,
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = ErrorBody {
            error: self.to_string(),
            status: status.as_u16(),
        };
        (status, axum::Json(body)).into_response()
    }
}
