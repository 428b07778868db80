//! Error types for algoscope-vis.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

use algoscope_algorithms::GraphError;

/// Result type for server operations.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// Binding or serving failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A payload or visible state could not be encoded, or a command could not be decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("WebSocket error: {0}")]
    Socket(#[from] axum::Error),

    /// A trace request named a graph with dangling edges.
    #[error("invalid graph: {0}")]
    Graph(#[from] GraphError),

    #[error("invalid command: {0}")]
    InvalidCommand(String),

    /// The blocking task generating a trace panicked or was cancelled.
    #[error("trace generation failed: {0}")]
    Generation(#[from] tokio::task::JoinError),
}

impl Error {
    fn status(&self) -> StatusCode {
        match self {
            Error::Io(_) | Error::Json(_) | Error::Socket(_) | Error::Generation(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Error::Graph(_) | Error::InvalidCommand(_) => StatusCode::BAD_REQUEST,
        }
    }
}

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::warn!(%status, error = %self, "request rejected");
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
