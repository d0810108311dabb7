//! Error types for the RiverMind API client.
//!
//! # Design
//! `RequestFailed` and `DecodeError` are the two outcomes a reachable backend
//! can produce. The remaining variants cover failures before or around the
//! round-trip (encoding, network, local files, configuration).

use thiserror::Error;

use crate::types::ErrorBody;

/// Errors returned by `RiverMindClient` and the `RiverMind` façade.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with a non-2xx status.
    #[error("request failed with HTTP {status}: {body}")]
    RequestFailed { status: u16, body: String },

    /// The response body was not valid JSON (or not the expected shape).
    #[error("could not decode response body: {0}")]
    DecodeError(String),

    /// The request payload could not be serialized to JSON.
    #[error("serialization failed: {0}")]
    SerializationError(String),

    /// The request never produced a response (connection refused, timeout).
    #[error("transport error: {0}")]
    Transport(String),

    /// The file to upload could not be read.
    #[error("invalid upload: {0}")]
    InvalidUpload(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl ApiError {
    /// HTTP status for `RequestFailed`, `None` otherwise.
    pub fn status(&self) -> Option<u16> {
        match self {
            ApiError::RequestFailed { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// The backend's `{"error": "..."}` message, when the failure carries one.
    pub fn backend_message(&self) -> Option<String> {
        match self {
            ApiError::RequestFailed { body, .. } => serde_json::from_str::<ErrorBody>(body)
                .ok()
                .map(|b| b.error),
            _ => None,
        }
    }
}
