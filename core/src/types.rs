//! Payload types exchanged with the RiverMind backend.
//!
//! # Design
//! Response payloads stay opaque (`serde_json::Value`); only the shapes the
//! client itself produces or inspects are typed here. The mock-server crate
//! defines its own copies so the two sides can drift only under test.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Body of `POST /emotion`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct EmotionRequest {
    pub text: String,
}

/// Failure body the backend sends alongside 4xx/5xx statuses.
#[derive(Debug, Clone, Deserialize)]
pub struct ErrorBody {
    pub error: String,
}

/// A video file sent as the `video` field of `POST /drowning`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VideoUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl VideoUpload {
    /// Wrap in-memory bytes; the content type follows the file extension.
    pub fn new(file_name: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        let file_name = file_name.into();
        let content_type = content_type_for(&file_name).to_string();
        Self {
            file_name,
            content_type,
            bytes: bytes.into(),
        }
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ApiError> {
        let path = path.as_ref();
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(|| ApiError::InvalidUpload(format!("no file name in {}", path.display())))?;
        let bytes = std::fs::read(path)
            .map_err(|e| ApiError::InvalidUpload(format!("{}: {e}", path.display())))?;
        Ok(Self::new(file_name, bytes))
    }
}

fn content_type_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase());
    match ext.as_deref() {
        Some("mp4") => "video/mp4",
        Some("avi") => "video/x-msvideo",
        Some("mov") => "video/quicktime",
        Some("mkv") => "video/x-matroska",
        _ => "application/octet-stream",
    }
}
