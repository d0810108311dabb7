//! Synchronous API client for the RiverMind backend.
//!
//! # Overview
//! Wraps the four backend operations (emotion analysis, drowning detection
//! upload, climate data, suggestions) behind one façade with a uniform error
//! policy: non-2xx statuses become `ApiError::RequestFailed`, malformed bodies
//! become `ApiError::DecodeError`.
//!
//! # Design
//! - `RiverMindClient` is stateless: it holds only its `ClientConfig`, builds
//!   `HttpRequest` values and parses `HttpResponse` values (host-does-IO).
//! - `Transport` executes requests; `UreqTransport` is the blocking default.
//! - `RiverMind` ties the two together and is the entry point callers use.
//! - `LogFailure::or_log` converts a failure into a logged `None` for callers
//!   that only care whether data arrived.

pub mod client;
pub mod config;
pub mod error;
pub mod facade;
pub mod http;
pub mod multipart;
pub mod transport;
pub mod types;

pub use client::{RequestBody, RequestOptions, RiverMindClient};
pub use config::{ClientConfig, DEFAULT_BASE_URL};
pub use error::ApiError;
pub use facade::{LogFailure, RiverMind};
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use multipart::{MultipartForm, Part};
pub use transport::{Transport, UreqTransport};
pub use types::{EmotionRequest, ErrorBody, VideoUpload};
