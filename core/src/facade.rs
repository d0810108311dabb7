//! The single entry point for backend calls.
//!
//! # Design
//! `RiverMind` pairs a `RiverMindClient` with a `Transport`: build the
//! request, execute it, parse the response. Every operation returns
//! `Result<Value, ApiError>`. Callers that want the "log it and carry on with
//! no data" behaviour opt in through `LogFailure::or_log`, which emits exactly
//! one error event per failure.

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error};

use crate::client::{RequestOptions, RiverMindClient};
use crate::config::ClientConfig;
use crate::error::ApiError;
use crate::http::{HttpRequest, HttpResponse};
use crate::transport::{Transport, UreqTransport};
use crate::types::VideoUpload;

#[derive(Debug, Clone)]
pub struct RiverMind<T = UreqTransport> {
    client: RiverMindClient,
    transport: T,
}

impl RiverMind<UreqTransport> {
    /// Façade over ureq, honouring the config's timeout and response limit.
    pub fn new(config: ClientConfig) -> Self {
        let transport = UreqTransport::from_config(&config);
        Self::with_transport(config, transport)
    }
}

impl<T: Transport> RiverMind<T> {
    pub fn with_transport(config: ClientConfig, transport: T) -> Self {
        Self {
            client: RiverMindClient::with_config(config),
            transport,
        }
    }

    pub fn client(&self) -> &RiverMindClient {
        &self.client
    }

    /// Generic call: `path` is appended to the base address.
    pub fn fetch_data(&self, path: &str, options: &RequestOptions) -> Result<Value, ApiError> {
        self.fetch_json(path, options)
    }

    /// Like `fetch_data`, decoding into `R` instead of a raw JSON value.
    pub fn fetch_json<R: DeserializeOwned>(&self, path: &str, options: &RequestOptions) -> Result<R, ApiError> {
        let request = self.client.build_request(path, options)?;
        self.round_trip(request, |client, response| client.parse_json(response))
    }

    pub fn analyze_emotion(&self, text: &str) -> Result<Value, ApiError> {
        let request = self.client.build_analyze_emotion(text)?;
        self.round_trip(request, RiverMindClient::parse_analyze_emotion)
    }

    pub fn detect_drowning(&self, video: VideoUpload) -> Result<Value, ApiError> {
        let request = self.client.build_detect_drowning(video)?;
        self.round_trip(request, RiverMindClient::parse_detect_drowning)
    }

    pub fn climate_data(&self) -> Result<Value, ApiError> {
        let request = self.client.build_climate_data()?;
        self.round_trip(request, RiverMindClient::parse_climate_data)
    }

    pub fn suggestions(&self, user_id: &str) -> Result<Value, ApiError> {
        let request = self.client.build_suggestions(user_id)?;
        self.round_trip(request, RiverMindClient::parse_suggestions)
    }

    fn round_trip<R>(
        &self,
        request: HttpRequest,
        parse: impl FnOnce(&RiverMindClient, HttpResponse) -> Result<R, ApiError>,
    ) -> Result<R, ApiError> {
        debug!(method = %request.method, url = %request.url, "sending request");
        let response = self.transport.execute(request)?;
        debug!(status = response.status, bytes = response.body.len(), "received response");
        parse(&self.client, response)
    }
}

/// Turns a failed call into an absent result, logging the failure once.
pub trait LogFailure<T> {
    fn or_log(self, operation: &str) -> Option<T>;
}

impl<T> LogFailure<T> for Result<T, ApiError> {
    fn or_log(self, operation: &str) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(err) => {
                error!(operation, status = ?err.status(), "{err}");
                None
            }
        }
    }
}
