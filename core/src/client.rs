//! Stateless HTTP request builder and response parser for the RiverMind API.
//!
//! # Design
//! `RiverMindClient` holds only its `ClientConfig` and carries no mutable
//! state between calls. Every operation is split into a `build_*` method that
//! produces an `HttpRequest` and a `parse_*` method that consumes an
//! `HttpResponse`. The generic pair `build_request` / `parse_json` implements
//! the shared contract; the per-route methods only pick path, method, and
//! body.

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::config::{set_header, ClientConfig};
use crate::error::ApiError;
use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::multipart::MultipartForm;
use crate::types::{EmotionRequest, VideoUpload};

pub const EMOTION_PATH: &str = "/emotion";
pub const DROWNING_PATH: &str = "/drowning";
pub const CLIMATE_PATH: &str = "/climate";
pub const SUGGESTIONS_PATH: &str = "/suggestions";

/// Everything except the RFC 3986 unreserved characters.
const QUERY_VALUE: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'.').remove(b'_').remove(b'~');

/// Request body accepted by `build_request`.
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    Json(Value),
    Multipart(MultipartForm),
}

/// Caller-supplied request configuration. `Default` is a bare GET.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequestOptions {
    pub method: HttpMethod,
    pub body: Option<RequestBody>,
    /// Applied last; replaces defaults with the same name (case-insensitive).
    pub headers: Vec<(String, String)>,
}

impl RequestOptions {
    pub fn get() -> Self {
        Self::default()
    }

    pub fn post_json(body: Value) -> Self {
        Self {
            method: HttpMethod::Post,
            body: Some(RequestBody::Json(body)),
            headers: Vec::new(),
        }
    }

    pub fn post_multipart(form: MultipartForm) -> Self {
        Self {
            method: HttpMethod::Post,
            body: Some(RequestBody::Multipart(form)),
            headers: Vec::new(),
        }
    }

    pub fn header(mut self, name: &str, value: &str) -> Self {
        self.headers.push((name.to_string(), value.to_string()));
        self
    }
}

/// Synchronous, stateless client for the RiverMind API.
///
/// Builds `HttpRequest` values and parses `HttpResponse` values without
/// touching the network.
#[derive(Debug, Clone, Default)]
pub struct RiverMindClient {
    config: ClientConfig,
}

impl RiverMindClient {
    pub fn new(base_url: &str) -> Self {
        Self::with_config(ClientConfig::new(base_url))
    }

    pub fn with_config(config: ClientConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Base address + `path`, with merged headers and the encoded body.
    ///
    /// Header precedence, lowest first: configured defaults, the body's own
    /// content type (multipart only), then `options.headers`.
    pub fn build_request(&self, path: &str, options: &RequestOptions) -> Result<HttpRequest, ApiError> {
        let mut headers = self.config.default_headers.clone();
        let body = match &options.body {
            None => None,
            Some(RequestBody::Json(value)) => {
                Some(serde_json::to_vec(value).map_err(|e| ApiError::SerializationError(e.to_string()))?)
            }
            Some(RequestBody::Multipart(form)) => {
                set_header(&mut headers, "content-type", &form.content_type());
                Some(form.encode())
            }
        };
        for (name, value) in &options.headers {
            set_header(&mut headers, name, value);
        }
        Ok(HttpRequest {
            method: options.method,
            url: format!("{}{path}", self.config.base_url),
            headers,
            body,
        })
    }

    /// Fail on non-2xx, otherwise decode the body as JSON.
    pub fn parse_json<T: DeserializeOwned>(&self, response: HttpResponse) -> Result<T, ApiError> {
        check_status(&response)?;
        serde_json::from_slice(&response.body).map_err(|e| ApiError::DecodeError(e.to_string()))
    }

    pub fn build_analyze_emotion(&self, text: &str) -> Result<HttpRequest, ApiError> {
        let body = serde_json::to_value(EmotionRequest {
            text: text.to_string(),
        })
        .map_err(|e| ApiError::SerializationError(e.to_string()))?;
        self.build_request(EMOTION_PATH, &RequestOptions::post_json(body))
    }

    /// Takes the upload by value so its bytes move into the form instead of
    /// being copied.
    pub fn build_detect_drowning(&self, video: VideoUpload) -> Result<HttpRequest, ApiError> {
        self.build_request(DROWNING_PATH, &RequestOptions::post_multipart(MultipartForm::video(video)))
    }

    pub fn build_climate_data(&self) -> Result<HttpRequest, ApiError> {
        self.build_request(CLIMATE_PATH, &RequestOptions::get())
    }

    pub fn build_suggestions(&self, user_id: &str) -> Result<HttpRequest, ApiError> {
        let path = format!(
            "{SUGGESTIONS_PATH}?user_id={}",
            utf8_percent_encode(user_id, QUERY_VALUE)
        );
        self.build_request(&path, &RequestOptions::get())
    }

    pub fn parse_analyze_emotion(&self, response: HttpResponse) -> Result<Value, ApiError> {
        self.parse_json(response)
    }

    pub fn parse_detect_drowning(&self, response: HttpResponse) -> Result<Value, ApiError> {
        self.parse_json(response)
    }

    pub fn parse_climate_data(&self, response: HttpResponse) -> Result<Value, ApiError> {
        self.parse_json(response)
    }

    pub fn parse_suggestions(&self, response: HttpResponse) -> Result<Value, ApiError> {
        self.parse_json(response)
    }
}

/// Map non-2xx statuses to `RequestFailed`.
fn check_status(response: &HttpResponse) -> Result<(), ApiError> {
    if response.is_success() {
        return Ok(());
    }
    Err(ApiError::RequestFailed {
        status: response.status,
        body: response.body_text(),
    })
}
