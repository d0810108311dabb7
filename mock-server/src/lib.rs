use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{DefaultBodyLimit, Multipart, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tokio::{net::TcpListener, sync::RwLock};

pub const MAX_UPLOAD_BYTES: usize = 100 * 1024 * 1024;
const VIDEO_EXTENSIONS: [&str; 4] = [".mp4", ".avi", ".mov", ".mkv"];

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct EmotionRequest {
    pub text: String,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct EmotionResult {
    pub emotion: String,
    pub score: f64,
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct DrowningReport {
    pub temperature: f64,
    pub ph: f64,
    pub flow: f64,
    pub emotion: String,
}

#[derive(Deserialize)]
pub struct SuggestionQuery {
    pub user_id: Option<String>,
}

/// A fixed reply installed for one route, replacing its normal behaviour.
#[derive(Clone, Debug)]
pub struct Canned {
    pub status: StatusCode,
    pub body: String,
}

impl Canned {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status: StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            body: body.into(),
        }
    }
}

impl IntoResponse for Canned {
    fn into_response(self) -> Response {
        (self.status, [(header::CONTENT_TYPE, "application/json")], self.body).into_response()
    }
}

/// Route path (e.g. `/climate`) to its canned reply.
pub type Overrides = Arc<RwLock<HashMap<String, Canned>>>;

pub fn app() -> Router {
    app_with(Overrides::default())
}

/// Router whose routes answer from `overrides` when an entry exists. The map
/// is shared, so tests can change replies while the server is running.
pub fn app_with(overrides: Overrides) -> Router {
    Router::new()
        .route("/emotion", post(analyze_emotion))
        .route("/drowning", post(detect_drowning))
        .route("/climate", get(climate_data))
        .route("/suggestions", get(suggestions))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(overrides)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

pub async fn run_with(listener: TcpListener, overrides: Overrides) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(overrides)).await
}

async fn canned(overrides: &Overrides, route: &str) -> Option<Response> {
    let reply = overrides.read().await.get(route).cloned()?;
    tracing::debug!(route, status = %reply.status, "serving canned reply");
    Some(reply.into_response())
}

fn error_reply(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "error": message }))).into_response()
}

async fn analyze_emotion(State(overrides): State<Overrides>, Json(input): Json<EmotionRequest>) -> Response {
    if let Some(reply) = canned(&overrides, "/emotion").await {
        return reply;
    }
    Json(classify_text(&input.text)).into_response()
}

async fn detect_drowning(State(overrides): State<Overrides>, mut multipart: Multipart) -> Response {
    if let Some(reply) = canned(&overrides, "/drowning").await {
        return reply;
    }

    let mut video: Option<(String, Vec<u8>)> = None;
    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => return error_reply(StatusCode::BAD_REQUEST, &e.body_text()),
        };
        if field.name() != Some("video") {
            continue;
        }
        let file_name = field.file_name().unwrap_or_default().to_string();
        match field.bytes().await {
            Ok(bytes) => video = Some((file_name, bytes.to_vec())),
            Err(e) => return error_reply(StatusCode::BAD_REQUEST, &e.body_text()),
        }
    }

    let Some((file_name, bytes)) = video else {
        return error_reply(StatusCode::BAD_REQUEST, "No video file provided");
    };
    if file_name.is_empty() {
        return error_reply(StatusCode::BAD_REQUEST, "No selected file");
    }
    let lower = file_name.to_ascii_lowercase();
    if !VIDEO_EXTENSIONS.iter().any(|ext| lower.ends_with(ext)) {
        return error_reply(
            StatusCode::BAD_REQUEST,
            "Invalid file type. Please upload a video file (mp4, avi, mov, or mkv)",
        );
    }
    if bytes.is_empty() {
        return error_reply(StatusCode::BAD_REQUEST, "Failed to read video frames");
    }
    tracing::info!(file_name = %file_name, bytes = bytes.len(), "analysing upload");
    Json(analyze_video(&bytes)).into_response()
}

async fn climate_data(State(overrides): State<Overrides>) -> Response {
    if let Some(reply) = canned(&overrides, "/climate").await {
        return reply;
    }
    Json(climate_snapshot()).into_response()
}

async fn suggestions(State(overrides): State<Overrides>, Query(query): Query<SuggestionQuery>) -> Response {
    if let Some(reply) = canned(&overrides, "/suggestions").await {
        return reply;
    }
    match query.user_id.filter(|id| !id.is_empty()) {
        Some(user_id) => Json(json!({
            "user_id": user_id,
            "suggestions": [
                "Log today's river reading in your emotion diary",
                "Check the climate page for this month's water level",
                "Review drowning alerts near your monitored spots",
            ],
        }))
        .into_response(),
        None => error_reply(StatusCode::BAD_REQUEST, "user_id is required"),
    }
}

/// Keyword lexicon; the first matching group wins.
pub fn classify_text(text: &str) -> EmotionResult {
    const LEXICON: [(&str, f64, &[&str]); 4] = [
        ("joy", 0.9, &["happy", "glad", "joy", "great", "love"]),
        ("sadness", 0.8, &["sad", "down", "lonely", "cry"]),
        ("anger", 0.8, &["angry", "mad", "furious", "hate"]),
        ("fear", 0.7, &["afraid", "scared", "worried", "anxious"]),
    ];
    let lower = text.to_lowercase();
    let words: Vec<&str> = lower.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()).collect();
    for (emotion, score, keywords) in LEXICON {
        if words.iter().any(|w| keywords.contains(w)) {
            return EmotionResult {
                emotion: emotion.to_string(),
                score,
            };
        }
    }
    EmotionResult {
        emotion: "neutral".to_string(),
        score: 0.5,
    }
}

/// Derive river readings from raw video bytes: brightness stands in for
/// temperature, byte spread for clarity (pH), and byte-to-byte change for flow.
pub fn analyze_video(bytes: &[u8]) -> DrowningReport {
    let n = bytes.len().max(1) as f64;
    let mean = bytes.iter().map(|&b| b as f64).sum::<f64>() / n;
    let variance = bytes.iter().map(|&b| (b as f64 - mean).powi(2)).sum::<f64>() / n;
    let change = bytes.windows(2).map(|w| (w[0] as f64 - w[1] as f64).abs()).sum::<f64>() / n;

    let temperature = mean / 255.0 * 50.0;
    let ph = (5.5 + 3.0 * variance.sqrt() / 128.0).clamp(0.0, 14.0);
    let flow = (change / 255.0 * 100.0).clamp(0.0, 100.0);
    DrowningReport {
        temperature,
        ph,
        flow,
        emotion: river_emotion(temperature, ph, flow).to_string(),
    }
}

pub fn river_emotion(temperature: f64, ph: f64, flow: f64) -> &'static str {
    if temperature > 35.0 && flow > 80.0 {
        "angry"
    } else if !(5.0..=9.0).contains(&ph) {
        "sad"
    } else if flow > 90.0 && (25.0..=40.0).contains(&temperature) {
        "excited"
    } else if temperature < 10.0 && flow < 30.0 {
        "calm"
    } else if (20.0..=30.0).contains(&temperature) && (6.5..=8.5).contains(&ph) && (40.0..=60.0).contains(&flow) {
        "happy"
    } else {
        "neutral"
    }
}

/// Twelve monthly readings with a fixed seasonal curve, plus the latest one
/// as `current`.
pub fn climate_snapshot() -> Value {
    let history: Vec<Value> = (0..12)
        .map(|month| {
            let phase = (month as f64 / 12.0) * std::f64::consts::TAU;
            let temperature = 25.0 + 5.0 * phase.sin();
            let water_level = 100.0 + 10.0 * phase.cos();
            json!({
                "month": month + 1,
                "temperature": round2(temperature),
                "water_level": round2(water_level),
                "pollution_level": round2(water_level * 0.5),
            })
        })
        .collect();
    let current = history.last().cloned().unwrap_or(Value::Null);
    json!({ "current": current, "history": history })
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_happy_text_as_joy() {
        let result = classify_text("I am happy");
        assert_eq!(result.emotion, "joy");
        assert_eq!(result.score, 0.9);
    }

    #[test]
    fn classify_unknown_text_as_neutral() {
        assert_eq!(classify_text("the river is wide").emotion, "neutral");
        assert_eq!(classify_text("").emotion, "neutral");
    }

    #[test]
    fn classify_matches_whole_words_only() {
        assert_eq!(classify_text("madrid").emotion, "neutral");
        assert_eq!(classify_text("So MAD today!").emotion, "anger");
    }

    #[test]
    fn river_emotion_thresholds() {
        assert_eq!(river_emotion(36.0, 7.0, 85.0), "angry");
        assert_eq!(river_emotion(20.0, 4.0, 50.0), "sad");
        assert_eq!(river_emotion(30.0, 7.0, 95.0), "excited");
        assert_eq!(river_emotion(5.0, 7.0, 10.0), "calm");
        assert_eq!(river_emotion(25.0, 7.0, 50.0), "happy");
        assert_eq!(river_emotion(15.0, 7.0, 70.0), "neutral");
    }

    #[test]
    fn analyze_video_stays_in_range() {
        let report = analyze_video(&[0, 255, 0, 255, 128]);
        assert!((0.0..=50.0).contains(&report.temperature));
        assert!((0.0..=14.0).contains(&report.ph));
        assert!((0.0..=100.0).contains(&report.flow));
    }

    #[test]
    fn analyze_still_dark_video_is_calm() {
        let report = analyze_video(&[0u8; 64]);
        assert_eq!(report.temperature, 0.0);
        assert_eq!(report.flow, 0.0);
        assert_eq!(report.emotion, "calm");
    }

    #[test]
    fn climate_snapshot_has_twelve_months() {
        let snapshot = climate_snapshot();
        let history = snapshot["history"].as_array().unwrap();
        assert_eq!(history.len(), 12);
        assert_eq!(snapshot["current"], history[11]);
        assert_eq!(history[0]["temperature"], 25.0);
        assert_eq!(history[0]["water_level"], 110.0);
        assert_eq!(history[0]["pollution_level"], 55.0);
    }

    #[test]
    fn canned_falls_back_to_500_on_bad_status() {
        assert_eq!(Canned::new(42, "").status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(Canned::new(503, "").status, StatusCode::SERVICE_UNAVAILABLE);
    }
}
