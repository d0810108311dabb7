use axum::body::Body;
use axum::http::{self, Request, StatusCode};
use http_body_util::BodyExt;
use mock_server::{app, app_with, Canned, DrowningReport, EmotionResult, Overrides};
use tower::ServiceExt;

async fn body_json<T: serde::de::DeserializeOwned>(response: axum::response::Response) -> T {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

async fn body_bytes(response: axum::response::Response) -> bytes::Bytes {
    response.into_body().collect().await.unwrap().to_bytes()
}

async fn error_message(response: axum::response::Response) -> String {
    let body: serde_json::Value = body_json(response).await;
    body["error"].as_str().unwrap().to_string()
}

fn json_request(method: &str, uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn get_request(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

/// Single-part multipart upload with the given field and file name.
fn upload_request(field: &str, file_name: &str, data: &[u8]) -> Request<Body> {
    let boundary = "test-boundary";
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{boundary}\r\n").as_bytes());
    body.extend_from_slice(
        format!("Content-Disposition: form-data; name=\"{field}\"; filename=\"{file_name}\"\r\n").as_bytes(),
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{boundary}--\r\n").as_bytes());

    Request::builder()
        .method("POST")
        .uri("/drowning")
        .header(
            http::header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={boundary}"),
        )
        .body(Body::from(body))
        .unwrap()
}

// --- emotion ---

#[tokio::test]
async fn emotion_classifies_text() {
    let resp = app()
        .oneshot(json_request("POST", "/emotion", r#"{"text":"I am happy"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let result: EmotionResult = body_json(resp).await;
    assert_eq!(result.emotion, "joy");
    assert_eq!(result.score, 0.9);
}

#[tokio::test]
async fn emotion_missing_text_returns_422() {
    let resp = app()
        .oneshot(json_request("POST", "/emotion", r#"{"words":"hi"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn emotion_rejects_get() {
    let resp = app().oneshot(get_request("/emotion")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}

// --- drowning ---

#[tokio::test]
async fn drowning_analyses_upload() {
    let resp = app()
        .oneshot(upload_request("video", "pool.mp4", &[10, 200, 30, 180, 90]))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let report: DrowningReport = body_json(resp).await;
    assert!((0.0..=50.0).contains(&report.temperature));
    assert!(!report.emotion.is_empty());
}

#[tokio::test]
async fn drowning_without_video_field_returns_400() {
    let resp = app()
        .oneshot(upload_request("clip", "pool.mp4", b"frames"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(resp).await, "No video file provided");
}

#[tokio::test]
async fn drowning_with_empty_file_name_returns_400() {
    let resp = app()
        .oneshot(upload_request("video", "", b"frames"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(resp).await, "No selected file");
}

#[tokio::test]
async fn drowning_rejects_non_video_extension() {
    let resp = app()
        .oneshot(upload_request("video", "notes.txt", b"frames"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(error_message(resp).await.starts_with("Invalid file type"));
}

#[tokio::test]
async fn drowning_rejects_empty_video() {
    let resp = app()
        .oneshot(upload_request("video", "pool.MOV", b""))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(resp).await, "Failed to read video frames");
}

// --- climate ---

#[tokio::test]
async fn climate_returns_history_and_current() {
    let resp = app().oneshot(get_request("/climate")).await.unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["history"].as_array().unwrap().len(), 12);
    assert!(body["current"]["temperature"].is_number());
}

// --- suggestions ---

#[tokio::test]
async fn suggestions_echo_user_id() {
    let resp = app()
        .oneshot(get_request("/suggestions?user_id=river%2042"))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let body: serde_json::Value = body_json(resp).await;
    assert_eq!(body["user_id"], "river 42");
    assert!(!body["suggestions"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn suggestions_without_user_id_returns_400() {
    let resp = app().oneshot(get_request("/suggestions")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert_eq!(error_message(resp).await, "user_id is required");
}

// --- overrides ---

#[tokio::test]
async fn override_replaces_route_reply() {
    let overrides = Overrides::default();
    overrides
        .write()
        .await
        .insert("/climate".to_string(), Canned::new(500, r#"{"error":"down"}"#));
    let router = app_with(overrides.clone());

    let resp = router.clone().oneshot(get_request("/climate")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        resp.headers()[http::header::CONTENT_TYPE],
        "application/json"
    );
    assert_eq!(error_message(resp).await, "down");

    // other routes keep their normal behaviour
    let resp = router.clone().oneshot(get_request("/suggestions?user_id=1")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);

    overrides.write().await.remove("/climate");
    let resp = router.oneshot(get_request("/climate")).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}

#[tokio::test]
async fn override_can_serve_malformed_json() {
    let overrides = Overrides::default();
    overrides
        .write()
        .await
        .insert("/emotion".to_string(), Canned::new(200, "{not json"));

    let resp = app_with(overrides)
        .oneshot(json_request("POST", "/emotion", r#"{"text":"hi"}"#))
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(&body_bytes(resp).await[..], b"{not json");
}
