//! Gemini client against an in-process mock of the Generative Language API

mod common;

use axum::{
    extract::{Path, State},
    http::{HeaderMap, StatusCode},
    routing::post,
    Json, Router,
};
use parking_lot::Mutex;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use common::{build_course_store, TestEmbedder};
use compass_rag::config::LlmConfig;
use compass_rag::providers::{GeminiClient, LlmProvider};
use compass_rag::{Error, QueryPipeline};

#[derive(Default)]
struct MockGemini {
    requests: AtomicUsize,
    last_body: Mutex<Option<Value>>,
}

async fn generate_content(
    State(mock): State<Arc<MockGemini>>,
    Path(model_action): Path<String>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, Json<Value>) {
    mock.requests.fetch_add(1, Ordering::SeqCst);
    *mock.last_body.lock() = Some(body);

    if model_action.starts_with("slow-model") {
        tokio::time::sleep(Duration::from_secs(3)).await;
    }
    if model_action.starts_with("broken-model") {
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"error": {"status": "INTERNAL"}})),
        );
    }

    let key = headers
        .get("x-goog-api-key")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    match key {
        "good-key" => (
            StatusCode::OK,
            Json(json!({
                "candidates": [{
                    "content": {
                        "role": "model",
                        "parts": [{"text": "The midterm is "}, {"text": "in Week 8."}]
                    }
                }]
            })),
        ),
        "forbidden-key" => (
            StatusCode::FORBIDDEN,
            Json(json!({"error": {"status": "PERMISSION_DENIED"}})),
        ),
        _ => (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "error": {
                    "status": "INVALID_ARGUMENT",
                    "details": [{"reason": "API_KEY_INVALID"}]
                }
            })),
        ),
    }
}

async fn spawn_mock() -> (String, Arc<MockGemini>) {
    let mock = Arc::new(MockGemini::default());
    let app = Router::new()
        .route("/v1beta/models/:model_action", post(generate_content))
        .with_state(Arc::clone(&mock));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });

    (format!("http://{}/v1beta", addr), mock)
}

fn config(base_url: &str, model: &str) -> LlmConfig {
    LlmConfig {
        base_url: Some(base_url.to_string()),
        model: model.to_string(),
        timeout_secs: 1,
        ..LlmConfig::default()
    }
}

#[tokio::test]
async fn test_successful_generation_joins_parts() {
    let (base_url, mock) = spawn_mock().await;
    let client =
        GeminiClient::new(&config(&base_url, "gemini-2.5-flash"), Some("good-key".into())).unwrap();

    let text = client.complete("When is the midterm?", 0.0).await.unwrap();

    assert_eq!(text, "The midterm is in Week 8.");
    assert_eq!(mock.requests.load(Ordering::SeqCst), 1);

    let body = mock.last_body.lock().clone().unwrap();
    assert_eq!(body["contents"][0]["parts"][0]["text"], "When is the midterm?");
    assert_eq!(body["generationConfig"]["temperature"], 0.0);
}

#[tokio::test]
async fn test_invalid_key_is_credential_error() {
    let (base_url, _mock) = spawn_mock().await;
    let client =
        GeminiClient::new(&config(&base_url, "gemini-2.5-flash"), Some("wrong".into())).unwrap();

    let err = client.complete("hi", 0.0).await.unwrap_err();
    assert!(matches!(err, Error::Credential(_)));
}

#[tokio::test]
async fn test_forbidden_is_credential_error() {
    let (base_url, _mock) = spawn_mock().await;
    let client =
        GeminiClient::new(&config(&base_url, "gemini-2.5-flash"), Some("forbidden-key".into()))
            .unwrap();

    assert!(matches!(
        client.complete("hi", 0.0).await,
        Err(Error::Credential(_))
    ));
}

#[tokio::test]
async fn test_server_error_is_generation_error() {
    let (base_url, _mock) = spawn_mock().await;
    let client =
        GeminiClient::new(&config(&base_url, "broken-model"), Some("good-key".into())).unwrap();

    assert!(matches!(
        client.complete("hi", 0.0).await,
        Err(Error::Generation(_))
    ));
}

#[tokio::test]
async fn test_timeout_is_generation_error() {
    let (base_url, mock) = spawn_mock().await;
    let client = GeminiClient::new(&config(&base_url, "slow-model"), Some("good-key".into())).unwrap();

    let err = client.complete("hi", 0.0).await.unwrap_err();
    assert!(matches!(err, Error::Generation(_)));
    // Not retried
    assert_eq!(mock.requests.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn test_missing_key_sends_no_request() {
    let (base_url, mock) = spawn_mock().await;
    let dir = tempfile::tempdir().unwrap();
    let rag_config = build_course_store(dir.path()).await;

    let client = GeminiClient::new(&config(&base_url, "gemini-2.5-flash"), None).unwrap();
    let pipeline =
        QueryPipeline::with_providers(&rag_config, Arc::new(TestEmbedder::new()), Arc::new(client));

    let err = pipeline.answer_question("When is the midterm exam?").await.unwrap_err();

    assert!(matches!(err, Error::Credential(_)));
    assert!(err.user_message().contains("GEMINI_API_KEY"));
    assert_eq!(mock.requests.load(Ordering::SeqCst), 0);
}
