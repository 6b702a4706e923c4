//! Web UI and JSON API routes

mod common;

use axum::{
    body::{to_bytes, Body},
    http::{header, Request, StatusCode},
    Router,
};
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;

use common::{build_course_store, test_config, ScriptedLlm, TestEmbedder};
use compass_rag::server::{build_router, state::AppState, CompassServer};
use compass_rag::{QueryPipeline, RagConfig};

fn app(config: RagConfig, llm: ScriptedLlm) -> Router {
    let pipeline =
        QueryPipeline::with_providers(&config, Arc::new(TestEmbedder::new()), Arc::new(llm));
    build_router(AppState::from_pipeline(config, pipeline))
}

async fn body_string(response: axum::response::Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

fn json_query(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/query")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn test_health() {
    let dir = tempfile::tempdir().unwrap();
    let response = app(test_config(dir.path()), ScriptedLlm::course_assistant())
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_string(response).await, "OK");
}

#[tokio::test]
async fn test_index_shows_form() {
    let dir = tempfile::tempdir().unwrap();
    let response = app(test_config(dir.path()), ScriptedLlm::course_assistant())
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains(r#"<form method="post" action="/ask">"#));
    assert!(!html.contains("is not set"));
}

#[tokio::test]
async fn test_index_warns_without_credential() {
    let dir = tempfile::tempdir().unwrap();
    let response = app(test_config(dir.path()), ScriptedLlm::without_key())
        .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
        .await
        .unwrap();

    let html = body_string(response).await;
    assert!(html.contains("GEMINI_API_KEY is not set"));
}

#[tokio::test]
async fn test_ask_form_renders_answer_and_sources() {
    let dir = tempfile::tempdir().unwrap();
    let config = build_course_store(dir.path()).await;
    let response = app(config, ScriptedLlm::course_assistant())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/ask")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("question=When+is+the+midterm+exam%3F"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("held in Week 8"));
    assert!(html.contains("Source: docs/syllabus.pdf (Page: 2)"));
    assert!(html.contains(r#"value="When is the midterm exam?""#));
}

#[tokio::test]
async fn test_ask_form_shows_empty_store_panel() {
    let dir = tempfile::tempdir().unwrap();
    let response = app(test_config(dir.path()), ScriptedLlm::course_assistant())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/ask")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("question=When+is+the+midterm%3F"))
                .unwrap(),
        )
        .await
        .unwrap();

    let html = body_string(response).await;
    assert!(html.contains("panel error empty_store"));
    assert!(html.contains("compass-ingest"));
}

#[tokio::test]
async fn test_ask_form_shows_generation_error_panel() {
    let dir = tempfile::tempdir().unwrap();
    let config = build_course_store(dir.path()).await;
    let response = app(config, ScriptedLlm::failing("upstream 503"))
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/ask")
                .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
                .body(Body::from("question=When+is+the+midterm%3F"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let html = body_string(response).await;
    assert!(html.contains("panel error generation_error"));
    assert!(html.contains("Could not generate an answer"));
    assert!(html.contains("upstream 503"));
    assert!(!html.contains("panel answer"));
}

#[tokio::test]
async fn test_api_query() {
    let dir = tempfile::tempdir().unwrap();
    let config = build_course_store(dir.path()).await;
    let response = app(config, ScriptedLlm::course_assistant())
        .oneshot(json_query(json!({"question": "When is the midterm exam?", "top_k": 2})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert!(body["answer"].as_str().unwrap().contains("Week 8"));
    assert_eq!(body["chunks_retrieved"], 2);
    assert_eq!(body["sources"].as_array().unwrap().len(), 2);
    assert_eq!(body["sources"][0]["page"], 2);
}

#[tokio::test]
async fn test_api_query_empty_store() {
    let dir = tempfile::tempdir().unwrap();
    let response = app(test_config(dir.path()), ScriptedLlm::course_assistant())
        .oneshot(json_query(json!({"question": "When is the midterm exam?"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["error"]["type"], "empty_store");
}

#[tokio::test]
async fn test_api_query_missing_credential() {
    let dir = tempfile::tempdir().unwrap();
    let config = build_course_store(dir.path()).await;
    let response = app(config, ScriptedLlm::without_key())
        .oneshot(json_query(json!({"question": "When is the midterm exam?"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["error"]["type"], "credential_error");
}

#[tokio::test]
async fn test_api_query_blank_question() {
    let dir = tempfile::tempdir().unwrap();
    let response = app(test_config(dir.path()), ScriptedLlm::course_assistant())
        .oneshot(json_query(json!({"question": "  "})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_api_query_generation_failure() {
    let dir = tempfile::tempdir().unwrap();
    let config = build_course_store(dir.path()).await;
    let response = app(config, ScriptedLlm::failing("upstream 503"))
        .oneshot(json_query(json!({"question": "When is the midterm exam?"})))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let body: Value = serde_json::from_str(&body_string(response).await).unwrap();
    assert_eq!(body["error"]["type"], "generation_error");
    assert!(body["error"]["message"].as_str().unwrap().contains("upstream 503"));
}

#[test]
fn test_server_address_from_state() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = test_config(dir.path());
    config.server.host = "127.0.0.1".to_string();
    config.server.port = 8090;
    let pipeline = QueryPipeline::with_providers(
        &config,
        Arc::new(TestEmbedder::new()),
        Arc::new(ScriptedLlm::course_assistant()),
    );

    let server = CompassServer::from_state(AppState::from_pipeline(config, pipeline));
    assert_eq!(server.address(), "127.0.0.1:8090");
}
