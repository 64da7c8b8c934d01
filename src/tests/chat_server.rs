mod support;

use axum::body::Body;
use axum::Router;
use ollama_batch::chat::ChatService;
use ollama_batch::server;
use ollama_batch::PipelineError;
use serde_json::{json, Value};
use std::sync::Arc;
use support::FakeClient;
use tower::ServiceExt; // for `oneshot`

fn app(client: FakeClient) -> Router {
    server::router(Arc::new(ChatService::new(Arc::new(client), "llama3.2-vision:latest")))
}

async fn send(app: &Router, req: http::Request<Body>) -> (http::StatusCode, Value) {
    let resp = app.clone().oneshot(req).await.unwrap();
    let status = resp.status();
    let body = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    let v = if body.is_empty() { Value::Null } else { serde_json::from_slice(&body).unwrap() };
    (status, v)
}

fn post(uri: &str, payload: Value) -> http::Request<Body> {
    http::Request::post(uri)
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_vec(&payload).unwrap()))
        .unwrap()
}

fn get(uri: &str) -> http::Request<Body> {
    http::Request::get(uri).body(Body::empty()).unwrap()
}

#[tokio::test]
async fn prompts_build_up_a_conversation() {
    let app = app(FakeClient::new(|req| Ok(format!("echo: {}", req.prompt))));

    let (status, first) = send(&app, post("/api/chat/prompt", json!({"prompt": "Hello"}))).await;
    assert_eq!(status, http::StatusCode::CREATED);
    assert_eq!(first["response"], "echo: Hello");
    let id = first["conversationId"].as_str().unwrap().to_string();

    let (status, _) = send(
        &app,
        post("/api/chat/prompt", json!({"conversationId": id, "prompt": "Again", "model": "llama3.2"})),
    )
    .await;
    assert_eq!(status, http::StatusCode::CREATED);

    let (status, conv) = send(&app, get(&format!("/api/chat/conversation/{id}"))).await;
    assert_eq!(status, http::StatusCode::OK);
    let prompts = conv["prompts"].as_array().unwrap();
    assert_eq!(prompts.len(), 2);
    assert_eq!(prompts[0]["model"], "llama3.2-vision:latest");
    assert_eq!(prompts[1]["model"], "llama3.2");
    assert_eq!(prompts[1]["response"], "echo: Again");
    assert_eq!(prompts[0]["id"], first["promptId"]);
}

#[tokio::test]
async fn prompt_validation_and_lookup_errors() {
    let client = Arc::new(FakeClient::always("hi"));
    let app = server::router(Arc::new(ChatService::new(client.clone(), "m")));

    let (status, body) = send(&app, post("/api/chat/prompt", json!({"prompt": "   "}))).await;
    assert_eq!(status, http::StatusCode::BAD_REQUEST);
    assert!(body["error"].as_str().unwrap().contains("prompt"));

    let (status, _) = send(&app, post("/api/chat/prompt", json!({}))).await;
    assert_eq!(status, http::StatusCode::BAD_REQUEST);

    let unknown = uuid::Uuid::new_v4().to_string();
    let (status, _) = send(&app, post("/api/chat/prompt", json!({"conversationId": unknown, "prompt": "x"}))).await;
    assert_eq!(status, http::StatusCode::NOT_FOUND);

    let (status, _) = send(&app, get("/api/chat/conversation/not-a-uuid")).await;
    assert_eq!(status, http::StatusCode::NOT_FOUND);
    let (status, _) = send(&app, get(&format!("/api/chat/conversation/{unknown}"))).await;
    assert_eq!(status, http::StatusCode::NOT_FOUND);

    // rejected requests never reach the model
    assert!(client.calls().is_empty());
}

#[tokio::test]
async fn failed_generation_is_a_bad_gateway() {
    let app = app(FakeClient::new(|_| Err(PipelineError::Transport("connection refused".into()))));
    let (status, body) = send(&app, post("/api/chat/prompt", json!({"prompt": "Hello"}))).await;
    assert_eq!(status, http::StatusCode::BAD_GATEWAY);
    assert!(body["error"].as_str().unwrap().contains("connection refused"));
}

#[tokio::test]
async fn sentiment_endpoint_returns_label() {
    let app = app(FakeClient::always("  Negative "));
    let (status, body) = send(
        &app,
        post("/api/chat/sentiment-analysis", json!({"phrase_to_analyze": "The servers are always down"})),
    )
    .await;
    assert_eq!(status, http::StatusCode::CREATED);
    assert_eq!(body["response"], "negative");
    assert_eq!(body["prompt"], "The servers are always down");

    let id = body["conversationId"].as_str().unwrap();
    let (_, conv) = send(&app, get(&format!("/api/chat/conversation/{id}"))).await;
    assert_eq!(conv["prompts"][0]["response"], "negative");

    let (status, _) = send(&app, post("/api/chat/sentiment-analysis", json!({"phrase_to_analyze": ""}))).await;
    assert_eq!(status, http::StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn sentiment_failure_is_reported_as_error_label() {
    let app = app(FakeClient::new(|_| Err(PipelineError::Transport("HTTP 500".into()))));
    let (status, body) =
        send(&app, post("/api/chat/sentiment-analysis", json!({"phrase_to_analyze": "fine I guess"}))).await;
    assert_eq!(status, http::StatusCode::CREATED);
    assert_eq!(body["response"], "error");
}

#[tokio::test]
async fn models_are_listed_or_fail_with_500() {
    let app_ok = app(FakeClient::always("").with_models(&["llama3.2:latest", "llava:7b"]));
    let (status, body) = send(&app_ok, get("/api/chat/models")).await;
    assert_eq!(status, http::StatusCode::OK);
    assert_eq!(body["models"][1]["name"], "llava:7b");

    let app_down = app(FakeClient::always(""));
    let (status, _) = send(&app_down, get("/api/chat/models")).await;
    assert_eq!(status, http::StatusCode::INTERNAL_SERVER_ERROR);
}
