// src/server.rs
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use crate::chat::{ChatError, ChatService, Conversation, PromptReply, PromptRequest, SentimentReply, SentimentRequest};
use crate::types::ModelInfo;

impl IntoResponse for ChatError {
    fn into_response(self) -> Response {
        let status = match &self {
            ChatError::Invalid(_) => StatusCode::BAD_REQUEST,
            ChatError::NotFound(_) => StatusCode::NOT_FOUND,
            ChatError::Inference(_) => StatusCode::BAD_GATEWAY,
            ChatError::Models(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };
        if status.is_server_error() {
            warn!(error = %self, "chat request failed");
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}

#[derive(Serialize)]
pub struct ModelsResp {
    models: Vec<ModelInfo>,
}

#[axum::debug_handler]
pub async fn register_prompt(
    State(chat): State<Arc<ChatService>>,
    Json(req): Json<PromptRequest>,
) -> Result<(StatusCode, Json<PromptReply>), ChatError> {
    let reply = chat.register_prompt(req).await?;
    Ok((StatusCode::CREATED, Json(reply)))
}

pub async fn get_conversation(
    State(chat): State<Arc<ChatService>>,
    Path(id): Path<String>,
) -> Result<Json<Conversation>, ChatError> {
    Ok(Json(chat.conversation(&id).await?))
}

pub async fn list_models(State(chat): State<Arc<ChatService>>) -> Result<Json<ModelsResp>, ChatError> {
    Ok(Json(ModelsResp { models: chat.models().await? }))
}

pub async fn analyze_sentiment(
    State(chat): State<Arc<ChatService>>,
    Json(req): Json<SentimentRequest>,
) -> Result<(StatusCode, Json<SentimentReply>), ChatError> {
    let reply = chat.analyze_sentiment(req).await?;
    Ok((StatusCode::CREATED, Json(reply)))
}

pub fn router(chat: Arc<ChatService>) -> Router {
    let api = Router::new()
        .route("/prompt", post(register_prompt))
        .route("/conversation/{id}", get(get_conversation))
        .route("/models", get(list_models))
        .route("/sentiment-analysis", post(analyze_sentiment));
    Router::new().nest("/api/chat", api).with_state(chat)
}

pub async fn run_server(chat: ChatService, addr: &str) -> anyhow::Result<()> {
    let app = router(Arc::new(chat));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(addr = %listener.local_addr()?, "chat API listening");
    axum::serve(listener, app).await?;
    Ok(())
}
