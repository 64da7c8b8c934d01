//! In-memory conversations behind the chat routes.

use crate::error::PipelineError;
use crate::llm::{infer, InferenceClient, ResponseKind};
use crate::prompts::sentiment_request;
use crate::types::{InferenceRequest, InferenceResult, ModelInfo, Sentiment};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{info, warn};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptEntry {
    pub id: Uuid,
    pub prompt: String,
    pub response: String,
    pub model: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Conversation {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
    pub prompts: Vec<PromptEntry>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptRequest {
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub prompt: Option<String>,
    pub model: Option<String>,
    #[serde(default)]
    pub stream: bool,
}

#[derive(Debug, Default, Deserialize)]
pub struct SentimentRequest {
    #[serde(rename = "conversationId")]
    pub conversation_id: Option<String>,
    #[serde(default)]
    pub phrase_to_analyze: Option<String>,
    pub model: Option<String>,
    #[serde(default)]
    pub stream: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PromptReply {
    pub conversation_id: Uuid,
    pub prompt_id: Uuid,
    pub prompt: String,
    pub response: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SentimentReply {
    pub conversation_id: Uuid,
    pub prompt_id: Uuid,
    pub prompt: String,
    pub response: Sentiment,
    pub message: String,
}

#[derive(Error, Debug)]
pub enum ChatError {
    #[error("{0}")]
    Invalid(String),

    #[error("Conversation not found: {0}")]
    NotFound(String),

    #[error("Inference failed: {0}")]
    Inference(PipelineError),

    #[error("Could not list models: {0}")]
    Models(PipelineError),
}

// the store lock is never held across an inference call
pub struct ChatService {
    client: Arc<dyn InferenceClient>,
    default_model: String,
    conversations: RwLock<HashMap<Uuid, Conversation>>,
}

fn non_blank(value: Option<String>, what: &str) -> Result<String, ChatError> {
    match value {
        Some(v) if !v.trim().is_empty() => Ok(v),
        _ => Err(ChatError::Invalid(format!("{what} is required"))),
    }
}

impl ChatService {
    pub fn new(client: Arc<dyn InferenceClient>, default_model: impl Into<String>) -> Self {
        Self { client, default_model: default_model.into(), conversations: RwLock::new(HashMap::new()) }
    }

    /// `None` means a new conversation will be created on append.
    async fn existing_conversation(&self, id: Option<&str>) -> Result<Option<Uuid>, ChatError> {
        let Some(raw) = id else {
            return Ok(None);
        };
        let id = Uuid::parse_str(raw).map_err(|_| ChatError::NotFound(raw.to_string()))?;
        if !self.conversations.read().await.contains_key(&id) {
            return Err(ChatError::NotFound(raw.to_string()));
        }
        Ok(Some(id))
    }

    async fn append(&self, id: Option<Uuid>, entry: PromptEntry) -> Uuid {
        let id = id.unwrap_or_else(Uuid::new_v4);
        let mut store = self.conversations.write().await;
        let conversation = store.entry(id).or_insert_with(|| Conversation {
            id,
            created_at: Utc::now(),
            prompts: Vec::new(),
        });
        conversation.prompts.push(entry);
        id
    }

    fn model_or_default(&self, model: Option<String>) -> String {
        model.filter(|m| !m.trim().is_empty()).unwrap_or_else(|| self.default_model.clone())
    }

    pub async fn register_prompt(&self, req: PromptRequest) -> Result<PromptReply, ChatError> {
        let prompt = non_blank(req.prompt, "prompt")?;
        let conversation = self.existing_conversation(req.conversation_id.as_deref()).await?;
        let model = self.model_or_default(req.model);
        if req.stream {
            info!("streaming requested; answering with a single response");
        }

        let request = InferenceRequest { model: model.clone(), prompt: prompt.clone(), images: None, stream: false };
        let response = self.client.generate(&request).await.map_err(ChatError::Inference)?;

        let prompt_id = Uuid::new_v4();
        let entry = PromptEntry {
            id: prompt_id,
            prompt: prompt.clone(),
            response: response.clone(),
            model,
            created_at: Utc::now(),
        };
        let conversation_id = self.append(conversation, entry).await;
        Ok(PromptReply { conversation_id, prompt_id, prompt, response })
    }

    pub async fn analyze_sentiment(&self, req: SentimentRequest) -> Result<SentimentReply, ChatError> {
        let phrase = non_blank(req.phrase_to_analyze, "phrase_to_analyze")?;
        let conversation = self.existing_conversation(req.conversation_id.as_deref()).await?;
        let model = self.model_or_default(req.model);

        let request = sentiment_request(&model, &phrase);
        let label = match infer(self.client.as_ref(), &request, ResponseKind::Label).await {
            Ok(InferenceResult::Label(label)) => label,
            Ok(InferenceResult::Structured(_)) => Sentiment::Error,
            Err(e) => {
                warn!(error = %e, "sentiment inference failed, answering with error label");
                Sentiment::Error
            }
        };

        let prompt_id = Uuid::new_v4();
        let entry = PromptEntry {
            id: prompt_id,
            prompt: phrase.clone(),
            response: label.as_str().to_string(),
            model,
            created_at: Utc::now(),
        };
        let conversation_id = self.append(conversation, entry).await;
        Ok(SentimentReply {
            conversation_id,
            prompt_id,
            prompt: phrase,
            response: label,
            message: "Sentiment analysis completed".into(),
        })
    }

    pub async fn conversation(&self, id: &str) -> Result<Conversation, ChatError> {
        let parsed = Uuid::parse_str(id).map_err(|_| ChatError::NotFound(id.to_string()))?;
        self.conversations
            .read()
            .await
            .get(&parsed)
            .cloned()
            .ok_or_else(|| ChatError::NotFound(id.to_string()))
    }

    pub async fn models(&self) -> Result<Vec<ModelInfo>, ChatError> {
        self.client.list_models().await.map_err(ChatError::Models)
    }
}
