pub mod ollama;
pub mod parse;

use crate::error::Result;
use crate::types::{InferenceRequest, InferenceResult, ModelInfo};

pub use ollama::OllamaClient;

#[async_trait::async_trait]
pub trait InferenceClient: Send + Sync {
    /// One non-streamed generation; returns the model's raw text.
    async fn generate(&self, request: &InferenceRequest) -> Result<String>;
    async fn list_models(&self) -> Result<Vec<ModelInfo>>;
}

/// How the raw text of a response is turned into a result.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseKind {
    Label,
    Structured,
}

pub async fn infer(client: &dyn InferenceClient, request: &InferenceRequest, kind: ResponseKind) -> Result<InferenceResult> {
    let raw = client.generate(request).await?;
    Ok(match kind {
        ResponseKind::Label => InferenceResult::Label(parse::classify_label(&raw)),
        ResponseKind::Structured => InferenceResult::Structured(parse::extract_json_object(&raw)?),
    })
}
