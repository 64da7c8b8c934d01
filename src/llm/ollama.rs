use super::InferenceClient;
use crate::error::{PipelineError, Result};
use crate::types::{InferenceRequest, ModelInfo};
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Deserialize)]
struct GenerateResp {
    response: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TagsResp {
    #[serde(default)]
    models: Vec<ModelInfo>,
}

/// Client for an Ollama-compatible API. `base_url` already includes the
/// `/api` prefix, e.g. `http://localhost:11434/api`.
#[derive(Clone)]
pub struct OllamaClient {
    http: Client,
    base_url: String,
}

impl OllamaClient {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, base_url: base_url.trim_end_matches('/').to_string() })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn check(resp: reqwest::Response) -> Result<reqwest::Response> {
        let status = resp.status();
        if !status.is_success() {
            return Err(PipelineError::Transport(format!(
                "HTTP {} {}",
                status.as_u16(),
                status.canonical_reason().unwrap_or("")
            )));
        }
        Ok(resp)
    }
}

#[async_trait::async_trait]
impl InferenceClient for OllamaClient {
    async fn generate(&self, request: &InferenceRequest) -> Result<String> {
        let url = format!("{}/generate", self.base_url);
        debug!(%url, model = %request.model, "sending generate request");
        let resp = self.http.post(&url).json(request).send().await?;
        let body = Self::check(resp)?.bytes().await?;
        let parsed: GenerateResp = serde_json::from_slice(&body)
            .map_err(|e| PipelineError::Parse(format!("generate response is not JSON: {e}")))?;
        parsed
            .response
            .ok_or_else(|| PipelineError::Parse("generate response has no `response` field".into()))
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        let resp = self.http.get(format!("{}/tags", self.base_url)).send().await?;
        let body = Self::check(resp)?.bytes().await?;
        let parsed: TagsResp = serde_json::from_slice(&body)
            .map_err(|e| PipelineError::Parse(format!("tags response is not JSON: {e}")))?;
        Ok(parsed.models)
    }
}
