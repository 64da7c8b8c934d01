#![allow(dead_code)]

use async_trait::async_trait;
use ollama_batch::config::{Settings, GAMES_FILE, IMAGES_SUBFOLDER, REVIEWS_FILE, STEAM_SUBFOLDER};
use ollama_batch::llm::InferenceClient;
use ollama_batch::types::{InferenceRequest, ModelInfo};
use ollama_batch::{PipelineError, Result};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

type Handler = Box<dyn Fn(&InferenceRequest) -> Result<String> + Send + Sync>;

pub struct FakeClient {
    // maps each request to the model's raw text (or a failure)
    handler: Handler,
    models: Option<Vec<ModelInfo>>,
    calls: Mutex<Vec<InferenceRequest>>,
}

impl FakeClient {
    pub fn new(handler: impl Fn(&InferenceRequest) -> Result<String> + Send + Sync + 'static) -> Self {
        Self { handler: Box::new(handler), models: None, calls: Mutex::new(Vec::new()) }
    }

    pub fn always(text: &'static str) -> Self {
        Self::new(move |_| Ok(text.to_string()))
    }

    pub fn with_models(mut self, names: &[&str]) -> Self {
        self.models = Some(
            names
                .iter()
                .map(|n| ModelInfo { name: n.to_string(), size: None, modified_at: None })
                .collect(),
        );
        self
    }

    pub fn calls(&self) -> Vec<InferenceRequest> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl InferenceClient for FakeClient {
    async fn generate(&self, request: &InferenceRequest) -> Result<String> {
        self.calls.lock().unwrap().push(request.clone());
        (self.handler)(request)
    }

    async fn list_models(&self) -> Result<Vec<ModelInfo>> {
        self.models.clone().ok_or_else(|| PipelineError::Transport("HTTP 500 Internal Server Error".into()))
    }
}

pub fn write_file(path: &Path, body: &[u8]) {
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, body).unwrap();
}

pub fn steam_fixture(data: &Path, games: &str, reviews: &str) {
    let dir = data.join(STEAM_SUBFOLDER);
    write_file(&dir.join(GAMES_FILE), games.as_bytes());
    write_file(&dir.join(REVIEWS_FILE), reviews.as_bytes());
}

pub fn image_root(data: &Path) -> PathBuf {
    data.join(IMAGES_SUBFOLDER)
}

pub fn settings_for(data: &Path, out: &Path) -> Settings {
    Settings {
        data_path: Some(data.to_path_buf()),
        ollama_url: Some("http://127.0.0.1:9/api".into()),
        text_model: Some("llama3.2".into()),
        vision_model: Some("llama3.2-vision".into()),
        output_dir: out.to_path_buf(),
        ..Settings::default()
    }
}

pub fn read_json(path: &Path) -> serde_json::Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}
