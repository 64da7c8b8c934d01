use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    // Startup
    #[error("Missing required configuration: {0}")]
    ConfigMissing(&'static str),

    #[error("Input not found: {}", .0.display())]
    NotFound(PathBuf),

    // Request building
    #[error("Encoding failed: {0}")]
    Encoding(String),

    // Inference calls
    #[error("Inference request failed: {0}")]
    Transport(String),

    #[error("Unexpected inference response: {0}")]
    Parse(String),

    // Pass-through from dependencies
    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

impl From<reqwest::Error> for PipelineError {
    fn from(value: reqwest::Error) -> Self {
        if value.is_decode() {
            PipelineError::Parse(value.to_string())
        } else {
            PipelineError::Transport(value.to_string())
        }
    }
}
