//! Run configuration, built once in `main` and passed to each component.

use crate::error::{PipelineError, Result};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const ENV_DATA_PATH: &str = "DATA_PATH";
pub const ENV_OLLAMA_URL: &str = "CHAT_API_OLLAMA_URL";
pub const ENV_TEXT_MODEL: &str = "CHAT_API_OLLAMA_MODEL_TEXT";
pub const ENV_VISION_MODEL: &str = "CHAT_API_OLLAMA_MODEL_VISION";

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1000);
pub const DEFAULT_CHAT_MODEL: &str = "llama3.2-vision:latest";

pub const STEAM_SUBFOLDER: &str = "steamreviews";
pub const GAMES_FILE: &str = "games.csv";
pub const REVIEWS_FILE: &str = "reviews.csv";
pub const IMAGES_SUBFOLDER: &str = "imatges/animals";
pub const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "gif"];

pub const SENTIMENT_REPORT_FILE: &str = "sentiment_analysis.json";
pub const VISION_REPORT_FILE: &str = "image_classification.json";

/// Caps on how much of a dataset a run touches. `None` means no cap.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Limits {
    pub max_games: Option<usize>,
    pub max_reviews_per_game: Option<usize>,
    pub max_category_dirs: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct Settings {
    pub data_path: Option<PathBuf>,
    pub ollama_url: Option<String>,
    pub text_model: Option<String>,
    pub vision_model: Option<String>,
    pub output_dir: PathBuf,
    pub timeout: Duration,
    pub limits: Limits,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            data_path: None,
            ollama_url: None,
            text_model: None,
            vision_model: None,
            output_dir: PathBuf::from("./data"),
            timeout: DEFAULT_TIMEOUT,
            limits: Limits::default(),
        }
    }
}

fn required<'a, T: ?Sized>(value: Option<&'a T>, name: &'static str) -> Result<&'a T>
where
    T: IsBlank,
{
    match value {
        Some(v) if !v.is_blank() => Ok(v),
        _ => Err(PipelineError::ConfigMissing(name)),
    }
}

trait IsBlank {
    fn is_blank(&self) -> bool;
}

impl IsBlank for str {
    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

impl IsBlank for Path {
    fn is_blank(&self) -> bool {
        self.as_os_str().is_empty()
    }
}

impl Settings {
    pub fn data_path(&self) -> Result<&Path> {
        required(self.data_path.as_deref(), ENV_DATA_PATH)
    }

    pub fn ollama_url(&self) -> Result<&str> {
        required(self.ollama_url.as_deref(), ENV_OLLAMA_URL)
    }

    pub fn text_model(&self) -> Result<&str> {
        required(self.text_model.as_deref(), ENV_TEXT_MODEL)
    }

    pub fn vision_model(&self) -> Result<&str> {
        required(self.vision_model.as_deref(), ENV_VISION_MODEL)
    }

    /// Everything the sentiment batch needs, checked before any I/O.
    pub fn validate_sentiment(&self) -> Result<()> {
        self.data_path()?;
        self.ollama_url()?;
        self.text_model()?;
        Ok(())
    }

    pub fn validate_vision(&self) -> Result<()> {
        self.data_path()?;
        self.ollama_url()?;
        self.vision_model()?;
        Ok(())
    }

    pub fn sentiment_report_path(&self) -> PathBuf {
        self.output_dir.join(SENTIMENT_REPORT_FILE)
    }

    pub fn vision_report_path(&self) -> PathBuf {
        self.output_dir.join(VISION_REPORT_FILE)
    }
}
