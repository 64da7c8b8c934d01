use serde::{Deserialize, Serialize};

/// One row of `games.csv`. Columns other than these are ignored.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Game {
    pub appid: String,
    pub name: String,
}

/// One row of `reviews.csv`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
    pub app_id: String,
    #[serde(default)]
    pub content: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct GameReviewPair {
    pub game_id: String,
    pub game_name: String,
    pub review_text: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ImageSample {
    pub category: String,
    pub file_name: String,
    pub image_bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DatasetRecord {
    GameReview(GameReviewPair),
    Image(ImageSample),
}

/// Body of `POST {base}/generate`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceRequest {
    pub model: String,
    pub prompt: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub images: Option<Vec<String>>, // base64, standard alphabet
    pub stream: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Negative,
    Neutral,
    Error,
}

impl Sentiment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Negative => "negative",
            Sentiment::Neutral => "neutral",
            Sentiment::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum InferenceResult {
    Label(Sentiment),
    Structured(serde_json::Value),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SentimentStats {
    pub positive: u32,
    pub negative: u32,
    pub neutral: u32,
    pub error: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GameStatistics {
    pub appid: String,
    pub name: String,
    pub statistics: SentimentStats,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentReport {
    pub timestamp: String, // RFC 3339, UTC, milliseconds
    pub games: Vec<GameStatistics>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageAnalysis {
    #[serde(rename = "fileName")]
    pub file_name: String,
    pub data: serde_json::Value,
}

/// Entry of `GET {base}/tags`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    pub name: String,
    #[serde(default)]
    pub size: Option<u64>,
    #[serde(default)]
    pub modified_at: Option<String>,
}
