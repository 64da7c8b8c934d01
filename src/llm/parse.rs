use crate::error::{PipelineError, Result};
use crate::types::Sentiment;
use serde_json::Value;

pub fn classify_label(raw: &str) -> Sentiment {
    match raw.trim().to_lowercase().as_str() {
        "positive" => Sentiment::Positive,
        "negative" => Sentiment::Negative,
        "neutral" => Sentiment::Neutral,
        _ => Sentiment::Error,
    }
}

/// Byte range of the first balanced `{...}` in `raw`. Braces inside JSON
/// string literals do not count.
fn first_object_span(raw: &str) -> Option<(usize, usize)> {
    let start = raw.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;
    for (i, b) in raw.bytes().enumerate().skip(start) {
        if in_string {
            match b {
                _ if escaped => escaped = false,
                b'\\' => escaped = true,
                b'"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match b {
            b'"' => in_string = true,
            b'{' => depth += 1,
            b'}' => {
                depth -= 1;
                if depth == 0 {
                    return Some((start, i + 1));
                }
            }
            _ => {}
        }
    }
    None
}

/// Pulls the first JSON object out of free-form model output.
pub fn extract_json_object(raw: &str) -> Result<Value> {
    let (start, end) = first_object_span(raw)
        .ok_or_else(|| PipelineError::Parse("response contains no complete JSON object".into()))?;
    serde_json::from_str(&raw[start..end]).map_err(|e| PipelineError::Parse(format!("invalid JSON object: {e}")))
}
