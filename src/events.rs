//! Ordered diagnostics of a run, mirrored to `tracing`.

use serde::Serialize;
use std::path::PathBuf;
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    NotADirectory,
    NotAFile,
    UnsupportedExtension,
    Unreadable,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum Event {
    GameStarted { appid: String, name: String, reviews: usize },
    /// An item failed and was counted as `error`.
    Sentinel { item: String, error: String },
    ImageAnalyzed { file_name: String },
    /// An item failed and was left out of the results.
    ItemDropped { item: String, error: String },
    Skipped { path: PathBuf, reason: SkipReason },
    RowSkipped { file: PathBuf, line: Option<u64>, error: String },
    ReportWritten { path: PathBuf },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Info,
    Warn,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub level: Level,
    #[serde(flatten)]
    pub event: Event,
}

#[derive(Debug, Default)]
pub struct EventLog {
    entries: Vec<Diagnostic>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: Event) {
        let level = match &event {
            Event::GameStarted { appid, name, reviews } => {
                info!(%appid, %name, reviews, "processing game");
                Level::Info
            }
            Event::ImageAnalyzed { file_name } => {
                info!(%file_name, "image analyzed");
                Level::Info
            }
            Event::ReportWritten { path } => {
                info!(path = %path.display(), "report written");
                Level::Info
            }
            Event::Sentinel { item, error } => {
                warn!(%item, %error, "inference failed, counted as error");
                Level::Warn
            }
            Event::ItemDropped { item, error } => {
                warn!(%item, %error, "inference failed, item skipped");
                Level::Warn
            }
            Event::RowSkipped { file, line, error } => {
                warn!(file = %file.display(), ?line, %error, "malformed row skipped");
                Level::Warn
            }
            Event::Skipped { path, reason } => {
                info!(path = %path.display(), ?reason, "entry skipped");
                Level::Info
            }
        };
        self.entries.push(Diagnostic { level, event });
    }

    pub fn entries(&self) -> &[Diagnostic] {
        &self.entries
    }

    pub fn events(&self) -> impl Iterator<Item = &Event> {
        self.entries.iter().map(|d| &d.event)
    }

    pub fn warnings(&self) -> usize {
        self.entries.iter().filter(|d| d.level == Level::Warn).count()
    }

    pub fn into_entries(self) -> Vec<Diagnostic> {
        self.entries
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keeps_order_and_levels() {
        let mut log = EventLog::new();
        log.push(Event::GameStarted { appid: "10".into(), name: "Counter-Strike".into(), reviews: 2 });
        log.push(Event::Sentinel { item: "10#0".into(), error: "HTTP 500".into() });
        log.push(Event::Skipped { path: "a/notes.txt".into(), reason: SkipReason::UnsupportedExtension });

        let levels: Vec<_> = log.entries().iter().map(|d| d.level).collect();
        assert_eq!(levels, vec![Level::Info, Level::Warn, Level::Info]);
        assert_eq!(log.warnings(), 1);
        assert!(matches!(log.events().nth(1), Some(Event::Sentinel { .. })));
    }

    #[test]
    fn serializes_flat() {
        let mut log = EventLog::new();
        log.push(Event::ItemDropped { item: "cat.png".into(), error: "no JSON object".into() });
        let v = serde_json::to_value(&log.into_entries()[0]).unwrap();
        assert_eq!(v["level"], "warn");
        assert_eq!(v["event"], "item_dropped");
        assert_eq!(v["item"], "cat.png");
    }
}
