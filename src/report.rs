use crate::error::Result;
use crate::types::{GameStatistics, SentimentReport};
use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::fs;
use std::path::Path;

pub fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

impl SentimentReport {
    pub fn new(games: Vec<GameStatistics>) -> Self {
        Self::at(Utc::now(), games)
    }

    pub fn at(at: DateTime<Utc>, games: Vec<GameStatistics>) -> Self {
        Self { timestamp: timestamp(at), games }
    }
}

/// Writes `value` as pretty JSON, replacing any existing file and creating
/// missing parent directories.
pub fn write_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    let body = serde_json::to_string_pretty(value)?;
    fs::write(path, body)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SentimentStats;
    use chrono::TimeZone;

    #[test]
    fn timestamp_matches_iso_millis() {
        let at = Utc.with_ymd_and_hms(2024, 3, 5, 7, 8, 9).unwrap();
        assert_eq!(timestamp(at), "2024-03-05T07:08:09.000Z");
    }

    #[test]
    fn creates_parents_and_overwrites() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("nested/out/report.json");
        write_json(&path, &vec![1, 2, 3]).unwrap();
        let report = SentimentReport::at(
            Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap(),
            vec![GameStatistics { appid: "10".into(), name: "Counter-Strike".into(), statistics: SentimentStats::default() }],
        );
        write_json(&path, &report).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("{\n  \"timestamp\": \"2024-01-01T00:00:00.000Z\""));
        let back: SentimentReport = serde_json::from_str(&text).unwrap();
        assert_eq!(back, report);
    }

    #[test]
    fn unwritable_target_is_an_error() {
        let tmp = tempfile::tempdir().unwrap();
        // the directory itself is the target path
        assert!(write_json(tmp.path(), &"x").is_err());
    }
}
