use super::run_batch;
use crate::aggregate::SentimentTally;
use crate::config::{Limits, Settings};
use crate::dataset::SteamDataset;
use crate::error::Result;
use crate::events::{Event, EventLog};
use crate::llm::{InferenceClient, ResponseKind};
use crate::report::write_json;
use crate::types::SentimentReport;
use std::path::PathBuf;

pub struct SentimentJob<'a> {
    pub model: &'a str,
    pub limits: Limits,
}

/// Classifies the selected reviews of every selected game. Games without
/// reviews still appear, with all counters at zero.
pub async fn run_sentiment(
    client: &dyn InferenceClient,
    dataset: &SteamDataset,
    job: &SentimentJob<'_>,
    events: &mut EventLog,
) -> SentimentReport {
    let mut tally = SentimentTally::default();
    for group in dataset.groups(job.limits) {
        events.push(Event::GameStarted {
            appid: group.game.appid.clone(),
            name: group.game.name.clone(),
            reviews: group.reviews.len(),
        });
        tally.begin_game(&group.game.appid, &group.game.name);
        run_batch(client, job.model, ResponseKind::Label, group.records(), &mut tally, events).await;
    }
    SentimentReport::new(tally.into_games())
}

/// Full run: check settings, load the CSV files, classify, write the report.
pub async fn execute(settings: &Settings, client: &dyn InferenceClient, events: &mut EventLog) -> Result<PathBuf> {
    settings.validate_sentiment()?;
    let dataset = SteamDataset::open(settings.data_path()?, events)?;
    let job = SentimentJob { model: settings.text_model()?, limits: settings.limits };
    let report = run_sentiment(client, &dataset, &job, events).await;

    let path = settings.sentiment_report_path();
    write_json(&path, &report)?;
    events.push(Event::ReportWritten { path: path.clone() });
    Ok(path)
}
