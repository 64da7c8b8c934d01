use super::feed;
use crate::aggregate::ImageCollector;
use crate::config::{Limits, Settings, IMAGE_EXTENSIONS};
use crate::dataset::ImageTree;
use crate::error::Result;
use crate::events::{Event, EventLog, SkipReason};
use crate::llm::{InferenceClient, ResponseKind};
use crate::report::write_json;
use crate::types::{DatasetRecord, ImageAnalysis};
use std::path::PathBuf;
use tracing::info;

pub struct VisionJob<'a> {
    pub model: &'a str,
    pub limits: Limits,
}

pub async fn run_vision(
    client: &dyn InferenceClient,
    tree: &ImageTree,
    job: &VisionJob<'_>,
    events: &mut EventLog,
) -> Result<Vec<ImageAnalysis>> {
    let entries = tree.scan(job.limits, &IMAGE_EXTENSIONS, events)?;
    info!(images = entries.len(), "images to analyze");

    // each image is read right before it is sent
    let mut collector = ImageCollector::default();
    for entry in &entries {
        match entry.load() {
            Ok(sample) => {
                let record = DatasetRecord::Image(sample);
                feed(client, job.model, ResponseKind::Structured, record, &mut collector, events).await;
            }
            Err(_) => events.push(Event::Skipped { path: entry.path.clone(), reason: SkipReason::Unreadable }),
        }
    }
    Ok(collector.into_items())
}

pub async fn execute(settings: &Settings, client: &dyn InferenceClient, events: &mut EventLog) -> Result<PathBuf> {
    settings.validate_vision()?;
    let tree = ImageTree::open(settings.data_path()?)?;
    let job = VisionJob { model: settings.vision_model()?, limits: settings.limits };
    let results = run_vision(client, &tree, &job, events).await?;

    let path = settings.vision_report_path();
    write_json(&path, &results)?;
    events.push(Event::ReportWritten { path: path.clone() });
    Ok(path)
}
