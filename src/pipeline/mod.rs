//! Sequential batch-inference loop shared by both jobs.

pub mod sentiment;
pub mod vision;

use crate::aggregate::Aggregator;
use crate::error::Result;
use crate::events::EventLog;
use crate::llm::{infer, InferenceClient, ResponseKind};
use crate::prompts::build_request;
use crate::types::{DatasetRecord, InferenceResult};

pub use sentiment::{run_sentiment, SentimentJob};
pub use vision::{run_vision, VisionJob};

pub async fn process_record(
    client: &dyn InferenceClient,
    model: &str,
    kind: ResponseKind,
    record: &DatasetRecord,
) -> Result<InferenceResult> {
    let request = build_request(record, model)?;
    infer(client, &request, kind).await
}

/// One record, one call, one outcome handed to the aggregator.
pub async fn feed<A>(
    client: &dyn InferenceClient,
    model: &str,
    kind: ResponseKind,
    record: DatasetRecord,
    aggregator: &mut A,
    events: &mut EventLog,
) where
    A: Aggregator + ?Sized,
{
    let outcome = process_record(client, model, kind, &record).await;
    aggregator.accept(&record, outcome, events);
}

/// Runs every record through the client and returns how many were attempted.
pub async fn run_batch<I, A>(
    client: &dyn InferenceClient,
    model: &str,
    kind: ResponseKind,
    records: I,
    aggregator: &mut A,
    events: &mut EventLog,
) -> usize
where
    I: IntoIterator<Item = DatasetRecord>,
    A: Aggregator + ?Sized,
{
    let mut attempted = 0;
    for record in records {
        feed(client, model, kind, record, aggregator, events).await;
        attempted += 1;
    }
    attempted
}
