use crate::error::PipelineError;
use crate::events::{Event, EventLog};
use crate::types::{DatasetRecord, GameStatistics, ImageAnalysis, InferenceResult, Sentiment, SentimentStats};

/// Folds one outcome per record into a report structure.
pub trait Aggregator {
    fn accept(&mut self, record: &DatasetRecord, outcome: Result<InferenceResult, PipelineError>, events: &mut EventLog);
}

fn item_name(record: &DatasetRecord) -> String {
    match record {
        DatasetRecord::GameReview(p) => format!("review of {} ({})", p.game_name, p.game_id),
        DatasetRecord::Image(s) => format!("{}/{}", s.category, s.file_name),
    }
}

impl SentimentStats {
    pub fn record(&mut self, label: Sentiment) {
        match label {
            Sentiment::Positive => self.positive += 1,
            Sentiment::Negative => self.negative += 1,
            Sentiment::Neutral => self.neutral += 1,
            Sentiment::Error => self.error += 1,
        }
    }

    pub fn total(&self) -> u32 {
        self.positive + self.negative + self.neutral + self.error
    }
}

/// Per-game sentiment counters, in the order games were started.
#[derive(Debug, Default)]
pub struct SentimentTally {
    games: Vec<GameStatistics>,
}

impl SentimentTally {
    pub fn begin_game(&mut self, appid: &str, name: &str) {
        self.games.push(GameStatistics {
            appid: appid.to_string(),
            name: name.to_string(),
            statistics: SentimentStats::default(),
        });
    }

    /// Counts into the group of the record's game, opening one if needed.
    pub fn record(&mut self, appid: &str, name: &str, label: Sentiment) {
        if self.games.last().map(|g| g.appid != appid).unwrap_or(true) {
            self.begin_game(appid, name);
        }
        if let Some(current) = self.games.last_mut() {
            current.statistics.record(label);
        }
    }

    pub fn into_games(self) -> Vec<GameStatistics> {
        self.games
    }
}

impl Aggregator for SentimentTally {
    fn accept(&mut self, record: &DatasetRecord, outcome: Result<InferenceResult, PipelineError>, events: &mut EventLog) {
        let DatasetRecord::GameReview(pair) = record else {
            events.push(Event::ItemDropped { item: item_name(record), error: "not a review".into() });
            return;
        };
        let label = match outcome {
            Ok(InferenceResult::Label(Sentiment::Error)) => {
                events.push(Event::Sentinel { item: item_name(record), error: "unrecognized label".into() });
                Sentiment::Error
            }
            Ok(InferenceResult::Label(label)) => label,
            Ok(InferenceResult::Structured(_)) => {
                events.push(Event::Sentinel { item: item_name(record), error: "expected a label".into() });
                Sentiment::Error
            }
            Err(e) => {
                events.push(Event::Sentinel { item: item_name(record), error: e.to_string() });
                Sentiment::Error
            }
        };
        self.record(&pair.game_id, &pair.game_name, label);
    }
}

/// Parsed image descriptions in arrival order.
#[derive(Debug, Default)]
pub struct ImageCollector {
    items: Vec<ImageAnalysis>,
}

impl ImageCollector {
    pub fn items(&self) -> &[ImageAnalysis] {
        &self.items
    }

    pub fn into_items(self) -> Vec<ImageAnalysis> {
        self.items
    }
}

impl Aggregator for ImageCollector {
    fn accept(&mut self, record: &DatasetRecord, outcome: Result<InferenceResult, PipelineError>, events: &mut EventLog) {
        let DatasetRecord::Image(sample) = record else {
            events.push(Event::ItemDropped { item: item_name(record), error: "not an image".into() });
            return;
        };
        match outcome {
            Ok(InferenceResult::Structured(data)) => {
                events.push(Event::ImageAnalyzed { file_name: sample.file_name.clone() });
                self.items.push(ImageAnalysis { file_name: sample.file_name.clone(), data });
            }
            Ok(InferenceResult::Label(label)) => events.push(Event::ItemDropped {
                item: item_name(record),
                error: format!("expected a JSON object, got label {}", label.as_str()),
            }),
            Err(e) => events.push(Event::ItemDropped { item: item_name(record), error: e.to_string() }),
        }
    }
}
