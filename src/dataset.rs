use crate::config::{Limits, GAMES_FILE, IMAGES_SUBFOLDER, REVIEWS_FILE, STEAM_SUBFOLDER};
use crate::error::{PipelineError, Result};
use crate::events::{Event, EventLog, SkipReason};
use crate::types::{DatasetRecord, Game, GameReviewPair, ImageSample, Review};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Reads a headed CSV file, mapping fields by column name. Rows that do not
/// decode are reported and skipped; a missing or unreadable header is fatal.
pub fn read_csv<T: DeserializeOwned>(path: &Path, events: &mut EventLog) -> Result<Vec<T>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)?;
    reader.headers()?;
    let mut rows = Vec::new();
    for row in reader.deserialize() {
        match row {
            Ok(r) => rows.push(r),
            Err(e) => events.push(Event::RowSkipped {
                file: path.to_path_buf(),
                line: e.position().map(|p| p.line()),
                error: e.to_string(),
            }),
        }
    }
    debug!(path = %path.display(), rows = rows.len(), "csv loaded");
    Ok(rows)
}

/// `games.csv` + `reviews.csv` under `<root>/steamreviews`.
pub struct SteamDataset {
    games: Vec<Game>,
    reviews: Vec<Review>,
}

/// One game and the reviews selected for it, in file order.
pub struct GameReviews<'a> {
    pub game: &'a Game,
    pub reviews: Vec<&'a Review>,
}

impl<'a> GameReviews<'a> {
    pub fn records(&self) -> impl Iterator<Item = DatasetRecord> + '_ {
        self.reviews.iter().map(move |r| {
            DatasetRecord::GameReview(GameReviewPair {
                game_id: self.game.appid.clone(),
                game_name: self.game.name.clone(),
                review_text: r.content.clone(),
            })
        })
    }
}

impl SteamDataset {
    pub fn open(root: &Path, events: &mut EventLog) -> Result<Self> {
        let dir = root.join(STEAM_SUBFOLDER);
        let games_path = dir.join(GAMES_FILE);
        let reviews_path = dir.join(REVIEWS_FILE);
        for p in [&games_path, &reviews_path] {
            if !p.is_file() {
                return Err(PipelineError::NotFound(p.clone()));
            }
        }
        Ok(Self { games: read_csv(&games_path, events)?, reviews: read_csv(&reviews_path, events)? })
    }

    pub fn from_rows(games: Vec<Game>, reviews: Vec<Review>) -> Self {
        Self { games, reviews }
    }

    /// Lazily pairs each selected game with its reviews.
    pub fn groups(&self, limits: Limits) -> impl Iterator<Item = GameReviews<'_>> + '_ {
        let max_games = limits.max_games.unwrap_or(usize::MAX);
        let max_reviews = limits.max_reviews_per_game.unwrap_or(usize::MAX);
        self.games.iter().take(max_games).map(move |game| GameReviews {
            game,
            reviews: self
                .reviews
                .iter()
                .filter(|r| r.app_id == game.appid)
                .take(max_reviews)
                .collect(),
        })
    }
}

/// An image found on disk, not yet read.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageEntry {
    pub category: String,
    pub file_name: String,
    pub path: PathBuf,
}

impl ImageEntry {
    pub fn load(&self) -> Result<ImageSample> {
        Ok(ImageSample {
            category: self.category.clone(),
            file_name: self.file_name.clone(),
            image_bytes: fs::read(&self.path)?,
        })
    }
}

/// `<root>/imatges/animals`, one subdirectory per category.
pub struct ImageTree {
    root: PathBuf,
}

fn sorted_entries(dir: &Path) -> std::io::Result<Vec<fs::DirEntry>> {
    let mut entries = fs::read_dir(dir)?.collect::<std::io::Result<Vec<_>>>()?;
    entries.sort_by_key(|e| e.file_name());
    Ok(entries)
}

fn has_allowed_extension(path: &Path, allowed: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| allowed.iter().any(|a| a.eq_ignore_ascii_case(e)))
        .unwrap_or(false)
}

impl ImageTree {
    pub fn open(data_path: &Path) -> Result<Self> {
        Self::at(data_path.join(IMAGES_SUBFOLDER))
    }

    pub fn at(root: PathBuf) -> Result<Self> {
        if !root.is_dir() {
            return Err(PipelineError::NotFound(root));
        }
        Ok(Self { root })
    }

    /// Walks one level of category directories and returns the matching
    /// image files, both levels sorted by name. Nested directories are not
    /// entered.
    pub fn scan(&self, limits: Limits, allowed: &[&str], events: &mut EventLog) -> Result<Vec<ImageEntry>> {
        let max_dirs = limits.max_category_dirs.unwrap_or(usize::MAX);
        let mut out = Vec::new();
        let mut visited = 0;

        for category in sorted_entries(&self.root)? {
            if visited >= max_dirs {
                break;
            }
            let category_path = category.path();
            if !category_path.is_dir() {
                events.push(Event::Skipped { path: category_path, reason: SkipReason::NotADirectory });
                continue;
            }
            let files = match sorted_entries(&category_path) {
                Ok(f) => f,
                Err(_) => {
                    events.push(Event::Skipped { path: category_path, reason: SkipReason::Unreadable });
                    continue;
                }
            };
            let category_name = category.file_name().to_string_lossy().into_owned();
            for file in files {
                let path = file.path();
                if !path.is_file() {
                    events.push(Event::Skipped { path, reason: SkipReason::NotAFile });
                    continue;
                }
                if !has_allowed_extension(&path, allowed) {
                    events.push(Event::Skipped { path, reason: SkipReason::UnsupportedExtension });
                    continue;
                }
                out.push(ImageEntry {
                    category: category_name.clone(),
                    file_name: file.file_name().to_string_lossy().into_owned(),
                    path,
                });
            }
            visited += 1;
        }
        Ok(out)
    }
}
