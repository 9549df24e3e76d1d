//! Best-attempt highscores with JSON persistence.
//!
//! Records are keyed first by word source, then by the composite key
//! `"{direction} | {packet} | {filter}"`. A record is replaced only by an
//! attempt with strictly more first-pass correct answers.

use std::collections::BTreeMap;
use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::model::{Direction, PacketChoice, WordsetFilter};

/// Composite key of one highscore slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct HighscoreKey {
    pub direction: Direction,
    pub packet: PacketChoice,
    pub filter: WordsetFilter,
}

impl fmt::Display for HighscoreKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} | {} | {}", self.direction, self.packet, self.filter)
    }
}

/// The best attempt for one key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HighscoreRecord {
    /// First-pass correct answers.
    pub correct: usize,
    /// First-pass question count.
    pub total: usize,
    /// `correct / total` as a percentage, one decimal.
    pub percent: f64,
    #[serde(default, alias = "duration")]
    pub duration_seconds: Option<u64>,
    /// Local time the attempt finished.
    pub timestamp: NaiveDateTime,
}

impl HighscoreRecord {
    /// Whether this attempt should replace `best`.
    pub fn beats(&self, best: Option<&HighscoreRecord>) -> bool {
        best.map_or(true, |best| self.correct > best.correct)
    }
}

/// Percentage rounded to one decimal. A zero total counts as one.
pub fn percent(correct: usize, total: usize) -> f64 {
    let total = total.max(1);
    (1000.0 * correct as f64 / total as f64).round() / 10.0
}

type SourceScores = BTreeMap<String, HighscoreRecord>;

/// File-backed highscores for every word source.
#[derive(Debug)]
pub struct HighscoreStore {
    path: PathBuf,
    scores: BTreeMap<String, SourceScores>,
}

impl HighscoreStore {
    /// Open the store at `path`. A missing file is an empty store; an
    /// unreadable or malformed one is an error.
    pub fn open(path: &Path) -> Result<Self> {
        let scores = if path.exists() {
            let content = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read highscores from {}", path.display()))?;
            serde_json::from_str(&content)
                .with_context(|| format!("failed to parse highscores JSON: {}", path.display()))?
        } else {
            BTreeMap::new()
        };
        Ok(Self {
            path: path.to_path_buf(),
            scores,
        })
    }

    pub fn get(&self, source: &str, key: &str) -> Option<&HighscoreRecord> {
        self.scores.get(source)?.get(key)
    }

    /// All records of one word source, ordered by key.
    pub fn entries(&self, source: &str) -> Vec<(&str, &HighscoreRecord)> {
        self.scores
            .get(source)
            .map(|scores| scores.iter().map(|(k, v)| (k.as_str(), v)).collect())
            .unwrap_or_default()
    }

    /// Store `record` under `key` if it beats the current best.
    ///
    /// Returns `true` if the store changed. Changes are saved immediately.
    pub fn record(&mut self, source: &str, key: &str, record: HighscoreRecord) -> Result<bool> {
        if !record.beats(self.get(source, key)) {
            tracing::debug!(source, key, correct = record.correct, "not a new best");
            return Ok(false);
        }
        tracing::info!(
            source,
            key,
            correct = record.correct,
            total = record.total,
            "new highscore"
        );
        self.scores
            .entry(source.to_string())
            .or_default()
            .insert(key.to_string(), record);
        self.save()?;
        Ok(true)
    }

    /// Remove one key of `source`, or every key of it when `key` is `None`.
    ///
    /// Returns the number of removed records.
    pub fn reset(&mut self, source: &str, key: Option<&str>) -> Result<usize> {
        let removed = match key {
            Some(key) => self
                .scores
                .get_mut(source)
                .and_then(|scores| scores.remove(key))
                .map_or(0, |_| 1),
            None => self.scores.remove(source).map_or(0, |scores| scores.len()),
        };
        if self.scores.get(source).is_some_and(|scores| scores.is_empty()) {
            self.scores.remove(source);
        }
        tracing::info!(source, key = key.unwrap_or("*"), removed, "highscores reset");
        self.save()?;
        Ok(removed)
    }

    fn save(&self) -> Result<()> {
        let json =
            serde_json::to_string_pretty(&self.scores).context("failed to serialize highscores")?;
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, json)
            .with_context(|| format!("failed to write highscores to {}", self.path.display()))?;
        Ok(())
    }
}
