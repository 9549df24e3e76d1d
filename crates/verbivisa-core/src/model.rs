//! Core data model types for verbivisa.
//!
//! Words, the table they live in, and the knobs that configure a quiz.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One row of the word list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordEntry {
    /// Italian form (the `italia` column by default).
    pub source_text: String,
    /// Finnish form (the `suomi` column by default).
    pub target_text: String,
    /// Irregular verb marker.
    pub irregular: bool,
}

impl WordEntry {
    /// Prompt and expected answer for the given direction.
    pub fn prompt_and_answer(&self, direction: Direction) -> (&str, &str) {
        match direction {
            Direction::SourceToTarget => (&self.source_text, &self.target_text),
            Direction::TargetToSource => (&self.target_text, &self.source_text),
        }
    }
}

/// A loaded word list.
///
/// The position of an entry is its identity everywhere else (packets, sessions).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordTable {
    /// Identifier of the word source, the CSV file name (e.g. `verbit.csv`).
    pub source: String,
    entries: Vec<WordEntry>,
}

impl WordTable {
    pub fn new(source: impl Into<String>, entries: Vec<WordEntry>) -> Self {
        Self {
            source: source.into(),
            entries,
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&WordEntry> {
        self.entries.get(index)
    }

    pub fn entries(&self) -> &[WordEntry] {
        &self.entries
    }

    /// Number of entries carrying the irregular marker.
    pub fn irregular_count(&self) -> usize {
        self.entries.iter().filter(|e| e.irregular).count()
    }
}

/// Translation direction of a quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    /// Italian prompt, Finnish answer.
    SourceToTarget,
    /// Finnish prompt, Italian answer.
    TargetToSource,
}

impl fmt::Display for Direction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Direction::SourceToTarget => write!(f, "it → fi"),
            Direction::TargetToSource => write!(f, "fi → it"),
        }
    }
}

impl FromStr for Direction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "it-fi" | "it → fi" | "it->fi" | "source-target" => Ok(Direction::SourceToTarget),
            "fi-it" | "fi → it" | "fi->it" | "target-source" => Ok(Direction::TargetToSource),
            other => Err(format!("unknown direction: {other}")),
        }
    }
}

/// Which words of the selected subset take part in a quiz.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WordsetFilter {
    All,
    IrregularOnly,
    RegularOnly,
}

impl WordsetFilter {
    pub fn accepts(&self, entry: &WordEntry) -> bool {
        match self {
            WordsetFilter::All => true,
            WordsetFilter::IrregularOnly => entry.irregular,
            WordsetFilter::RegularOnly => !entry.irregular,
        }
    }
}

impl fmt::Display for WordsetFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WordsetFilter::All => write!(f, "kaikki"),
            WordsetFilter::IrregularOnly => write!(f, "vain epäsäännölliset"),
            WordsetFilter::RegularOnly => write!(f, "vain säännölliset"),
        }
    }
}

impl FromStr for WordsetFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "all" | "kaikki" => Ok(WordsetFilter::All),
            "irregular" | "vain epäsäännölliset" => Ok(WordsetFilter::IrregularOnly),
            "regular" | "vain säännölliset" => Ok(WordsetFilter::RegularOnly),
            other => Err(format!("unknown word set filter: {other}")),
        }
    }
}

/// How wrong answers are handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum QuizMode {
    /// Every question is asked once.
    FirstPassOnly,
    /// Missed questions go to the back of the queue until answered correctly.
    RetryUntilCorrect,
}

impl fmt::Display for QuizMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizMode::FirstPassOnly => write!(f, "first-pass"),
            QuizMode::RetryUntilCorrect => write!(f, "retry"),
        }
    }
}

impl FromStr for QuizMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "first-pass" | "once" | "eka kierros" => Ok(QuizMode::FirstPassOnly),
            "retry" | "until-correct" | "kunnes kaikki oikein" => Ok(QuizMode::RetryUntilCorrect),
            other => Err(format!("unknown quiz mode: {other}")),
        }
    }
}

/// The word subset a quiz draws from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PacketChoice {
    /// Every packet combined. Runs over this subset are never scored.
    All,
    /// A single packet by name.
    Named(String),
}

impl fmt::Display for PacketChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PacketChoice::All => write!(f, "kaikki"),
            PacketChoice::Named(name) => write!(f, "{name}"),
        }
    }
}

impl FromStr for PacketChoice {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err("packet name cannot be empty".to_string());
        }
        match s.to_lowercase().as_str() {
            "all" | "kaikki" => Ok(PacketChoice::All),
            _ => Ok(PacketChoice::Named(s.to_string())),
        }
    }
}

/// Everything needed to start a quiz session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizConfig {
    pub packet: PacketChoice,
    pub direction: Direction,
    pub filter: WordsetFilter,
    pub mode: QuizMode,
}

impl Default for QuizConfig {
    fn default() -> Self {
        Self {
            packet: PacketChoice::All,
            direction: Direction::SourceToTarget,
            filter: WordsetFilter::All,
            mode: QuizMode::FirstPassOnly,
        }
    }
}
