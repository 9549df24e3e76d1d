//! Scoring a finished session into the highscore store.

use anyhow::Result;
use chrono::{Local, SubsecRound};

use crate::error::VisaError;
use crate::highscores::{percent, HighscoreKey, HighscoreRecord, HighscoreStore};
use crate::model::{PacketChoice, QuizConfig};
use crate::session::{QuizSession, SessionSummary};

/// What happened to the highscore store.
#[derive(Debug, Clone, PartialEq)]
pub enum RecordOutcome {
    /// All packets combined; such runs are informational only.
    Unscored,
    /// The attempt became the new best for `key`.
    NewBest { key: String, record: HighscoreRecord },
    /// An earlier attempt with at least as many correct answers stands.
    NotImproved {
        key: String,
        best: Option<HighscoreRecord>,
    },
    /// This session was already finalized.
    AlreadyRecorded,
}

/// Summary and recording result of a finished session.
#[derive(Debug, Clone, PartialEq)]
pub struct Finalized {
    pub summary: SessionSummary,
    pub outcome: RecordOutcome,
}

impl Finalized {
    /// The stored record, if this attempt became the new best.
    pub fn record(&self) -> Option<&HighscoreRecord> {
        match &self.outcome {
            RecordOutcome::NewBest { record, .. } => Some(record),
            _ => None,
        }
    }
}

/// Highscore slot for a quiz configuration.
pub fn highscore_key(config: &QuizConfig) -> HighscoreKey {
    HighscoreKey {
        direction: config.direction,
        packet: config.packet.clone(),
        filter: config.filter,
    }
}

/// Score a complete session and update the store with best-attempt semantics.
///
/// Calling this again for the same session changes nothing.
pub fn finalize(session: &mut QuizSession, store: &mut HighscoreStore) -> Result<Finalized> {
    if !session.is_complete() {
        return Err(VisaError::SessionNotComplete.into());
    }
    let summary = session.summary();

    if session.is_recorded() {
        return Ok(Finalized {
            summary,
            outcome: RecordOutcome::AlreadyRecorded,
        });
    }

    if session.config().packet == PacketChoice::All {
        session.mark_recorded();
        return Ok(Finalized {
            summary,
            outcome: RecordOutcome::Unscored,
        });
    }

    let key = highscore_key(session.config()).to_string();
    let record = HighscoreRecord {
        correct: summary.first_pass_correct,
        total: summary.first_pass_total,
        percent: percent(summary.first_pass_correct, summary.first_pass_total),
        duration_seconds: Some(summary.elapsed_seconds),
        timestamp: Local::now().naive_local().trunc_subsecs(0),
    };

    let source = session.source().to_string();
    let improved = store.record(&source, &key, record.clone())?;
    session.mark_recorded();

    let outcome = if improved {
        RecordOutcome::NewBest { key, record }
    } else {
        let best = store.get(&source, &key).cloned();
        RecordOutcome::NotImproved { key, best }
    };
    Ok(Finalized { summary, outcome })
}
