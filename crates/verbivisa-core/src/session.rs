//! The quiz session state machine.
//!
//! A session is built from a quiz configuration, asks the word at the head
//! of its work queue, and moves through
//! `Running → AwaitingAdvance → … → Complete` as answers are submitted.
//! Dropping a session abandons it; nothing is persisted until the scoring
//! step runs on a complete session.

use std::collections::{HashSet, VecDeque};
use std::time::{Duration, Instant};

use rand::seq::SliceRandom;
use rand::Rng;
use uuid::Uuid;

use crate::answer;
use crate::error::VisaError;
use crate::model::{PacketChoice, QuizConfig, QuizMode, WordEntry, WordTable};
use crate::packets::PacketSet;

/// Lifecycle state of a running session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// A question is waiting for an answer.
    Running,
    /// An answer was checked; feedback is shown until the caller advances.
    AwaitingAdvance,
    /// The work queue is empty.
    Complete,
}

/// Result of starting a session.
#[derive(Debug)]
pub enum SessionStart {
    Ready(QuizSession),
    /// The selected packet and filter leave no words. Not scored.
    NoQuestions,
}

/// The question currently asked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question<'a> {
    pub index: usize,
    pub prompt: &'a str,
    pub expected: &'a str,
    /// Changes with every submission, so per-question input state can be reset.
    pub key: u64,
}

/// Outcome of one submitted answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnswerOutcome {
    pub is_correct: bool,
    pub expected_answer: String,
    /// Whether this was the first time the word was asked in this session.
    pub first_attempt: bool,
}

/// Running tally for progress display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Progress {
    /// Distinct words whose first answer has been given.
    pub answered: usize,
    pub first_pass_total: usize,
    pub first_pass_correct: usize,
    /// Words still in the work queue, retries included.
    pub outstanding: usize,
}

impl Progress {
    pub fn fraction(&self) -> f64 {
        if self.first_pass_total == 0 {
            return 1.0;
        }
        self.answered as f64 / self.first_pass_total as f64
    }
}

/// Summary of a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub first_pass_correct: usize,
    pub first_pass_total: usize,
    pub elapsed_seconds: u64,
}

/// One quiz attempt.
#[derive(Debug)]
pub struct QuizSession {
    id: Uuid,
    table: WordTable,
    config: QuizConfig,
    candidates: Vec<usize>,
    queue: VecDeque<usize>,
    asked: HashSet<usize>,
    missed: Vec<usize>,
    first_pass_correct: usize,
    question_key: u64,
    state: SessionState,
    started_at: Instant,
    elapsed: Option<Duration>,
    recorded: bool,
}

impl QuizSession {
    /// Resolve the configured subset, filter it, shuffle it once and start.
    pub fn start<R: Rng + ?Sized>(
        table: &WordTable,
        packets: &PacketSet,
        config: QuizConfig,
        rng: &mut R,
    ) -> Result<SessionStart, VisaError> {
        let subset = match &config.packet {
            PacketChoice::All => packets.all_indices(),
            PacketChoice::Named(name) => packets
                .get(name)
                .ok_or_else(|| VisaError::UnknownPacket(name.clone()))?
                .to_vec(),
        };

        let mut candidates: Vec<usize> = subset
            .into_iter()
            .filter(|&i| table.get(i).is_some_and(|e| config.filter.accepts(e)))
            .collect();

        if candidates.is_empty() {
            tracing::info!(
                packet = %config.packet,
                filter = %config.filter,
                "no words to quiz"
            );
            return Ok(SessionStart::NoQuestions);
        }

        candidates.shuffle(rng);

        let session = Self {
            id: Uuid::new_v4(),
            table: table.clone(),
            queue: candidates.iter().copied().collect(),
            candidates,
            asked: HashSet::new(),
            missed: Vec::new(),
            first_pass_correct: 0,
            question_key: 0,
            state: SessionState::Running,
            started_at: Instant::now(),
            elapsed: None,
            recorded: false,
            config,
        };
        tracing::info!(
            session = %session.id,
            source = %session.table.source,
            packet = %session.config.packet,
            direction = %session.config.direction,
            filter = %session.config.filter,
            mode = %session.config.mode,
            questions = session.candidates.len(),
            "quiz started"
        );
        Ok(SessionStart::Ready(session))
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn config(&self) -> &QuizConfig {
        &self.config
    }

    /// Word-source identifier of the table this session quizzes.
    pub fn source(&self) -> &str {
        &self.table.source
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_complete(&self) -> bool {
        self.state == SessionState::Complete
    }

    /// Number of distinct words in the first pass. Fixed at start.
    pub fn first_pass_total(&self) -> usize {
        self.candidates.len()
    }

    pub fn first_pass_correct(&self) -> usize {
        self.first_pass_correct
    }

    /// The word at the head of the work queue.
    pub fn current_question(&self) -> Option<Question<'_>> {
        let index = *self.queue.front()?;
        let entry = self.table.get(index)?;
        let (prompt, expected) = entry.prompt_and_answer(self.config.direction);
        Some(Question {
            index,
            prompt,
            expected,
            key: self.question_key,
        })
    }

    /// Check an answer for the current question and move the queue on.
    ///
    /// Submitting while awaiting advance advances implicitly.
    pub fn submit(&mut self, user_text: &str) -> Result<AnswerOutcome, VisaError> {
        if self.state == SessionState::Complete {
            return Err(VisaError::SessionComplete);
        }
        let Some(index) = self.queue.pop_front() else {
            self.finish();
            return Err(VisaError::SessionComplete);
        };

        let (_, expected) = self.entry(index).prompt_and_answer(self.config.direction);
        let expected_answer = expected.to_string();
        let is_correct = answer::is_correct(user_text, &expected_answer);

        let first_attempt = self.asked.insert(index);
        if first_attempt {
            if is_correct {
                self.first_pass_correct += 1;
            } else {
                self.missed.push(index);
            }
        }

        if !is_correct && self.config.mode == QuizMode::RetryUntilCorrect {
            self.queue.push_back(index);
        }

        self.question_key += 1;
        tracing::debug!(
            session = %self.id,
            index,
            is_correct,
            first_attempt,
            outstanding = self.queue.len(),
            "answer checked"
        );

        if self.queue.is_empty() {
            self.finish();
        } else {
            self.state = SessionState::AwaitingAdvance;
        }

        Ok(AnswerOutcome {
            is_correct,
            expected_answer,
            first_attempt,
        })
    }

    /// Leave the feedback state and show the next question.
    pub fn advance(&mut self) {
        if self.state == SessionState::AwaitingAdvance {
            self.state = SessionState::Running;
        }
    }

    pub fn progress(&self) -> Progress {
        Progress {
            answered: self.asked.len(),
            first_pass_total: self.first_pass_total(),
            first_pass_correct: self.first_pass_correct,
            outstanding: self.queue.len(),
        }
    }

    /// Words answered wrong the first time they were asked, in asking order.
    pub fn missed(&self) -> Vec<&WordEntry> {
        self.missed.iter().filter_map(|&i| self.table.get(i)).collect()
    }

    /// First-pass score and elapsed time.
    ///
    /// Elapsed time is frozen when the session completes; before that it runs
    /// up to now.
    pub fn summary(&self) -> SessionSummary {
        let elapsed = self.elapsed.unwrap_or_else(|| self.started_at.elapsed());
        SessionSummary {
            first_pass_correct: self.first_pass_correct,
            first_pass_total: self.first_pass_total(),
            elapsed_seconds: elapsed.as_secs(),
        }
    }

    pub(crate) fn is_recorded(&self) -> bool {
        self.recorded
    }

    pub(crate) fn mark_recorded(&mut self) {
        self.recorded = true;
    }

    fn entry(&self, index: usize) -> &WordEntry {
        // Candidates are filtered against the table at start.
        &self.table.entries()[index]
    }

    fn finish(&mut self) {
        if self.state != SessionState::Complete {
            self.state = SessionState::Complete;
            self.elapsed = Some(self.started_at.elapsed());
            let summary = self.summary();
            tracing::info!(
                session = %self.id,
                correct = summary.first_pass_correct,
                total = summary.first_pass_total,
                elapsed_secs = summary.elapsed_seconds,
                "quiz complete"
            );
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::model::{Direction, WordsetFilter};
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    /// `len` words; the `it → fi` answer for word `i` is `v{i}`.
    pub(crate) fn words(len: usize) -> WordTable {
        let entries = (0..len)
            .map(|i| WordEntry {
                source_text: format!("w{i}"),
                target_text: format!("v{i}"),
                irregular: i % 2 == 0,
            })
            .collect();
        WordTable::new("verbit.csv", entries)
    }

    pub(crate) fn single_packet(len: usize) -> PacketSet {
        [("paketti_1".to_string(), (0..len).collect())]
            .into_iter()
            .collect()
    }

    pub(crate) fn start(len: usize, mode: QuizMode) -> QuizSession {
        let config = QuizConfig {
            packet: PacketChoice::Named("paketti_1".into()),
            direction: Direction::SourceToTarget,
            filter: WordsetFilter::All,
            mode,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        match QuizSession::start(&words(len), &single_packet(len), config, &mut rng).unwrap() {
            SessionStart::Ready(session) => session,
            SessionStart::NoQuestions => panic!("expected questions"),
        }
    }

    fn right(session: &QuizSession) -> String {
        session.current_question().unwrap().expected.to_string()
    }

    #[test]
    fn first_pass_only_with_one_miss() {
        let mut session = start(5, QuizMode::FirstPassOnly);
        let mut submissions = 0;
        while !session.is_complete() {
            let answer = if submissions == 2 {
                "wrong".to_string()
            } else {
                right(&session)
            };
            let before = session.progress().outstanding;
            session.submit(&answer).unwrap();
            assert!(session.progress().outstanding < before);
            submissions += 1;
        }
        assert_eq!(submissions, 5);
        let summary = session.summary();
        assert_eq!(summary.first_pass_correct, 4);
        assert_eq!(summary.first_pass_total, 5);
        assert_eq!(session.missed().len(), 1);
    }

    #[test]
    fn retry_until_correct_counts_first_attempt_only() {
        let mut session = start(3, QuizMode::RetryUntilCorrect);
        let mut submissions = 0;

        let answer = right(&session);
        assert!(session.submit(&answer).unwrap().is_correct);
        submissions += 1;

        let missed_index = session.current_question().unwrap().index;
        let outcome = session.submit("wrong").unwrap();
        assert!(!outcome.is_correct);
        assert!(outcome.first_attempt);
        submissions += 1;

        while !session.is_complete() {
            let q = session.current_question().unwrap();
            let retry = q.index == missed_index;
            let answer = q.expected.to_string();
            let outcome = session.submit(&answer).unwrap();
            assert_eq!(outcome.first_attempt, !retry);
            submissions += 1;
        }

        assert_eq!(submissions, 4);
        assert_eq!(session.summary().first_pass_correct, 2);
        assert_eq!(session.summary().first_pass_total, 3);
    }

    #[test]
    fn repeated_misses_never_inflate_first_pass() {
        let mut session = start(4, QuizMode::RetryUntilCorrect);
        // Miss everything three times round, then answer correctly.
        for _ in 0..12 {
            session.submit("nope").unwrap();
        }
        assert_eq!(session.progress().answered, 4);
        assert_eq!(session.progress().outstanding, 4);
        while !session.is_complete() {
            let answer = right(&session);
            session.submit(&answer).unwrap();
        }
        assert_eq!(session.first_pass_correct(), 0);
        assert_eq!(session.first_pass_total(), 4);
    }

    #[test]
    fn question_key_changes_every_submit() {
        let mut session = start(3, QuizMode::RetryUntilCorrect);
        let first = session.current_question().unwrap().key;
        session.submit("x").unwrap();
        let second = session.current_question().unwrap().key;
        assert!(second > first);
    }

    #[test]
    fn awaiting_advance_between_questions() {
        let mut session = start(2, QuizMode::FirstPassOnly);
        assert_eq!(session.state(), SessionState::Running);
        let answer = right(&session);
        session.submit(&answer).unwrap();
        assert_eq!(session.state(), SessionState::AwaitingAdvance);
        session.advance();
        assert_eq!(session.state(), SessionState::Running);
        session.submit("wrong").unwrap();
        assert_eq!(session.state(), SessionState::Complete);
        session.advance();
        assert_eq!(session.state(), SessionState::Complete);
    }

    #[test]
    fn submit_after_completion_is_rejected() {
        let mut session = start(1, QuizMode::FirstPassOnly);
        session.submit("whatever").unwrap();
        assert!(session.is_complete());
        assert!(session.current_question().is_none());
        assert_eq!(session.submit("again"), Err(VisaError::SessionComplete));
    }

    #[test]
    fn direction_picks_prompt() {
        let config = QuizConfig {
            packet: PacketChoice::All,
            direction: Direction::TargetToSource,
            filter: WordsetFilter::All,
            mode: QuizMode::FirstPassOnly,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let SessionStart::Ready(session) =
            QuizSession::start(&words(1), &single_packet(1), config, &mut rng).unwrap()
        else {
            panic!("expected questions");
        };
        let q = session.current_question().unwrap();
        assert_eq!(q.prompt, "v0");
        assert_eq!(q.expected, "w0");
    }

    #[test]
    fn filter_selects_irregular_words() {
        let config = QuizConfig {
            packet: PacketChoice::All,
            direction: Direction::SourceToTarget,
            filter: WordsetFilter::IrregularOnly,
            mode: QuizMode::FirstPassOnly,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let SessionStart::Ready(mut session) =
            QuizSession::start(&words(6), &single_packet(6), config, &mut rng).unwrap()
        else {
            panic!("expected questions");
        };
        assert_eq!(session.first_pass_total(), 3);
        while let Some(q) = session.current_question() {
            assert_eq!(q.index % 2, 0);
            let answer = q.expected.to_string();
            session.submit(&answer).unwrap();
        }
        assert_eq!(session.first_pass_correct(), 3);
    }

    #[test]
    fn empty_subset_is_no_questions() {
        let table = WordTable::new(
            "verbit.csv",
            vec![WordEntry {
                source_text: "parlare".into(),
                target_text: "puhua".into(),
                irregular: false,
            }],
        );
        let config = QuizConfig {
            filter: WordsetFilter::IrregularOnly,
            ..Default::default()
        };
        let start = QuizSession::start(
            &table,
            &single_packet(1),
            config,
            &mut rand::thread_rng(),
        )
        .unwrap();
        assert!(matches!(start, SessionStart::NoQuestions));
    }

    #[test]
    fn unknown_packet_is_an_error() {
        let config = QuizConfig {
            packet: PacketChoice::Named("paketti_9".into()),
            ..Default::default()
        };
        let err = QuizSession::start(&words(2), &single_packet(2), config, &mut rand::thread_rng())
            .unwrap_err();
        assert_eq!(err, VisaError::UnknownPacket("paketti_9".into()));
    }

    #[test]
    fn all_packets_are_unioned() {
        let packets: PacketSet = [
            ("paketti_1".to_string(), vec![0, 1]),
            ("paketti_2".to_string(), vec![2]),
        ]
        .into_iter()
        .collect();
        let start =
            QuizSession::start(&words(3), &packets, QuizConfig::default(), &mut rand::thread_rng())
                .unwrap();
        let SessionStart::Ready(session) = start else {
            panic!("expected questions");
        };
        assert_eq!(session.first_pass_total(), 3);
        let mut queued: Vec<usize> = session.queue.iter().copied().collect();
        queued.sort_unstable();
        assert_eq!(queued, vec![0, 1, 2]);
    }

    #[test]
    fn progress_tracks_answers() {
        let mut session = start(4, QuizMode::RetryUntilCorrect);
        session.submit("wrong").unwrap();
        let answer = right(&session);
        session.submit(&answer).unwrap();
        let progress = session.progress();
        assert_eq!(progress.answered, 2);
        assert_eq!(progress.first_pass_correct, 1);
        assert_eq!(progress.outstanding, 3);
        assert!((progress.fraction() - 0.5).abs() < f64::EPSILON);
    }
}
