//! The `verbivisa quiz` command.

use std::io::{self, BufRead, Write};

use anyhow::{Context, Result};

use verbivisa_core::answer::alternatives;
use verbivisa_core::highscores::{percent, HighscoreStore};
use verbivisa_core::model::{Direction, PacketChoice, QuizConfig, QuizMode, WordsetFilter};
use verbivisa_core::packets::PacketStore;
use verbivisa_core::scoring::{finalize, RecordOutcome};
use verbivisa_core::session::{QuizSession, SessionStart};

use crate::SourceArgs;

/// Typed instead of an answer to leave the quiz.
const QUIT: &str = ":q";

pub fn execute(
    source: SourceArgs,
    packet: String,
    direction: String,
    filter: String,
    mode: String,
) -> Result<()> {
    let quiz = QuizConfig {
        packet: packet.parse::<PacketChoice>().map_err(anyhow::Error::msg)?,
        direction: direction.parse::<Direction>().map_err(anyhow::Error::msg)?,
        filter: filter.parse::<WordsetFilter>().map_err(anyhow::Error::msg)?,
        mode: mode.parse::<QuizMode>().map_err(anyhow::Error::msg)?,
    };

    let workspace = source.open()?;
    let config = &workspace.config;
    let words = &workspace.words;

    // A broken highscore file must fail before the first question.
    let mut highscores = HighscoreStore::open(&config.highscores_path())?;
    let mut packets = PacketStore::open(&config.packets_path())?;
    let packet_set = packets.ensure(words, config.package_size, config.packet_seed)?;

    let mut session =
        match QuizSession::start(words, &packet_set, quiz.clone(), &mut rand::thread_rng())? {
            SessionStart::Ready(session) => session,
            SessionStart::NoQuestions => {
                println!(
                    "No words to quiz in '{}' with filter '{}'.",
                    quiz.packet, quiz.filter
                );
                return Ok(());
            }
        };

    println!(
        "Quiz: {} | {} | {} | {} ({} words). Type {QUIT} to stop.\n",
        quiz.direction,
        quiz.packet,
        quiz.filter,
        quiz.mode,
        session.first_pass_total()
    );

    let stdin = io::stdin();
    let stdout = io::stdout();
    let finished = run(&mut session, stdin.lock(), stdout.lock())?;
    if !finished {
        println!("\nQuiz abandoned, nothing recorded.");
        return Ok(());
    }

    let finalized = finalize(&mut session, &mut highscores)?;
    let summary = finalized.summary;
    let pct = percent(summary.first_pass_correct, summary.first_pass_total);
    println!(
        "\nQuiz complete! First pass correct {}/{} ({pct:.1}%) in {} s.",
        summary.first_pass_correct, summary.first_pass_total, summary.elapsed_seconds
    );

    let missed = session.missed();
    if !missed.is_empty() {
        println!("\nMissed on first pass:");
        for entry in missed {
            println!("  {} = {}", entry.source_text, entry.target_text);
        }
    }

    match finalized.outcome {
        RecordOutcome::NewBest { key, .. } => println!("\nNew highscore for {key}!"),
        RecordOutcome::NotImproved { key, best } => {
            if let Some(best) = best {
                println!("\nBest for {key} is still {}/{}.", best.correct, best.total);
            }
        }
        RecordOutcome::Unscored => println!("\nRuns over all packets are not scored."),
        RecordOutcome::AlreadyRecorded => {}
    }

    Ok(())
}

/// Ask questions until the session completes.
///
/// Returns `false` if the input ended or the user quit first.
pub fn run<R: BufRead, W: Write>(
    session: &mut QuizSession,
    mut input: R,
    mut out: W,
) -> Result<bool> {
    while let Some(question) = session.current_question() {
        let progress = session.progress();
        let position = if progress.answered < progress.first_pass_total {
            format!("{}/{}", progress.answered + 1, progress.first_pass_total)
        } else {
            format!("retry, {} left", progress.outstanding)
        };
        writeln!(out, "[{position}] Sana: {}", question.prompt)?;
        write!(out, "> ")?;
        out.flush()?;

        let mut line = String::new();
        let read = input
            .read_line(&mut line)
            .context("failed to read answer")?;
        let answer = line.trim_end_matches(['\r', '\n']);
        if read == 0 || answer.trim() == QUIT {
            tracing::info!(session = %session.id(), "quiz abandoned");
            return Ok(false);
        }

        let outcome = session.submit(answer)?;
        if outcome.is_correct {
            writeln!(out, "✓ Oikein!")?;
        } else {
            let accepted = alternatives(&outcome.expected_answer).join(" / ");
            writeln!(out, "✗ Väärin. Oikea vastaus: {accepted}")?;
        }
        session.advance();
    }

    Ok(session.is_complete())
}
