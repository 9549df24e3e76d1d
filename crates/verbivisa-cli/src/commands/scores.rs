//! The `verbivisa scores` commands.

use anyhow::Result;
use comfy_table::{Cell, Table};

use verbivisa_core::highscores::HighscoreStore;
use verbivisa_core::words::source_id;

use crate::SourceArgs;

// Highscores are keyed by the word list's file name, so the list itself
// need not exist or parse.
pub fn list(source: SourceArgs) -> Result<()> {
    let config = source.load_config()?;
    let words_source = source_id(&source.words_path(&config));
    let store = HighscoreStore::open(&config.highscores_path())?;
    let entries = store.entries(&words_source);

    if entries.is_empty() {
        println!("No highscores yet for {words_source}.");
        return Ok(());
    }

    let mut table = Table::new();
    table.set_header(vec!["Key", "Correct", "Percent", "Duration", "Timestamp"]);
    for (key, record) in entries {
        let duration = record
            .duration_seconds
            .map(|s| format!("{s} s"))
            .unwrap_or_else(|| "-".to_string());
        table.add_row(vec![
            Cell::new(key),
            Cell::new(format!("{}/{}", record.correct, record.total)),
            Cell::new(format!("{:.1}%", record.percent)),
            Cell::new(duration),
            Cell::new(record.timestamp.format("%Y-%m-%d %H:%M:%S")),
        ]);
    }

    println!("Highscores for {words_source}");
    println!("{table}");
    Ok(())
}

pub fn reset(source: SourceArgs, key: Option<String>) -> Result<()> {
    let config = source.load_config()?;
    let words_source = source_id(&source.words_path(&config));
    let mut store = HighscoreStore::open(&config.highscores_path())?;
    let removed = store.reset(&words_source, key.as_deref())?;

    match (&key, removed) {
        (Some(key), 0) => println!("No highscore for '{key}'."),
        (Some(key), _) => println!("Highscore for '{key}' reset."),
        (None, n) => println!("Reset {n} highscore(s) for {words_source}."),
    }
    Ok(())
}
