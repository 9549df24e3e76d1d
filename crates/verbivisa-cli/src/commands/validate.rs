//! The `verbivisa validate` command.

use anyhow::Result;

use verbivisa_core::error::VisaError;
use verbivisa_core::words::{load_words, validate_words};

use crate::SourceArgs;

pub fn execute(source: SourceArgs) -> Result<()> {
    let config = source.load_config()?;
    let path = source.words_path(&config);
    let words = match load_words(&path, &config.columns) {
        Ok(words) => words,
        Err(e) => {
            let schema = e
                .chain()
                .filter_map(|cause| cause.downcast_ref::<VisaError>())
                .any(VisaError::is_schema_error);
            if schema {
                let columns = &config.columns;
                eprintln!(
                    "Expected header columns: {}, {}, {}",
                    columns.source, columns.target, columns.irregular
                );
            }
            return Err(e);
        }
    };
    let words = &words;

    println!(
        "Word list: {} ({} words, {} irregular)",
        words.source,
        words.len(),
        words.irregular_count()
    );

    let warnings = validate_words(words);
    for w in &warnings {
        let prefix = w
            .line
            .map(|line| format!("  [line {line}]"))
            .unwrap_or_else(|| "  ".to_string());
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Word list valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
