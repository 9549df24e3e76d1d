//! Word list loading.
//!
//! Reads a CSV word list with a header row and checks that the required
//! columns exist. Extra columns are ignored and short rows are padded with
//! empty fields.

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};

use crate::config::ColumnNames;
use crate::error::VisaError;
use crate::model::{WordEntry, WordTable};

/// Marker value for irregular words, compared case-insensitively.
pub const IRREGULAR_MARKER: &str = "x";

/// Load a word list from a CSV file.
///
/// The file name becomes the word-source identifier of the table.
pub fn load_words(path: &Path, columns: &ColumnNames) -> Result<WordTable> {
    let file = File::open(path)
        .with_context(|| format!("failed to open word list: {}", path.display()))?;
    let source = source_id(path);
    load_words_from_reader(file, &source, columns)
        .with_context(|| format!("failed to load word list: {}", path.display()))
}

/// Word-source identifier for a path: its file name.
pub fn source_id(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Load a word list from any reader (useful for testing).
pub fn load_words_from_reader<R: Read>(
    reader: R,
    source: &str,
    columns: &ColumnNames,
) -> Result<WordTable> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(reader);

    let headers = csv_reader
        .headers()
        .context("failed to read header row")?
        .clone();
    let position = |name: &str| {
        headers
            .iter()
            .position(|h| h.trim_start_matches('\u{feff}').trim() == name)
    };

    let (source_col, target_col, irregular_col) = match (
        position(&columns.source),
        position(&columns.target),
        position(&columns.irregular),
    ) {
        (Some(s), Some(t), Some(i)) => (s, t, i),
        (s, t, i) => {
            let missing = [
                (s, &columns.source),
                (t, &columns.target),
                (i, &columns.irregular),
            ]
            .into_iter()
            .filter(|(pos, _)| pos.is_none())
            .map(|(_, name)| name.clone())
            .collect();
            return Err(VisaError::MissingColumns { missing }.into());
        }
    };

    let mut entries = Vec::new();
    for (row, record) in csv_reader.records().enumerate() {
        // Header is line 1.
        let record = record.with_context(|| format!("failed to read line {}", row + 2))?;
        let field = |idx: usize| record.get(idx).unwrap_or("").trim().to_string();
        entries.push(WordEntry {
            source_text: field(source_col),
            target_text: field(target_col),
            irregular: field(irregular_col).eq_ignore_ascii_case(IRREGULAR_MARKER),
        });
    }

    tracing::debug!(source, words = entries.len(), "loaded word list");
    Ok(WordTable::new(source, entries))
}

/// A warning from word list validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// Line in the CSV file (header is line 1), if applicable.
    pub line: Option<usize>,
    /// Warning message.
    pub message: String,
}

/// Check a loaded word list for entries that cannot be quizzed sensibly.
pub fn validate_words(table: &WordTable) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if table.is_empty() {
        warnings.push(ValidationWarning {
            line: None,
            message: "word list has no rows".into(),
        });
    }

    let mut seen: HashMap<String, usize> = HashMap::new();
    for (idx, entry) in table.entries().iter().enumerate() {
        let line = idx + 2;
        if entry.source_text.is_empty() || entry.target_text.is_empty() {
            warnings.push(ValidationWarning {
                line: Some(line),
                message: "empty word; this entry can never be answered in one direction".into(),
            });
        }
        if entry.source_text.is_empty() {
            continue;
        }
        match seen.entry(entry.source_text.to_lowercase()) {
            Entry::Occupied(first) => warnings.push(ValidationWarning {
                line: Some(line),
                message: format!(
                    "duplicate word '{}' (first on line {})",
                    entry.source_text,
                    first.get()
                ),
            }),
            Entry::Vacant(slot) => {
                slot.insert(line);
            }
        }
    }

    warnings
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(csv: &str) -> Result<WordTable> {
        load_words_from_reader(csv.as_bytes(), "verbit.csv", &ColumnNames::default())
    }

    #[test]
    fn loads_and_trims_fields() {
        let table = load(
            "suomi,italia,epäsäännöllinen\n  mennä , andare ,x\npuhua,parlare,\nolla,essere, X \n",
        )
        .unwrap();
        assert_eq!(table.source, "verbit.csv");
        assert_eq!(table.len(), 3);
        let first = table.get(0).unwrap();
        assert_eq!(first.source_text, "andare");
        assert_eq!(first.target_text, "mennä");
        assert!(first.irregular);
        assert!(!table.get(1).unwrap().irregular);
        assert!(table.get(2).unwrap().irregular);
        assert_eq!(table.irregular_count(), 2);
    }

    #[test]
    fn extra_columns_and_short_rows() {
        let table = load("huom,italia,suomi,epäsäännöllinen\n1,andare,mennä\n2,\"stare; restare\",olla,x,extra\n")
            .unwrap();
        assert_eq!(table.len(), 2);
        let first = table.get(0).unwrap();
        assert_eq!(first.target_text, "mennä");
        assert!(!first.irregular);
        assert_eq!(table.get(1).unwrap().source_text, "stare; restare");
    }

    #[test]
    fn missing_columns_are_named() {
        let err = load("italia,muuta\nandare,1\n").unwrap_err();
        let visa = err.downcast_ref::<VisaError>().unwrap();
        assert_eq!(
            visa,
            &VisaError::MissingColumns {
                missing: vec!["suomi".into(), "epäsäännöllinen".into()]
            }
        );
    }

    #[test]
    fn empty_input_misses_every_column() {
        let err = load("").unwrap_err();
        match err.downcast_ref::<VisaError>() {
            Some(VisaError::MissingColumns { missing }) => assert_eq!(missing.len(), 3),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn bom_before_header_is_ignored() {
        let table = load("\u{feff}suomi,italia,epäsäännöllinen\nmennä,andare,x\n").unwrap();
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn load_from_file_uses_file_name_as_source() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("lista.csv");
        std::fs::write(&path, "suomi,italia,epäsäännöllinen\nmennä,andare,x\n").unwrap();
        let table = load_words(&path, &ColumnNames::default()).unwrap();
        assert_eq!(table.source, "lista.csv");
    }

    #[test]
    fn missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        assert!(load_words(&dir.path().join("none.csv"), &ColumnNames::default()).is_err());
    }

    #[test]
    fn validation_flags_empty_and_duplicate_words() {
        let table = load("suomi,italia,epäsäännöllinen\nmennä,andare,x\n,parlare,\nmennä pois,Andare,\n").unwrap();
        let warnings = validate_words(&table);
        assert_eq!(warnings.len(), 2);
        assert_eq!(warnings[0].line, Some(3));
        assert_eq!(warnings[1].line, Some(4));
        assert!(warnings[1].message.contains("first on line 2"));
    }

    #[test]
    fn validation_of_clean_list_is_silent() {
        let table = load("suomi,italia,epäsäännöllinen\nmennä,andare,x\npuhua,parlare,\n").unwrap();
        assert!(validate_words(&table).is_empty());
    }
}
