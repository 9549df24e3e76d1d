//! Domain error types.
//!
//! I/O and parse failures travel as `anyhow::Error` with file context; the
//! variants here are the failures callers may want to match on.

use thiserror::Error;

/// Errors raised by the word store, packets and quiz session.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum VisaError {
    /// The word list lacks one or more required columns.
    #[error("word list is missing columns: {}", .missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    /// The requested packet does not exist in the current partition.
    #[error("unknown packet: {0}")]
    UnknownPacket(String),

    /// Packets cannot be built with a size of zero.
    #[error("package size must be at least 1")]
    ZeroPackageSize,

    /// The session has not finished yet.
    #[error("quiz session is not complete")]
    SessionNotComplete,

    /// The session has already finished; no further answers are accepted.
    #[error("quiz session is already complete")]
    SessionComplete,
}

impl VisaError {
    /// Returns `true` if the error comes from the shape of the word list.
    pub fn is_schema_error(&self) -> bool {
        matches!(self, VisaError::MissingColumns { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_columns_lists_names() {
        let err = VisaError::MissingColumns {
            missing: vec!["suomi".into(), "epäsäännöllinen".into()],
        };
        assert_eq!(
            err.to_string(),
            "word list is missing columns: suomi, epäsäännöllinen"
        );
        assert!(err.is_schema_error());
        assert!(!VisaError::ZeroPackageSize.is_schema_error());
    }
}
