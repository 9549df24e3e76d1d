//! Free-text answer checking.
//!
//! An accepted answer may list alternatives separated by `;`. Comparison is
//! exact after trimming and lowercasing both sides.

/// Separator between accepted alternatives.
pub const ALTERNATIVE_SEPARATOR: char = ';';

fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// The normalized alternatives encoded in `accepted`.
pub fn alternatives(accepted: &str) -> Vec<String> {
    accepted.split(ALTERNATIVE_SEPARATOR).map(normalize).collect()
}

/// Returns `true` if `user_text` matches any accepted alternative.
pub fn is_correct(user_text: &str, accepted: &str) -> bool {
    let answer = normalize(user_text);
    accepted
        .split(ALTERNATIVE_SEPARATOR)
        .any(|alt| normalize(alt) == answer)
}
