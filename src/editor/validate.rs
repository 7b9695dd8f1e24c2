//! Save-time validation of edited commit messages.

/// Lines whose first non-whitespace character is this are comments.
pub const COMMENT_CHAR: char = '#';

/// Warning shown when the saved message is empty.
pub const EMPTY_WARNING: &str = "Commit message cannot be empty. Edit the message or cancel.";

/// Result of validating a saved message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    /// Message is acceptable; holds the stripped, trimmed text.
    Accept(String),
    /// Empty after stripping; keep the session open.
    RejectEmpty,
    /// Longer than the configured limit; re-present the text.
    RejectTooLong { limit: usize, length: usize },
    /// Empty after stripping while a length limit is configured.
    Cancel,
}

impl Verdict {
    /// User-facing warning for rejected saves.
    pub fn warning(&self) -> Option<String> {
        match self {
            Verdict::RejectEmpty => Some(EMPTY_WARNING.to_string()),
            Verdict::RejectTooLong { limit, length } => Some(format!(
                "Commit message is {length} characters; the maximum is {limit}. Shorten it or cancel."
            )),
            Verdict::Accept(_) | Verdict::Cancel => None,
        }
    }
}

/// Remove comment lines, leaving every other byte untouched.
pub fn strip_comments(text: &str) -> String {
    text.split_inclusive('\n')
        .filter(|line| !line.trim_start().starts_with(COMMENT_CHAR))
        .collect()
}

/// Validate a saved message.
///
/// With `max_length` set, an empty result is a cancellation rather than a
/// rejection. Length is counted in characters, after trimming.
pub fn validate(text: &str, max_length: Option<usize>) -> Verdict {
    let stripped = strip_comments(text);
    let trimmed = stripped.trim();

    if trimmed.is_empty() {
        return match max_length {
            Some(_) => Verdict::Cancel,
            None => Verdict::RejectEmpty,
        };
    }

    if let Some(limit) = max_length {
        let length = trimmed.chars().count();
        if length > limit {
            return Verdict::RejectTooLong { limit, length };
        }
    }

    Verdict::Accept(trimmed.to_string())
}
