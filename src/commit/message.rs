//! Candidate commit messages produced by synthesis.

use std::fmt;

/// Where a candidate message came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageSource {
    Ai,
    RuleBased,
}

impl fmt::Display for MessageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MessageSource::Ai => f.write_str("AI"),
            MessageSource::RuleBased => f.write_str("rule-based"),
        }
    }
}

/// A synthesized commit message, before the user edits it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateMessage {
    pub subject: String,
    pub body: String,
    pub source: MessageSource,
}

impl CandidateMessage {
    /// Split generated text into subject (first line) and body (the rest).
    ///
    /// Returns `None` when the text has no non-blank first line.
    pub fn from_generated(text: &str, source: MessageSource) -> Option<Self> {
        let text = text.trim();
        let (subject, body) = match text.split_once('\n') {
            Some((first, rest)) => (first.trim(), rest.trim()),
            None => (text, ""),
        };

        if subject.is_empty() {
            return None;
        }

        Some(Self {
            subject: subject.to_string(),
            body: body.to_string(),
            source,
        })
    }

    /// Format the message for git: subject, blank line, body.
    ///
    /// ```
    /// use cmit::{CandidateMessage, MessageSource};
    ///
    /// let msg = CandidateMessage {
    ///     subject: "fix: modify api.ts".to_string(),
    ///     body: "Fixed issues in src.".to_string(),
    ///     source: MessageSource::RuleBased,
    /// };
    /// assert_eq!(msg.format(), "fix: modify api.ts\n\nFixed issues in src.");
    /// ```
    pub fn format(&self) -> String {
        if self.body.trim().is_empty() {
            self.subject.clone()
        } else {
            format!("{}\n\n{}", self.subject, self.body.trim())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_generated_subject_and_body() {
        let msg = CandidateMessage::from_generated(
            "feat: add login form\n\nAdds a login form to the auth module.",
            MessageSource::Ai,
        )
        .unwrap();
        assert_eq!(msg.subject, "feat: add login form");
        assert_eq!(msg.body, "Adds a login form to the auth module.");
        assert_eq!(msg.source, MessageSource::Ai);
    }

    #[test]
    fn test_from_generated_subject_only() {
        let msg = CandidateMessage::from_generated("  chore: bump deps  ", MessageSource::Ai).unwrap();
        assert_eq!(msg.subject, "chore: bump deps");
        assert!(msg.body.is_empty());
        assert_eq!(msg.format(), "chore: bump deps");
    }

    #[test]
    fn test_from_generated_body_without_blank_line() {
        let msg = CandidateMessage::from_generated("fix: x\nsecond line\nthird", MessageSource::Ai).unwrap();
        assert_eq!(msg.subject, "fix: x");
        assert_eq!(msg.body, "second line\nthird");
    }

    #[test]
    fn test_from_generated_blank_is_none() {
        assert!(CandidateMessage::from_generated("   \n\n", MessageSource::Ai).is_none());
    }

    #[test]
    fn test_format_with_body() {
        let msg = CandidateMessage {
            subject: "docs: update README.md".to_string(),
            body: "Updated documentation in README.md.".to_string(),
            source: MessageSource::RuleBased,
        };
        assert_eq!(
            msg.format(),
            "docs: update README.md\n\nUpdated documentation in README.md."
        );
    }
}
