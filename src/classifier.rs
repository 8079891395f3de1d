use serde::{Deserialize, Serialize};

/// How a submission compares to the expected word
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Classification {
    /// submission equals the expected word
    Exact,
    /// expected word starts with the submission
    PartialPrefix,
    /// anything else
    Mismatch,
}

/// Result of scoring one submission
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Verdict {
    pub classification: Classification,
    /// expected word ends with the submission; tracked independently of `classification`
    pub fully_consumed: bool,
    /// characters in the trimmed submission
    pub keystrokes: usize,
}

/// Score `submitted` against `expected`.
///
/// Surrounding whitespace in the submission is ignored. Rules apply in order:
/// equality, then prefix, then mismatch. The `fully_consumed` flag is a
/// separate suffix test, so an empty submission is a prefix that is also
/// fully consumed, and a mismatch can still be fully consumed
/// (`"cat"` vs `"at"`).
pub fn classify(expected: &str, submitted: &str) -> Verdict {
    let submitted = submitted.trim();

    let classification = if submitted == expected {
        Classification::Exact
    } else if expected.starts_with(submitted) {
        Classification::PartialPrefix
    } else {
        Classification::Mismatch
    };

    Verdict {
        classification,
        fully_consumed: expected.ends_with(submitted),
        keystrokes: submitted.chars().count(),
    }
}
