// file: src/models/outcome.rs
// description: tagged results of batch searches and the final answer
// reference: replaces raw sentinel string comparisons with explicit variants

/// Literal the batch prompt asks the model to reply with when nothing matches.
pub const NO_MATCHES_SENTINEL: &str = "NO_MATCHES_FOUND";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchOutcome {
    NoMatch,
    Matches(String),
    /// Only produced under the skip failure policy
    Failed { batch: usize, error: String },
}

impl BatchOutcome {
    /// Classifies raw model text. Only an exact (trimmed) sentinel is a miss; any
    /// other text, including an empty reply, is kept verbatim as matches.
    pub fn from_response(text: &str) -> Self {
        if text.trim() == NO_MATCHES_SENTINEL {
            BatchOutcome::NoMatch
        } else {
            BatchOutcome::Matches(text.to_string())
        }
    }

    pub fn matches(&self) -> Option<&str> {
        match self {
            BatchOutcome::Matches(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, BatchOutcome::Failed { .. })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchAnswer {
    NoMatches,
    Answer(String),
}
