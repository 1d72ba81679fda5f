//! Query classification.
//!
//! The guard runs every question through a [`QueryClassifier`] before any
//! retrieval or generation. The default [`KeywordClassifier`] uses fixed
//! case-insensitive phrase lists; the trait keeps the phrase heuristic
//! swappable for a stronger classifier without touching the state machine.

/// What kind of handling a question needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QueryKind {
    /// An attempt to override the grounding policy; deflect without
    /// retrieving.
    Injection,
    /// A page-locating question; answer from chunk metadata without
    /// generation.
    PageLookup,
    /// An ordinary question for the retrieve-and-generate path.
    Standard,
}

/// Classifies a question before the pipeline touches it.
pub trait QueryClassifier: Send + Sync {
    /// Classify the user's question text.
    fn classify(&self, question: &str) -> QueryKind;
}

/// Phrasings that attempt to override system instructions.
const INJECTION_PHRASES: &[&str] = &[
    "ignore previous instructions",
    "ignore prior instructions",
    "ignore all previous",
    "ignore the above",
    "disregard previous",
    "disregard the above",
    "disregard your instructions",
    "override your rules",
    "you are now",
    "pretend to be",
    "pretend you are",
    "act as if",
    "new persona",
    "system prompt",
    "developer instructions",
    "reveal your instructions",
    "jailbreak",
];

/// Phrasings that ask where in the corpus a topic appears.
const PAGE_LOOKUP_PHRASES: &[&str] = &[
    "which page",
    "what page",
    "which pages",
    "what pages",
    "on what page",
    "page number",
];

/// Substring-matching classifier over fixed phrase lists.
///
/// Injection wins over page lookup: a question that matches both is
/// deflected.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordClassifier;

impl KeywordClassifier {
    /// Create a new classifier with the built-in phrase lists.
    pub fn new() -> Self {
        Self
    }
}

impl QueryClassifier for KeywordClassifier {
    fn classify(&self, question: &str) -> QueryKind {
        let lower = question.to_lowercase();
        if INJECTION_PHRASES.iter().any(|phrase| lower.contains(phrase)) {
            return QueryKind::Injection;
        }
        if PAGE_LOOKUP_PHRASES.iter().any(|phrase| lower.contains(phrase)) {
            return QueryKind::PageLookup;
        }
        QueryKind::Standard
    }
}
