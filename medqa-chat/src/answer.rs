//! Answer and conversation types.

use serde::{Deserialize, Serialize};

use crate::prompt::{DEFLECTION_TEXT, REFUSAL_TEXT};

/// How a query terminated.
///
/// Exposed explicitly so callers can distinguish the terminal states
/// without parsing answer text or inferring from citation presence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    /// Grounded answer produced by generation over retrieved evidence.
    Answered,
    /// Page-lookup answer composed directly from chunk metadata, without
    /// generation.
    AnsweredDirect,
    /// The corpus holds no evidence for the question (or the model
    /// signalled it could not answer from the context).
    Refused,
    /// The question matched an injection pattern; no retrieval was
    /// performed.
    Deflected,
}

/// The result of one query.
///
/// Grounded answers carry non-empty citations; both refusal variants carry
/// none.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Answer {
    /// The answer text shown to the user.
    pub text: String,
    /// Deduplicated, sorted `"source (page N)"` citations.
    pub citations: Vec<String>,
    /// The terminal state that produced this answer.
    pub outcome: Outcome,
}

impl Answer {
    /// The canonical "no evidence" refusal.
    pub fn refused() -> Self {
        Self { text: REFUSAL_TEXT.to_string(), citations: Vec::new(), outcome: Outcome::Refused }
    }

    /// The canonical injection deflection.
    pub fn deflected() -> Self {
        Self {
            text: DEFLECTION_TEXT.to_string(),
            citations: Vec::new(),
            outcome: Outcome::Deflected,
        }
    }

    /// Whether this answer is backed by corpus evidence.
    pub fn is_grounded(&self) -> bool {
        matches!(self.outcome, Outcome::Answered | Outcome::AnsweredDirect)
    }
}

/// Who produced a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    /// The person asking questions.
    User,
    /// The assistant's answers.
    Assistant,
}

/// One entry in the session transcript.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConversationTurn {
    /// Who produced this turn.
    pub role: Role,
    /// The question or answer text.
    pub content: String,
    /// Citations attached to assistant turns; empty for user turns.
    pub citations: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn refusal_variants_have_no_citations() {
        assert!(Answer::refused().citations.is_empty());
        assert!(Answer::deflected().citations.is_empty());
        assert!(!Answer::refused().is_grounded());
        assert!(!Answer::deflected().is_grounded());
    }

    #[test]
    fn refusal_and_deflection_texts_differ() {
        assert_ne!(Answer::refused().text, Answer::deflected().text);
    }
}
