//! Session-scoped conversation state.
//!
//! A [`ChatSession`] owns the transcript for one user session and carries
//! the previous question into the next query as single-step follow-up
//! context. This is heuristic memory, not dialogue state: answers are never
//! carried, only the immediately preceding question, overwritten each turn.

use crate::answer::{Answer, ConversationTurn, Outcome, Role};
use crate::composer::Composer;
use crate::error::Result;

/// Build the effective query from the previous and current questions.
///
/// With no previous question the current one passes through unchanged;
/// otherwise the two-line composite is used verbatim for retrieval and
/// generation.
pub fn combine_questions(previous: Option<&str>, current: &str) -> String {
    match previous {
        Some(previous) => {
            format!("Previous question: {previous}\nCurrent question: {current}")
        }
        None => current.to_string(),
    }
}

/// One user's conversation with the corpus.
///
/// Process-local and single-writer; turns are append-only and never
/// persisted beyond the session.
pub struct ChatSession {
    composer: Composer,
    turns: Vec<ConversationTurn>,
    last_question: Option<String>,
}

impl ChatSession {
    /// Start a fresh session over the given composer.
    pub fn new(composer: Composer) -> Self {
        Self { composer, turns: Vec::new(), last_question: None }
    }

    /// Ask a question, recording both turns in the transcript.
    ///
    /// Deflected questions are not remembered as follow-up context, so an
    /// injection attempt cannot smuggle itself into the next query.
    pub async fn ask(&mut self, question: &str, source_filter: Option<&str>) -> Result<Answer> {
        let answer =
            self.composer.answer(question, source_filter, self.last_question.as_deref()).await?;

        self.turns.push(ConversationTurn {
            role: Role::User,
            content: question.to_string(),
            citations: Vec::new(),
        });
        self.turns.push(ConversationTurn {
            role: Role::Assistant,
            content: answer.text.clone(),
            citations: answer.citations.clone(),
        });

        if answer.outcome != Outcome::Deflected {
            self.last_question = Some(question.to_string());
        }

        Ok(answer)
    }

    /// The transcript so far.
    pub fn turns(&self) -> &[ConversationTurn] {
        &self.turns
    }
}
