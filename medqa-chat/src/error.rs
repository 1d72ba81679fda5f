//! Error types for the `medqa-chat` crate.

use thiserror::Error;

/// Errors that can occur while answering a question.
///
/// Refusals and deflections are not errors; they are normal
/// [`Answer`](crate::answer::Answer) outcomes.
#[derive(Debug, Error)]
pub enum ChatError {
    /// The generation backend is unreachable or returned an error.
    ///
    /// Never retried; the query fails rather than guessing an answer.
    #[error("Generation error ({provider}): {message}")]
    Generation {
        /// The generation provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// Retrieval failed (embedding backend or index).
    #[error(transparent)]
    Retrieval(#[from] medqa_rag::RagError),

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A convenience result type for answer composition.
pub type Result<T> = std::result::Result<T, ChatError>;
