//! # medqa-chat
//!
//! Guarded answer composition for the MedQA closed-corpus document
//! assistant.
//!
//! Every question runs through a fixed state machine: an injection check
//! (deflect without retrieving), retrieval against the persisted index, a
//! refusal when no evidence clears the relevance cutoff, a metadata-only
//! path for page-lookup questions, and otherwise a single grounded
//! generation call whose output is normalized to the canonical refusal if
//! the model signals it could not answer from the context. Grounded answers
//! carry deduplicated `"source (page N)"` citations; both refusal variants
//! carry none, and the [`Outcome`] on every [`Answer`] names the terminal
//! state explicitly.
//!
//! The [`ChatSession`] wraps a [`Composer`] with an append-only transcript
//! and single-step follow-up memory (the previous question only).

pub mod answer;
pub mod classify;
pub mod composer;
pub mod error;
pub mod generate;
pub mod prompt;
pub mod session;

pub use answer::{Answer, ConversationTurn, Outcome, Role};
pub use classify::{KeywordClassifier, QueryClassifier, QueryKind};
pub use composer::{Composer, ComposerBuilder, EvidenceSource};
pub use error::{ChatError, Result};
pub use generate::Generator;
#[cfg(feature = "openai")]
pub use generate::OpenAIChatGenerator;
pub use prompt::{DEFLECTION_TEXT, REFUSAL_TEXT, build_prompt, is_refusal};
pub use session::{ChatSession, combine_questions};
