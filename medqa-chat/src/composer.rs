//! Guarded answer composition.
//!
//! The [`Composer`] runs the per-query state machine: injection check →
//! retrieval → empty-evidence refusal → page-lookup direct answer →
//! grounded generation with post-hoc refusal normalization → citation
//! assembly. Every path terminates in an [`Answer`] whose
//! [`Outcome`](crate::answer::Outcome) names the state it reached.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info};

use medqa_rag::{Chunk, Retriever};

use crate::answer::{Answer, Outcome};
use crate::classify::{KeywordClassifier, QueryClassifier, QueryKind};
use crate::error::{ChatError, Result};
use crate::generate::Generator;
use crate::prompt::{build_prompt, is_refusal};
use crate::session::combine_questions;

/// Supplies ranked evidence chunks for a query.
///
/// Implemented by [`medqa_rag::Retriever`]; the seam exists so the guard's
/// "never retrieve on deflection" behavior is observable with a test
/// double.
#[async_trait]
pub trait EvidenceSource: Send + Sync {
    /// Retrieve evidence for `query`, ranked most relevant first.
    async fn retrieve(
        &self,
        query: &str,
        source_filter: Option<&str>,
    ) -> medqa_rag::Result<Vec<Chunk>>;
}

#[async_trait]
impl EvidenceSource for Retriever {
    async fn retrieve(
        &self,
        query: &str,
        source_filter: Option<&str>,
    ) -> medqa_rag::Result<Vec<Chunk>> {
        Retriever::retrieve(self, query, source_filter).await
    }
}

/// Composes one [`Answer`] per question.
///
/// Owns answer construction only; it never mutates the evidence or the
/// index. Construct via [`Composer::builder()`].
pub struct Composer {
    classifier: Arc<dyn QueryClassifier>,
    evidence_source: Arc<dyn EvidenceSource>,
    generator: Arc<dyn Generator>,
}

impl Composer {
    /// Create a new [`ComposerBuilder`].
    pub fn builder() -> ComposerBuilder {
        ComposerBuilder::default()
    }

    /// Answer `question`, optionally scoped to one source document and
    /// optionally carrying the previous question as follow-up context.
    ///
    /// # Errors
    ///
    /// Fails only when retrieval or generation backends fail; refusals and
    /// deflections are `Ok` answers.
    pub async fn answer(
        &self,
        question: &str,
        source_filter: Option<&str>,
        previous_question: Option<&str>,
    ) -> Result<Answer> {
        // The guard classifies the raw current question so a benign
        // previous question can never mask an injection attempt.
        let kind = self.classifier.classify(question);
        if kind == QueryKind::Injection {
            info!("injection attempt deflected");
            return Ok(Answer::deflected());
        }

        let query = combine_questions(previous_question, question);
        let evidence = self.evidence_source.retrieve(&query, source_filter).await?;
        if evidence.is_empty() {
            info!("no evidence above threshold; refusing");
            return Ok(Answer::refused());
        }

        if kind == QueryKind::PageLookup {
            debug!(chunks = evidence.len(), "page lookup answered from metadata");
            return Ok(page_answer(&evidence));
        }

        let context: Vec<&str> = evidence.iter().map(|chunk| chunk.text.as_str()).collect();
        let prompt = build_prompt(&context.join("\n\n"), &query);
        let response = self.generator.generate(&prompt).await?;
        let response = response.trim();

        // The model's refusal phrasing is unreliable; normalize anything
        // containing a refusal marker to the canonical refusal.
        if is_refusal(response) {
            info!("model declined to answer from context; refusing");
            return Ok(Answer::refused());
        }

        let citations = collect_citations(&evidence);
        info!(citations = citations.len(), "answered from evidence");
        Ok(Answer { text: response.to_string(), citations, outcome: Outcome::Answered })
    }
}

/// Deduplicated, sorted citations over all evidence chunks.
///
/// Citations are "available evidence", not per-sentence provenance: every
/// chunk shown to the model is cited whether or not the final text drew on
/// it.
fn collect_citations(evidence: &[Chunk]) -> Vec<String> {
    let set: BTreeSet<String> = evidence.iter().map(Chunk::citation).collect();
    set.into_iter().collect()
}

/// Compose a page-lookup answer directly from evidence metadata.
///
/// Never invokes generation, so it cannot hallucinate page numbers.
fn page_answer(evidence: &[Chunk]) -> Answer {
    let mut pages_by_source: BTreeMap<&str, BTreeSet<usize>> = BTreeMap::new();
    for chunk in evidence {
        pages_by_source.entry(&chunk.source_id).or_default().insert(chunk.page_number + 1);
    }

    let sentences: Vec<String> = pages_by_source
        .iter()
        .map(|(source, pages)| {
            let pages: Vec<String> = pages.iter().map(usize::to_string).collect();
            format!("In **{source}**, this topic appears on pages {}.", pages.join(", "))
        })
        .collect();

    Answer {
        text: sentences.join(" "),
        citations: collect_citations(evidence),
        outcome: Outcome::AnsweredDirect,
    }
}

/// Builder for constructing a [`Composer`].
///
/// The classifier defaults to [`KeywordClassifier`]; evidence source and
/// generator are required.
#[derive(Default)]
pub struct ComposerBuilder {
    classifier: Option<Arc<dyn QueryClassifier>>,
    evidence_source: Option<Arc<dyn EvidenceSource>>,
    generator: Option<Arc<dyn Generator>>,
}

impl ComposerBuilder {
    /// Set a custom query classifier.
    pub fn classifier(mut self, classifier: Arc<dyn QueryClassifier>) -> Self {
        self.classifier = Some(classifier);
        self
    }

    /// Set the evidence source (typically a [`medqa_rag::Retriever`]).
    pub fn evidence_source(mut self, source: Arc<dyn EvidenceSource>) -> Self {
        self.evidence_source = Some(source);
        self
    }

    /// Set the generation backend.
    pub fn generator(mut self, generator: Arc<dyn Generator>) -> Self {
        self.generator = Some(generator);
        self
    }

    /// Build the [`Composer`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`ChatError::Config`] if the evidence source or generator is
    /// missing.
    pub fn build(self) -> Result<Composer> {
        let evidence_source = self
            .evidence_source
            .ok_or_else(|| ChatError::Config("evidence_source is required".to_string()))?;
        let generator = self
            .generator
            .ok_or_else(|| ChatError::Config("generator is required".to_string()))?;
        let classifier =
            self.classifier.unwrap_or_else(|| Arc::new(KeywordClassifier::new()));

        Ok(Composer { classifier, evidence_source, generator })
    }
}
