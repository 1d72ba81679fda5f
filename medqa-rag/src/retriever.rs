//! Query-time retrieval.
//!
//! The [`Retriever`] embeds a question, searches the index, and applies the
//! relevance cutoff. An empty result means "the corpus has no evidence for
//! this query", which is a normal outcome, not an error.

use std::sync::Arc;

use tracing::{debug, error};

use crate::config::RagConfig;
use crate::document::Chunk;
use crate::embedding::EmbeddingProvider;
use crate::error::Result;
use crate::vectorstore::VectorStore;

/// Retrieves ranked evidence chunks for a query.
///
/// Holds the same [`EmbeddingProvider`] used at build time; the caller is
/// responsible for constructing one provider per process and injecting it
/// into both the ingestor and the retriever.
pub struct Retriever {
    config: RagConfig,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
}

impl Retriever {
    /// Create a new retriever over an already-built index.
    pub fn new(
        config: RagConfig,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        vector_store: Arc<dyn VectorStore>,
    ) -> Self {
        Self { config, embedding_provider, vector_store }
    }

    /// Retrieve evidence for `query`, ranked most similar first.
    ///
    /// Fetches `top_k` candidates (restricted to `source_filter` when given)
    /// and keeps only those with `score >= similarity_threshold`. Scores are
    /// not returned; the relevance judgment is final here.
    ///
    /// # Errors
    ///
    /// Fails only when the embedding backend or the store fails; zero
    /// surviving candidates yields `Ok(vec![])`.
    pub async fn retrieve(&self, query: &str, source_filter: Option<&str>) -> Result<Vec<Chunk>> {
        let query_embedding = self.embedding_provider.embed(query).await.map_err(|e| {
            error!(error = %e, "query embedding failed");
            e
        })?;

        let results = self
            .vector_store
            .search(&query_embedding, self.config.top_k, source_filter)
            .await?;

        let candidates = results.len();
        let threshold = self.config.similarity_threshold;
        let evidence: Vec<Chunk> = results
            .into_iter()
            .filter(|r| r.score >= threshold)
            .map(|r| r.chunk)
            .collect();

        debug!(candidates, kept = evidence.len(), threshold, "retrieved evidence");
        Ok(evidence)
    }
}
