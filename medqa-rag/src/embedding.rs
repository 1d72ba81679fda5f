//! Embedding provider trait.

use async_trait::async_trait;

use crate::error::Result;

/// A provider that converts text into fixed-dimensionality vectors.
///
/// The same provider instance must be used at build time and query time;
/// mixing embedding functions silently degrades relevance with no error
/// signal. Providers are therefore constructed once and injected into both
/// the ingestor and the retriever. Implementations must be deterministic:
/// embedding identical text twice yields the same vector.
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for a single text input.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embedding vectors for a batch of text inputs.
    ///
    /// The default implementation calls [`embed`](EmbeddingProvider::embed)
    /// sequentially; backends with native batch endpoints should override it.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// Return the dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;
}
