//! Vector store trait and ranking helpers.

use async_trait::async_trait;

use crate::document::{IndexEntry, SearchResult};
use crate::error::{RagError, Result};

/// Storage for the corpus index with similarity search.
///
/// The index holds one flat set of [`IndexEntry`]s keyed by `chunk_id`. At
/// query time the store is read-only; rebuilding replaces the whole index
/// (clear, then upsert) rather than merging incrementally.
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Insert or replace entries, keyed by `chunk_id`.
    async fn upsert(&self, entries: &[IndexEntry]) -> Result<()>;

    /// Return the `top_k` entries most similar to `embedding`, ordered by
    /// descending cosine similarity.
    ///
    /// When `source_filter` is given, only entries whose `source_id` equals
    /// the filter are candidates; the restriction applies before ranking.
    ///
    /// Fails with [`RagError::Index`] if any stored entry's dimensionality
    /// differs from the query's, which happens when an index built with one
    /// embedding provider is searched with another.
    async fn search(
        &self,
        embedding: &[f32],
        top_k: usize,
        source_filter: Option<&str>,
    ) -> Result<Vec<SearchResult>>;

    /// Number of entries in the index.
    async fn len(&self) -> Result<usize>;

    /// Remove all entries.
    async fn clear(&self) -> Result<()>;

    /// Distinct `source_id`s present in the index, sorted.
    ///
    /// Feeds the source-filter selector offered to users.
    async fn source_ids(&self) -> Result<Vec<String>>;
}

/// Cosine similarity between two vectors, 0.0 if either has zero magnitude.
pub(crate) fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

/// Score, filter, rank, and truncate entries. Shared by the in-memory and
/// on-disk stores, which differ only in where the entries live.
///
/// The dimension check runs over every entry, filtered or not: an index
/// whose entries do not match the query embedding must fail loudly instead
/// of scoring against truncated vectors.
pub(crate) fn rank_entries<'a, I>(
    entries: I,
    embedding: &[f32],
    top_k: usize,
    source_filter: Option<&str>,
    backend: &str,
) -> Result<Vec<SearchResult>>
where
    I: Iterator<Item = &'a IndexEntry>,
{
    let mut scored = Vec::new();
    for entry in entries {
        if entry.embedding.len() != embedding.len() {
            return Err(RagError::Index {
                backend: backend.to_string(),
                message: format!(
                    "dimension mismatch: entry {} has {} dimensions, query has {}",
                    entry.chunk.chunk_id,
                    entry.embedding.len(),
                    embedding.len()
                ),
            });
        }
        if source_filter.is_none_or(|source| entry.chunk.source_id == source) {
            scored.push(SearchResult {
                chunk: entry.chunk.clone(),
                score: cosine_similarity(&entry.embedding, embedding),
            });
        }
    }

    scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
    scored.truncate(top_k);
    Ok(scored)
}
