//! In-memory vector store.
//!
//! [`InMemoryVectorStore`] keeps the index in a `HashMap` behind a
//! `tokio::sync::RwLock`. It backs tests and small corpora; the durable
//! variant is [`DiskVectorStore`](crate::diskstore::DiskVectorStore).

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::document::{IndexEntry, SearchResult};
use crate::error::Result;
use crate::vectorstore::{VectorStore, rank_entries};

/// A vector store holding all entries in memory, searched by cosine
/// similarity.
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    entries: RwLock<HashMap<u64, IndexEntry>>,
}

impl InMemoryVectorStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn upsert(&self, new_entries: &[IndexEntry]) -> Result<()> {
        let mut entries = self.entries.write().await;
        for entry in new_entries {
            entries.insert(entry.chunk.chunk_id, entry.clone());
        }
        Ok(())
    }

    async fn search(
        &self,
        embedding: &[f32],
        top_k: usize,
        source_filter: Option<&str>,
    ) -> Result<Vec<SearchResult>> {
        let entries = self.entries.read().await;
        rank_entries(entries.values(), embedding, top_k, source_filter, "memory")
    }

    async fn len(&self) -> Result<usize> {
        Ok(self.entries.read().await.len())
    }

    async fn clear(&self) -> Result<()> {
        self.entries.write().await.clear();
        Ok(())
    }

    async fn source_ids(&self) -> Result<Vec<String>> {
        let entries = self.entries.read().await;
        let sources: BTreeSet<String> =
            entries.values().map(|e| e.chunk.source_id.clone()).collect();
        Ok(sources.into_iter().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::Chunk;

    fn entry(chunk_id: u64, source_id: &str, embedding: Vec<f32>) -> IndexEntry {
        IndexEntry {
            chunk: Chunk {
                chunk_id,
                source_id: source_id.to_string(),
                page_number: 0,
                text: format!("chunk {chunk_id}"),
            },
            embedding,
        }
    }

    #[tokio::test]
    async fn search_orders_by_descending_similarity() {
        let store = InMemoryVectorStore::new();
        store
            .upsert(&[
                entry(0, "a.pdf", vec![1.0, 0.0]),
                entry(1, "a.pdf", vec![0.0, 1.0]),
                entry(2, "a.pdf", vec![0.7, 0.7]),
            ])
            .await
            .unwrap();

        let results = store.search(&[1.0, 0.0], 3, None).await.unwrap();
        let ids: Vec<u64> = results.iter().map(|r| r.chunk.chunk_id).collect();
        assert_eq!(ids, vec![0, 2, 1]);
    }

    #[tokio::test]
    async fn source_filter_restricts_candidates_before_ranking() {
        let store = InMemoryVectorStore::new();
        store
            .upsert(&[
                entry(0, "a.pdf", vec![1.0, 0.0]),
                entry(1, "b.pdf", vec![0.9, 0.1]),
            ])
            .await
            .unwrap();

        let results = store.search(&[1.0, 0.0], 2, Some("b.pdf")).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].chunk.source_id, "b.pdf");
    }

    #[tokio::test]
    async fn upsert_replaces_by_chunk_id() {
        let store = InMemoryVectorStore::new();
        store.upsert(&[entry(0, "a.pdf", vec![1.0, 0.0])]).await.unwrap();
        store.upsert(&[entry(0, "a.pdf", vec![0.0, 1.0])]).await.unwrap();
        assert_eq!(store.len().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn clear_empties_the_index() {
        let store = InMemoryVectorStore::new();
        store.upsert(&[entry(0, "a.pdf", vec![1.0, 0.0])]).await.unwrap();
        store.clear().await.unwrap();
        assert_eq!(store.len().await.unwrap(), 0);
        assert!(store.search(&[1.0, 0.0], 4, None).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn dimension_mismatch_is_an_index_error() {
        let store = InMemoryVectorStore::new();
        store.upsert(&[entry(0, "a.pdf", vec![1.0, 0.0])]).await.unwrap();
        let err = store.search(&[1.0, 0.0, 0.0], 4, None).await.unwrap_err();
        assert!(matches!(err, crate::error::RagError::Index { .. }));
    }

    #[tokio::test]
    async fn dimension_check_covers_filtered_out_entries() {
        let store = InMemoryVectorStore::new();
        store.upsert(&[entry(0, "a.pdf", vec![1.0, 0.0])]).await.unwrap();
        let err = store.search(&[1.0, 0.0, 0.0], 4, Some("b.pdf")).await.unwrap_err();
        assert!(matches!(err, crate::error::RagError::Index { .. }));
    }

    #[tokio::test]
    async fn source_ids_are_distinct_and_sorted() {
        let store = InMemoryVectorStore::new();
        store
            .upsert(&[
                entry(0, "b.pdf", vec![1.0, 0.0]),
                entry(1, "a.pdf", vec![0.0, 1.0]),
                entry(2, "a.pdf", vec![0.5, 0.5]),
            ])
            .await
            .unwrap();
        assert_eq!(store.source_ids().await.unwrap(), vec!["a.pdf", "b.pdf"]);
    }
}
