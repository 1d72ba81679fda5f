//! File-backed vector store.
//!
//! [`DiskVectorStore`] keeps the working set in memory and persists it as a
//! single JSON file. [`persist`](DiskVectorStore::persist) overwrites the
//! file wholesale; there is no incremental merge. Build (write) and query
//! (read) are separate process phases — the ingest command builds and
//! persists, the chat command opens the file read-only.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::Path;

use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::info;

use crate::document::{IndexEntry, SearchResult};
use crate::error::{RagError, Result};
use crate::vectorstore::{VectorStore, rank_entries};

/// A vector store persisted to one JSON file, searched by cosine similarity.
#[derive(Debug, Default)]
pub struct DiskVectorStore {
    entries: RwLock<HashMap<u64, IndexEntry>>,
}

impl DiskVectorStore {
    /// Create a new empty store (nothing on disk yet).
    pub fn new() -> Self {
        Self::default()
    }

    /// Open a persisted index file.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Index`] if the file cannot be read or parsed.
    pub fn open(path: &Path) -> Result<Self> {
        let bytes = fs::read(path).map_err(|e| RagError::Index {
            backend: "disk".into(),
            message: format!("failed to read index at {}: {e}", path.display()),
        })?;
        let stored: Vec<IndexEntry> = serde_json::from_slice(&bytes).map_err(|e| {
            RagError::Index {
                backend: "disk".into(),
                message: format!("failed to parse index at {}: {e}", path.display()),
            }
        })?;

        let entries: HashMap<u64, IndexEntry> =
            stored.into_iter().map(|entry| (entry.chunk.chunk_id, entry)).collect();
        info!(path = %path.display(), entries = entries.len(), "opened index");

        Ok(Self { entries: RwLock::new(entries) })
    }

    /// Write the current entries to `path`, replacing any prior contents.
    ///
    /// Entries are written in `chunk_id` order so the file is deterministic
    /// for a given ingestion run.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Index`] if the file cannot be written.
    pub async fn persist(&self, path: &Path) -> Result<()> {
        let entries = self.entries.read().await;
        let mut stored: Vec<&IndexEntry> = entries.values().collect();
        stored.sort_by_key(|entry| entry.chunk.chunk_id);

        let json = serde_json::to_vec(&stored).map_err(|e| RagError::Index {
            backend: "disk".into(),
            message: format!("failed to serialize index: {e}"),
        })?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| RagError::Index {
                backend: "disk".into(),
                message: format!("failed to create {}: {e}", parent.display()),
            })?;
        }
        fs::write(path, json).map_err(|e| RagError::Index {
            backend: "disk".into(),
            message: format!("failed to write index at {}: {e}", path.display()),
        })?;

        info!(path = %path.display(), entries = stored.len(), "persisted index");
        Ok(())
    }
}

#[async_trait]
impl VectorStore for DiskVectorStore {
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
        rank_entries(entries.values(), embedding, top_k, source_filter, "disk")
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
