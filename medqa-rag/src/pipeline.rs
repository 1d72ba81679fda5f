//! Ingestion pipeline.
//!
//! The [`Ingestor`] runs the offline build: load → clean → chunk → embed →
//! index. It is constructed from injected collaborators via
//! [`Ingestor::builder()`]; the caller persists the resulting store.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use medqa_rag::{Ingestor, RecursiveChunker, DiskVectorStore};
//!
//! let store = Arc::new(DiskVectorStore::new());
//! let ingestor = Ingestor::builder()
//!     .chunker(Arc::new(RecursiveChunker::new(700, 100)))
//!     .embedding_provider(Arc::new(embedder))
//!     .vector_store(store.clone())
//!     .build()?;
//!
//! let report = ingestor.ingest(corpus_dir).await?;
//! store.persist(index_path).await?;
//! ```

use std::path::Path;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::chunking::Chunker;
use crate::document::IndexEntry;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::loader::load_corpus;
use crate::vectorstore::VectorStore;

/// Counts from one ingestion run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngestReport {
    /// Pages that survived cleaning.
    pub pages: usize,
    /// Chunks embedded and indexed.
    pub chunks: usize,
}

/// The offline ingestion pipeline: load → chunk → embed → index.
pub struct Ingestor {
    chunker: Arc<dyn Chunker>,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
}

impl std::fmt::Debug for Ingestor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ingestor").finish_non_exhaustive()
    }
}

impl Ingestor {
    /// Create a new [`IngestorBuilder`].
    pub fn builder() -> IngestorBuilder {
        IngestorBuilder::default()
    }

    /// Ingest every PDF under `corpus_dir` into the vector store.
    ///
    /// The store is cleared first: re-running ingestion replaces the index
    /// rather than merging into it. Fail-fast: any unreadable document or
    /// embedding failure aborts the run.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Ingestion`] for document failures,
    /// [`RagError::Embedding`] when the embedding backend fails, and
    /// [`RagError::Index`] when the store does.
    pub async fn ingest(&self, corpus_dir: &Path) -> Result<IngestReport> {
        let pages = load_corpus(corpus_dir)?;
        let chunks = self.chunker.chunk(&pages);
        info!(pages = pages.len(), chunks = chunks.len(), "chunked corpus");

        self.vector_store.clear().await?;
        if chunks.is_empty() {
            warn!("corpus produced no chunks; index is empty");
            return Ok(IngestReport { pages: pages.len(), chunks: 0 });
        }

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings = self.embedding_provider.embed_batch(&texts).await.map_err(|e| {
            error!(error = %e, "embedding failed during ingestion");
            e
        })?;

        let entries: Vec<IndexEntry> = chunks
            .into_iter()
            .zip(embeddings)
            .map(|(chunk, embedding)| IndexEntry { chunk, embedding })
            .collect();

        self.vector_store.upsert(&entries).await?;
        info!(entries = entries.len(), "indexed corpus");

        Ok(IngestReport { pages: pages.len(), chunks: entries.len() })
    }
}

/// Builder for constructing an [`Ingestor`]. All fields are required.
#[derive(Default)]
pub struct IngestorBuilder {
    chunker: Option<Arc<dyn Chunker>>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    vector_store: Option<Arc<dyn VectorStore>>,
}

impl IngestorBuilder {
    /// Set the chunking strategy.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Set the embedding provider.
    ///
    /// Must be the same provider handed to the retriever; build-time and
    /// query-time embeddings have to share one embedding space.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the vector store backend.
    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.vector_store = Some(store);
        self
    }

    /// Build the [`Ingestor`], validating that all fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if any required field is missing.
    pub fn build(self) -> Result<Ingestor> {
        let chunker =
            self.chunker.ok_or_else(|| RagError::Config("chunker is required".to_string()))?;
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::Config("embedding_provider is required".to_string()))?;
        let vector_store = self
            .vector_store
            .ok_or_else(|| RagError::Config("vector_store is required".to_string()))?;

        Ok(Ingestor { chunker, embedding_provider, vector_store })
    }
}
