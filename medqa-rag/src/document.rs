//! Data types for pages, chunks, and search results.

use serde::{Deserialize, Serialize};

/// One physical document page after cleaning.
///
/// Pages whose cleaned text is empty never become a `CleanedPage`; the
/// loader drops them so no chunk or citation can ever point at a page with
/// no extractable text.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CleanedPage {
    /// The originating file's base name, stable across ingestion and query
    /// time so citations and source filters agree on it.
    pub source_id: String,
    /// Zero-indexed page number within the source document.
    pub page_number: usize,
    /// Cleaned page text (no null bytes, normalized whitespace).
    pub text: String,
}

/// A bounded window of page text, the unit of retrieval.
///
/// Chunks never span two pages; `source_id` and `page_number` are inherited
/// unchanged from the originating [`CleanedPage`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Chunk {
    /// Sequential identifier, unique within one ingestion run.
    pub chunk_id: u64,
    /// Base name of the originating document.
    pub source_id: String,
    /// Zero-indexed page the chunk was cut from.
    pub page_number: usize,
    /// The chunk text, at most `chunk_size` characters.
    pub text: String,
}

impl Chunk {
    /// Human-readable citation for this chunk, with a 1-indexed page number.
    pub fn citation(&self) -> String {
        format!("{} (page {})", self.source_id, self.page_number + 1)
    }
}

/// A chunk paired with its embedding vector, as stored in the index.
///
/// Created at build time and immutable thereafter.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct IndexEntry {
    /// The indexed chunk payload.
    pub chunk: Chunk,
    /// The embedding vector for the chunk's text.
    pub embedding: Vec<f32>,
}

/// A retrieved [`Chunk`] paired with a relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved chunk.
    pub chunk: Chunk,
    /// Cosine similarity to the query (higher is more relevant).
    pub score: f32,
}
