//! # medqa-rag
//!
//! Ingestion and retrieval for the MedQA closed-corpus document assistant.
//!
//! The offline build loads a directory of PDFs page by page, cleans the
//! extracted text, splits it into overlapping per-page chunks, embeds them,
//! and persists a vector index. At query time the [`Retriever`] embeds the
//! question, searches the index (optionally scoped to one source), and
//! applies a cosine-similarity cutoff to decide what counts as evidence.
//!
//! ## Overview
//!
//! - [`clean_text`] — pure page-text normalization
//! - [`load_corpus`] — PDF directory → cleaned pages with provenance
//! - [`RecursiveChunker`] — paragraph/sentence/word-boundary splitting
//! - [`EmbeddingProvider`] — pluggable embedding backend
//!   ([`OpenAIEmbeddingProvider`] with the `openai` feature)
//! - [`VectorStore`] — index backend ([`InMemoryVectorStore`],
//!   [`DiskVectorStore`])
//! - [`Ingestor`] — offline build pipeline
//! - [`Retriever`] — query-time evidence retrieval
//!
//! The embedding provider is constructed once per process and shared by the
//! ingestor and the retriever so that build-time and query-time vectors live
//! in the same embedding space.

pub mod chunking;
pub mod cleaning;
pub mod config;
pub mod diskstore;
pub mod document;
pub mod embedding;
pub mod error;
pub mod inmemory;
pub mod loader;
#[cfg(feature = "openai")]
pub mod openai;
pub mod pipeline;
pub mod retriever;
pub mod vectorstore;

pub use chunking::{Chunker, RecursiveChunker};
pub use cleaning::clean_text;
pub use config::{RagConfig, RagConfigBuilder};
pub use diskstore::DiskVectorStore;
pub use document::{Chunk, CleanedPage, IndexEntry, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{RagError, Result};
pub use inmemory::InMemoryVectorStore;
pub use loader::load_corpus;
#[cfg(feature = "openai")]
pub use openai::OpenAIEmbeddingProvider;
pub use pipeline::{IngestReport, Ingestor, IngestorBuilder};
pub use retriever::Retriever;
pub use vectorstore::VectorStore;
