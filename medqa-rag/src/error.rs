//! Error types for the `medqa-rag` crate.

use thiserror::Error;

/// Errors that can occur during ingestion or retrieval.
#[derive(Debug, Error)]
pub enum RagError {
    /// A source document could not be read or parsed during ingestion.
    ///
    /// Ingestion is fail-fast: one bad document aborts the whole run rather
    /// than silently producing a partial index.
    #[error("Ingestion error ({source_id}): {message}")]
    Ingestion {
        /// The document (or directory) that failed.
        source_id: String,
        /// A description of the failure.
        message: String,
    },

    /// The embedding backend is unreachable or returned an error.
    ///
    /// Never retried and never substituted with a default vector; the query
    /// or ingestion run that triggered it fails.
    #[error("Embedding error ({provider}): {message}")]
    Embedding {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// An error in the vector index backend.
    #[error("Index error ({backend}): {message}")]
    Index {
        /// The index backend that produced the error.
        backend: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    Config(String),
}

/// A convenience result type for ingestion and retrieval operations.
pub type Result<T> = std::result::Result<T, RagError>;
