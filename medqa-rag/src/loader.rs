//! PDF corpus loading.
//!
//! Enumerates the PDF files in a corpus directory (non-recursive), extracts
//! text page by page, cleans each page, and attaches provenance metadata.
//! Ingestion is fail-fast: a file that cannot be read or parsed as a PDF
//! aborts the run with [`RagError::Ingestion`] instead of silently producing
//! a partial corpus.

use std::fs;
use std::path::Path;

use tracing::{debug, info};

use crate::cleaning::clean_text;
use crate::document::CleanedPage;
use crate::error::{RagError, Result};

/// Load every PDF in `corpus_dir` as a sequence of cleaned pages.
///
/// Files are processed in name order so ingestion is deterministic. Pages
/// whose cleaned text is empty are dropped; they can never be chunked,
/// indexed, or cited.
///
/// # Errors
///
/// Returns [`RagError::Ingestion`] if the directory cannot be read or any
/// PDF cannot be read or parsed.
pub fn load_corpus(corpus_dir: &Path) -> Result<Vec<CleanedPage>> {
    let dir_id = corpus_dir.display().to_string();
    let entries = fs::read_dir(corpus_dir).map_err(|e| RagError::Ingestion {
        source_id: dir_id.clone(),
        message: format!("failed to read corpus directory: {e}"),
    })?;

    let mut pdf_paths = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|e| RagError::Ingestion {
            source_id: dir_id.clone(),
            message: format!("failed to read directory entry: {e}"),
        })?;
        let path = entry.path();
        if path.is_file() && path.extension().is_some_and(|ext| ext.eq_ignore_ascii_case("pdf")) {
            pdf_paths.push(path);
        }
    }
    pdf_paths.sort();

    let mut pages = Vec::new();
    for path in &pdf_paths {
        pages.extend(load_pdf(path)?);
    }

    info!(sources = pdf_paths.len(), pages = pages.len(), "loaded corpus");
    Ok(pages)
}

/// Load one PDF as cleaned pages with 0-indexed page numbers.
///
/// `source_id` is the file's base name; it must match what a source-filter
/// selector offers, so it is used verbatim for filtering and citations.
fn load_pdf(path: &Path) -> Result<Vec<CleanedPage>> {
    let source_id = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    let bytes = fs::read(path).map_err(|e| RagError::Ingestion {
        source_id: source_id.clone(),
        message: format!("failed to read file: {e}"),
    })?;

    let raw_pages =
        pdf_extract::extract_text_from_mem_by_pages(&bytes).map_err(|e| RagError::Ingestion {
            source_id: source_id.clone(),
            message: format!("failed to parse PDF: {e}"),
        })?;

    let mut pages = Vec::new();
    for (page_number, raw) in raw_pages.iter().enumerate() {
        let text = clean_text(raw);
        if text.is_empty() {
            debug!(source = %source_id, page = page_number, "dropping page with no extractable text");
            continue;
        }
        pages.push(CleanedPage { source_id: source_id.clone(), page_number, text });
    }

    debug!(source = %source_id, pages = pages.len(), "loaded document");
    Ok(pages)
}
