//! Page chunking.
//!
//! Splits cleaned pages into overlapping windows of at most `chunk_size`
//! characters, preferring paragraph boundaries, then sentence boundaries,
//! then word boundaries, before falling back to raw character offsets.
//! Splitting is strictly per page — a chunk never spans two pages, so page
//! attribution stays exact.

use crate::document::{Chunk, CleanedPage};

/// Separator hierarchy tried in order when a page exceeds the chunk size.
const SEPARATORS: &[&str] = &["\n\n", ". ", "! ", "? ", " "];

/// A strategy for splitting cleaned pages into chunks.
///
/// Implementations assign `chunk_id` sequentially across the whole call
/// (input page order, then split order) and copy `source_id` and
/// `page_number` from the originating page unchanged.
pub trait Chunker: Send + Sync {
    /// Split pages into provenance-carrying chunks.
    fn chunk(&self, pages: &[CleanedPage]) -> Vec<Chunk>;
}

/// Splits hierarchically: paragraphs, then sentences, then words, then raw
/// characters, with `chunk_overlap` characters carried between consecutive
/// chunks from the same page.
///
/// Sizes are measured in characters, not bytes. Construct via
/// [`RecursiveChunker::new`] with `chunk_overlap < chunk_size` (enforced by
/// the config builder upstream).
#[derive(Debug, Clone)]
pub struct RecursiveChunker {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl RecursiveChunker {
    /// Create a new `RecursiveChunker`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Self {
        Self { chunk_size, chunk_overlap }
    }
}

impl Chunker for RecursiveChunker {
    fn chunk(&self, pages: &[CleanedPage]) -> Vec<Chunk> {
        let mut chunks = Vec::new();
        let mut next_id: u64 = 0;

        for page in pages {
            for piece in split_and_merge(&page.text, self.chunk_size, self.chunk_overlap, SEPARATORS)
            {
                let text = piece.trim();
                if text.is_empty() {
                    continue;
                }
                chunks.push(Chunk {
                    chunk_id: next_id,
                    source_id: page.source_id.clone(),
                    page_number: page.page_number,
                    text: text.to_string(),
                });
                next_id += 1;
            }
        }

        chunks
    }
}

/// Split text by the first separator, merging segments back into pieces
/// that respect `chunk_size`. Oversized pieces are split again with the
/// next-level separator; the last `chunk_overlap` characters of each piece
/// seed the next one.
fn split_and_merge(
    text: &str,
    chunk_size: usize,
    chunk_overlap: usize,
    separators: &[&str],
) -> Vec<String> {
    if char_len(text) <= chunk_size {
        return vec![text.to_string()];
    }
    let Some((separator, remaining)) = separators.split_first() else {
        return split_by_size(text, chunk_size, chunk_overlap);
    };

    let segments = split_keeping_separator(text, separator);

    let mut pieces = Vec::new();
    let mut current = String::new();
    for segment in segments {
        if !current.is_empty() && char_len(&current) + char_len(segment) > chunk_size {
            flush(&mut pieces, std::mem::take(&mut current), chunk_size, chunk_overlap, remaining);
            if chunk_overlap > 0 {
                if let Some(previous) = pieces.last() {
                    current = tail_chars(previous, chunk_overlap).to_string();
                }
            }
        }
        current.push_str(segment);
    }
    if !current.is_empty() {
        flush(&mut pieces, current, chunk_size, chunk_overlap, remaining);
    }

    pieces
}

/// Push a merged piece, splitting it at the next separator level first if
/// it still exceeds `chunk_size`.
fn flush(
    pieces: &mut Vec<String>,
    piece: String,
    chunk_size: usize,
    chunk_overlap: usize,
    separators: &[&str],
) {
    if char_len(&piece) > chunk_size {
        pieces.extend(split_and_merge(&piece, chunk_size, chunk_overlap, separators));
    } else {
        pieces.push(piece);
    }
}

/// Split text at a separator while keeping the separator attached to the
/// preceding segment.
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    let mut result = Vec::new();
    let mut start = 0;

    while let Some(pos) = text[start..].find(separator) {
        let end = start + pos + separator.len();
        result.push(&text[start..end]);
        start = end;
    }

    if start < text.len() {
        result.push(&text[start..]);
    }

    result
}

/// Character-based splitting with overlap, the last-resort level.
fn split_by_size(text: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let chars: Vec<char> = text.chars().collect();
    let step = chunk_size.saturating_sub(chunk_overlap).max(1);

    let mut pieces = Vec::new();
    let mut start = 0;
    while start < chars.len() {
        let end = (start + chunk_size).min(chars.len());
        pieces.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start += step;
    }

    pieces
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// The last `n` characters of `text`, on char boundaries.
fn tail_chars(text: &str, n: usize) -> &str {
    let len = char_len(text);
    if len <= n {
        return text;
    }
    text.char_indices().nth(len - n).map(|(idx, _)| &text[idx..]).unwrap_or(text)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(source_id: &str, page_number: usize, text: &str) -> CleanedPage {
        CleanedPage { source_id: source_id.to_string(), page_number, text: text.to_string() }
    }

    #[test]
    fn short_page_becomes_one_chunk() {
        let chunker = RecursiveChunker::new(100, 20);
        let chunks = chunker.chunk(&[page("a.pdf", 0, "short page text")]);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].text, "short page text");
    }

    #[test]
    fn chunks_inherit_page_provenance() {
        let chunker = RecursiveChunker::new(30, 5);
        let text = "first sentence here. second sentence here. third sentence here.";
        let chunks = chunker.chunk(&[page("doc.pdf", 7, text)]);
        assert!(chunks.len() > 1);
        for chunk in &chunks {
            assert_eq!(chunk.source_id, "doc.pdf");
            assert_eq!(chunk.page_number, 7);
        }
    }

    #[test]
    fn chunk_ids_are_sequential_across_pages() {
        let chunker = RecursiveChunker::new(30, 5);
        let long = "one sentence goes here. another sentence goes here. yet another one.";
        let chunks = chunker.chunk(&[page("a.pdf", 0, long), page("b.pdf", 0, long)]);
        let ids: Vec<u64> = chunks.iter().map(|c| c.chunk_id).collect();
        let expected: Vec<u64> = (0..chunks.len() as u64).collect();
        assert_eq!(ids, expected);
    }

    #[test]
    fn chunks_never_span_pages() {
        let chunker = RecursiveChunker::new(50, 10);
        let pages = [
            page("doc.pdf", 0, "alpha beta gamma delta epsilon zeta eta theta iota kappa"),
            page("doc.pdf", 1, "lambda mu nu xi omicron pi rho sigma tau upsilon phi chi"),
        ];
        for chunk in chunker.chunk(&pages) {
            let origin = &pages[chunk.page_number];
            assert!(origin.text.contains(chunk.text.trim()));
        }
    }

    #[test]
    fn chunk_size_bound_holds() {
        let chunker = RecursiveChunker::new(40, 10);
        let text = "word ".repeat(100);
        for chunk in chunker.chunk(&[page("a.pdf", 0, &text)]) {
            assert!(chunk.text.chars().count() <= 40, "oversized chunk: {:?}", chunk.text);
        }
    }

    #[test]
    fn prefers_paragraph_boundaries() {
        let first = "this paragraph is about telehealth and remote care";
        let second = "this paragraph is about readmission rates instead";
        let text = format!("{first}\n\n{second}");
        let chunker = RecursiveChunker::new(60, 10);
        let chunks = chunker.chunk(&[page("a.pdf", 0, &text)]);
        assert_eq!(chunks[0].text, first);
    }

    #[test]
    fn consecutive_chunks_share_overlap_context() {
        let first = "alpha beta gamma delta epsilon zeta";
        let second = "eta theta iota kappa";
        let text = format!("{first}\n\n{second}");
        let chunker = RecursiveChunker::new(40, 10);
        let chunks = chunker.chunk(&[page("a.pdf", 0, &text)]);
        assert_eq!(chunks.len(), 2);
        // The second chunk is seeded with the tail of the first paragraph.
        assert!(chunks[1].text.starts_with("lon zeta"));
        assert!(chunks[1].text.ends_with(second));
    }

    #[test]
    fn splits_unbroken_text_by_characters() {
        let text = "x".repeat(120);
        let chunker = RecursiveChunker::new(50, 10);
        let chunks = chunker.chunk(&[page("a.pdf", 0, &text)]);
        assert!(chunks.len() >= 3);
        for chunk in &chunks {
            assert!(chunk.text.chars().count() <= 50);
        }
    }

    #[test]
    fn empty_pages_produce_no_chunks() {
        let chunker = RecursiveChunker::new(50, 10);
        assert!(chunker.chunk(&[]).is_empty());
        assert!(chunker.chunk(&[page("a.pdf", 0, "")]).is_empty());
    }
}
