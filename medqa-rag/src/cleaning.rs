//! Text normalization for raw extracted page text.
//!
//! [`clean_text`] is a pure function applied to every page before chunking:
//! it removes null bytes, normalizes line endings and whitespace runs, and
//! truncates trailing reference sections that add noise without answer value.

use std::sync::OnceLock;

use regex::Regex;

/// Section headers that mark trailing bibliographic content.
const TRAILING_SECTION_MARKERS: &[&str] = &["references", "bibliography"];

/// A marker only counts as a section header when it appears this far into
/// the text; earlier occurrences are assumed to be body-text mentions.
const TRAILING_SECTION_RATIO: f32 = 0.7;

fn horizontal_ws() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"[ \t]+").expect("valid regex"))
}

fn excess_newlines() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n{3,}").expect("valid regex"))
}

/// Clean raw page text: drop null bytes, normalize line endings, collapse
/// whitespace runs, strip a trailing references/bibliography section, and
/// trim. Returns an empty string for empty input.
pub fn clean_text(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut text = text.replace('\0', " ");
    text = text.replace("\r\n", "\n").replace('\r', "\n");

    // Last marker occurrence, if any; truncate only when it sits past the
    // 70% offset, where it is a section header rather than a mention. The
    // ratio is judged in characters, not bytes, so multibyte text ahead of
    // the marker does not shift the cutoff.
    let cutoff = TRAILING_SECTION_MARKERS
        .iter()
        .filter_map(|marker| rfind_ignore_ascii_case(&text, marker))
        .max();
    if let Some(idx) = cutoff {
        let marker_chars = text[..idx].chars().count();
        let total_chars = text.chars().count();
        if marker_chars as f32 > total_chars as f32 * TRAILING_SECTION_RATIO {
            text.truncate(idx);
        }
    }

    let text = horizontal_ws().replace_all(&text, " ");
    let text = excess_newlines().replace_all(&text, "\n\n");

    text.trim().to_string()
}

/// Byte offset of the last ASCII-case-insensitive occurrence of `needle`.
///
/// The returned offset is a char boundary because the needles are ASCII.
fn rfind_ignore_ascii_case(haystack: &str, needle: &str) -> Option<usize> {
    let h = haystack.as_bytes();
    let n = needle.as_bytes();
    if n.is_empty() || h.len() < n.len() {
        return None;
    }
    (0..=h.len() - n.len()).rev().find(|&i| h[i..i + n.len()].eq_ignore_ascii_case(n))
}
