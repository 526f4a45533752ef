//! Text extraction: pull the text layer out of a PDF, bounded in size.
//!
//! Uses [`pdf_extract`] page by page. Since `pdf_extract` can panic on
//! malformed input (rather than returning errors), the call is wrapped in
//! [`std::panic::catch_unwind`]. Any failure — corrupt file, encrypted
//! document, library panic — degrades to an empty string rather than an
//! error: the relevance gate downstream treats zero-length text as a
//! rejection, which is the client-facing status we want for an unreadable
//! upload.

use std::panic::{self, AssertUnwindSafe};
use tracing::{debug, warn};

/// Bounded extraction result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExtractedText {
    pub text: String,
    /// True only when the bound actually cut characters off; a document
    /// whose text is naturally exactly `max_chars` long is not truncated.
    pub truncated: bool,
}

/// Extract text from PDF bytes, truncated to the first `max_chars`
/// characters.
///
/// Pages yielding no text contribute nothing; non-empty pages are
/// concatenated with a trailing newline each. The bound counts characters,
/// not bytes, and is a hard cut — long documents lose their tail.
pub fn extract_text(bytes: &[u8], max_chars: usize) -> ExtractedText {
    let pages = match extract_pages(bytes) {
        Some(pages) => pages,
        None => {
            return ExtractedText {
                text: String::new(),
                truncated: false,
            }
        }
    };

    let mut text = String::new();
    for page in &pages {
        if !page.trim().is_empty() {
            text.push_str(page);
            text.push('\n');
        }
    }

    debug!(
        "Extracted {} chars from {} pages (bound: {})",
        text.chars().count(),
        pages.len(),
        max_chars
    );

    let (bounded, truncated) = bound_text(&text, max_chars);
    ExtractedText {
        text: bounded.to_string(),
        truncated,
    }
}

/// Apply the character bound and report whether it cut anything.
pub fn bound_text(text: &str, max_chars: usize) -> (&str, bool) {
    let cut = truncate_chars(text, max_chars);
    (cut, cut.len() < text.len())
}

/// Per-page extraction with panic containment. `None` on any failure.
fn extract_pages(bytes: &[u8]) -> Option<Vec<String>> {
    let data = bytes.to_vec(); // owned copy for the unwind boundary
    let result = panic::catch_unwind(AssertUnwindSafe(|| {
        pdf_extract::extract_text_from_mem_by_pages(&data)
    }));
    match result {
        Ok(Ok(pages)) => Some(pages),
        Ok(Err(e)) => {
            warn!("PDF extraction failed, continuing with empty text: {e}");
            None
        }
        Err(_) => {
            warn!("PDF extraction panicked (malformed document), continuing with empty text");
            None
        }
    }
}

/// Cut `text` at `max_chars` characters, respecting UTF-8 boundaries.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn garbage_bytes_yield_empty_string() {
        let out = extract_text(b"definitely not a pdf", 25_000);
        assert_eq!(out.text, "");
        assert!(!out.truncated);
        assert_eq!(extract_text(&[], 25_000).text, "");
    }

    #[test]
    fn exact_bound_length_is_not_truncated() {
        let (text, truncated) = bound_text("hello", 5);
        assert_eq!(text, "hello");
        assert!(!truncated, "a natural exact fit must not count as a cut");
    }

    #[test]
    fn over_bound_text_is_truncated() {
        let (text, truncated) = bound_text("hello there", 5);
        assert_eq!(text, "hello");
        assert!(truncated);
    }

    #[test]
    fn truncate_short_input_unchanged() {
        assert_eq!(truncate_chars("hello", 10), "hello");
        assert_eq!(truncate_chars("hello", 5), "hello");
    }

    #[test]
    fn truncate_counts_chars_not_bytes() {
        // Each 'é' is 2 bytes; a byte-based cut at 3 would split a char.
        let s = "ééé";
        assert_eq!(truncate_chars(s, 2), "éé");
    }

    #[test]
    fn truncate_zero_is_empty() {
        assert_eq!(truncate_chars("anything", 0), "");
    }
}
