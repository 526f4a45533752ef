//! Error types for the callbrief library.
//!
//! One error enum covers the whole pipeline, but variants fall into two
//! classes a caller must treat differently:
//!
//! * **Invalid input** — the document itself was rejected
//!   ([`AnalyzeError::NotEarningsCall`]). A serving layer should map this to
//!   a client-facing status; no completion call was made.
//!
//! * **System failure** — everything else: unreadable files, missing
//!   credentials, upstream API errors, unparseable model output. These map
//!   to a server-facing status.
//!
//! Use [`AnalyzeError::is_invalid_input`] to branch between the two without
//! matching on individual variants.
//!
//! Partial model output (a parse that succeeds but misses contractual keys)
//! is deliberately *not* an error — it is repaired with defaults during
//! normalization. See [`crate::pipeline::normalize`].

use crate::llm::LlmError;
use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the callbrief library.
#[derive(Debug, Error)]
pub enum AnalyzeError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{}'\nCheck the path exists and is readable.", path.display())]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{}'\nTry: chmod +r '{}'", path.display(), path.display())]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{}'\nFirst bytes: {magic:?}", path.display())]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    /// The keyword gate rejected the document before any completion call.
    ///
    /// This is the one *invalid input* variant: the pipeline worked, the
    /// document just does not look like an earnings-call transcript.
    #[error(
        "Document does not appear to be a financial transcript \
         ({hits}/{needed} keywords matched)"
    )]
    NotEarningsCall { hits: usize, needed: usize },

    // ── Configuration errors ──────────────────────────────────────────────
    /// No completion client was injected and none could be built from the
    /// environment.
    #[error("No completion client configured.\n{hint}")]
    ClientNotConfigured { hint: String },

    /// A prompt-template file was configured but could not be read.
    #[error("Failed to read prompt template '{}': {detail}", path.display())]
    PromptFileUnreadable { path: PathBuf, detail: String },

    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Upstream errors ───────────────────────────────────────────────────
    /// The completion API call failed. Never retried.
    #[error("Completion request failed: {0}")]
    Completion(#[from] LlmError),

    /// Neither a direct parse nor brace-scan recovery produced a JSON
    /// object from the model's output.
    #[error("Failed to parse analyst output: {detail}\nModel said: {snippet}")]
    UnparseableOutput { detail: String, snippet: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not write the result JSON to the requested file.
    #[error("Failed to write output file '{}': {source}", path.display())]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AnalyzeError {
    /// True when the *document* was rejected rather than the system failing.
    ///
    /// Serving layers map this to a client-facing status (HTTP 400-class);
    /// everything else is a server-side fault.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, AnalyzeError::NotEarningsCall { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_earnings_call_display_and_class() {
        let e = AnalyzeError::NotEarningsCall { hits: 1, needed: 3 };
        assert!(e.to_string().contains("1/3"), "got: {e}");
        assert!(e.is_invalid_input());
    }

    #[test]
    fn unparseable_output_display() {
        let e = AnalyzeError::UnparseableOutput {
            detail: "no JSON object found".into(),
            snippet: "I'm sorry, I cannot".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("no JSON object found"));
        assert!(msg.contains("I'm sorry"));
        assert!(!e.is_invalid_input());
    }

    #[test]
    fn not_a_pdf_display() {
        let e = AnalyzeError::NotAPdf {
            path: PathBuf::from("notes.txt"),
            magic: *b"Dear",
        };
        assert!(e.to_string().contains("notes.txt"));
    }

    #[test]
    fn client_not_configured_keeps_hint() {
        let e = AnalyzeError::ClientNotConfigured {
            hint: "Set GROQ_API_KEY or OPENAI_API_KEY.".into(),
        };
        assert!(e.to_string().contains("GROQ_API_KEY"));
    }
}
