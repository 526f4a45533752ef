//! Output types: the normalized analysis payload and per-run statistics.

use serde::{Deserialize, Serialize};

/// The seven-field analyst read of a transcript.
///
/// After normalization every field is guaranteed present: absent or empty
/// model answers become `[]` for the list fields and `"Not mentioned"` for
/// the string fields.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TranscriptInsights {
    /// Rhetorical tone of management (e.g. "Optimistic", "Cautious").
    pub management_tone: String,
    /// How reliable the disclosed data is for future modelling.
    pub confidence_level: String,
    /// Positive developments, each optionally carrying a short quote.
    pub key_positives: Vec<String>,
    /// Concerns, including ones management glossed over.
    pub key_concerns: Vec<String>,
    /// Specific outlook details.
    pub forward_guidance: String,
    /// Capacity-utilization trend details.
    pub capacity_utilization_trend: String,
    /// New growth initiatives, each optionally carrying a short quote.
    pub new_growth_initiatives: Vec<String>,
}

/// The normalized payload returned to the caller.
///
/// Serialises untagged, so the JSON a consumer sees is either the seven-key
/// insights object or — only under
/// [`crate::config::ParseFallback::RawText`] — the raw-text wrapper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AnalysisPayload {
    /// Successfully parsed and normalized insights.
    Insights(TranscriptInsights),
    /// The model produced no parseable JSON; its text is passed through.
    RawOutput { raw_output: String },
}

impl AnalysisPayload {
    /// The typed insights, when the parse succeeded.
    pub fn insights(&self) -> Option<&TranscriptInsights> {
        match self {
            AnalysisPayload::Insights(i) => Some(i),
            AnalysisPayload::RawOutput { .. } => None,
        }
    }
}

/// Statistics for a single analysis run.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnalysisStats {
    /// Characters of text extracted from the document (post-truncation).
    pub extracted_chars: usize,
    /// True when the extracted text hit the `max_chars` bound.
    pub truncated: bool,
    /// Distinct relevance keywords found in the extracted text.
    pub keyword_hits: usize,
    /// Characters in the reshaped dialogue context.
    pub context_chars: usize,
    /// Prompt tokens reported by the completion API (0 if unreported).
    pub input_tokens: u32,
    /// Completion tokens reported by the API (0 if unreported).
    pub output_tokens: u32,
    /// Wall-clock duration of the completion call.
    pub llm_duration_ms: u64,
    /// Wall-clock duration of the whole analysis.
    pub total_duration_ms: u64,
    /// Model identifier the completion client reported.
    pub model: String,
}

/// Result of a full analysis: the payload plus run statistics.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisOutput {
    pub payload: AnalysisPayload,
    pub stats: AnalysisStats,
}
