//! Relevance gate: is this document an earnings-call transcript at all?
//!
//! A deliberately crude keyword heuristic. It counts *presence* of each term
//! (not frequency), passes at three distinct hits, and makes no attempt at
//! synonyms or stemming — a transcript that says "turnover" instead of
//! "revenue" throughout can be rejected, and that is accepted behaviour.
//! The gate exists to stop obviously-wrong uploads before the paid
//! completion call, not to classify documents well.

/// Terms that flag a financial transcript.
pub const KEYWORDS: [&str; 7] = [
    "revenue", "ebitda", "quarter", "analyst", "guidance", "margin", "fiscal",
];

/// Distinct keyword hits required to pass the gate.
pub const MIN_KEYWORD_HITS: usize = 3;

/// Count how many distinct keywords appear in `text` (case-insensitive).
pub fn keyword_hits(text: &str) -> usize {
    let lower = text.to_lowercase();
    KEYWORDS.iter().filter(|k| lower.contains(*k)).count()
}

/// True iff at least [`MIN_KEYWORD_HITS`] distinct keywords are present.
pub fn is_earnings_call(text: &str) -> bool {
    keyword_hits(text) >= MIN_KEYWORD_HITS
}
