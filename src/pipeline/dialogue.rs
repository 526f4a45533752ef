//! Dialogue reshaping: keep the conversational flow, drop operator noise.
//!
//! The downstream model needs management remarks *and* analyst questions to
//! attribute concerns correctly, so no content line is ever dropped — with
//! one exception: lines spoken by the call operator ("Operator: Please hold
//! while we assemble the queue"), which are pure boilerplate and waste
//! context tokens.
//!
//! ## Output shape
//!
//! Lines are space-joined, but each detected speaker line is emitted with a
//! literal leading `'\n'`. The result is a semi-structured single string in
//! which turn boundaries are recoverable by newline scanning even though the
//! overall join uses spaces. Downstream prompt formatting depends on this
//! exact behaviour; do not "fix" the join.

use once_cell::sync::Lazy;
use regex::Regex;

/// A speaker label: capital letter, then 2–40 chars of letters, spaces,
/// periods, hyphens, or apostrophes, then a colon. Matches "John Doe:",
/// "Operator:", "Mary O'Brien - CFO:" style lines.
static RE_SPEAKER: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Z][A-Za-z .\-']{2,40}:").unwrap());

/// Reshape raw transcript text into a speaker-annotated context string.
///
/// Per line (split strictly on `'\n'`, trimmed of surrounding whitespace):
/// - speaker line containing "operator:" (lowercased) → dropped entirely;
/// - other speaker line → emitted as `"\n" + line`, marking a new turn;
/// - anything else → emitted unchanged as a continuation of the turn.
pub fn reshape_dialogue(text: &str) -> String {
    let mut cleaned: Vec<String> = Vec::new();

    for line in text.split('\n') {
        let line = line.trim();
        if RE_SPEAKER.is_match(line) {
            if line.to_lowercase().contains("operator:") {
                continue;
            }
            cleaned.push(format!("\n{line}"));
        } else {
            cleaned.push(line.to_string());
        }
    }

    cleaned.join(" ")
}
