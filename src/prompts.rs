//! Analyst prompts for transcript summarisation.
//!
//! Centralising the prompt here serves two purposes:
//!
//! 1. **Single source of truth** — changing the analytical instructions or
//!    the required JSON shape means editing exactly one place.
//!
//! 2. **Testability** — unit tests can inspect the assembled prompt without
//!    a live model, making prompt regressions easy to catch.
//!
//! Callers can override the default via
//! [`crate::config::AnalysisConfig::prompt_template`] (inline) or
//! [`crate::config::AnalysisConfig::prompt_file`] (read at call time);
//! the constant here is used only when no override is provided.

/// Default analyst instruction template.
///
/// The transcript context is appended by [`build_prompt`]; the template
/// itself carries the persona, the strict JSON shape, and the grading
/// guidelines.
pub const DEFAULT_ANALYSIS_PROMPT: &str = r#"You are a Senior Equity Research Analyst.

TASK: Summarize the management's perspective versus the underlying business reality.

STRICT JSON STRUCTURE:
{
"management_tone": "Identify the rhetorical tone (e.g., Optimistic, Resilient, Cautious).",
"confidence_level": "How reliable is the data provided for future modeling?",
"key_positives": ["Point (Quote: '...')"],
"key_concerns": ["Point (Quote: '...')"],
"forward_guidance": "Specific outlook details",
"capacity_utilization_trend": "Trend details",
"new_growth_initiatives": ["Initiative (Quote: '...')"]
}

GUIDELINES:
- TONE: Even if there are declines, if Management focuses on 'Record TCV' and '$30B milestones', the tone is "Optimistic/Resilient".
- CONCERNS: Be ruthless. If the Consumer segment declined 0.2%, list it as a concern even if Management glosses over it.
- QUOTES: Keep them under 15 words."#;

/// Assemble the full prompt: instruction template plus the reshaped
/// transcript context.
pub fn build_prompt(template: &str, context: &str) -> String {
    format!("{template}\n\nTranscript:\n{context}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_template_names_all_contract_keys() {
        for key in [
            "management_tone",
            "confidence_level",
            "key_positives",
            "key_concerns",
            "forward_guidance",
            "capacity_utilization_trend",
            "new_growth_initiatives",
        ] {
            assert!(
                DEFAULT_ANALYSIS_PROMPT.contains(key),
                "template must require '{key}'"
            );
        }
    }

    #[test]
    fn build_prompt_appends_transcript_section() {
        let prompt = build_prompt("Analyze this.", "\nCEO Jane Doe: revenue grew.");
        assert!(prompt.starts_with("Analyze this."));
        assert!(prompt.contains("\n\nTranscript:\n"));
        assert!(prompt.ends_with("CEO Jane Doe: revenue grew."));
    }
}
