//! Completion stage: assemble the prompt and make the one network call.
//!
//! Intentionally thin — the analytical instructions live in
//! [`crate::prompts`] and the HTTP mechanics live in [`crate::llm`], so this
//! stage only resolves the template, interpolates the context, and forwards
//! the reply. No retries: a transient upstream failure propagates to the
//! caller as-is.

use crate::config::AnalysisConfig;
use crate::error::AnalyzeError;
use crate::llm::{CompletionClient, CompletionResponse};
use crate::prompts::{build_prompt, DEFAULT_ANALYSIS_PROMPT};
use std::sync::Arc;
use std::time::Instant;
use tracing::debug;

/// Resolve the instruction template, most- to least-specific:
/// `prompt_file` (read now, unreadable → per-request config error) →
/// inline `prompt_template` → built-in default.
pub async fn resolve_template(config: &AnalysisConfig) -> Result<String, AnalyzeError> {
    if let Some(ref path) = config.prompt_file {
        return tokio::fs::read_to_string(path).await.map_err(|e| {
            AnalyzeError::PromptFileUnreadable {
                path: path.clone(),
                detail: e.to_string(),
            }
        });
    }
    if let Some(ref template) = config.prompt_template {
        return Ok(template.clone());
    }
    Ok(DEFAULT_ANALYSIS_PROMPT.to_string())
}

/// Submit the reshaped context to the completion client.
///
/// Returns the raw (untrusted) model reply plus the wall-clock duration of
/// the call in milliseconds.
pub async fn run_completion(
    client: &Arc<dyn CompletionClient>,
    context: &str,
    config: &AnalysisConfig,
) -> Result<(CompletionResponse, u64), AnalyzeError> {
    let template = resolve_template(config).await?;
    let prompt = build_prompt(&template, context);

    debug!(
        "Submitting prompt: {} chars, model {}",
        prompt.chars().count(),
        client.model()
    );

    let start = Instant::now();
    let response = client.complete(&prompt).await?;
    let elapsed_ms = start.elapsed().as_millis() as u64;

    if let Some(ref usage) = response.usage {
        debug!(
            "Completion done: {} input tokens, {} output tokens, {}ms",
            usage.prompt_tokens, usage.completion_tokens, elapsed_ms
        );
    } else {
        debug!("Completion done in {}ms (no usage reported)", elapsed_ms);
    }

    Ok((response, elapsed_ms))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AnalysisConfig;

    #[tokio::test]
    async fn template_defaults_to_builtin() {
        let config = AnalysisConfig::default();
        let template = resolve_template(&config).await.expect("default template");
        assert_eq!(template, DEFAULT_ANALYSIS_PROMPT);
    }

    #[tokio::test]
    async fn inline_template_overrides_builtin() {
        let config = AnalysisConfig::builder()
            .prompt_template("Just summarise.")
            .build()
            .unwrap();
        let template = resolve_template(&config).await.unwrap();
        assert_eq!(template, "Just summarise.");
    }

    #[tokio::test]
    async fn missing_prompt_file_is_per_request_error() {
        let config = AnalysisConfig::builder()
            .prompt_file("/definitely/not/a/real/prompt.txt")
            .build()
            .unwrap();
        let err = resolve_template(&config).await.unwrap_err();
        assert!(matches!(err, AnalyzeError::PromptFileUnreadable { .. }));
    }

    #[tokio::test]
    async fn prompt_file_takes_precedence_over_inline() {
        use std::io::Write;
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "From the file.").unwrap();

        let config = AnalysisConfig::builder()
            .prompt_template("From the inline override.")
            .prompt_file(file.path())
            .build()
            .unwrap();
        let template = resolve_template(&config).await.unwrap();
        assert_eq!(template, "From the file.");
    }
}
