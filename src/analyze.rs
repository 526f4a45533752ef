//! Eager (full-document) analysis entry points.
//!
//! Data flows strictly linearly through the pipeline stages; one call
//! produces one result, nothing is cached or shared across calls, and the
//! only side effect is the single completion request. The three entry
//! points differ only in how much of the pipeline they skip:
//! [`analyze`] starts from a path, [`analyze_bytes`] from uploaded bytes,
//! [`analyze_text`] from already-extracted text.

use crate::config::{AnalysisConfig, ParseFallback};
use crate::error::AnalyzeError;
use crate::llm::{ChatClientConfig, CompletionClient, OpenAiChatClient};
use crate::output::{AnalysisOutput, AnalysisPayload, AnalysisStats};
use crate::pipeline::{completion, dialogue, extract, normalize, relevance};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Analyze a transcript PDF on the local filesystem.
///
/// This is the primary entry point for the library.
///
/// # Errors
/// - File not found / permission denied / not a PDF
/// - [`AnalyzeError::NotEarningsCall`] when the keyword gate rejects the
///   document (check [`AnalyzeError::is_invalid_input`])
/// - Upstream completion failures and unparseable output (under the default
///   [`ParseFallback::Reject`] policy)
pub async fn analyze(
    input: impl AsRef<Path>,
    config: &AnalysisConfig,
) -> Result<AnalysisOutput, AnalyzeError> {
    let path = input.as_ref();
    info!("Starting analysis: {}", path.display());

    let bytes = read_pdf(path).await?;
    analyze_bytes(&bytes, config).await
}

/// Analyze a transcript PDF held in memory (the upload path).
pub async fn analyze_bytes(
    bytes: &[u8],
    config: &AnalysisConfig,
) -> Result<AnalysisOutput, AnalyzeError> {
    let total_start = Instant::now();

    // ── Step 1: Extract bounded text ─────────────────────────────────────
    let extracted = extract::extract_text(bytes, config.max_chars);
    let extracted_chars = extracted.text.chars().count();
    debug!(
        "Extracted {} chars (truncated: {})",
        extracted_chars, extracted.truncated
    );

    let mut output = run_from_text(&extracted.text, config).await?;
    output.stats.extracted_chars = extracted_chars;
    output.stats.truncated = extracted.truncated;
    output.stats.total_duration_ms = total_start.elapsed().as_millis() as u64;
    Ok(output)
}

/// Analyze already-extracted transcript text.
///
/// Skips PDF handling entirely; the relevance gate onward behaves exactly
/// as in [`analyze_bytes`].
pub async fn analyze_text(
    text: &str,
    config: &AnalysisConfig,
) -> Result<AnalysisOutput, AnalyzeError> {
    let total_start = Instant::now();
    let mut output = run_from_text(text, config).await?;
    output.stats.extracted_chars = text.chars().count();
    output.stats.total_duration_ms = total_start.elapsed().as_millis() as u64;
    Ok(output)
}

/// Synchronous wrapper around [`analyze`].
///
/// Creates a temporary tokio runtime internally.
pub fn analyze_sync(
    input: impl AsRef<Path>,
    config: &AnalysisConfig,
) -> Result<AnalysisOutput, AnalyzeError> {
    tokio::runtime::Runtime::new()
        .map_err(|e| AnalyzeError::Internal(format!("Failed to create tokio runtime: {}", e)))?
        .block_on(analyze(input, config))
}

// ── Internal helpers ─────────────────────────────────────────────────────

/// Gate → reshape → complete → normalize. Shared by all entry points.
async fn run_from_text(
    text: &str,
    config: &AnalysisConfig,
) -> Result<AnalysisOutput, AnalyzeError> {
    // ── Step 2: Relevance gate (before any paid call) ────────────────────
    let hits = relevance::keyword_hits(text);
    if hits < relevance::MIN_KEYWORD_HITS {
        info!(
            "Rejected by relevance gate: {}/{} keywords",
            hits,
            relevance::MIN_KEYWORD_HITS
        );
        return Err(AnalyzeError::NotEarningsCall {
            hits,
            needed: relevance::MIN_KEYWORD_HITS,
        });
    }

    // ── Step 3: Reshape dialogue ─────────────────────────────────────────
    let context = dialogue::reshape_dialogue(text);
    debug!("Reshaped context: {} chars", context.chars().count());

    // ── Step 4: Resolve client and run the completion ────────────────────
    let client = resolve_client(config)?;
    let (response, llm_duration_ms) = completion::run_completion(&client, &context, config).await?;

    // ── Step 5: Normalize the untrusted reply ────────────────────────────
    let payload = match normalize::parse_model_output(&response.content) {
        Ok(parsed) => AnalysisPayload::Insights(normalize::normalize_insights(parsed)),
        Err(failure) => match config.parse_fallback {
            ParseFallback::Reject => {
                return Err(AnalyzeError::UnparseableOutput {
                    detail: failure.to_string(),
                    snippet: snippet(&response.content),
                });
            }
            ParseFallback::RawText => {
                warn!("Model output unparseable ({failure}); returning raw text");
                AnalysisPayload::RawOutput {
                    raw_output: response.content.clone(),
                }
            }
        },
    };

    let usage = response.usage.unwrap_or_default();
    let stats = AnalysisStats {
        extracted_chars: 0, // filled by the entry point
        truncated: false,
        keyword_hits: hits,
        context_chars: context.chars().count(),
        input_tokens: usage.prompt_tokens,
        output_tokens: usage.completion_tokens,
        llm_duration_ms,
        total_duration_ms: 0, // filled by the entry point
        model: client.model().to_string(),
    };

    info!(
        "Analysis complete: {} keywords, {} context chars, {}ms completion",
        hits, stats.context_chars, llm_duration_ms
    );

    Ok(AnalysisOutput { payload, stats })
}

/// Read a local PDF, validating existence, permission, and magic bytes.
async fn read_pdf(path: &Path) -> Result<Vec<u8>, AnalyzeError> {
    let bytes = match tokio::fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            return Err(AnalyzeError::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(AnalyzeError::PermissionDenied {
                path: path.to_path_buf(),
            });
        }
        // Anything else (directory path, I/O fault) is not "not found".
        Err(e) => {
            return Err(AnalyzeError::Internal(format!(
                "Failed to read '{}': {}",
                path.display(),
                e
            )));
        }
    };

    if bytes.len() < 4 || &bytes[..4] != b"%PDF" {
        let mut magic = [0u8; 4];
        for (slot, byte) in magic.iter_mut().zip(bytes.iter()) {
            *slot = *byte;
        }
        return Err(AnalyzeError::NotAPdf {
            path: path.to_path_buf(),
            magic,
        });
    }

    Ok(bytes)
}

/// Resolve the completion client, from most-specific to least-specific:
///
/// 1. **Injected client** (`config.client`) — the caller constructed and
///    configured it entirely; used as-is. This is how tests substitute a
///    stub completion service.
/// 2. **`GROQ_API_KEY`** — Groq-hosted OpenAI-compatible endpoint, the
///    default upstream.
/// 3. **`OPENAI_API_KEY`** — api.openai.com.
///
/// `config.model` / `config.base_url` / sampling knobs override the
/// env-built client's defaults.
fn resolve_client(config: &AnalysisConfig) -> Result<Arc<dyn CompletionClient>, AnalyzeError> {
    if let Some(ref client) = config.client {
        return Ok(Arc::clone(client));
    }

    let (api_key, defaults) = if let Some(key) = non_empty_env("GROQ_API_KEY") {
        (key, ChatClientConfig::default())
    } else if let Some(key) = non_empty_env("OPENAI_API_KEY") {
        (
            key,
            ChatClientConfig {
                model: "gpt-4o-mini".to_string(),
                base_url: "https://api.openai.com/v1".to_string(),
                ..Default::default()
            },
        )
    } else {
        return Err(AnalyzeError::ClientNotConfigured {
            hint: "Set GROQ_API_KEY or OPENAI_API_KEY, or inject a client via \
                   AnalysisConfig::builder().client(...)."
                .to_string(),
        });
    };

    let client_config = ChatClientConfig {
        api_key,
        model: config.model.clone().unwrap_or(defaults.model),
        base_url: config.base_url.clone().unwrap_or(defaults.base_url),
        temperature: config.temperature,
        max_tokens: config.max_tokens,
        timeout_secs: config.api_timeout_secs,
    };

    let client = OpenAiChatClient::new(client_config)?;
    Ok(Arc::new(client))
}

fn non_empty_env(var: &str) -> Option<String> {
    std::env::var(var).ok().filter(|v| !v.is_empty())
}

/// First 200 chars of the model output, for error messages.
fn snippet(content: &str) -> String {
    let cut = extract::truncate_chars(content, 200);
    if cut.len() < content.len() {
        format!("{cut}…")
    } else {
        cut.to_string()
    }
}
