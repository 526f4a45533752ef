//! Configuration types for transcript analysis.
//!
//! All behaviour is controlled through [`AnalysisConfig`], built via its
//! [`AnalysisConfigBuilder`]. Keeping every knob in one struct makes it
//! trivial to share configs, serialise the interesting bits for logging, and
//! diff two runs to understand why their outputs differ.
//!
//! # Design choice: one pipeline, two historical behaviours
//! Earlier incarnations of this tool shipped as two parallel scripts with
//! different truncation limits (25 000 vs 10 000 chars) and different
//! parse-failure policies (hard error vs raw-text wrapper). Those are unified
//! here: `max_chars` carries the limit and [`ParseFallback`] carries the
//! policy, so one deployment runs exactly one behaviour.

use crate::error::AnalyzeError;
use crate::llm::CompletionClient;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// What to do when neither a direct parse nor brace-scan recovery yields a
/// JSON object from the model output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ParseFallback {
    /// Surface [`AnalyzeError::UnparseableOutput`] to the caller. (default)
    #[default]
    Reject,
    /// Wrap the raw model text as `{"raw_output": <text>}` and return it
    /// as the payload.
    RawText,
}

/// Configuration for a transcript analysis.
///
/// Built via [`AnalysisConfig::builder()`] or using
/// [`AnalysisConfig::default()`].
///
/// # Example
/// ```rust
/// use callbrief::AnalysisConfig;
///
/// let config = AnalysisConfig::builder()
///     .max_chars(10_000)
///     .model("llama-3.1-8b-instant")
///     .temperature(0.1)
///     .build()
///     .unwrap();
/// ```
#[derive(Clone)]
pub struct AnalysisConfig {
    /// Hard character bound on extracted text. Default: 25 000.
    ///
    /// A cost/latency cap for the completion call, not a token-aware limit.
    /// Long documents are silently cut at this boundary, which can drop
    /// late-call Q&A — raise the bound if your transcripts run long.
    pub max_chars: usize,

    /// Model identifier, e.g. "llama-3.1-8b-instant", "gpt-4o-mini".
    /// If None, the resolved client's default is used.
    pub model: Option<String>,

    /// Override for the OpenAI-compatible API base URL.
    /// If None, the env-resolved client picks Groq or OpenAI.
    pub base_url: Option<String>,

    /// Pre-constructed completion client. Takes precedence over any
    /// environment-based resolution. This is the test-injection seam.
    pub client: Option<Arc<dyn CompletionClient>>,

    /// Sampling temperature. Default: 0.1.
    ///
    /// Low temperature biases the model toward the strict JSON structure the
    /// prompt demands; higher values produce creative prose that the
    /// normalizer then has to rescue.
    pub temperature: f32,

    /// Maximum tokens the model may generate. Default: 1024.
    pub max_tokens: u32,

    /// Per-request timeout for the completion call in seconds. Default: 60.
    pub api_timeout_secs: u64,

    /// Inline prompt-template override. If None, the built-in template is
    /// used (see [`crate::prompts`]).
    pub prompt_template: Option<String>,

    /// Load the prompt template from this file at call time. Takes
    /// precedence over `prompt_template`; an unreadable file fails the
    /// request with [`AnalyzeError::PromptFileUnreadable`].
    pub prompt_file: Option<PathBuf>,

    /// Policy when the model output cannot be parsed as JSON at all.
    pub parse_fallback: ParseFallback,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            max_chars: 25_000,
            model: None,
            base_url: None,
            client: None,
            temperature: 0.1,
            max_tokens: 1024,
            api_timeout_secs: 60,
            prompt_template: None,
            prompt_file: None,
            parse_fallback: ParseFallback::default(),
        }
    }
}

impl fmt::Debug for AnalysisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnalysisConfig")
            .field("max_chars", &self.max_chars)
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("client", &self.client.as_ref().map(|_| "<dyn CompletionClient>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("api_timeout_secs", &self.api_timeout_secs)
            .field("prompt_file", &self.prompt_file)
            .field("parse_fallback", &self.parse_fallback)
            .finish()
    }
}

impl AnalysisConfig {
    /// Create a new builder for `AnalysisConfig`.
    pub fn builder() -> AnalysisConfigBuilder {
        AnalysisConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`AnalysisConfig`].
#[derive(Debug)]
pub struct AnalysisConfigBuilder {
    config: AnalysisConfig,
}

impl AnalysisConfigBuilder {
    pub fn max_chars(mut self, n: usize) -> Self {
        self.config.max_chars = n;
        self
    }

    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = Some(model.into());
        self
    }

    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.config.base_url = Some(url.into());
        self
    }

    pub fn client(mut self, client: Arc<dyn CompletionClient>) -> Self {
        self.config.client = Some(client);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_tokens(mut self, n: u32) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn api_timeout_secs(mut self, secs: u64) -> Self {
        self.config.api_timeout_secs = secs;
        self
    }

    pub fn prompt_template(mut self, template: impl Into<String>) -> Self {
        self.config.prompt_template = Some(template.into());
        self
    }

    pub fn prompt_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.prompt_file = Some(path.into());
        self
    }

    pub fn parse_fallback(mut self, policy: ParseFallback) -> Self {
        self.config.parse_fallback = policy;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<AnalysisConfig, AnalyzeError> {
        let c = &self.config;
        if c.max_chars == 0 {
            return Err(AnalyzeError::InvalidConfig(
                "max_chars must be ≥ 1".into(),
            ));
        }
        if !c.temperature.is_finite() {
            return Err(AnalyzeError::InvalidConfig(format!(
                "temperature must be finite, got {}",
                c.temperature
            )));
        }
        if c.max_tokens == 0 {
            return Err(AnalyzeError::InvalidConfig(
                "max_tokens must be ≥ 1".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_strict_variant() {
        let config = AnalysisConfig::default();
        assert_eq!(config.max_chars, 25_000);
        assert_eq!(config.parse_fallback, ParseFallback::Reject);
        assert!((config.temperature - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn builder_clamps_temperature() {
        let config = AnalysisConfig::builder()
            .temperature(9.5)
            .build()
            .expect("valid config");
        assert!((config.temperature - 2.0).abs() < f32::EPSILON);
    }

    #[test]
    fn builder_rejects_zero_max_chars() {
        let err = AnalysisConfig::builder().max_chars(0).build().unwrap_err();
        assert!(err.to_string().contains("max_chars"));
    }

    #[test]
    fn debug_elides_client() {
        let config = AnalysisConfig::default();
        let dbg = format!("{:?}", config);
        assert!(dbg.contains("client: None"));
    }
}
