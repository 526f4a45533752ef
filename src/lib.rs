//! # callbrief
//!
//! Summarise earnings-call transcript PDFs with an LLM.
//!
//! ## Why this crate?
//!
//! Earnings-call transcripts bury the signal — a 0.2 % segment decline, a
//! hedged guidance sentence — under pages of prepared remarks and operator
//! boilerplate. This crate extracts the transcript text, keeps the dialogue
//! structure (management remarks *and* analyst questions), strips operator
//! chatter, and asks an LLM for a fixed-shape JSON read of management tone
//! versus the underlying business reality.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Extract    per-page text layer, bounded to max_chars
//!  ├─ 2. Gate       keyword heuristic: is this an earnings call at all?
//!  ├─ 3. Reshape    speaker-turn boundaries kept, operator lines dropped
//!  ├─ 4. Complete   one chat-completion call, low temperature
//!  └─ 5. Normalize  strict-then-recovered JSON parse, defaults back-filled
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use callbrief::{analyze, AnalysisConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Client auto-detected from GROQ_API_KEY / OPENAI_API_KEY
//!     let config = AnalysisConfig::default();
//!     let output = analyze("q3_transcript.pdf", &config).await?;
//!     println!("{}", serde_json::to_string_pretty(&output.payload)?);
//!     eprintln!("tokens: {} in / {} out",
//!         output.stats.input_tokens,
//!         output.stats.output_tokens);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `callbrief` binary (clap + anyhow + tracing-subscriber) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! callbrief = { version = "0.1", default-features = false }
//! ```
//!
//! ## Result Shape
//!
//! Every analysis yields the same seven-key JSON object — missing or empty
//! fields are back-filled with `[]` / `"Not mentioned"` so downstream
//! consumers never branch on key presence:
//!
//! | Key | Type |
//! |-----|------|
//! | `management_tone` | string |
//! | `confidence_level` | string |
//! | `key_positives` | list of strings |
//! | `key_concerns` | list of strings |
//! | `forward_guidance` | string |
//! | `capacity_utilization_trend` | string |
//! | `new_growth_initiatives` | list of strings |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod analyze;
pub mod config;
pub mod error;
pub mod llm;
pub mod output;
pub mod pipeline;
pub mod prompts;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use analyze::{analyze, analyze_bytes, analyze_sync, analyze_text};
pub use config::{AnalysisConfig, AnalysisConfigBuilder, ParseFallback};
pub use error::AnalyzeError;
pub use llm::{CompletionClient, CompletionResponse, LlmError, OpenAiChatClient, TokenUsage};
pub use output::{AnalysisOutput, AnalysisPayload, AnalysisStats, TranscriptInsights};
