//! CLI binary for callbrief.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `AnalysisConfig` and prints the result JSON.

use anyhow::{Context, Result};
use callbrief::{analyze, AnalysisConfig, AnalyzeError, ParseFallback};
use clap::Parser;
use std::io::{self, Write};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Basic analysis (payload JSON to stdout)
  callbrief q3_transcript.pdf

  # Write the result to a file
  callbrief q3_transcript.pdf -o analysis.json

  # Use a specific model and a tighter text bound
  callbrief --model llama-3.1-8b-instant --max-chars 10000 transcript.pdf

  # Custom prompt template from a file
  callbrief --prompt-file prompt.txt transcript.pdf

  # Keep the raw model text instead of failing when the JSON is broken
  callbrief --raw-fallback transcript.pdf

  # Full run statistics alongside the payload
  callbrief --stats transcript.pdf

EXIT CODES:
  0  analysis succeeded
  1  system failure (upstream API, unreadable file, unparseable output)
  2  document rejected by the relevance gate (not a financial transcript)

ENVIRONMENT VARIABLES:
  GROQ_API_KEY      Groq API key (checked first; default upstream)
  OPENAI_API_KEY    OpenAI API key (fallback)
  RUST_LOG          Tracing filter override (e.g. callbrief=debug)

SETUP:
  1. Set an API key:  export GROQ_API_KEY=gsk_...
  2. Analyze:         callbrief transcript.pdf
"#;

/// Summarise earnings-call transcript PDFs with an LLM.
#[derive(Parser, Debug)]
#[command(
    name = "callbrief",
    version,
    about = "Summarise earnings-call transcript PDFs with an LLM",
    long_about = "Extract an earnings-call transcript from a PDF, verify it looks like one, \
keep the speaker flow while dropping operator boilerplate, and ask an LLM for a fixed-shape \
JSON read of management tone versus business reality. Works with Groq, OpenAI, or any \
OpenAI-compatible endpoint.",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Local transcript PDF path.
    input: PathBuf,

    /// Write the result JSON to this file instead of stdout.
    #[arg(short, long, env = "CALLBRIEF_OUTPUT")]
    output: Option<PathBuf>,

    /// Model ID (e.g. llama-3.1-8b-instant, gpt-4o-mini).
    #[arg(long, env = "CALLBRIEF_MODEL")]
    model: Option<String>,

    /// OpenAI-compatible API base URL override.
    #[arg(long, env = "CALLBRIEF_BASE_URL")]
    base_url: Option<String>,

    /// Hard character bound on extracted text.
    #[arg(long, env = "CALLBRIEF_MAX_CHARS", default_value_t = 25_000)]
    max_chars: usize,

    /// Sampling temperature (0.0–2.0).
    #[arg(long, env = "CALLBRIEF_TEMPERATURE", default_value_t = 0.1)]
    temperature: f32,

    /// Max tokens the model may generate.
    #[arg(long, env = "CALLBRIEF_MAX_TOKENS", default_value_t = 1024)]
    max_tokens: u32,

    /// Completion call timeout in seconds.
    #[arg(long, env = "CALLBRIEF_API_TIMEOUT", default_value_t = 60)]
    api_timeout: u64,

    /// Path to a text file containing a custom analyst prompt template.
    #[arg(long, env = "CALLBRIEF_PROMPT_FILE")]
    prompt_file: Option<PathBuf>,

    /// On unparseable model output, return {"raw_output": ...} instead of failing.
    #[arg(long, env = "CALLBRIEF_RAW_FALLBACK")]
    raw_fallback: bool,

    /// Emit the full result (payload + run statistics) instead of the payload alone.
    #[arg(long)]
    stats: bool,

    /// Compact single-line JSON instead of pretty-printed.
    #[arg(long)]
    compact: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "CALLBRIEF_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors and the result JSON.
    #[arg(short, long, env = "CALLBRIEF_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config ─────────────────────────────────────────────────────
    let mut builder = AnalysisConfig::builder()
        .max_chars(cli.max_chars)
        .temperature(cli.temperature)
        .max_tokens(cli.max_tokens)
        .api_timeout_secs(cli.api_timeout)
        .parse_fallback(if cli.raw_fallback {
            ParseFallback::RawText
        } else {
            ParseFallback::Reject
        });

    if let Some(ref model) = cli.model {
        builder = builder.model(model.clone());
    }
    if let Some(ref url) = cli.base_url {
        builder = builder.base_url(url.clone());
    }
    if let Some(ref path) = cli.prompt_file {
        builder = builder.prompt_file(path.clone());
    }

    let config = builder.build().context("Invalid configuration")?;

    // ── Run analysis ─────────────────────────────────────────────────────
    let output = match analyze(&cli.input, &config).await {
        Ok(output) => output,
        Err(e) if e.is_invalid_input() => {
            eprintln!("rejected: {e}");
            std::process::exit(2);
        }
        Err(e) => return Err(e).context("Analysis failed"),
    };

    let json = if cli.stats {
        to_json(&output, cli.compact)?
    } else {
        to_json(&output.payload, cli.compact)?
    };

    match cli.output {
        Some(ref path) => {
            tokio::fs::write(path, &json)
                .await
                .map_err(|source| AnalyzeError::OutputWriteFailed {
                    path: path.clone(),
                    source,
                })
                .context("Failed to write output file")?;
            if !cli.quiet {
                eprintln!("wrote {}", path.display());
            }
        }
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(json.as_bytes())
                .context("Failed to write to stdout")?;
            handle.write_all(b"\n").ok();
        }
    }

    Ok(())
}

fn to_json<T: serde::Serialize>(value: &T, compact: bool) -> Result<String> {
    if compact {
        serde_json::to_string(value).context("Failed to serialise result")
    } else {
        serde_json::to_string_pretty(value).context("Failed to serialise result")
    }
}
