//! End-to-end pipeline tests with a stubbed completion client.
//!
//! The stub records every prompt it receives and replies with canned text,
//! so the whole extract → gate → reshape → complete → normalize path runs
//! without network access or API keys.

use async_trait::async_trait;
use callbrief::{
    analyze_text, AnalysisConfig, AnalysisPayload, AnalyzeError, CompletionClient,
    CompletionResponse, LlmError, ParseFallback, TokenUsage,
};
use std::sync::{Arc, Mutex};

// ── Test helpers ─────────────────────────────────────────────────────────

/// Completion stub: records prompts, replies with a fixed string.
struct StubClient {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

impl StubClient {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        })
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionClient for StubClient {
    async fn complete(&self, prompt: &str) -> Result<CompletionResponse, LlmError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(CompletionResponse {
            content: self.reply.clone(),
            usage: Some(TokenUsage {
                prompt_tokens: 120,
                completion_tokens: 45,
                total_tokens: 165,
            }),
        })
    }

    fn model(&self) -> &str {
        "stub-model"
    }
}

/// Completion stub that always fails upstream.
struct FailingClient;

#[async_trait]
impl CompletionClient for FailingClient {
    async fn complete(&self, _prompt: &str) -> Result<CompletionResponse, LlmError> {
        Err(LlmError::RateLimitExceeded)
    }

    fn model(&self) -> &str {
        "stub-model"
    }
}

fn config_with(client: Arc<dyn CompletionClient>) -> AnalysisConfig {
    AnalysisConfig::builder()
        .client(client)
        .build()
        .expect("valid config")
}

/// A transcript passing the keyword gate, with one CEO turn and one
/// operator turn.
const TRANSCRIPT: &str = "\
Q3 Earnings Call

Operator: please hold
CEO John Smith: Revenue grew 12% this quarter and margin expanded.
Analyst Jane Lee: How does that square with your guidance?
CEO John Smith: We remain comfortable with full-year guidance.";

const FULL_REPLY: &str = r#"{
  "management_tone": "Optimistic",
  "confidence_level": "High",
  "key_positives": ["Revenue growth (Quote: 'Revenue grew 12%')"],
  "key_concerns": ["Margin sustainability"],
  "forward_guidance": "Comfortable with full-year guidance",
  "capacity_utilization_trend": "Not discussed",
  "new_growth_initiatives": []
}"#;

// ── End-to-end scenarios ─────────────────────────────────────────────────

#[tokio::test]
async fn operator_line_never_reaches_the_prompt() {
    let stub = StubClient::new(FULL_REPLY);
    let config = config_with(stub.clone());

    let output = analyze_text(TRANSCRIPT, &config).await.expect("analysis succeeds");

    let prompts = stub.prompts();
    assert_eq!(prompts.len(), 1, "exactly one completion call");
    assert!(
        !prompts[0].contains("Operator: please hold"),
        "operator boilerplate must be suppressed before the model sees it"
    );
    assert!(
        prompts[0].contains("\nCEO John Smith: Revenue grew 12%"),
        "speaker turns must survive with their newline boundary"
    );
    assert!(
        prompts[0].contains("Analyst Jane Lee:"),
        "analyst questions must be kept for context"
    );

    // All seven contractual keys are present in the wire shape.
    let value = serde_json::to_value(&output.payload).unwrap();
    let object = value.as_object().unwrap();
    for key in [
        "management_tone",
        "confidence_level",
        "key_positives",
        "key_concerns",
        "forward_guidance",
        "capacity_utilization_trend",
        "new_growth_initiatives",
    ] {
        assert!(object.contains_key(key), "missing contractual key '{key}'");
    }

    assert_eq!(output.stats.input_tokens, 120);
    assert_eq!(output.stats.output_tokens, 45);
    assert_eq!(output.stats.model, "stub-model");
    assert!(output.stats.keyword_hits >= 3);
}

#[tokio::test]
async fn partial_model_output_is_repaired_not_rejected() {
    let stub = StubClient::new(r#"{"management_tone": "Cautious"}"#);
    let config = config_with(stub);

    let output = analyze_text(TRANSCRIPT, &config).await.expect("repaired");
    let insights = output.payload.insights().expect("typed insights");

    assert_eq!(insights.management_tone, "Cautious");
    assert_eq!(insights.forward_guidance, "Not mentioned");
    assert!(insights.key_concerns.is_empty());
    assert!(insights.new_growth_initiatives.is_empty());
}

#[tokio::test]
async fn prose_wrapped_json_is_recovered_by_brace_scan() {
    let stub = StubClient::new(&format!("Sure! Here is the analysis:\n{FULL_REPLY}\nHope it helps."));
    let config = config_with(stub);

    let output = analyze_text(TRANSCRIPT, &config).await.expect("recovered");
    let insights = output.payload.insights().expect("typed insights");
    assert_eq!(insights.management_tone, "Optimistic");
}

#[tokio::test]
async fn unparseable_output_fails_under_reject_policy() {
    let stub = StubClient::new("I'm sorry, I can't produce JSON for this.");
    let config = config_with(stub);

    let err = analyze_text(TRANSCRIPT, &config).await.unwrap_err();
    assert!(matches!(err, AnalyzeError::UnparseableOutput { .. }));
    assert!(!err.is_invalid_input(), "parse failure is a server-side fault");
}

#[tokio::test]
async fn unparseable_output_wraps_under_raw_text_policy() {
    let stub = StubClient::new("I'm sorry, I can't produce JSON for this.");
    let config = AnalysisConfig::builder()
        .client(stub)
        .parse_fallback(ParseFallback::RawText)
        .build()
        .unwrap();

    let output = analyze_text(TRANSCRIPT, &config).await.expect("wrapped");
    match output.payload {
        AnalysisPayload::RawOutput { ref raw_output } => {
            assert!(raw_output.contains("can't produce JSON"));
        }
        AnalysisPayload::Insights(_) => panic!("expected raw-output wrapper"),
    }
}

// ── Relevance gate ───────────────────────────────────────────────────────

#[tokio::test]
async fn non_financial_text_is_rejected_before_any_call() {
    let stub = StubClient::new(FULL_REPLY);
    let config = config_with(stub.clone());

    let err = analyze_text("A short story about a dog and a postman.", &config)
        .await
        .unwrap_err();

    assert!(matches!(err, AnalyzeError::NotEarningsCall { .. }));
    assert!(err.is_invalid_input());
    assert!(
        stub.prompts().is_empty(),
        "the gate must fire before the paid completion call"
    );
}

#[tokio::test]
async fn empty_text_is_rejected_the_same_way() {
    let stub = StubClient::new(FULL_REPLY);
    let config = config_with(stub.clone());

    let err = analyze_text("", &config).await.unwrap_err();
    assert!(err.is_invalid_input());
    assert!(stub.prompts().is_empty());
}

// ── Upstream failure ─────────────────────────────────────────────────────

#[tokio::test]
async fn upstream_failure_propagates_without_retry() {
    let config = config_with(Arc::new(FailingClient));

    let err = analyze_text(TRANSCRIPT, &config).await.unwrap_err();
    match err {
        AnalyzeError::Completion(LlmError::RateLimitExceeded) => {}
        other => panic!("expected a completion error, got {other}"),
    }
}

// ── Prompt template override ─────────────────────────────────────────────

#[tokio::test]
async fn inline_template_is_used_verbatim() {
    let stub = StubClient::new(FULL_REPLY);
    let config = AnalysisConfig::builder()
        .client(stub.clone())
        .prompt_template("Reply with JSON only.")
        .build()
        .unwrap();

    analyze_text(TRANSCRIPT, &config).await.expect("succeeds");

    let prompts = stub.prompts();
    assert!(prompts[0].starts_with("Reply with JSON only."));
    assert!(prompts[0].contains("\n\nTranscript:\n"));
}
