//! Normalization: turn untrusted model text into the seven-key contract.
//!
//! ## Why is this necessary?
//!
//! Even at temperature 0.1 a model occasionally disobeys "STRICT JSON
//! STRUCTURE": it wraps the object in prose ("Here is the analysis: {...}"),
//! drops a key it found nothing for, or returns a bare string where a list
//! was required. This module absorbs all of that deterministically:
//!
//! 1. strict parse, 2. brace-scan recovery, 3. key back-fill and shape
//! coercion — so callers always receive either a complete
//! [`TranscriptInsights`] or an explicit failure they must handle.

use crate::output::TranscriptInsights;
use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::{Map, Value};
use thiserror::Error;

/// The contractual key set. Order matters only for readability.
pub const REQUIRED_KEYS: [&str; 7] = [
    "management_tone",
    "confidence_level",
    "key_positives",
    "key_concerns",
    "forward_guidance",
    "capacity_utilization_trend",
    "new_growth_initiatives",
];

/// Why the model output could not be interpreted as a JSON object.
#[derive(Debug, Error)]
pub enum OutputParseFailure {
    /// Direct parse failed and no `{...}` block was found to recover from.
    #[error("no JSON object found in model output")]
    NoJsonObject,

    /// A brace-delimited block was found but still failed to parse.
    #[error("recovered JSON block failed to parse: {detail}")]
    RecoveredBlockInvalid { detail: String },
}

/// Greedy first-to-last brace block, dot matching newlines.
static RE_BRACE_BLOCK: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)\{.*\}").unwrap());

/// Parse model output into a JSON object, with brace-scan recovery.
///
/// Strategy:
/// 1. parse the whole string; accept only a top-level object;
/// 2. otherwise locate the greedy `{...}` block and parse that;
/// 3. otherwise report an explicit failure — never a panic.
pub fn parse_model_output(output: &str) -> Result<Map<String, Value>, OutputParseFailure> {
    if let Ok(Value::Object(map)) = serde_json::from_str::<Value>(output) {
        return Ok(map);
    }

    let block = RE_BRACE_BLOCK
        .find(output)
        .ok_or(OutputParseFailure::NoJsonObject)?;

    match serde_json::from_str::<Value>(block.as_str()) {
        Ok(Value::Object(map)) => Ok(map),
        Ok(other) => Err(OutputParseFailure::RecoveredBlockInvalid {
            detail: format!("expected an object, got {}", type_name(&other)),
        }),
        Err(e) => Err(OutputParseFailure::RecoveredBlockInvalid {
            detail: e.to_string(),
        }),
    }
}

/// Repair a parsed object into the full contract and project it onto the
/// typed result.
///
/// For every required key: a missing or falsy value becomes the default
/// (`[]` for keys whose name contains "key" or "initiatives", otherwise
/// `"Not mentioned"`); a present value of the wrong shape is coerced
/// (scalar → one-element list for list fields, non-string → its JSON text
/// for string fields). Keys outside the contract are dropped. This is a
/// repair step by design — partial output is never an error.
pub fn normalize_insights(mut parsed: Map<String, Value>) -> TranscriptInsights {
    let mut normalized = Map::with_capacity(REQUIRED_KEYS.len());

    for key in REQUIRED_KEYS {
        let value = parsed.remove(key).unwrap_or(Value::Null);
        let value = if is_falsy(&value) {
            default_for(key)
        } else if wants_list(key) {
            coerce_string_list(value)
        } else {
            Value::String(coerce_string(value))
        };
        normalized.insert(key.to_string(), value);
    }

    // All keys present with contractual shapes, so this cannot fail.
    serde_json::from_value(Value::Object(normalized))
        .expect("normalized object matches TranscriptInsights shape")
}

/// List-typed fields are the ones whose name contains "key" or "initiatives".
fn wants_list(key: &str) -> bool {
    key.contains("key") || key.contains("initiatives")
}

/// Type-appropriate default for a missing or falsy field.
fn default_for(key: &str) -> Value {
    if wants_list(key) {
        Value::Array(Vec::new())
    } else {
        Value::String("Not mentioned".to_string())
    }
}

/// Python-style falsiness: null, false, 0, "", [], {}.
fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f == 0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(m) => m.is_empty(),
    }
}

/// Render any JSON value as a plain string (strings unquoted).
fn coerce_string(value: Value) -> String {
    match value {
        Value::String(s) => s,
        other => other.to_string(),
    }
}

/// Coerce any non-falsy JSON value into a list of strings.
fn coerce_string_list(value: Value) -> Value {
    let items = match value {
        Value::Array(items) => items.into_iter().map(coerce_string).collect(),
        other => vec![coerce_string(other)],
    };
    Value::Array(items.into_iter().map(Value::String).collect())
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
