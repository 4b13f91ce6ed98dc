//! Normalisation: model text → [`ExtractionResult`].
//!
//! Even when told "no markdown", models sometimes wrap their JSON in a
//! ```` ```json ```` fence. The cleanup here is intentionally narrow, two
//! exact-match rules applied to the trimmed text:
//!
//! 1. a leading `` ```json `` is removed;
//! 2. a trailing `` ``` `` is removed.
//!
//! Anything else (other fence languages, prose around the JSON) is left for
//! the parser to reject. A reply that still does not parse is returned as
//! [`ExtractionResult::Unparsed`] with the original text, not as an error.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::warn;

/// Message placed in the `error` field of an unparsed result.
pub const PARSE_FAILURE_MESSAGE: &str = "Failed to parse JSON from model output";

const OPENING_FENCE: &str = "```json";
const CLOSING_FENCE: &str = "```";

/// What an extraction produced.
///
/// Serialised untagged: `Parsed` becomes the model's JSON as-is, `Unparsed`
/// becomes `{"error": ..., "raw_output": ...}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ExtractionResult {
    /// The model's output parsed as JSON (any shape).
    Parsed(Value),
    /// The output was not JSON; `raw_output` is the unstripped model text.
    Unparsed { error: String, raw_output: String },
}

impl ExtractionResult {
    pub fn is_parsed(&self) -> bool {
        matches!(self, ExtractionResult::Parsed(_))
    }

    /// The value that goes on the wire.
    pub fn into_value(self) -> Value {
        match self {
            ExtractionResult::Parsed(v) => v,
            ExtractionResult::Unparsed { error, raw_output } => serde_json::json!({
                "error": error,
                "raw_output": raw_output,
            }),
        }
    }
}

/// Trim, then drop one leading `` ```json `` and one trailing `` ``` ``.
pub fn strip_code_fences(raw: &str) -> &str {
    let s = raw.trim();
    let s = s.strip_prefix(OPENING_FENCE).unwrap_or(s);
    s.strip_suffix(CLOSING_FENCE).unwrap_or(s)
}

/// Strip fences and parse; fall back to the error envelope.
pub fn parse_model_output(raw: &str) -> ExtractionResult {
    match serde_json::from_str::<Value>(strip_code_fences(raw)) {
        Ok(value) => ExtractionResult::Parsed(value),
        Err(e) => {
            warn!(
                "Failed to parse JSON from model output ({}). Returning raw output wrapped in error object.",
                e
            );
            ExtractionResult::Unparsed {
                error: PARSE_FAILURE_MESSAGE.to_string(),
                raw_output: raw.to_string(),
            }
        }
    }
}
