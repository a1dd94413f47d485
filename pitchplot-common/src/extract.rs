//! JSON array recovery from noisy model replies
//!
//! Model replies routinely wrap the requested JSON in prose ("Here is the
//! data:") or markdown code fences even when the prompt forbids it. This
//! module recovers the embedded array without any semantic interpretation.

use once_cell::sync::Lazy;
use regex::Regex;
use serde_json::Value;
use thiserror::Error;

/// Upper bound on diagnostic text carried inside extraction errors
const SNIPPET_MAX_CHARS: usize = 160;

/// Matches triple-backtick fence markers, with or without a language tag
static FENCE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"```[A-Za-z0-9_+-]*").unwrap());

/// Extraction failures over one model reply
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ExtractError {
    /// The reply contained no `[`/`]` pair at all
    #[error("No JSON array found in model reply: {snippet}")]
    NoJsonFound { snippet: String },

    /// A bracketed candidate was found but failed strict decoding
    #[error("Malformed JSON in model reply: {message}")]
    MalformedJson { message: String, snippet: String },
}

impl ExtractError {
    /// Bounded diagnostic text (head of the raw reply or of the candidate)
    pub fn snippet(&self) -> &str {
        match self {
            ExtractError::NoJsonFound { snippet } => snippet,
            ExtractError::MalformedJson { snippet, .. } => snippet,
        }
    }
}

/// Recover the JSON array embedded in a raw model reply.
///
/// Fence markers are stripped first, then the candidate substring runs
/// from the first `[` to the last `]` inclusive. The candidate must decode
/// as a JSON array; element-level validation happens downstream.
pub fn extract_json_array(raw: &str) -> Result<Vec<Value>, ExtractError> {
    let cleaned = FENCE_RE.replace_all(raw, "");

    let start = cleaned.find('[');
    let end = cleaned.rfind(']');
    let candidate = match (start, end) {
        (Some(s), Some(e)) if s < e => &cleaned[s..=e],
        _ => {
            return Err(ExtractError::NoJsonFound {
                snippet: snippet_of(raw),
            })
        }
    };

    serde_json::from_str::<Vec<Value>>(candidate).map_err(|e| ExtractError::MalformedJson {
        message: e.to_string(),
        snippet: snippet_of(candidate),
    })
}

/// Truncate text to a bounded snippet on a char boundary.
fn snippet_of(text: &str) -> String {
    let mut out = String::new();
    for (count, ch) in text.chars().enumerate() {
        if count >= SNIPPET_MAX_CHARS {
            out.push_str("...");
            break;
        }
        out.push(ch);
    }
    out
}
