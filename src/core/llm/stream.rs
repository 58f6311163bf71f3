//! Streaming chat response: content deltas, size limits, token usage.

use serde_json::Value;

/// Max content size (2MB) to prevent unbounded memory growth from malformed streams.
pub(super) const MAX_CONTENT_BYTES: usize = 2 * 1024 * 1024;

/// Token usage reported by the API in the final streaming chunk.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenUsage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

/// Parse token usage from a streaming chunk. OpenAI-style servers put it in `usage`,
/// Groq in `x_groq.usage`.
pub(crate) fn parse_usage(chunk: &Value) -> Option<TokenUsage> {
    let usage = chunk
        .get("usage")
        .filter(|u| u.is_object())
        .or_else(|| chunk.get("x_groq").and_then(|x| x.get("usage")))?;
    Some(TokenUsage {
        prompt_tokens: usage.get("prompt_tokens").and_then(|v| v.as_u64()).unwrap_or(0),
        completion_tokens: usage.get("completion_tokens").and_then(|v| v.as_u64()).unwrap_or(0),
        total_tokens: usage.get("total_tokens").and_then(|v| v.as_u64()).unwrap_or(0),
    })
}

/// Text carried by the first choice's delta, if any.
pub(crate) fn content_delta(chunk: &Value) -> Option<&str> {
    let choice = chunk.get("choices")?.as_array()?.first()?;
    choice["delta"]["content"].as_str().filter(|s| !s.is_empty())
}

/// Append `piece` to `acc` unless that would exceed [`MAX_CONTENT_BYTES`].
/// Returns false once the limit is reached.
pub(crate) fn push_limited(acc: &mut String, piece: &str) -> bool {
    if acc.len() + piece.len() > MAX_CONTENT_BYTES {
        return false;
    }
    acc.push_str(piece);
    true
}
