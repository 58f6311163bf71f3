//! Streaming completion: one API call, chunks accumulated until the stream ends.

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use futures::StreamExt;
use serde_json::{Value, json};
use tokio_util::sync::CancellationToken;

use super::stream::{TokenUsage, content_delta, parse_usage, push_limited};
use super::{Answer, ChatError, map_api_error};

/// Progress, streaming and cancellation hooks for one completion.
pub(super) struct CompletionCallbacks<'a> {
    pub on_progress: Option<&'a (dyn Fn(&str) + Send + Sync)>,
    pub on_content_chunk: Option<&'a (dyn Fn(&str) + Send + Sync)>,
    pub cancel_token: Option<&'a CancellationToken>,
}

/// API client, model and messages for one completion.
pub(super) struct CompletionParams<'a> {
    pub client: &'a Client<OpenAIConfig>,
    pub model: &'a str,
    pub messages: &'a [Value],
}

/// Call the API with streaming enabled and collect the answer text.
pub(super) async fn stream_completion(
    params: CompletionParams<'_>,
    callbacks: CompletionCallbacks<'_>,
) -> Result<Answer, ChatError> {
    let cancel_token = callbacks.cancel_token;
    if cancel_token.is_some_and(|t| t.is_cancelled()) {
        return Err(ChatError::Cancelled);
    }

    if let Some(progress) = callbacks.on_progress {
        progress("Calling API...");
    }

    // Start the streaming API call, racing against cancellation.
    let chat_api = params.client.chat();
    let stream_future = chat_api.create_stream_byot::<_, Value>(json!({
        "model": params.model,
        "messages": params.messages,
        "stream": true,
    }));

    let stream_result = if let Some(token) = cancel_token {
        tokio::select! {
            biased;
            _ = token.cancelled() => {
                return Err(ChatError::Cancelled);
            }
            result = stream_future => result,
        }
    } else {
        stream_future.await
    };

    let mut stream = stream_result.map_err(map_api_error)?;

    if let Some(progress) = callbacks.on_progress {
        progress("Receiving answer...");
    }

    let mut full_content = String::new();
    let mut usage = TokenUsage::default();

    // Read stream chunks, racing against cancellation.
    loop {
        let chunk_opt = if let Some(token) = cancel_token {
            tokio::select! {
                biased;
                _ = token.cancelled() => {
                    return Err(ChatError::Cancelled);
                }
                chunk = stream.next() => chunk,
            }
        } else {
            stream.next().await
        };

        let Some(chunk_result) = chunk_opt else { break };
        let chunk = chunk_result.map_err(map_api_error)?;

        if let Some(err) = chunk.get("error") {
            let msg = err
                .get("message")
                .and_then(|v| v.as_str())
                .unwrap_or("Unknown error");
            return Err(ChatError::ApiMessage(msg.to_string()));
        }

        if let Some(u) = parse_usage(&chunk) {
            usage = u;
        }

        if let Some(content) = content_delta(&chunk) {
            if !push_limited(&mut full_content, content) {
                log::warn!("Answer exceeded size limit, truncating stream");
                break;
            }
            if let Some(cb) = callbacks.on_content_chunk {
                cb(content);
            }
        }
    }

    if full_content.trim().is_empty() {
        return Err(ChatError::EmptyResponse);
    }
    log::debug!(
        "Answer complete: {} bytes, {} tokens",
        full_content.len(),
        usage.total_tokens
    );
    Ok(Answer {
        content: full_content,
        usage,
    })
}
