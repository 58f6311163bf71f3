//! Tutor requests: one streamed chat completion per question.

mod completion;
mod error;
mod stream;

use async_openai::Client;
use tokio_util::sync::CancellationToken;

use crate::core::config::Config;
use crate::core::math::Mode;
use crate::core::prompts;

pub use error::{ChatError, map_api_error};
pub use stream::TokenUsage;

/// A question to send to the model.
#[derive(Debug, Clone, Copy)]
pub struct AskRequest<'a> {
    pub question: &'a str,
    /// Text extracted from attached files.
    pub context: Option<&'a str>,
    pub mode: Mode,
}

/// Raw model output for one question, before normalization.
#[derive(Debug, Clone)]
pub struct Answer {
    pub content: String,
    pub usage: TokenUsage,
}

/// Callback for progress updates during a request (e.g. "Calling API...").
pub type OnProgress = Box<dyn Fn(&str) + Send + Sync>;

/// Callback for each streamed content chunk (text only).
pub type OnContentChunk = Box<dyn Fn(&str) + Send + Sync>;

/// Ask the tutor a question and stream the answer.
///
/// The system prompt is chosen by `request.mode`. If `on_content_chunk` is Some, it is
/// called with each streamed chunk; the returned [`Answer`] holds the whole text.
/// Cancelling `cancel_token` aborts the request with [`ChatError::Cancelled`].
pub async fn ask(
    config: &Config,
    request: AskRequest<'_>,
    on_progress: Option<OnProgress>,
    on_content_chunk: Option<OnContentChunk>,
    cancel_token: Option<CancellationToken>,
) -> Result<Answer, ChatError> {
    let client = Client::with_config(config.openai_config.clone());
    let messages = prompts::build_messages(request.question, request.context, request.mode);
    log::info!(
        "Asking {} ({} mode, {} context bytes)",
        config.model_id,
        request.mode.label(),
        request.context.map_or(0, str::len)
    );

    completion::stream_completion(
        completion::CompletionParams {
            client: &client,
            model: &config.model_id,
            messages: &messages,
        },
        completion::CompletionCallbacks {
            on_progress: on_progress.as_deref(),
            on_content_chunk: on_content_chunk.as_deref(),
            cancel_token: cancel_token.as_ref(),
        },
    )
    .await
}
