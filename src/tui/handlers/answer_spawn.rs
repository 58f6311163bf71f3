//! Spawns tutor requests in a background thread with progress/stream/result channels.

use std::sync::Arc;
use std::sync::mpsc;
use tokio::runtime::Runtime;
use tokio_util::sync::CancellationToken;

use crate::core::config::Config;
use crate::core::llm;
use crate::core::math::Mode;

use super::PendingAnswer;

/// Spawn a request for `question`. Returns PendingAnswer with channels for progress, stream, and result.
pub fn spawn_answer(
    rt: &Arc<Runtime>,
    config: Arc<Config>,
    question: String,
    mode: Mode,
    context: Option<String>,
) -> PendingAnswer {
    let (progress_tx, progress_rx) = mpsc::channel();
    let (stream_tx, stream_rx) = mpsc::channel();
    let (result_tx, result_rx) = mpsc::channel();
    let cancel_token = CancellationToken::new();
    let cancel_token_clone = cancel_token.clone();
    let rt_clone = Arc::clone(rt);

    std::thread::spawn(move || {
        let on_progress: llm::OnProgress = Box::new(move |s| {
            let _ = progress_tx.send(s.to_string());
        });
        let on_content_chunk: llm::OnContentChunk = Box::new(move |s| {
            let _ = stream_tx.send(s.to_string());
        });
        let request = llm::AskRequest {
            question: &question,
            context: context.as_deref(),
            mode,
        };
        let result = rt_clone.block_on(llm::ask(
            config.as_ref(),
            request,
            Some(on_progress),
            Some(on_content_chunk),
            Some(cancel_token_clone),
        ));
        let _ = result_tx.send(result);
    });

    PendingAnswer {
        progress_rx,
        stream_rx,
        result_rx,
        cancel_token,
    }
}
