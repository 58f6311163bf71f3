//! Handling of finished answers and session save.

use crate::core::history;
use crate::core::llm::{Answer, ChatError};
use crate::core::math::{normalize, render_as_string};

use super::app::{AnswerState, App, ScrollPosition};

/// Process a finished request: normalize the answer, record it and save the session.
pub(super) fn handle_answer_result(
    app: &mut App,
    result: Result<Answer, ChatError>,
    max_sessions: u32,
) {
    app.is_streaming = false;
    let Some(turn) = app.turns.last_mut() else {
        return;
    };
    match result {
        Ok(answer) => {
            let doc = normalize(&answer.content, turn.mode);
            let rendered = render_as_string(&doc);
            let (question, mode) = (turn.question.clone(), turn.mode);
            turn.answer = AnswerState::Done(doc);
            app.token_usage = Some(answer.usage);
            app.session.record(&question, &rendered, mode);
            match history::save_session(&app.session, max_sessions) {
                Ok(()) => app.save_error = None,
                Err(e) => {
                    log::warn!("Failed to save session {}: {}", app.session.id(), e);
                    app.save_error = Some(format!("Save failed: {}", e));
                }
            }
        }
        Err(ChatError::Cancelled) => {
            turn.answer = AnswerState::Cancelled;
        }
        Err(e) => {
            log::warn!("Request failed: {}", e);
            turn.answer = AnswerState::Failed(e.to_string());
        }
    }
    app.scroll = ScrollPosition::Bottom;
}
