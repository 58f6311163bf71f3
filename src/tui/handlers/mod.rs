//! Event handlers for the TUI: keyboard and mouse.

mod answer_spawn;
mod input;

use crossterm::event::{KeyEvent, KeyEventKind, MouseEvent, MouseEventKind};
use std::sync::Arc;
use std::sync::mpsc;
use tokio_util::sync::CancellationToken;

use tokio::runtime::Runtime;

use crate::core::config::Config;
use crate::core::llm::{Answer, ChatError};

use super::app::App;
use super::constants;
use super::shortcuts::Shortcut;

/// Holds receivers for a request in progress (progress logs, streamed content, final result).
pub struct PendingAnswer {
    pub progress_rx: mpsc::Receiver<String>,
    pub stream_rx: mpsc::Receiver<String>,
    pub result_rx: mpsc::Receiver<Result<Answer, ChatError>>,
    /// Token to cancel the in-flight request.
    pub cancel_token: CancellationToken,
}

/// Result of handling an event: continue the loop or exit.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum HandleResult {
    Continue,
    Break,
}

/// Handle a mouse event (wheel scrolling only).
pub fn handle_mouse(mouse: MouseEvent, app: &mut App) {
    match mouse.kind {
        MouseEventKind::ScrollUp => app.scroll_up(constants::SCROLL_LINES_SMALL),
        MouseEventKind::ScrollDown => app.scroll_down(constants::SCROLL_LINES_SMALL),
        _ => {}
    }
}

/// Context for key event handling. Bundles mutable state to reduce parameter count.
pub struct HandleKeyContext<'a> {
    pub app: &'a mut App,
    pub config: &'a Arc<Config>,
    pub pending: &'a mut Option<PendingAnswer>,
    pub rt: &'a Arc<Runtime>,
}

/// Handle a key event. Returns HandleResult::Break to exit the main loop.
pub fn handle_key(key: KeyEvent, ctx: HandleKeyContext<'_>) -> HandleResult {
    let HandleKeyContext {
        app,
        config,
        pending,
        rt,
    } = ctx;

    if key.kind != KeyEventKind::Press {
        return HandleResult::Continue;
    }

    if let Some(shortcut) = Shortcut::match_key(&key) {
        match shortcut {
            Shortcut::Quit => {
                if let Some(p) = pending.as_ref() {
                    p.cancel_token.cancel();
                }
                return HandleResult::Break;
            }
            Shortcut::ToggleMode => app.toggle_mode(),
            Shortcut::NewSession if pending.is_none() => app.new_session(),
            Shortcut::NewSession => {}
            Shortcut::ClearInput => app.clear_input(),
        }
        return HandleResult::Continue;
    }

    // Esc: cancel in-flight request, else clear the input.
    if Shortcut::is_escape(&key) {
        match pending.as_ref() {
            Some(p) => p.cancel_token.cancel(),
            None => app.clear_input(),
        }
        return HandleResult::Continue;
    }

    input::handle_main_input(key.code, key.modifiers, app, config, pending, rt)
}
