//! Handler for main input (question editing, sending, scroll).

use crossterm::event::{KeyCode, KeyModifiers};
use std::sync::Arc;

use tokio::runtime::Runtime;

use crate::core::config::Config;

use super::super::app::App;
use super::super::constants;
use super::answer_spawn;
use super::{HandleResult, PendingAnswer};

/// Handle keys that edit the question or scroll the answers.
pub(crate) fn handle_main_input(
    key_code: KeyCode,
    key_modifiers: KeyModifiers,
    app: &mut App,
    config: &Arc<Config>,
    pending: &mut Option<PendingAnswer>,
    rt: &Arc<Runtime>,
) -> HandleResult {
    match (key_code, key_modifiers) {
        (KeyCode::Enter, mods) if mods.intersects(KeyModifiers::SHIFT | KeyModifiers::ALT) => {
            app.insert_char('\n');
        }
        (KeyCode::Enter, _) => {
            if pending.is_none()
                && let Some(question) = app.take_question()
            {
                app.begin_turn(question.clone());
                *pending = Some(answer_spawn::spawn_answer(
                    rt,
                    Arc::clone(config),
                    question,
                    app.mode,
                    app.context.clone(),
                ));
            }
        }
        (KeyCode::Backspace, _) => app.delete_before_cursor(),
        (KeyCode::Left, _) => app.move_cursor_left(),
        (KeyCode::Right, _) => app.move_cursor_right(),
        (KeyCode::Home, _) => app.input_cursor = 0,
        (KeyCode::End, _) => app.input_cursor = app.input.len(),
        (KeyCode::Up, _) => app.scroll_up(constants::SCROLL_LINES_SMALL),
        (KeyCode::Down, _) => app.scroll_down(constants::SCROLL_LINES_SMALL),
        (KeyCode::PageUp, _) => app.scroll_up(constants::SCROLL_LINES_PAGE),
        (KeyCode::PageDown, _) => app.scroll_down(constants::SCROLL_LINES_PAGE),
        (KeyCode::Char(c), mods) => {
            // Ignore Ctrl/Alt+key: user likely intended a shortcut
            if !mods.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
                app.insert_char(c);
            }
        }
        _ => {}
    }
    HandleResult::Continue
}
