//! TUI rendering: header, answer history, input section.

mod header;
mod history;
mod input;

use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};

use super::app::App;
use super::constants::{ACCENT, INPUT_LINES};

pub(super) fn draw(f: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(3),
            Constraint::Length(INPUT_LINES + 2),
        ])
        .split(area);
    header::draw_header(f, app, chunks[0], ACCENT);
    if app.turns.is_empty() {
        history::draw_welcome(f, app, chunks[1]);
    } else {
        history::draw_history(f, app, chunks[1]);
    }
    input::draw_input_section(f, app, chunks[2]);
}
