//! Centralized keyboard shortcuts.
//!
//! | Action        | Keys                  |
//! |---------------|-----------------------|
//! | Ask           | Enter                 |
//! | Newline       | Shift+Enter, Alt+Enter|
//! | Solve/Theory  | Tab                   |
//! | Scroll        | ↑ ↓ PageUp PageDown   |
//! | New session   | Ctrl+N                |
//! | Clear input   | Ctrl+U, Esc (idle)    |
//! | Cancel        | Esc (while answering) |
//! | Quit          | Ctrl+C                |

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

/// Detected shortcut.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shortcut {
    /// Start a new session (Ctrl+N)
    NewSession,
    /// Switch between Solve and Theory (Tab)
    ToggleMode,
    /// Clear the input (Ctrl+U)
    ClearInput,
    /// Quit (Ctrl+C)
    Quit,
}

impl Shortcut {
    /// Returns the shortcut if the key matches.
    pub fn match_key(key: &KeyEvent) -> Option<Shortcut> {
        if key.kind != KeyEventKind::Press {
            return None;
        }
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Char('c') if ctrl => Some(Shortcut::Quit),
            KeyCode::Char('n') if ctrl => Some(Shortcut::NewSession),
            KeyCode::Char('u') if ctrl => Some(Shortcut::ClearInput),
            KeyCode::Tab | KeyCode::BackTab => Some(Shortcut::ToggleMode),
            _ => None,
        }
    }

    /// True if key is Escape.
    pub fn is_escape(key: &KeyEvent) -> bool {
        key.kind == KeyEventKind::Press && key.code == KeyCode::Esc
    }
}


/// Labels for the bottom bar.
pub mod labels {
    use ratatui::style::Color;
    use ratatui::text::{Line, Span, Text};

    const DIM: Color = Color::DarkGray;

    pub fn bottom_bar(is_streaming: bool) -> Text<'static> {
        if is_streaming {
            Text::from(Line::from(vec![
                Span::styled("Esc ", Color::Yellow),
                Span::raw("cancel"),
                Span::styled("  ↑↓ ", DIM),
                Span::raw("scroll"),
            ]))
        } else {
            Text::from(Line::from(vec![
                Span::styled("Enter ", DIM),
                Span::raw("ask"),
                Span::styled("  Tab ", DIM),
                Span::raw("solve/theory"),
                Span::styled("  ↑↓ ", DIM),
                Span::raw("scroll"),
                Span::styled("  Ctrl+N ", DIM),
                Span::raw("new"),
                Span::styled("  Ctrl+C ", DIM),
                Span::raw("quit"),
            ]))
        }
    }
}
