//! TUI application state: turns, input, scroll, mode.

use crate::core::llm::TokenUsage;
use crate::core::math::{Mode, NormalizedDocument};
use crate::core::session::{Session, now_secs};

/// What the tutor side of a turn currently shows.
#[derive(Debug, Clone)]
pub(crate) enum AnswerState {
    /// Chunks received so far, normalized on every draw.
    Streaming {
        raw: String,
        progress: Option<String>,
    },
    Done(NormalizedDocument),
    Failed(String),
    Cancelled,
}

/// One question and its answer.
#[derive(Debug, Clone)]
pub(crate) struct Turn {
    pub(crate) question: String,
    pub(crate) mode: Mode,
    pub(crate) answer: AnswerState,
    pub(crate) timestamp: u64,
}

/// Scroll position: either a specific line index, or "at bottom" (follow new content).
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ScrollPosition {
    Line(usize),
    Bottom,
}

impl Default for ScrollPosition {
    fn default() -> Self {
        Self::Line(0)
    }
}

pub struct App {
    pub(crate) turns: Vec<Turn>,
    /// User input in the text field.
    pub(crate) input: String,
    /// Cursor position in the input (byte index).
    pub(crate) input_cursor: usize,
    pub(crate) scroll: ScrollPosition,
    pub(crate) last_max_scroll: usize,
    /// Mode for the next question (Tab toggles).
    pub(crate) mode: Mode,
    /// True while a request is in flight (used by bottom bar to show cancel hint).
    pub(crate) is_streaming: bool,
    pub(crate) model_name: String,
    /// Token usage reported for the last answer.
    pub(crate) token_usage: Option<TokenUsage>,
    /// Answered turns, persisted after each answer.
    pub(crate) session: Session,
    /// Reference text from `--file`, sent with every question.
    pub(crate) context: Option<String>,
    /// Last session save failure, shown in the bottom bar.
    pub(crate) save_error: Option<String>,
}

impl App {
    pub fn new(model_name: String, mode: Mode, context: Option<String>) -> Self {
        Self {
            turns: vec![],
            input: String::new(),
            input_cursor: 0,
            scroll: ScrollPosition::default(),
            last_max_scroll: 0,
            mode,
            is_streaming: false,
            model_name,
            token_usage: None,
            session: Session::new(),
            context,
            save_error: None,
        }
    }

    /// Start a turn for `question` in the current mode and follow it.
    pub(crate) fn begin_turn(&mut self, question: String) {
        self.turns.push(Turn {
            question,
            mode: self.mode,
            answer: AnswerState::Streaming {
                raw: String::new(),
                progress: None,
            },
            timestamp: now_secs(),
        });
        self.is_streaming = true;
        self.scroll = ScrollPosition::Bottom;
    }

    pub(crate) fn set_progress(&mut self, msg: String) {
        if let Some(Turn {
            answer: AnswerState::Streaming { progress, .. },
            ..
        }) = self.turns.last_mut()
        {
            *progress = Some(msg);
        }
    }

    pub(crate) fn append_chunk(&mut self, chunk: &str) {
        if let Some(Turn {
            answer: AnswerState::Streaming { raw, .. },
            ..
        }) = self.turns.last_mut()
        {
            raw.push_str(chunk);
        }
    }

    /// Reset to a new empty session. Saved sessions stay in history.
    pub(crate) fn new_session(&mut self) {
        self.turns.clear();
        self.session = Session::new();
        self.scroll = ScrollPosition::default();
        self.last_max_scroll = 0;
        self.token_usage = None;
        self.save_error = None;
    }

    pub(crate) fn toggle_mode(&mut self) {
        self.mode = self.mode.toggle();
    }

    pub(crate) fn insert_char(&mut self, c: char) {
        let at = self.input_cursor.min(self.input.len());
        self.input.insert(at, c);
        self.input_cursor = at + c.len_utf8();
    }

    pub(crate) fn delete_before_cursor(&mut self) {
        let at = self.input_cursor.min(self.input.len());
        if let Some((idx, _)) = self.input[..at].char_indices().next_back() {
            self.input.remove(idx);
            self.input_cursor = idx;
        }
    }

    pub(crate) fn move_cursor_left(&mut self) {
        let at = self.input_cursor.min(self.input.len());
        self.input_cursor = self.input[..at]
            .char_indices()
            .next_back()
            .map_or(0, |(idx, _)| idx);
    }

    pub(crate) fn move_cursor_right(&mut self) {
        let at = self.input_cursor.min(self.input.len());
        self.input_cursor = self.input[at..]
            .chars()
            .next()
            .map_or(at, |c| at + c.len_utf8());
    }

    pub(crate) fn clear_input(&mut self) {
        self.input.clear();
        self.input_cursor = 0;
    }

    /// Take the trimmed input, leaving the field empty. None if there is nothing to send.
    pub(crate) fn take_question(&mut self) -> Option<String> {
        let question = self.input.trim().to_string();
        if question.is_empty() {
            return None;
        }
        self.clear_input();
        Some(question)
    }

    /// Must be called before scroll_up/scroll_down when at bottom.
    pub(crate) fn materialize_scroll(&mut self) {
        if self.scroll == ScrollPosition::Bottom {
            self.scroll = ScrollPosition::Line(self.last_max_scroll);
        }
    }

    pub(crate) fn scroll_down(&mut self, n: usize) {
        self.materialize_scroll();
        if let ScrollPosition::Line(pos) = self.scroll {
            self.scroll = ScrollPosition::Line((pos + n).min(self.last_max_scroll));
        }
    }

    pub(crate) fn scroll_up(&mut self, n: usize) {
        self.materialize_scroll();
        if let ScrollPosition::Line(pos) = self.scroll {
            self.scroll = ScrollPosition::Line(pos.saturating_sub(n));
        }
    }

    /// Resolve scroll position to a concrete line index.
    pub(crate) fn scroll_line(&self) -> usize {
        match self.scroll {
            ScrollPosition::Line(n) => n.min(self.last_max_scroll),
            ScrollPosition::Bottom => self.last_max_scroll,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        App::new("test-model".to_string(), Mode::PreserveMath, None)
    }

    #[test]
    fn begin_turn_streams_into_last_turn() {
        let mut app = app();
        app.begin_turn("What is flux?".to_string());
        app.set_progress("Calling API...".to_string());
        app.append_chunk("Flux is ");
        app.append_chunk("$\\Phi$.");
        assert!(app.is_streaming);
        assert_eq!(app.scroll, ScrollPosition::Bottom);
        match &app.turns[0].answer {
            AnswerState::Streaming { raw, progress } => {
                assert_eq!(raw, "Flux is $\\Phi$.");
                assert_eq!(progress.as_deref(), Some("Calling API..."));
            }
            other => panic!("expected streaming, got {:?}", other),
        }
    }

    #[test]
    fn chunks_after_completion_are_ignored() {
        let mut app = app();
        app.begin_turn("q".to_string());
        app.turns[0].answer = AnswerState::Cancelled;
        app.append_chunk("late");
        assert!(matches!(app.turns[0].answer, AnswerState::Cancelled));
    }

    #[test]
    fn turn_uses_mode_at_send_time() {
        let mut app = app();
        app.toggle_mode();
        app.begin_turn("q".to_string());
        app.toggle_mode();
        assert_eq!(app.turns[0].mode, Mode::StripMath);
        assert_eq!(app.mode, Mode::PreserveMath);
    }

    #[test]
    fn new_session_clears_turns() {
        let mut app = app();
        app.begin_turn("q".to_string());
        let old_id = app.session.id().to_string();
        app.new_session();
        assert!(app.turns.is_empty());
        assert_ne!(app.session.id(), old_id);
    }

    #[test]
    fn input_editing_handles_multibyte_chars() {
        let mut app = app();
        for c in "θ=π".chars() {
            app.insert_char(c);
        }
        app.move_cursor_left();
        app.delete_before_cursor();
        assert_eq!(app.input, "θπ");
        app.move_cursor_right();
        app.insert_char('!');
        assert_eq!(app.input, "θπ!");
    }

    #[test]
    fn take_question_trims_and_clears() {
        let mut app = app();
        app.input = "  why?  ".to_string();
        app.input_cursor = app.input.len();
        assert_eq!(app.take_question().as_deref(), Some("why?"));
        assert!(app.input.is_empty());
        app.input = "   ".to_string();
        assert_eq!(app.take_question(), None);
    }

    #[test]
    fn scroll_from_bottom_materializes() {
        let mut app = app();
        app.last_max_scroll = 20;
        app.scroll = ScrollPosition::Bottom;
        app.scroll_up(3);
        assert_eq!(app.scroll, ScrollPosition::Line(17));
        app.scroll_down(10);
        assert_eq!(app.scroll_line(), 20);
    }
}
