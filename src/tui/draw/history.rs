//! Answer history: one bordered block per question and answer, with scrollbar.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Paragraph, Scrollbar, ScrollbarOrientation, ScrollbarState};

use crate::core::math::normalize;

use super::super::app::{AnswerState, App, Turn};
use super::super::constants::{ACCENT, ACCENT_SECONDARY};
use super::super::text::{styled_lines, wrap_message};

/// Repeat a character to fill width (approximate; chars may have different display widths).
fn repeat_char(c: char, n: usize) -> String {
    std::iter::repeat_n(c, n).collect()
}

/// Add a block with a labelled top border, "│ " gutter and bottom border.
fn add_block(
    lines: &mut Vec<Line<'static>>,
    label: &str,
    body: Vec<Line<'static>>,
    wrap_width: usize,
    border_color: Color,
) {
    let border_style = Style::default().fg(border_color);
    let top_label = format!("┌─ {} ", label);
    let top_trail_len = wrap_width.saturating_sub(top_label.chars().count() + 1);
    lines.push(Line::from(Span::styled(
        format!("{}{}┐", top_label, repeat_char('─', top_trail_len)),
        border_style,
    )));
    for line in body {
        let mut spans = vec![Span::styled("│ ", border_style), Span::raw("  ")];
        spans.extend(line.spans);
        lines.push(Line::from(spans));
    }
    lines.push(Line::from(Span::styled(
        format!("└{}┘", repeat_char('─', wrap_width.saturating_sub(2))),
        border_style,
    )));
}

/// "HH:MM" (UTC) for a unix timestamp.
fn clock(unix_secs: u64) -> String {
    let hour = (unix_secs % 86400) / 3600;
    let min = (unix_secs % 3600) / 60;
    format!("{:02}:{:02}", hour, min)
}

fn dim_italic(text: impl Into<String>) -> Line<'static> {
    Line::from(Span::styled(
        text.into(),
        Style::default()
            .fg(Color::DarkGray)
            .add_modifier(Modifier::ITALIC),
    ))
}

/// Body lines for the tutor side of a turn.
fn answer_lines(turn: &Turn, content_width: usize) -> Vec<Line<'static>> {
    match &turn.answer {
        AnswerState::Streaming { raw, progress } if raw.is_empty() => {
            vec![dim_italic(progress.as_deref().unwrap_or("Thinking..."))]
        }
        AnswerState::Streaming { raw, .. } => {
            let mut body = styled_lines(&normalize(raw, turn.mode), content_width);
            body.push(Line::from(Span::styled(
                "▌",
                Style::default().fg(ACCENT_SECONDARY),
            )));
            body
        }
        AnswerState::Done(doc) => styled_lines(doc, content_width),
        AnswerState::Failed(msg) => wrap_message(&format!("Error: {}", msg), content_width)
            .into_iter()
            .map(|chunk| Line::from(Span::styled(chunk, Style::default().fg(Color::Red))))
            .collect(),
        AnswerState::Cancelled => vec![dim_italic("[Cancelled]")],
    }
}

/// All history lines for the current turns.
pub(crate) fn turn_lines(turns: &[Turn], wrap_width: usize) -> Vec<Line<'static>> {
    let content_width = wrap_width.saturating_sub(5).max(1);
    let mut lines = Vec::new();
    for turn in turns {
        let question = wrap_message(&turn.question, content_width)
            .into_iter()
            .map(Line::from)
            .collect();
        add_block(
            &mut lines,
            &format!("You {}", clock(turn.timestamp)),
            question,
            wrap_width,
            Color::DarkGray,
        );
        add_block(
            &mut lines,
            &format!("Tutor ({})", turn.mode.label()),
            answer_lines(turn, content_width),
            wrap_width,
            ACCENT_SECONDARY,
        );
        lines.push(Line::default());
    }
    lines
}

pub(crate) fn draw_history(f: &mut Frame, app: &mut App, history_area: Rect) {
    let history_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(0), Constraint::Length(1)])
        .split(history_area);
    let text_area = history_chunks[0];
    let scrollbar_area = history_chunks[1];

    let lines = turn_lines(&app.turns, text_area.width as usize);
    let total_lines = lines.len();
    let visible = text_area.height as usize;
    let max_scroll = total_lines.saturating_sub(visible.max(1));
    app.last_max_scroll = max_scroll;
    let scroll_pos = app.scroll_line().min(max_scroll);
    let visible_lines: Vec<Line> = lines.into_iter().skip(scroll_pos).take(visible).collect();

    f.render_widget(Paragraph::new(visible_lines), text_area);

    let mut scrollbar_state = ScrollbarState::default()
        .position(scroll_pos)
        .content_length(total_lines);
    let scrollbar = Scrollbar::new(ScrollbarOrientation::VerticalRight)
        .thumb_symbol("█")
        .thumb_style(Style::default().fg(ACCENT_SECONDARY))
        .track_symbol(Some("│"));
    f.render_stateful_widget(scrollbar, scrollbar_area, &mut scrollbar_state);
}

/// Shown before the first question of a session.
pub(crate) fn draw_welcome(f: &mut Frame, app: &App, area: Rect) {
    let mut lines = vec![
        Line::default(),
        Line::from(Span::styled(
            "Ask a physics question.",
            Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
        )),
        Line::default(),
        Line::from(Span::styled(
            "Solve works problems step by step with equations.",
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            "Theory explains the concepts in words only.",
            Style::default().fg(Color::DarkGray),
        )),
    ];
    if let Some(ctx) = &app.context {
        lines.push(Line::default());
        lines.push(Line::from(Span::styled(
            format!("Reference material attached ({} bytes).", ctx.len()),
            Style::default().fg(ACCENT_SECONDARY),
        )));
    }
    f.render_widget(Paragraph::new(lines).alignment(Alignment::Center), area);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::Mode;

    fn text(line: &Line) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn turn(answer: AnswerState) -> Turn {
        Turn {
            question: "What is the field?".to_string(),
            mode: Mode::PreserveMath,
            answer,
            timestamp: 3600 * 14 + 60 * 5,
        }
    }

    #[test]
    fn clock_formats_utc_time_of_day() {
        assert_eq!(clock(0), "00:00");
        assert_eq!(clock(86400 + 3600 * 9 + 60 * 30), "09:30");
    }

    #[test]
    fn turn_renders_question_and_answer_blocks() {
        let doc = normalize(r"It is \(E=kq/r^2\).", Mode::PreserveMath);
        let lines = turn_lines(&[turn(AnswerState::Done(doc))], 40);
        let all: Vec<String> = lines.iter().map(text).collect();
        assert!(all[0].starts_with("┌─ You 14:05 "));
        assert!(all[0].ends_with('┐'));
        assert_eq!(all[1], "│   What is the field?");
        assert!(all[3].starts_with("┌─ Tutor (Solve) "));
        assert_eq!(all[4], "│   It is E=kq/r^2.");
        assert_eq!(all.last().map(String::as_str), Some(""));
    }

    #[test]
    fn streaming_without_text_shows_progress() {
        let lines = turn_lines(
            &[turn(AnswerState::Streaming {
                raw: String::new(),
                progress: Some("Calling API...".to_string()),
            })],
            40,
        );
        assert!(lines.iter().any(|l| text(l).contains("Calling API...")));
    }

    #[test]
    fn streaming_text_is_normalized_live() {
        let lines = turn_lines(
            &[turn(AnswerState::Streaming {
                raw: r"Use \(F=ma\)".to_string(),
                progress: None,
            })],
            40,
        );
        assert!(lines.iter().any(|l| text(l) == "│   Use F=ma"));
        assert!(lines.iter().any(|l| text(l).contains('▌')));
    }

    #[test]
    fn failure_is_shown_as_error_text() {
        let lines = turn_lines(&[turn(AnswerState::Failed("boom".to_string()))], 40);
        assert!(lines.iter().any(|l| text(l) == "│   Error: boom"));
    }
}
