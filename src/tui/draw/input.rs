//! Input section: question box, Solve/Theory selector, bottom bar.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Position, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::core::math::Mode;

use super::super::app::App;
use super::super::constants::{ACCENT, INPUT_LINES};
use super::super::shortcuts::labels;

fn wrapped_lines(text: &str, width: u16) -> Vec<String> {
    if width == 0 {
        return vec![];
    }
    textwrap::wrap(text, width as usize)
        .into_iter()
        .map(|s| s.into_owned())
        .collect()
}

fn mode_spans(current: Mode) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    for (i, mode) in [Mode::PreserveMath, Mode::StripMath].into_iter().enumerate() {
        if i > 0 {
            spans.push(Span::styled(" · ", Style::default().fg(Color::DarkGray)));
        }
        let style = if mode == current {
            Style::default().fg(Color::Black).bg(ACCENT)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(format!(" {} ", mode.label()), style));
    }
    spans
}

fn draw_input_block(f: &mut Frame, app: &App, input_area: Rect) {
    let border_color = if app.is_streaming {
        Color::DarkGray
    } else {
        ACCENT
    };
    let input_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));
    let inner = input_block.inner(input_area);
    let inner_height = inner.height as usize;

    let input_content = if app.input.is_empty() {
        Text::from(Span::styled(
            "Ask a physics question... ",
            Style::default().fg(Color::DarkGray),
        ))
    } else {
        Text::from(app.input.as_str())
    };

    let para = Paragraph::new(input_content)
        .block(input_block)
        .style(Style::default().fg(Color::White))
        .wrap(Wrap { trim: true });

    let lines = wrapped_lines(app.input.as_str(), inner.width);
    let total_lines = lines.len().max(1);

    // Must be at char boundary or str[..n] panics (UTF-8 multi-byte chars: é, θ, emoji).
    let cursor_byte = app
        .input
        .floor_char_boundary(app.input_cursor.min(app.input.len()));
    let cursor_char_offset = app.input[..cursor_byte].chars().count();
    let (cursor_line, cursor_col) = {
        let mut idx = 0;
        let mut found = (0, 0);
        for (i, line) in lines.iter().enumerate() {
            let len = line.chars().count();
            if cursor_char_offset <= idx + len {
                found = (i, cursor_char_offset - idx);
                break;
            }
            idx += len;
        }
        if cursor_char_offset >= idx {
            let last = lines.last().map_or(0, |s| s.chars().count());
            found = (total_lines.saturating_sub(1), last);
        }
        found
    };
    let scroll_y = cursor_line
        .saturating_sub(inner_height.saturating_sub(1))
        .min(total_lines.saturating_sub(inner_height));

    f.render_widget(para.scroll((scroll_y as u16, 0)), input_area);

    let cx = inner.x + cursor_col.min(inner.width as usize) as u16;
    let cy = inner.y + cursor_line.saturating_sub(scroll_y) as u16;
    f.set_cursor_position(Position::new(cx, cy));
}

/// Left: save error or context note. Right: shortcuts.
fn draw_bottom_bar(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(1), Constraint::Min(60)])
        .split(area);

    let status = match (&app.save_error, &app.context) {
        (Some(err), _) => Span::styled(err.clone(), Style::default().fg(Color::Red)),
        (None, Some(_)) => Span::styled("+ reference", Style::default().fg(Color::DarkGray)),
        (None, None) => Span::raw(""),
    };
    f.render_widget(Paragraph::new(Line::from(status)), chunks[0]);
    f.render_widget(
        Paragraph::new(labels::bottom_bar(app.is_streaming)).alignment(Alignment::Right),
        chunks[1],
    );
}

pub(crate) fn draw_input_section(f: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(INPUT_LINES),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(area);
    draw_input_block(f, app, chunks[0]);
    f.render_widget(
        Paragraph::new(Line::from(mode_spans(app.mode))).alignment(Alignment::Center),
        chunks[1],
    );
    draw_bottom_bar(f, app, chunks[2]);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selected_mode_is_highlighted() {
        let spans = mode_spans(Mode::StripMath);
        assert_eq!(spans[0].content.as_ref(), " Solve ");
        assert_eq!(spans[2].content.as_ref(), " Theory ");
        assert_eq!(spans[2].style.bg, Some(ACCENT));
        assert_eq!(spans[0].style.bg, None);
    }

    #[test]
    fn wrapped_lines_zero_width_is_empty() {
        assert!(wrapped_lines("abc", 0).is_empty());
        assert_eq!(wrapped_lines("ab cd", 2), ["ab", "cd"]);
    }
}
