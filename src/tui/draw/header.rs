//! Header: logo, title, model name, token usage.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;
use std::time::Instant;

use crate::core::app::NAME;

use super::super::app::App;
use super::super::constants::{LOGO_IDLE, LOGO_THINKING};

/// Start time for header animation phase (thinking spinner).
static HEADER_START: std::sync::OnceLock<Instant> = std::sync::OnceLock::new();

/// Max width for model name in header; longer names are truncated with "…".
const MODEL_HEADER_WIDTH: u16 = 28;
/// Width for token usage display (e.g. "1.2k tok").
const TOKENS_HEADER_WIDTH: u16 = 12;

/// Format a token count in compact form: 1234 -> "1.2k", 128000 -> "128k", 1500000 -> "1.5M".
fn format_tokens_compact(tokens: u64) -> String {
    if tokens >= 1_000_000 {
        let m = tokens as f64 / 1_000_000.0;
        if m == m.floor() {
            format!("{}M", m as u64)
        } else {
            format!("{:.1}M", m)
        }
    } else if tokens >= 1_000 {
        let k = tokens as f64 / 1_000.0;
        if k == k.floor() {
            format!("{}k", k as u64)
        } else {
            format!("{:.1}k", k)
        }
    } else {
        format!("{}", tokens)
    }
}

/// Keep the tail of `name` when it is wider than `max_len` chars.
fn truncate_model_name(name: &str, max_len: usize) -> String {
    if name.chars().count() <= max_len {
        return name.to_string();
    }
    let chars: Vec<char> = name.chars().collect();
    let start = chars.len().saturating_sub(max_len.saturating_sub(1));
    format!("…{}", chars[start..].iter().collect::<String>())
}

pub(crate) fn draw_header(f: &mut Frame, app: &App, area: Rect, accent: Color) {
    let header_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length(8),
            Constraint::Min(0),
            Constraint::Length(MODEL_HEADER_WIDTH),
            Constraint::Length(TOKENS_HEADER_WIDTH),
        ])
        .split(area);

    let logo_symbol = if app.is_streaming {
        let start = HEADER_START.get_or_init(Instant::now);
        let phase = start.elapsed().as_millis() as usize;
        LOGO_THINKING[(phase / 80) % LOGO_THINKING.len()]
    } else {
        LOGO_IDLE
    };
    let answered = app.session.entries().len();
    let logo_line = Line::from(vec![
        Span::styled(format!("{} ", logo_symbol), Style::default().fg(accent)),
        Span::styled(format!("{} ", answered), Style::default().fg(Color::DarkGray)),
    ]);
    f.render_widget(Paragraph::new(logo_line), header_chunks[0]);

    let title_str = format!("{} ", NAME);
    let title_len = title_str.len() as u16;
    let title_area = Rect {
        x: area.x + area.width.saturating_sub(title_len) / 2,
        y: area.y,
        width: title_len.min(area.width),
        height: area.height,
    };
    let title = Line::from(Span::styled(
        title_str,
        Style::default().fg(accent).add_modifier(Modifier::BOLD),
    ));
    f.render_widget(Paragraph::new(title), title_area);

    let model_line = Line::from(Span::styled(
        truncate_model_name(&app.model_name, MODEL_HEADER_WIDTH as usize),
        Style::default().fg(Color::DarkGray),
    ));
    f.render_widget(
        Paragraph::new(model_line).alignment(Alignment::Right),
        header_chunks[2],
    );

    let tokens_text = match &app.token_usage {
        Some(usage) => format!("{} tok", format_tokens_compact(usage.total_tokens)),
        None => "— tok".to_string(),
    };
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            tokens_text,
            Style::default().fg(Color::DarkGray),
        )))
        .alignment(Alignment::Right),
        header_chunks[3],
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tokens_compact_small() {
        assert_eq!(format_tokens_compact(0), "0");
        assert_eq!(format_tokens_compact(999), "999");
    }

    #[test]
    fn tokens_compact_thousands() {
        assert_eq!(format_tokens_compact(1_000), "1k");
        assert_eq!(format_tokens_compact(1_234), "1.2k");
        assert_eq!(format_tokens_compact(128_000), "128k");
    }

    #[test]
    fn tokens_compact_millions() {
        assert_eq!(format_tokens_compact(2_000_000), "2M");
        assert_eq!(format_tokens_compact(1_500_000), "1.5M");
    }

    #[test]
    fn long_model_name_keeps_tail() {
        assert_eq!(truncate_model_name("llama", 10), "llama");
        let t = truncate_model_name("meta-llama/llama-4-scout-17b", 10);
        assert_eq!(t.chars().count(), 10);
        assert!(t.starts_with('…'));
        assert!(t.ends_with("17b"));
    }
}
