//! Terminal rendering of normalized answers.
//!
//! [`StyledSink`] receives prose and math segments from the renderer and lays them out as
//! ratatui lines: prose goes through the inline Markdown parser, inline math is styled in
//! place and wrapped as one unit, display math gets its own indented lines.

use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};

use crate::core::math::{DisplaySink, NormalizedDocument, SpanKind, render, unescape_dollars};
use crate::tui::constants::ACCENT_SECONDARY;

use super::markdown::{Lead, parse_emphasis, parse_markdown_inline, split_lead};
use super::wrap::{display_width, wrap_message};

/// Indent for display equations.
const DISPLAY_INDENT: &str = "    ";

fn math_style() -> Style {
    Style::default()
        .fg(ACCENT_SECONDARY)
        .add_modifier(Modifier::ITALIC)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Piece {
    text: String,
    math: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Block {
    Text(Vec<Piece>),
    Display(String),
}

/// Collects a document as logical lines; [`StyledSink::into_lines`] wraps them.
#[derive(Debug, Default)]
pub(crate) struct StyledSink {
    blocks: Vec<Block>,
    current: Vec<Piece>,
    /// A display equation just ended; the next newline only closes its line.
    after_display: bool,
}

impl StyledSink {
    fn flush_line(&mut self) {
        let pieces = std::mem::take(&mut self.current);
        self.blocks.push(Block::Text(pieces));
    }

    /// Wrap everything received so far to `width` columns.
    pub(crate) fn into_lines(mut self, width: usize) -> Vec<Line<'static>> {
        if !self.current.is_empty() {
            self.flush_line();
        }
        let mut out = Vec::new();
        for block in self.blocks {
            match block {
                Block::Display(content) => {
                    let inner = width.saturating_sub(DISPLAY_INDENT.len()).max(1);
                    for chunk in wrap_message(&content, inner) {
                        out.push(Line::from(vec![
                            Span::raw(DISPLAY_INDENT),
                            Span::styled(chunk, math_style()),
                        ]));
                    }
                }
                Block::Text(pieces) if pieces.iter().any(|p| p.math) => {
                    out.extend(wrap_mixed(&pieces, width));
                }
                Block::Text(pieces) => {
                    let text: String = pieces.iter().map(|p| p.text.as_str()).collect();
                    for chunk in wrap_message(&text, width) {
                        out.push(Line::from(parse_markdown_inline(&chunk)));
                    }
                }
            }
        }
        out
    }
}

impl DisplaySink for StyledSink {
    fn prose(&mut self, text: &str) {
        let text = unescape_dollars(text);
        for (i, part) in text.split('\n').enumerate() {
            if i > 0 {
                if self.after_display && self.current.is_empty() {
                    self.after_display = false;
                } else {
                    self.flush_line();
                }
            }
            let part = if self.current.is_empty() && self.after_display {
                part.trim_start()
            } else {
                part
            };
            if !part.is_empty() {
                self.after_display = false;
                self.current.push(Piece {
                    text: part.to_string(),
                    math: false,
                });
            }
        }
    }

    fn math(&mut self, kind: SpanKind, content: &str) {
        match kind {
            SpanKind::DisplayMath => {
                if self.current.iter().any(|p| !p.text.trim().is_empty()) {
                    self.flush_line();
                } else {
                    self.current.clear();
                }
                self.blocks.push(Block::Display(content.to_string()));
                self.after_display = true;
            }
            _ => {
                self.after_display = false;
                self.current.push(Piece {
                    text: content.to_string(),
                    math: true,
                });
            }
        }
    }
}

/// Render `doc` as styled lines wrapped to `width`.
pub(crate) fn styled_lines(doc: &NormalizedDocument, width: usize) -> Vec<Line<'static>> {
    let mut sink = StyledSink::default();
    render(doc, &mut sink);
    sink.into_lines(width)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Token {
    text: String,
    math: bool,
    /// Separated from the previous token by whitespace.
    space_before: bool,
}

/// Split pieces into words. Inline math is always a single token.
fn tokenize(pieces: &[Piece]) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut space = false;
    for piece in pieces {
        if piece.math {
            tokens.push(Token {
                text: piece.text.clone(),
                math: true,
                space_before: space,
            });
            space = false;
            continue;
        }
        let mut word = String::new();
        for c in piece.text.chars() {
            if c.is_whitespace() {
                if !word.is_empty() {
                    tokens.push(Token {
                        text: std::mem::take(&mut word),
                        math: false,
                        space_before: space,
                    });
                }
                space = true;
            } else {
                word.push(c);
            }
        }
        if !word.is_empty() {
            tokens.push(Token {
                text: word,
                math: false,
                space_before: space,
            });
            space = false;
        }
    }
    tokens
}

/// Greedy wrap of a line mixing prose and inline math. Tokens glued without whitespace
/// (`$x$,`) move together.
fn wrap_mixed(pieces: &[Piece], width: usize) -> Vec<Line<'static>> {
    let (lead, first_rest) = match pieces.first() {
        Some(first) if !first.math => split_lead(&first.text),
        _ => (Lead::None, ""),
    };
    let mut pieces = pieces.to_vec();
    if lead != Lead::None
        && let Some(first) = pieces.first_mut()
    {
        first.text = first_rest.to_string();
    }
    let marker = lead.marker();
    let indent = marker.as_ref().map_or(0, |m| display_width(&m.content));
    let avail = width.saturating_sub(indent).max(1);

    // Group tokens that must stay on one line.
    let mut groups: Vec<Vec<Token>> = Vec::new();
    for token in tokenize(&pieces) {
        match groups.last_mut() {
            Some(group) if !token.space_before => group.push(token),
            _ => groups.push(vec![token]),
        }
    }

    let mut rows: Vec<Vec<Token>> = vec![Vec::new()];
    let mut used = 0;
    for mut group in groups {
        let group_width: usize = group.iter().map(|t| display_width(&t.text)).sum();
        let row_is_empty = rows.last().is_none_or(Vec::is_empty);
        if !row_is_empty && used + 1 + group_width > avail {
            rows.push(Vec::new());
            used = 0;
        }
        let Some(row) = rows.last_mut() else { continue };
        if row.is_empty() {
            group[0].space_before = false;
        } else {
            used += 1;
        }
        used += group_width;
        row.extend(group);
    }

    let body_style = lead.body_style();
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| {
            let mut spans = Vec::new();
            match (&marker, i) {
                (Some(m), 0) => spans.push(m.clone()),
                (Some(_), _) => spans.push(Span::raw(" ".repeat(indent))),
                (None, _) => {}
            }
            spans.extend(row_spans(&row, body_style));
            Line::from(spans)
        })
        .collect()
}

fn row_spans(row: &[Token], body_style: Style) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut prose = String::new();
    let flush = |prose: &mut String, spans: &mut Vec<Span<'static>>| {
        if prose.is_empty() {
            return;
        }
        for span in parse_emphasis(&std::mem::take(prose)) {
            let style = body_style.patch(span.style);
            spans.push(span.style(style));
        }
    };
    for token in row {
        if token.space_before {
            prose.push(' ');
        }
        if token.math {
            flush(&mut prose, &mut spans);
            spans.push(Span::styled(token.text.clone(), math_style()));
        } else {
            prose.push_str(&token.text);
        }
    }
    flush(&mut prose, &mut spans);
    spans
}
