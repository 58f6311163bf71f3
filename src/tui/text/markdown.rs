//! Inline Markdown for answer prose: headings, bullets, numbered lists, table rows,
//! **bold**, `code` and [links](url).

use ratatui::style::{Modifier, Style};
use ratatui::text::Span;

use crate::tui::constants::ACCENT;

/// Block-level marker at the start of a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(super) enum Lead {
    None,
    Heading,
    Bullet,
    Numbered(String),
    TableRow,
}

impl Lead {
    /// Span drawn in place of the marker, if any.
    pub(super) fn marker(&self) -> Option<Span<'static>> {
        match self {
            Lead::Bullet => Some(Span::styled("• ", Style::default().fg(ACCENT))),
            Lead::Numbered(n) => Some(Span::styled(format!("{} ", n), Style::default().fg(ACCENT))),
            Lead::None | Lead::Heading | Lead::TableRow => None,
        }
    }

    /// Style applied to the rest of the line.
    pub(super) fn body_style(&self) -> Style {
        match self {
            Lead::Heading => Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
            _ => Style::default(),
        }
    }
}

/// Split a line into its block marker and the remaining text.
pub(super) fn split_lead(s: &str) -> (Lead, &str) {
    let trimmed = s.trim_start();
    if trimmed.starts_with('#') {
        return (Lead::Heading, trimmed.trim_start_matches('#').trim_start());
    }
    if let Some(rest) = trimmed
        .strip_prefix("- ")
        .or_else(|| trimmed.strip_prefix("* "))
    {
        return (Lead::Bullet, rest);
    }
    if trimmed.starts_with('|') {
        return (Lead::TableRow, trimmed);
    }
    if let Some((num, rest)) = numbered_prefix(trimmed) {
        return (Lead::Numbered(num), rest);
    }
    (Lead::None, s)
}

/// "N. " or "N) " at the start of `s`: the marker as displayed ("N.") and the rest.
fn numbered_prefix(s: &str) -> Option<(String, &str)> {
    let digits = s.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    let rest = &s[digits..];
    let rest = rest.strip_prefix(". ").or_else(|| rest.strip_prefix(") "))?;
    Some((format!("{}.", &s[..digits]), rest))
}

/// Parse one display line of prose into styled spans.
pub(crate) fn parse_markdown_inline(s: &str) -> Vec<Span<'static>> {
    let (lead, rest) = split_lead(s);
    let mut spans: Vec<Span<'static>> = lead.marker().into_iter().collect();
    match lead {
        Lead::Heading => {
            if !rest.is_empty() {
                spans.push(Span::styled(rest.to_string(), lead.body_style()));
            }
        }
        Lead::TableRow => {
            let cells = rest.split('|').map(str::trim).filter(|c| !c.is_empty());
            for (i, cell) in cells.enumerate() {
                if i > 0 {
                    spans.push(Span::styled(" │ ", Style::default().fg(ACCENT)));
                }
                spans.extend(parse_emphasis(cell));
            }
        }
        _ => spans.extend(parse_emphasis(rest)),
    }
    spans
}

#[derive(Clone, Copy)]
enum Marker {
    Bold,
    Code,
    Link,
}

/// Parse **bold**, `code` and [text](url) within a line. Unclosed markers stay literal.
pub(super) fn parse_emphasis(s: &str) -> Vec<Span<'static>> {
    let mut spans = Vec::new();
    let mut plain = String::new();
    let mut rest = s;
    loop {
        let next = [
            (rest.find("**"), Marker::Bold),
            (rest.find('`'), Marker::Code),
            (rest.find('['), Marker::Link),
        ]
        .into_iter()
        .filter_map(|(pos, m)| pos.map(|p| (p, m)))
        .min_by_key(|(p, _)| *p);

        let Some((pos, marker)) = next else {
            plain.push_str(rest);
            break;
        };
        plain.push_str(&rest[..pos]);
        rest = &rest[pos..];

        let (open, close) = match marker {
            Marker::Bold => ("**", "**"),
            Marker::Code => ("`", "`"),
            Marker::Link => ("[", "]"),
        };
        let after_open = &rest[open.len()..];
        let Some(end) = after_open.find(close) else {
            plain.push_str(open);
            rest = after_open;
            continue;
        };
        let inner = &after_open[..end];
        let mut after = &after_open[end + close.len()..];

        let styled = match marker {
            Marker::Bold => Span::styled(
                inner.to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Marker::Code => Span::styled(inner.to_string(), Style::default().fg(ACCENT)),
            Marker::Link => {
                // Only `[text](url)` is a link; the URL itself is not shown.
                match after.strip_prefix('(').and_then(|u| u.find(')').map(|e| &u[e + 1..])) {
                    Some(tail) => {
                        after = tail;
                        Span::styled(
                            inner.to_string(),
                            Style::default()
                                .fg(ACCENT)
                                .add_modifier(Modifier::UNDERLINED),
                        )
                    }
                    None => {
                        plain.push('[');
                        rest = after_open;
                        continue;
                    }
                }
            }
        };
        if !plain.is_empty() {
            spans.push(Span::raw(std::mem::take(&mut plain)));
        }
        spans.push(styled);
        rest = after;
    }
    if !plain.is_empty() {
        spans.push(Span::raw(plain));
    }
    spans
}
