//! Delimiter rewriting: canonical fences, whitespace cleanup, balance validation.

use std::borrow::Cow;

use super::NormalizedDocument;
use super::detect::{Fence, MathSpan, SpanKind, detect, escape_dollars, is_escaped};

/// Why a math span could not be kept as math.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Imbalance {
    #[error("closing brace without an opening brace")]
    UnmatchedClose,
    #[error("{0} unclosed brace(s)")]
    UnclosedBrace(usize),
    #[error("\\begin or \\end without an environment name")]
    MalformedEnvironment,
    #[error("\\end{{{0}}} without a matching \\begin")]
    UnmatchedEnd(String),
    #[error("\\begin{{{open}}} closed by \\end{{{close}}}")]
    MismatchedEnvironment { open: String, close: String },
    #[error("\\begin{{{0}}} is never closed")]
    UnclosedEnvironment(String),
    #[error("unescaped $ inside math")]
    StrayDollar,
    #[error("trailing backslash would escape the closing fence")]
    TrailingBackslash,
}

/// Check that math content can be emitted between canonical `$` fences: braces and
/// environments balance, there is no unescaped `$` and no trailing lone backslash.
pub fn validate(content: &str) -> Result<(), Imbalance> {
    let bytes = content.as_bytes();
    let mut depth = 0usize;
    let mut envs: Vec<&str> = Vec::new();
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'\\' => {
                let name_start = i + 1;
                let mut k = name_start;
                while k < bytes.len() && bytes[k].is_ascii_alphabetic() {
                    k += 1;
                }
                if k == name_start {
                    if name_start == bytes.len() {
                        return Err(Imbalance::TrailingBackslash);
                    }
                    // Escaped symbol such as \{ \} \$ \\
                    i += 2;
                    continue;
                }
                let name = &content[name_start..k];
                if name == "begin" || name == "end" {
                    let (env, after) =
                        environment_name(content, k).ok_or(Imbalance::MalformedEnvironment)?;
                    if name == "begin" {
                        envs.push(env);
                    } else {
                        match envs.pop() {
                            Some(open) if open == env => {}
                            Some(open) => {
                                return Err(Imbalance::MismatchedEnvironment {
                                    open: open.to_string(),
                                    close: env.to_string(),
                                });
                            }
                            None => return Err(Imbalance::UnmatchedEnd(env.to_string())),
                        }
                    }
                    i = after;
                } else {
                    i = k;
                }
                continue;
            }
            b'{' => depth += 1,
            b'}' => depth = depth.checked_sub(1).ok_or(Imbalance::UnmatchedClose)?,
            b'$' => return Err(Imbalance::StrayDollar),
            _ => {}
        }
        i += 1;
    }
    if depth > 0 {
        return Err(Imbalance::UnclosedBrace(depth));
    }
    if let Some(open) = envs.pop() {
        return Err(Imbalance::UnclosedEnvironment(open.to_string()));
    }
    Ok(())
}

/// Parse `{name}` (after optional spaces) at `from`. Returns the name and the offset after `}`.
fn environment_name(content: &str, from: usize) -> Option<(&str, usize)> {
    let rest = &content[from..];
    let trimmed = rest.trim_start();
    let offset = from + (rest.len() - trimmed.len());
    let inner = trimmed.strip_prefix('{')?;
    let close = inner.find('}')?;
    let name = inner[..close].trim();
    if name.is_empty() {
        return None;
    }
    Some((name, offset + 1 + close + 1))
}

/// Collapse whitespace runs to one space and trim.
///
/// A control space (`\ `) at the very end loses its space to the trim; its backslash is
/// dropped with it so it cannot escape the closing fence.
pub(super) fn collapse_whitespace(s: &str) -> String {
    let mut out = s.split_whitespace().collect::<Vec<_>>().join(" ");
    if !out.is_empty() && is_escaped(out.as_bytes(), out.len()) {
        out.pop();
        out.truncate(out.trim_end().len());
    }
    out
}

/// Plain text for a span that stays or becomes plain.
///
/// Literal dollars are escaped so they cannot pair with canonical fences on a later pass.
/// Demoted `\(..\)`, `\[..\]` and bare-bracket spans are kept verbatim: their fences are
/// found again on re-detection regardless of any `$` inside.
pub(super) fn plain_text<'a>(span: &MathSpan, raw: &'a str) -> Cow<'a, str> {
    match span.fence {
        Fence::None | Fence::Dollar | Fence::DoubleDollar => escape_dollars(span.text(raw)),
        Fence::Bracket | Fence::Paren | Fence::BareBracket | Fence::BareParen => {
            Cow::Borrowed(span.text(raw))
        }
    }
}

/// Detect spans and rewrite every valid math span to its canonical form.
pub(super) fn canonicalize(raw: &str) -> NormalizedDocument {
    let mut doc = NormalizedDocument::default();
    for span in detect(raw) {
        if span.kind == SpanKind::Plain {
            doc.push_plain(&plain_text(&span, raw));
            continue;
        }
        let content = collapse_whitespace(span.content(raw));
        if content.is_empty() {
            log::trace!("dropping empty math span at {:?}", span.range);
            continue;
        }
        match validate(&content) {
            Ok(()) => doc.push_math(span.kind, content),
            Err(reason) => {
                log::debug!(
                    "demoting {:?} span at {:?} to plain text: {}",
                    span.fence,
                    span.range,
                    reason
                );
                doc.push_plain(&plain_text(&span, raw));
            }
        }
    }
    doc
}
