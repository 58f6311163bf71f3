//! Delimiter detection: partition raw text into plain, inline-math and display-math spans.

use std::borrow::Cow;
use std::ops::Range;

use super::rewrite::validate;

/// Classification of a span of text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpanKind {
    Plain,
    InlineMath,
    DisplayMath,
}

impl SpanKind {
    /// Canonical delimiter for math kinds; `None` for plain text.
    pub fn delimiter(self) -> Option<&'static str> {
        match self {
            SpanKind::Plain => None,
            SpanKind::InlineMath => Some("$"),
            SpanKind::DisplayMath => Some("$$"),
        }
    }
}

/// The markup that delimited a span in the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fence {
    None,
    /// `$$ ... $$`
    DoubleDollar,
    /// `$ ... $`
    Dollar,
    /// `\[ ... \]`
    Bracket,
    /// `\( ... \)`
    Paren,
    /// `[ \cmd ... ]`
    BareBracket,
    /// `( \cmd ... )`
    BareParen,
}

/// A classified byte range of the source. `range` includes the fences, `content` excludes them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MathSpan {
    pub kind: SpanKind,
    pub range: Range<usize>,
    pub content: Range<usize>,
    pub fence: Fence,
}

impl MathSpan {
    /// Source text of the whole span, fences included.
    pub fn text<'a>(&self, src: &'a str) -> &'a str {
        &src[self.range.clone()]
    }

    /// Source text between the fences.
    pub fn content<'a>(&self, src: &'a str) -> &'a str {
        &src[self.content.clone()]
    }
}

/// Commands whose brace argument is prose, not math (skipped by the prose heuristic).
pub(super) const TEXT_COMMANDS: &[&str] = &[
    "text",
    "textrm",
    "textbf",
    "textit",
    "textsf",
    "texttt",
    "mathrm",
    "mbox",
    "emph",
    "operatorname",
];

/// Alphabetic runs this long outside commands mark bracket content as prose.
const PROSE_WORD_LEN: usize = 3;

/// Partition `src` into spans. Concatenating `span.text(src)` over the result yields `src`.
pub fn detect(src: &str) -> Vec<MathSpan> {
    let mut scanner = Scanner {
        src,
        bytes: src.as_bytes(),
        spans: Vec::new(),
        plain_start: 0,
    };
    scanner.run();
    scanner.spans
}

struct Scanner<'a> {
    src: &'a str,
    bytes: &'a [u8],
    spans: Vec<MathSpan>,
    plain_start: usize,
}

/// What happened when an opener was examined.
enum Step {
    /// A math span was emitted; continue at this offset.
    Emitted(usize),
    /// Not a fence here; treat the opener as literal text.
    Literal,
    /// Literal text up to this offset.
    Skip(usize),
    /// Unterminated explicit fence: the rest of the input is plain.
    Tail,
}

impl Scanner<'_> {
    fn run(&mut self) {
        let mut i = 0;
        while i < self.bytes.len() {
            let step = match self.bytes[i] {
                b'`' => {
                    i = code_span_end(self.src, i);
                    continue;
                }
                b'\\' => match self.bytes.get(i + 1) {
                    Some(b'[') => self.explicit(i, 2, "\\]", SpanKind::DisplayMath, Fence::Bracket),
                    Some(b'(') => self.explicit(i, 2, "\\)", SpanKind::InlineMath, Fence::Paren),
                    Some(b'\\') | Some(b'$') => {
                        i += 2;
                        continue;
                    }
                    _ => Step::Literal,
                },
                b'$' if self.bytes.get(i + 1) == Some(&b'$') => self.double_dollar(i),
                b'$' => self.single_dollar(i),
                b'[' => self.implicit(i, b'[', b']', SpanKind::DisplayMath, Fence::BareBracket),
                b'(' => self.implicit(i, b'(', b')', SpanKind::InlineMath, Fence::BareParen),
                _ => Step::Literal,
            };
            match step {
                Step::Emitted(next) => i = next,
                Step::Literal => i += 1,
                Step::Skip(next) => i = next,
                Step::Tail => break,
            }
        }
        if self.plain_start < self.bytes.len() {
            self.spans.push(MathSpan {
                kind: SpanKind::Plain,
                range: self.plain_start..self.bytes.len(),
                content: self.plain_start..self.bytes.len(),
                fence: Fence::None,
            });
        }
    }

    fn emit(&mut self, kind: SpanKind, fence: Fence, range: Range<usize>, content: Range<usize>) {
        if self.plain_start < range.start {
            self.spans.push(MathSpan {
                kind: SpanKind::Plain,
                range: self.plain_start..range.start,
                content: self.plain_start..range.start,
                fence: Fence::None,
            });
        }
        self.plain_start = range.end;
        self.spans.push(MathSpan {
            kind,
            range,
            content,
            fence,
        });
    }

    /// Unambiguous fences: the closer is searched verbatim, a missing closer ends detection.
    fn explicit(
        &mut self,
        at: usize,
        open_len: usize,
        close: &str,
        kind: SpanKind,
        fence: Fence,
    ) -> Step {
        let content_start = at + open_len;
        match find_unescaped(self.src, content_start, close) {
            Some(content_end) => {
                let end = content_end + close.len();
                self.emit(kind, fence, at..end, content_start..content_end);
                Step::Emitted(end)
            }
            None => Step::Tail,
        }
    }

    /// `$$...$$`. A pair enclosing invalid math is literal text, so a stray `$$` cannot
    /// swallow the math that follows it.
    fn double_dollar(&mut self, at: usize) -> Step {
        let content_start = at + 2;
        match find_unescaped(self.src, content_start, "$$") {
            Some(content_end) if validate(&self.src[content_start..content_end]).is_err() => {
                Step::Skip(content_start)
            }
            Some(content_end) => {
                let end = content_end + 2;
                self.emit(
                    SpanKind::DisplayMath,
                    Fence::DoubleDollar,
                    at..end,
                    content_start..content_end,
                );
                Step::Emitted(end)
            }
            None => Step::Tail,
        }
    }

    /// `$...$`: opener followed by non-space, closer preceded by non-space, no blank line,
    /// valid math in between. Anything else leaves the `$` literal (currency).
    fn single_dollar(&mut self, at: usize) -> Step {
        let content_start = at + 1;
        match self.bytes.get(content_start) {
            Some(b) if !b.is_ascii_whitespace() => {}
            _ => return Step::Literal,
        }
        let limit = blank_line_from(self.src, content_start);
        let mut j = content_start + 1;
        while j < limit {
            if self.bytes[j] == b'$'
                && !is_escaped(self.bytes, j)
                && !self.bytes[j - 1].is_ascii_whitespace()
            {
                if validate(&self.src[content_start..j]).is_err() {
                    return Step::Literal;
                }
                self.emit(SpanKind::InlineMath, Fence::Dollar, at..j + 1, content_start..j);
                return Step::Emitted(j + 1);
            }
            j += 1;
        }
        Step::Literal
    }

    /// Bare `[...]` / `(...)` holding LaTeX. Anything doubtful stays plain.
    fn implicit(&mut self, at: usize, open: u8, close: u8, kind: SpanKind, fence: Fence) -> Step {
        let content_start = at + 1;
        if !starts_with_command(&self.src[content_start..]) {
            return Step::Literal;
        }
        let limit = blank_line_from(self.src, content_start);
        let mut depth = 1usize;
        let mut j = content_start;
        while j < limit {
            let b = self.bytes[j];
            if b == b'\\' {
                j += 2;
                continue;
            }
            if b == open {
                depth += 1;
            } else if b == close {
                depth -= 1;
                if depth == 0 {
                    let content = &self.src[content_start..j];
                    if looks_like_prose(content) {
                        return Step::Literal;
                    }
                    self.emit(kind, fence, at..j + 1, content_start..j);
                    return Step::Emitted(j + 1);
                }
            }
            j += 1;
        }
        Step::Literal
    }
}

/// Backtick code spans and fences are opaque; returns the offset after the closing run.
fn code_span_end(src: &str, at: usize) -> usize {
    let run = src.as_bytes()[at..].iter().take_while(|&&b| b == b'`').count();
    let ticks = &src[at..at + run];
    match src[at + run..].find(ticks) {
        Some(rel) => at + run + rel + run,
        None => at + run,
    }
}

/// True when `bytes[at]` follows an odd run of backslashes.
pub(super) fn is_escaped(bytes: &[u8], at: usize) -> bool {
    bytes[..at].iter().rev().take_while(|&&b| b == b'\\').count() % 2 == 1
}

/// First occurrence of `pat` at or after `from` that is not escaped by a backslash.
fn find_unescaped(src: &str, from: usize, pat: &str) -> Option<usize> {
    let mut start = from;
    while let Some(rel) = src[start..].find(pat) {
        let at = start + rel;
        if !is_escaped(src.as_bytes(), at) {
            return Some(at);
        }
        start = at + 1;
    }
    None
}

/// Write every literal `$` outside code spans as `\$`, so it cannot pair with a math fence.
/// Already escaped dollars are left alone.
pub fn escape_dollars(text: &str) -> Cow<'_, str> {
    if !text.contains('$') {
        return Cow::Borrowed(text);
    }
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len() + 4);
    let mut copied = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'`' => i = code_span_end(text, i),
            b'$' if !is_escaped(bytes, i) => {
                out.push_str(&text[copied..i]);
                out.push('\\');
                copied = i;
                i += 1;
            }
            _ => i += 1,
        }
    }
    out.push_str(&text[copied..]);
    Cow::Owned(out)
}

/// Inverse of [`escape_dollars`]: `\$` outside code spans becomes `$`.
pub fn unescape_dollars(text: &str) -> Cow<'_, str> {
    if !text.contains("\\$") {
        return Cow::Borrowed(text);
    }
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut copied = 0;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'`' => i = code_span_end(text, i),
            b'$' if is_escaped(bytes, i) => {
                out.push_str(&text[copied..i - 1]);
                copied = i;
                i += 1;
            }
            _ => i += 1,
        }
    }
    out.push_str(&text[copied..]);
    Cow::Owned(out)
}

/// Offset of the next blank line (a newline followed by a whitespace-only line), or the end.
fn blank_line_from(src: &str, from: usize) -> usize {
    let bytes = src.as_bytes();
    let mut i = from;
    while i < bytes.len() {
        if bytes[i] == b'\n' {
            let mut k = i + 1;
            while k < bytes.len() && matches!(bytes[k], b' ' | b'\t' | b'\r') {
                k += 1;
            }
            if k < bytes.len() && bytes[k] == b'\n' {
                return i;
            }
        }
        i += 1;
    }
    bytes.len()
}

/// True when `s`, after leading whitespace, starts with `\` followed by an ASCII letter.
fn starts_with_command(s: &str) -> bool {
    let mut chars = s.trim_start().chars();
    chars.next() == Some('\\') && chars.next().is_some_and(|c| c.is_ascii_alphabetic())
}

/// True when `content` contains a word of ordinary prose outside command names and
/// text-command arguments.
pub(super) fn looks_like_prose(content: &str) -> bool {
    let chars: Vec<char> = content.chars().collect();
    let mut i = 0;
    let mut run = 0;
    while i < chars.len() {
        let c = chars[i];
        if c == '\\' {
            run = 0;
            let name_start = i + 1;
            let mut k = name_start;
            while k < chars.len() && chars[k].is_ascii_alphabetic() {
                k += 1;
            }
            let name: String = chars[name_start..k].iter().collect();
            i = if k == name_start { k + 1 } else { k };
            if TEXT_COMMANDS.contains(&name.as_str()) {
                i = skip_brace_group(&chars, i);
            }
            continue;
        }
        if c.is_alphabetic() {
            run += 1;
            if run >= PROSE_WORD_LEN {
                return true;
            }
        } else {
            run = 0;
        }
        i += 1;
    }
    false
}

/// Skip an optional `{...}` group (with nesting) starting at or after whitespace at `i`.
fn skip_brace_group(chars: &[char], i: usize) -> usize {
    let mut k = i;
    while k < chars.len() && chars[k].is_whitespace() {
        k += 1;
    }
    if chars.get(k) != Some(&'{') {
        return i;
    }
    let mut depth = 0usize;
    while k < chars.len() {
        match chars[k] {
            '\\' => k += 1,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return k + 1;
                }
            }
            _ => {}
        }
        k += 1;
    }
    chars.len()
}
