//! Math notation normalization for model answers.
//!
//! Answers arrive with whatever math markup the model felt like using: `$...$`, `\(...\)`,
//! `\[...\]`, `$$...$$`, or LaTeX dropped into bare brackets. [`normalize`] turns that into a
//! [`NormalizedDocument`] with one canonical delimiter convention (or with all math removed
//! in theory-only mode), and [`render`] hands the result to a [`DisplaySink`].
//!
//! Everything here is a pure function over strings and never fails: malformed math is
//! demoted to plain text instead of being reported.

mod detect;
mod render;
mod rewrite;
mod sanitize;

pub use detect::{SpanKind, detect, unescape_dollars};
pub use render::{DisplaySink, render, render_as_string};
use sanitize::strip_math;

#[cfg(test)]
use sanitize::contains_forbidden_symbol;

use serde::{Deserialize, Serialize};

/// How math in an answer is treated.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// Keep math, rewritten to `$$...$$` / `$...$`.
    #[default]
    PreserveMath,
    /// Theory-only: delete every math span and sweep stray symbols.
    StripMath,
}

impl Mode {
    /// Short label shown in the UI and in history listings.
    pub fn label(self) -> &'static str {
        match self {
            Mode::PreserveMath => "Solve",
            Mode::StripMath => "Theory",
        }
    }

    pub fn toggle(self) -> Self {
        match self {
            Mode::PreserveMath => Mode::StripMath,
            Mode::StripMath => Mode::PreserveMath,
        }
    }
}

/// One piece of a normalized document. Math segments hold their content without fences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    pub kind: SpanKind,
    pub text: String,
}

/// Ordered prose/math segments with canonical delimiters applied on output.
///
/// Adjacent plain segments are always coalesced, so two documents that render to the same
/// string compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NormalizedDocument {
    segments: Vec<Segment>,
}

impl NormalizedDocument {
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Number of math segments (inline and display).
    pub fn math_count(&self) -> usize {
        self.segments
            .iter()
            .filter(|s| s.kind != SpanKind::Plain)
            .count()
    }

    pub(crate) fn push_plain(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        if let Some(last) = self.segments.last_mut()
            && last.kind == SpanKind::Plain
        {
            last.text.push_str(text);
            return;
        }
        self.segments.push(Segment {
            kind: SpanKind::Plain,
            text: text.to_string(),
        });
    }

    pub(crate) fn push_math(&mut self, kind: SpanKind, content: String) {
        debug_assert!(kind != SpanKind::Plain);
        self.segments.push(Segment {
            kind,
            text: content,
        });
    }
}

/// Normalize raw model output according to `mode`.
pub fn normalize(raw: &str, mode: Mode) -> NormalizedDocument {
    let doc = match mode {
        Mode::PreserveMath => rewrite::canonicalize(raw),
        Mode::StripMath => {
            let mut doc = NormalizedDocument::default();
            doc.push_plain(&strip_math(raw));
            doc
        }
    };
    log::debug!(
        "normalized {} bytes ({:?}): {} segments, {} math",
        raw.len(),
        mode,
        doc.segments.len(),
        doc.math_count()
    );
    doc
}
