//! Segment rendering: walk a normalized document and hand each segment to a display sink.

use super::NormalizedDocument;
use super::detect::SpanKind;

/// Display primitives for prose and typeset math.
///
/// Prose may carry Markdown structure (headings, bold, bullets); sinks decide how much of it
/// they interpret. Math content arrives without delimiters; `kind` says which canonical
/// delimiter applies.
pub trait DisplaySink {
    fn prose(&mut self, text: &str);
    fn math(&mut self, kind: SpanKind, content: &str);
}

/// Emit every segment of `doc` in order. Segments are never merged or reordered.
pub fn render<S: DisplaySink + ?Sized>(doc: &NormalizedDocument, sink: &mut S) {
    for segment in doc.segments() {
        match segment.kind {
            SpanKind::Plain => sink.prose(&segment.text),
            kind => sink.math(kind, &segment.text),
        }
    }
}

/// Sink producing Markdown with canonical `$$...$$` / `$...$` math.
#[derive(Debug, Default)]
pub struct MarkdownSink {
    out: String,
}

impl MarkdownSink {
    pub fn into_string(self) -> String {
        self.out
    }
}

impl DisplaySink for MarkdownSink {
    fn prose(&mut self, text: &str) {
        self.out.push_str(text);
    }

    fn math(&mut self, kind: SpanKind, content: &str) {
        let delimiter = kind.delimiter().unwrap_or_default();
        self.out.push_str(delimiter);
        self.out.push_str(content);
        self.out.push_str(delimiter);
    }
}

/// Render `doc` as canonical Markdown.
pub fn render_as_string(doc: &NormalizedDocument) -> String {
    let mut sink = MarkdownSink::default();
    render(doc, &mut sink);
    sink.into_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::math::{Mode, normalize};

    /// Records calls so ordering can be asserted.
    #[derive(Default)]
    struct Recorder {
        calls: Vec<(SpanKind, String)>,
    }

    impl DisplaySink for Recorder {
        fn prose(&mut self, text: &str) {
            self.calls.push((SpanKind::Plain, text.to_string()));
        }

        fn math(&mut self, kind: SpanKind, content: &str) {
            self.calls.push((kind, content.to_string()));
        }
    }

    #[test]
    fn render_dispatches_in_document_order() {
        let doc = normalize(r"a $x$ b \[y\] c", Mode::PreserveMath);
        let mut rec = Recorder::default();
        render(&doc, &mut rec);
        assert_eq!(
            rec.calls,
            [
                (SpanKind::Plain, "a ".to_string()),
                (SpanKind::InlineMath, "x".to_string()),
                (SpanKind::Plain, " b ".to_string()),
                (SpanKind::DisplayMath, "y".to_string()),
                (SpanKind::Plain, " c".to_string()),
            ]
        );
    }

    #[test]
    fn adjacent_math_segments_are_not_merged() {
        let doc = normalize("$a$$$b$$", Mode::PreserveMath);
        let mut rec = Recorder::default();
        render(&doc, &mut rec);
        assert_eq!(rec.calls.len(), 2);
    }

    #[test]
    fn markdown_sink_uses_canonical_delimiters() {
        let doc = normalize(r"\(a\) and \[b\]", Mode::PreserveMath);
        assert_eq!(render_as_string(&doc), "$a$ and $$b$$");
    }

    #[test]
    fn empty_document_renders_empty_string() {
        assert_eq!(render_as_string(&NormalizedDocument::default()), "");
    }
}
