use ratatui::style::Modifier;
use ratatui::text::Line;

use super::markdown::parse_markdown_inline;
use super::{styled_lines, wrap_message};
use crate::core::math::{Mode, normalize};

fn line_text(line: &Line) -> String {
    line.spans.iter().map(|s| s.content.as_ref()).collect()
}

fn texts(lines: &[Line]) -> Vec<String> {
    lines
        .iter()
        .map(|l| line_text(l).trim_end().to_string())
        .collect()
}

fn render(raw: &str, width: usize) -> Vec<Line<'static>> {
    styled_lines(&normalize(raw, Mode::PreserveMath), width)
}

#[test]
fn parse_markdown_inline_plain() {
    let spans = parse_markdown_inline("hello");
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].content.as_ref(), "hello");
}

#[test]
fn parse_markdown_inline_bold() {
    let spans = parse_markdown_inline("**bold** text");
    assert_eq!(spans.len(), 2);
    assert_eq!(spans[0].content.as_ref(), "bold");
    assert!(spans[0].style.add_modifier.contains(Modifier::BOLD));
    assert_eq!(spans[1].content.as_ref(), " text");
}

#[test]
fn parse_markdown_inline_code() {
    let spans = parse_markdown_inline("Use `SI` units");
    assert_eq!(spans.len(), 3);
    assert_eq!(spans[0].content.as_ref(), "Use ");
    assert_eq!(spans[1].content.as_ref(), "SI");
    assert_eq!(spans[2].content.as_ref(), " units");
}

#[test]
fn parse_markdown_inline_unclosed_markers_are_literal() {
    let spans = parse_markdown_inline("a ** b [c");
    let text: String = spans.iter().map(|s| s.content.as_ref()).collect();
    assert_eq!(text, "a ** b [c");
}

#[test]
fn parse_markdown_inline_heading() {
    let spans = parse_markdown_inline("### Gauss's law");
    assert_eq!(spans.len(), 1);
    assert_eq!(spans[0].content.as_ref(), "Gauss's law");
    assert!(spans[0].style.add_modifier.contains(Modifier::BOLD));
}

#[test]
fn parse_markdown_inline_bullet_list() {
    let spans = parse_markdown_inline("- item one");
    assert_eq!(spans[0].content.as_ref(), "• ");
    assert_eq!(spans[1].content.as_ref(), "item one");
}

#[test]
fn parse_markdown_inline_numbered_list() {
    let spans = parse_markdown_inline("2) second");
    assert_eq!(spans[0].content.as_ref(), "2. ");
    assert_eq!(spans[1].content.as_ref(), "second");
}

#[test]
fn parse_markdown_inline_link_hides_url() {
    let spans = parse_markdown_inline("See [notes](https://example.com) here.");
    let text: String = spans.iter().map(|s| s.content.as_ref()).collect();
    assert_eq!(text, "See notes here.");
}

#[test]
fn parse_markdown_inline_table_row() {
    let spans = parse_markdown_inline("| quantity | unit |");
    let text: String = spans.iter().map(|s| s.content.as_ref()).collect();
    assert_eq!(text, "quantity │ unit");
}

#[test]
fn wrap_message_preserves_newlines() {
    assert_eq!(wrap_message("line1\nline2", 100), ["line1", "line2"]);
}

#[test]
fn wrap_message_wraps_long_line() {
    assert_eq!(
        wrap_message("hello world test", 8),
        ["hello", "world", "test"]
    );
}

#[test]
fn wrap_message_empty_lines() {
    assert_eq!(wrap_message("a\n\nb", 100), ["a", "", "b"]);
}

#[test]
fn inline_math_styled_without_delimiters() {
    let lines = render("The field is $E=kq/r^2$ radial.", 80);
    assert_eq!(texts(&lines), ["The field is E=kq/r^2 radial."]);
    let math = lines[0]
        .spans
        .iter()
        .find(|s| s.content.as_ref() == "E=kq/r^2")
        .expect("math span");
    assert!(math.style.add_modifier.contains(Modifier::ITALIC));
}

#[test]
fn display_math_gets_its_own_indented_line() {
    let lines = render("Gauss:\n$$\\oint E\\cdot dA = q/\\epsilon_0$$\nso flux is fixed.", 80);
    assert_eq!(
        texts(&lines),
        [
            "Gauss:",
            "    \\oint E\\cdot dA = q/\\epsilon_0",
            "so flux is fixed."
        ]
    );
}

#[test]
fn display_math_mid_sentence_splits_line() {
    let lines = render(r"so \[F = ma\] holds", 80);
    assert_eq!(texts(&lines), ["so", "    F = ma", "holds"]);
}

#[test]
fn blank_lines_around_display_math_are_kept() {
    let lines = render("a\n\n$$x$$\n\nb", 80);
    assert_eq!(texts(&lines), ["a", "", "    x", "", "b"]);
}

#[test]
fn inline_math_is_never_split_across_lines() {
    let lines = render(r"Then \(a + b + c\) holds.", 10);
    let all = texts(&lines);
    assert!(all.iter().any(|l| l.contains("a + b + c")));
}

#[test]
fn punctuation_stays_glued_to_math() {
    let lines = render("values $x$, $y$.", 9);
    assert_eq!(texts(&lines), ["values x,", "y."]);
}

#[test]
fn bullet_with_math_keeps_marker_and_hangs() {
    let lines = render("- charge $q$ on a sphere of radius $R$", 16);
    let all = texts(&lines);
    assert!(all[0].starts_with("• charge q"));
    assert!(all[1..].iter().all(|l| l.starts_with("  ")));
}

#[test]
fn theory_answer_renders_as_prose() {
    let doc = normalize("### Idea\nFlux $$\\Phi$$ counts lines.", Mode::StripMath);
    let lines = styled_lines(&doc, 80);
    assert_eq!(texts(&lines), ["Idea", "Flux  counts lines."]);
}

#[test]
fn literal_dollars_show_without_escape() {
    let lines = render("costs $5 for $x$", 80);
    assert_eq!(texts(&lines), ["costs $5 for x"]);
}
