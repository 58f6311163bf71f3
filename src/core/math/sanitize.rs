//! Theory-only mode: remove every trace of math notation from an answer.

use std::sync::OnceLock;

use regex::Regex;

use super::detect::{SpanKind, TEXT_COMMANDS, detect};

/// LaTeX commands deleted (with their brace arguments) when sweeping prose.
const MATH_COMMANDS: &[&str] = &[
    // Greek letters
    "alpha", "beta", "gamma", "delta", "epsilon", "varepsilon", "zeta", "eta", "theta",
    "vartheta", "iota", "kappa", "lambda", "mu", "nu", "xi", "pi", "varpi", "rho", "varrho",
    "sigma", "varsigma", "tau", "upsilon", "phi", "varphi", "chi", "psi", "omega", "Gamma",
    "Delta", "Theta", "Lambda", "Xi", "Pi", "Sigma", "Upsilon", "Phi", "Psi", "Omega",
    // Operators and calculus
    "nabla", "partial", "infty", "int", "iint", "iiint", "oint", "sum", "prod", "lim", "frac",
    "dfrac", "tfrac", "sqrt", "cdot", "cdots", "ldots", "dots", "times", "div", "pm", "mp",
    "ast", "circ", "bullet", "hbar", "ell", "prime", "degree", "log", "ln", "exp", "sin",
    "cos", "tan", "sinh", "cosh", "tanh", "det", "min", "max",
    // Relations and arrows
    "leq", "le", "geq", "ge", "neq", "ne", "approx", "sim", "simeq", "cong", "equiv",
    "propto", "ll", "gg", "in", "notin", "subset", "subseteq", "to", "rightarrow",
    "leftarrow", "leftrightarrow", "Rightarrow", "Leftarrow", "Leftrightarrow", "mapsto",
    "implies", "iff",
    // Decorations, fonts and sizing
    "vec", "hat", "bar", "dot", "ddot", "tilde", "overline", "underline", "overrightarrow",
    "mathbf", "mathbb", "mathcal", "mathit", "boldsymbol", "left", "right", "big", "Big",
    "bigg", "Bigg", "quad", "qquad", "displaystyle", "begin", "end", "langle", "rangle",
];

/// Math spacing escapes (`\,` `\;` `\:` `\!`).
const SPACING_ESCAPES: &[char] = &[',', ';', ':', '!'];

/// True for every character theory-only output must not contain.
pub fn is_forbidden_symbol(c: char) -> bool {
    matches!(c, '\u{0391}'..='\u{03A9}' | '\u{03B1}'..='\u{03C9}')
        || matches!(
            c,
            'ϑ' | 'ϕ'
                | 'ϖ'
                | 'ϵ'
                | 'ϱ'
                | '∇'
                | '∂'
                | '±'
                | '∓'
                | '≈'
                | '≃'
                | '≅'
                | '≡'
                | '≠'
                | '≤'
                | '≥'
                | '×'
                | '÷'
                | '·'
                | '∙'
                | '⋅'
                | '∞'
                | '∑'
                | '∏'
                | '∫'
                | '∬'
                | '∮'
                | '√'
                | '∝'
                | '∈'
                | '→'
                | '←'
                | '↔'
                | '⇒'
                | '⇔'
                | '^'
                | '_'
                | '{'
                | '}'
        )
}

/// True if `s` contains any forbidden math symbol.
#[cfg(test)]
pub fn contains_forbidden_symbol(s: &str) -> bool {
    s.chars().any(is_forbidden_symbol)
}

fn operator_run() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"(\S)[ \t]+[=+\-*/<>~]+[ \t]+").expect("valid regex literal"))
}

fn excess_newlines() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\n{3,}").expect("valid regex literal"))
}

/// Remove all math from `raw`: fenced spans, known LaTeX commands, Unicode math symbols and
/// operator runs. The result contains no forbidden symbol and no detectable math span.
pub fn strip_math(raw: &str) -> String {
    let mut text = raw.replace("\r\n", "\n");
    let mut passes = 0;
    loop {
        passes += 1;
        text = remove_math_spans(&text);
        text = sweep_commands(&text);
        text.retain(|c| !is_forbidden_symbol(c));
        text = operator_run().replace_all(&text, "$1 ").into_owned();
        text = excess_newlines().replace_all(&text, "\n\n").into_owned();
        // Sweeping can join characters into a new fence; go again until nothing is left.
        if !has_math(&text) {
            break;
        }
    }
    log::trace!("strip_math finished after {} pass(es)", passes);
    trim_blank_lines(&text).to_string()
}

/// Drop blank lines at both ends and trailing spaces, keeping the first line's indentation.
fn trim_blank_lines(text: &str) -> &str {
    let first = text.len() - text.trim_start().len();
    let line_start = text[..first].rfind('\n').map_or(0, |nl| nl + 1);
    text[line_start..].trim_end()
}

fn has_math(text: &str) -> bool {
    detect(text).iter().any(|s| s.kind != SpanKind::Plain)
}

/// Keep only the plain spans of `text`.
fn remove_math_spans(text: &str) -> String {
    detect(text)
        .iter()
        .filter(|s| s.kind == SpanKind::Plain)
        .map(|s| s.text(text))
        .collect()
}

/// Delete known math commands with their arguments, unwrap text commands, keep the rest.
fn sweep_commands(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        if chars[i] != '\\' {
            out.push(chars[i]);
            i += 1;
            continue;
        }
        let name_start = i + 1;
        let mut k = name_start;
        while k < chars.len() && chars[k].is_ascii_alphabetic() {
            k += 1;
        }
        if k == name_start {
            match chars.get(name_start) {
                Some(c) if SPACING_ESCAPES.contains(c) => i = name_start + 1,
                _ => {
                    out.push('\\');
                    i += 1;
                }
            }
            continue;
        }
        let name: String = chars[name_start..k].iter().collect();
        if TEXT_COMMANDS.contains(&name.as_str()) {
            match brace_group(&chars, k) {
                Some((inner, after)) => {
                    let inner: String = chars[inner].iter().collect();
                    out.push_str(&sweep_commands(&inner));
                    i = after;
                }
                None => i = k,
            }
        } else if MATH_COMMANDS.contains(&name.as_str()) {
            i = k;
            // Optional [n] of \sqrt, then any number of {..} arguments.
            if chars.get(i) == Some(&'[')
                && let Some(close) = chars[i..].iter().position(|&c| c == ']')
            {
                i += close + 1;
            }
            while let Some((_, after)) = brace_group(&chars, i) {
                i = after;
            }
        } else {
            out.extend(&chars[i..k]);
            i = k;
        }
    }
    out
}

/// If a `{...}` group starts exactly at `at`, return its inner range and the offset after it.
fn brace_group(chars: &[char], at: usize) -> Option<(std::ops::Range<usize>, usize)> {
    if chars.get(at) != Some(&'{') {
        return None;
    }
    let mut depth = 0usize;
    let mut k = at;
    while k < chars.len() {
        match chars[k] {
            '\\' => k += 1,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some((at + 1..k, k + 1));
                }
            }
            _ => {}
        }
        k += 1;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_display_math_and_keeps_surrounding_spaces() {
        assert_eq!(
            strip_math(r"Flux equals $$\oint \mathbf{E}\cdot d\mathbf{A}$$ through the surface."),
            "Flux equals  through the surface."
        );
    }

    #[test]
    fn removes_stray_greek_letter() {
        assert_eq!(strip_math("the angle θ increases"), "the angle  increases");
    }

    #[test]
    fn removes_every_fence_style() {
        let out = strip_math(r"a $x$ b \(y\) c \[z\] d $$w$$ e (\alpha) f");
        assert_eq!(out, "a  b  c  d  e  f");
    }

    #[test]
    fn known_commands_removed_with_arguments() {
        assert_eq!(strip_math(r"ratio \frac{q}{r} here"), "ratio  here");
        assert_eq!(strip_math(r"root \sqrt[3]{x} here"), "root  here");
    }

    #[test]
    fn text_commands_keep_their_argument() {
        assert_eq!(strip_math(r"\textbf{Gauss law} holds"), "Gauss law holds");
    }

    #[test]
    fn unknown_commands_left_as_text() {
        assert_eq!(strip_math(r"see \cite me"), r"see \cite me");
    }

    #[test]
    fn operator_runs_collapse_between_words() {
        assert_eq!(strip_math("force = mass"), "force mass");
        assert_eq!(strip_math("a + b - c"), "a b c");
    }

    #[test]
    fn bullet_markers_survive() {
        let src = "### Notes\n- first point\n- second point";
        assert_eq!(strip_math(src), src);
    }

    #[test]
    fn blank_lines_collapse_after_display_math() {
        assert_eq!(strip_math("Intro\n\n$$x$$\n\n\nMore"), "Intro\n\nMore");
    }

    #[test]
    fn leading_indentation_is_kept() {
        assert_eq!(strip_math("    indented note"), "    indented note");
        assert_eq!(
            strip_math("$$x$$\n\n    code line\nafter\n\n"),
            "    code line\nafter"
        );
    }

    #[test]
    fn whitespace_only_result_is_empty() {
        assert_eq!(strip_math(" \n $$x$$ \n "), "");
    }

    #[test]
    fn crlf_normalized() {
        assert_eq!(strip_math("a\r\nb"), "a\nb");
    }

    #[test]
    fn sweep_that_creates_new_fence_is_stripped_again() {
        // Removing `_` joins `\` and `(`, forming a fence on the next pass.
        let out = strip_math(r"x \_( hidden \_) y");
        assert!(!has_math(&out));
        assert!(!contains_forbidden_symbol(&out));
    }

    #[test]
    fn no_math_is_noop() {
        assert_eq!(strip_math("Plain words only."), "Plain words only.");
        assert_eq!(strip_math(""), "");
    }

    #[test]
    fn forbidden_symbols_cover_greek_and_operators() {
        for c in ['α', 'Ω', 'ϕ', '∇', '≤', '≥', '×', '·', '∞', '_', '{'] {
            assert!(is_forbidden_symbol(c), "{c} should be forbidden");
        }
        assert!(!is_forbidden_symbol('a'));
        assert!(!is_forbidden_symbol('é'));
    }
}
