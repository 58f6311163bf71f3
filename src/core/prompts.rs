//! System prompts per answer mode.
//!
//! Prompts are loaded from `config/prompts.json` (embedded at compile time, validated by `build.rs`).

use std::sync::OnceLock;

use serde::Deserialize;
use serde_json::{Value, json};

use crate::core::math::Mode;

/// Prompt definition for one answer mode.
#[derive(Clone, Debug)]
pub struct Prompt {
    pub mode: Mode,
    pub label: String,
    pub system: String,
}

#[derive(Debug, Deserialize)]
struct PromptEntry {
    mode: String,
    label: String,
    system: String,
}

fn mode_from_key(key: &str) -> Option<Mode> {
    match key {
        "solve" => Some(Mode::PreserveMath),
        "theory" => Some(Mode::StripMath),
        _ => None,
    }
}

fn load_prompts() -> Vec<Prompt> {
    let json = include_str!("../../config/prompts.json");
    let entries: Vec<PromptEntry> =
        serde_json::from_str(json).expect("prompts.json must be valid");
    entries
        .into_iter()
        .filter_map(|e| {
            let mode = mode_from_key(&e.mode)?;
            Some(Prompt {
                mode,
                label: e.label,
                system: e.system,
            })
        })
        .collect()
}

static PROMPTS: OnceLock<Vec<Prompt>> = OnceLock::new();

/// Returns all prompts, loading from config on first access.
pub fn prompts() -> &'static [Prompt] {
    PROMPTS.get_or_init(load_prompts)
}

/// System prompt for `mode`.
pub fn system_prompt(mode: Mode) -> &'static str {
    prompts()
        .iter()
        .find(|p| p.mode == mode)
        .map(|p| p.system.as_str())
        .expect("build.rs guarantees a prompt for every mode")
}

/// The user turn: the question, followed by any attached file context.
pub fn user_message(question: &str, context: Option<&str>) -> String {
    match context.map(str::trim).filter(|c| !c.is_empty()) {
        Some(ctx) => format!(
            "{}\n\nUse the following reference material where it is relevant:\n\n{}",
            question.trim(),
            ctx
        ),
        None => question.trim().to_string(),
    }
}

/// Chat messages (system + user) for one question.
pub fn build_messages(question: &str, context: Option<&str>, mode: Mode) -> Vec<Value> {
    vec![
        json!({ "role": "system", "content": system_prompt(mode) }),
        json!({ "role": "user", "content": user_message(question, context) }),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_mode_has_a_prompt() {
        for mode in [Mode::PreserveMath, Mode::StripMath] {
            assert!(!system_prompt(mode).is_empty());
        }
    }

    #[test]
    fn labels_match_mode_labels() {
        for p in prompts() {
            assert_eq!(p.label, p.mode.label());
        }
    }

    #[test]
    fn user_message_without_context_is_trimmed_question() {
        assert_eq!(user_message("  What is flux? \n", None), "What is flux?");
        assert_eq!(user_message("What is flux?", Some("   ")), "What is flux?");
    }

    #[test]
    fn user_message_appends_context() {
        let msg = user_message("Explain this", Some("Gauss's law notes"));
        assert!(msg.starts_with("Explain this\n\n"));
        assert!(msg.ends_with("Gauss's law notes"));
    }

    #[test]
    fn build_messages_has_system_then_user() {
        let msgs = build_messages("q", None, Mode::StripMath);
        assert_eq!(msgs.len(), 2);
        assert_eq!(msgs[0]["role"], "system");
        assert_eq!(msgs[0]["content"], system_prompt(Mode::StripMath));
        assert_eq!(msgs[1]["role"], "user");
        assert_eq!(msgs[1]["content"], "q");
    }
}
