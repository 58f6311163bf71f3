//! CLI-only commands: config info, history list/show/delete.
//!
//! These run without opening the TUI and produce plain text output.

use std::env;

use crate::core::config::{self, ConfigError};
use crate::core::history;
use crate::core::prompts;
use crate::core::session::Session;

/// Run the `config` command: display paths, model, and API key status.
pub fn run_config() {
    let path_or_dash = |p: Option<std::path::PathBuf>| {
        p.map(|p| p.display().to_string())
            .unwrap_or_else(|| "-".to_string())
    };
    let config_dir = path_or_dash(crate::core::paths::config_dir());
    let cache_dir = path_or_dash(crate::core::paths::cache_dir());
    let data_dir = path_or_dash(crate::core::paths::data_dir());

    let (model, max_sessions, api_key_status) = match config::load() {
        Ok(c) => (c.model_id, c.max_sessions, "set ✓"),
        Err(ConfigError::MissingApiKey) => (
            config::model_from_env(),
            config::max_sessions_from_env(),
            "not set",
        ),
    };
    let base_url = env::var("GROQ_BASE_URL").unwrap_or_else(|_| config::DEFAULT_BASE_URL.to_string());

    println!("Config:       {}", config_dir);
    println!("Cache:        {}", cache_dir);
    println!("Sessions:     {} (keep {})", data_dir, max_sessions);
    println!("Endpoint:     {}", base_url);
    println!("Model:        {} ({})", model, model_source());
    println!("API key:      {}", api_key_status);
    let modes: Vec<&str> = prompts::prompts().iter().map(|p| p.label.as_str()).collect();
    println!("Modes:        {}", modes.join(", "));
}

fn model_source() -> &'static str {
    if env::var("GROQ_MODEL")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .is_some()
    {
        "from GROQ_MODEL"
    } else {
        "default"
    }
}

/// Run the `history list` command: list sessions with optional limit.
pub fn run_history_list(limit: Option<usize>) {
    let sessions = match history::list_sessions() {
        Ok(s) => s,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    };

    if sessions.is_empty() {
        println!("No saved sessions.");
        return;
    }

    let take = limit.unwrap_or(sessions.len());
    for s in sessions.into_iter().take(take) {
        println!(
            "{}\t{}\t{}\t{}",
            s.id,
            s.title,
            s.entries,
            format_timestamp(s.updated_at)
        );
    }
}

/// Run the `history show` command: print every question and answer of a session.
pub fn run_history_show(id: &str) {
    let Some(session) = history::load_session(id) else {
        eprintln!("Error: no session with id {}", id);
        std::process::exit(1);
    };
    print!("{}", format_session(&session));
}

/// Run the `history delete` command.
pub fn run_history_delete(id: &str) {
    if let Err(e) = history::delete_session(id) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
    println!("Deleted session {}", id);
}

/// Plain-text transcript of a session.
fn format_session(session: &Session) -> String {
    let mut out = format!(
        "Session {} ({})\n",
        session.id(),
        format_timestamp(session.started_at())
    );
    for entry in session.entries() {
        out.push_str(&format!(
            "\n## [{}] {} ({})\n\n{}\n",
            entry.mode.label(),
            entry.question.trim(),
            format_timestamp(entry.timestamp),
            entry.answer.trim_end()
        ));
    }
    out
}

fn format_timestamp(secs: u64) -> String {
    use chrono::{TimeZone, Utc};
    let dt = Utc.timestamp_opt(secs as i64, 0).single();
    dt.map(|d| d.format("%Y-%m-%d %H:%M").to_string())
        .unwrap_or_else(|| secs.to_string())
}
