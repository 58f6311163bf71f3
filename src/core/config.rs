//! Runtime configuration from the environment (and `.env`, loaded in `main`).

use std::env;

use async_openai::config::OpenAIConfig;

/// Groq's OpenAI-compatible endpoint.
pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Llama 3 70B, the model the tutor was written against.
pub const DEFAULT_MODEL: &str = "llama-3.3-70b-versatile";

/// Saved sessions kept on disk before the oldest are pruned.
pub const DEFAULT_MAX_SESSIONS: u32 = 50;

#[derive(Debug, Clone)]
pub struct Config {
    pub openai_config: OpenAIConfig,
    pub model_id: String,
    /// 0 disables pruning.
    pub max_sessions: u32,
}

#[derive(Debug)]
pub enum ConfigError {
    MissingApiKey,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::MissingApiKey => write!(
                f,
                "GROQ_API_KEY is not set (add it to .env or the environment)"
            ),
        }
    }
}

impl std::error::Error for ConfigError {}

/// Model id from `GROQ_MODEL`, or the default.
pub fn model_from_env() -> String {
    env::var("GROQ_MODEL")
        .ok()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_MODEL.to_string())
}

/// Session retention from `PHYSICS_TUTOR_MAX_SESSIONS`, or the default.
pub fn max_sessions_from_env() -> u32 {
    parse_max_sessions(env::var("PHYSICS_TUTOR_MAX_SESSIONS").ok().as_deref())
}

fn parse_max_sessions(value: Option<&str>) -> u32 {
    match value.map(str::trim) {
        Some(v) => v.parse().unwrap_or_else(|_| {
            log::warn!(
                "Ignoring invalid PHYSICS_TUTOR_MAX_SESSIONS={:?}, using {}",
                v,
                DEFAULT_MAX_SESSIONS
            );
            DEFAULT_MAX_SESSIONS
        }),
        None => DEFAULT_MAX_SESSIONS,
    }
}

/// Load configuration from environment. Returns an error if API key is missing.
pub fn load() -> Result<Config, ConfigError> {
    let base_url = env::var("GROQ_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

    let api_key = env::var("GROQ_API_KEY")
        .ok()
        .filter(|k| !k.trim().is_empty())
        .ok_or(ConfigError::MissingApiKey)?;

    let openai_config = OpenAIConfig::new()
        .with_api_base(base_url)
        .with_api_key(api_key);

    Ok(Config {
        openai_config,
        model_id: model_from_env(),
        max_sessions: max_sessions_from_env(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_max_sessions_default_when_unset() {
        assert_eq!(parse_max_sessions(None), DEFAULT_MAX_SESSIONS);
    }

    #[test]
    fn parse_max_sessions_reads_number() {
        assert_eq!(parse_max_sessions(Some(" 7 ")), 7);
        assert_eq!(parse_max_sessions(Some("0")), 0);
    }

    #[test]
    fn parse_max_sessions_falls_back_on_garbage() {
        assert_eq!(parse_max_sessions(Some("many")), DEFAULT_MAX_SESSIONS);
    }

    #[test]
    fn missing_api_key_message_names_variable() {
        assert!(ConfigError::MissingApiKey.to_string().contains("GROQ_API_KEY"));
    }
}
