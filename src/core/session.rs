//! In-memory session: the questions asked and answers shown since the app started.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::core::math::Mode;

/// One answered question. Appended once, never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub question: String,
    /// Normalized answer as canonical Markdown.
    pub answer: String,
    pub mode: Mode,
    /// Unix seconds.
    pub timestamp: u64,
}

/// Append-only list of entries, owned by the caller (CLI run or TUI app).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    id: String,
    started_at: u64,
    entries: Vec<HistoryEntry>,
}

pub(crate) fn now_secs() -> u64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or_else(|e| {
            log::warn!("System time before UNIX epoch: {}", e);
            0
        })
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            started_at: now_secs(),
            entries: Vec::new(),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn started_at(&self) -> u64 {
        self.started_at
    }

    pub fn entries(&self) -> &[HistoryEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append an entry stamped with the current time.
    pub fn record(&mut self, question: &str, answer: &str, mode: Mode) -> &HistoryEntry {
        self.entries.push(HistoryEntry {
            question: question.to_string(),
            answer: answer.to_string(),
            mode,
            timestamp: now_secs(),
        });
        let last = self.entries.len() - 1;
        &self.entries[last]
    }

    /// Title from the first question. Truncates to max_len chars with ellipsis.
    pub fn title(&self, max_len: usize) -> String {
        let Some(first) = self.entries.first() else {
            return "(No title)".to_string();
        };
        let s = first.question.trim().replace('\n', " ");
        if s.chars().count() <= max_len {
            return s;
        }
        let truncated: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_session_is_empty_with_uuid() {
        let s = Session::new();
        assert!(s.is_empty());
        assert!(Uuid::parse_str(s.id()).is_ok());
        assert_ne!(Session::new().id(), s.id());
    }

    #[test]
    fn record_appends_in_order() {
        let mut s = Session::new();
        s.record("first", "$a$", Mode::PreserveMath);
        let e = s.record("second", "b", Mode::StripMath).clone();
        assert_eq!(s.entries().len(), 2);
        assert_eq!(s.entries()[0].question, "first");
        assert_eq!(e.mode, Mode::StripMath);
        assert!(e.timestamp >= s.started_at());
    }

    #[test]
    fn title_empty_session() {
        assert_eq!(Session::new().title(50), "(No title)");
    }

    #[test]
    fn title_trims_and_replaces_newlines() {
        let mut s = Session::new();
        s.record("  What is\nflux?  ", "", Mode::PreserveMath);
        assert_eq!(s.title(50), "What is flux?");
    }

    #[test]
    fn title_truncates_long_question() {
        let mut s = Session::new();
        s.record(
            "Derive the electric field of an infinite charged sheet",
            "",
            Mode::PreserveMath,
        );
        let t = s.title(20);
        assert!(t.ends_with('…'));
        assert_eq!(t.chars().count(), 20);
        assert!(t.starts_with("Derive the electric"));
    }

    #[test]
    fn entry_mode_serializes_snake_case() {
        let entry = HistoryEntry {
            question: "q".into(),
            answer: "a".into(),
            mode: Mode::StripMath,
            timestamp: 1,
        };
        let v = serde_json::to_value(&entry).expect("serialize");
        assert_eq!(v["mode"], "strip_math");
    }
}
