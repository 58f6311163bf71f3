//! Session index: metadata, listing, and index mutations.

use std::io;

use serde::{Deserialize, Serialize};

use super::storage;

/// Metadata for a session in the index.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionMeta {
    pub id: String,
    pub title: String,
    pub created_at: u64,
    pub updated_at: u64,
    /// Number of answered questions.
    #[serde(default)]
    pub entries: usize,
}

/// Sort by `updated_at` descending. Ties go to the entry added to the index last.
fn newest_first(sessions: &mut [SessionMeta]) {
    sessions.reverse();
    sessions.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
}

/// List all sessions, most recently updated first.
pub fn list_sessions() -> io::Result<Vec<SessionMeta>> {
    let mut index = storage::load_index()?;
    newest_first(&mut index.sessions);
    Ok(index.sessions)
}

/// Add or update a session in the index. Removes any existing entry with the same id.
pub(super) fn add_or_update(meta: SessionMeta) -> io::Result<()> {
    let mut index = storage::load_index()?;
    index.sessions.retain(|s| s.id != meta.id);
    index.sessions.push(meta);
    storage::save_index(&index)
}

/// Remove a session from the index by ID.
pub(super) fn remove(id: &str) -> io::Result<()> {
    let mut index = storage::load_index()?;
    index.sessions.retain(|s| s.id != id);
    storage::save_index(&index)
}

/// Remove the oldest sessions when exceeding `max`. Deletes session files and updates the index.
pub(super) fn prune(max: u32) -> io::Result<()> {
    let max = max as usize;
    if max == 0 {
        return Ok(());
    }

    let mut index = storage::load_index()?;
    if index.sessions.len() <= max {
        return Ok(());
    }
    let mut by_age = index.sessions.clone();
    newest_first(&mut by_age);
    let to_remove: Vec<SessionMeta> = by_age.drain(max..).collect();
    // Keep the index in insertion order so ties keep resolving the same way.
    index
        .sessions
        .retain(|s| !to_remove.iter().any(|r| r.id == s.id));
    for meta in &to_remove {
        if let Err(e) = storage::remove_session_file(&meta.id) {
            log::warn!("Failed to remove session file {}: {}", meta.id, e);
        }
    }
    log::debug!("Pruned {} old session(s)", to_remove.len());
    storage::save_index(&index)
}
