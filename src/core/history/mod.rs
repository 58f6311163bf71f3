//! Persistence of tutor sessions in ~/.local/share/physics-tutor/sessions/.

mod index;
mod storage;

pub use index::{SessionMeta, list_sessions};

use std::io;

use crate::core::session::{Session, now_secs};

/// Max characters of the first question used as a session title.
pub const TITLE_MAX_LEN: usize = 60;

/// Load a session by ID. Returns None when missing or unreadable.
pub fn load_session(id: &str) -> Option<Session> {
    storage::read_session_file(id)
}

/// Save a session (create or update) and prune the oldest beyond `max_sessions` (0 keeps all).
pub fn save_session(session: &Session, max_sessions: u32) -> io::Result<()> {
    if session.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "Cannot save empty session",
        ));
    }
    storage::ensure_data_dir()?;
    storage::write_session_file(session)?;

    let meta = SessionMeta {
        id: session.id().to_string(),
        title: session.title(TITLE_MAX_LEN),
        created_at: session.started_at(),
        updated_at: now_secs(),
        entries: session.entries().len(),
    };
    index::add_or_update(meta)?;
    index::prune(max_sessions)
}

/// Delete a session by ID. Removes the file and index entry.
pub fn delete_session(id: &str) -> io::Result<()> {
    if let Err(e) = storage::remove_session_file(id)
        && e.kind() != io::ErrorKind::NotFound
    {
        return Err(e);
    }
    index::remove(id)
}

#[cfg(test)]
mod tests;
