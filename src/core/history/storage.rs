//! Index and session file persistence (index.json, session_*.json).

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::paths;
use crate::core::session::Session;

use super::SessionMeta;

fn index_path() -> Option<PathBuf> {
    paths::data_dir().map(|d| d.join("index.json"))
}

pub(super) fn session_path(id: &str) -> Option<PathBuf> {
    paths::data_dir().map(|d| d.join(format!("session_{}.json", id)))
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub(super) struct IndexFile {
    pub(super) sessions: Vec<SessionMeta>,
}

pub(super) fn ensure_data_dir() -> io::Result<PathBuf> {
    let dir = paths::data_dir()
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "No data directory"))?;
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

/// Write `contents` to a sibling temp file, then rename over `path`.
fn write_atomic(path: &Path, contents: &str) -> io::Result<()> {
    let tmp = path.with_extension("tmp");
    fs::write(&tmp, contents)?;
    fs::rename(tmp, path)
}

/// Load the session index. Returns an empty index when no data dir or file not found (first run).
/// Propagates IO errors (permission, disk) and JSON parse errors.
pub(super) fn load_index() -> io::Result<IndexFile> {
    let Some(path) = index_path() else {
        return Ok(IndexFile::default());
    };
    let data = match fs::read_to_string(&path) {
        Ok(d) => d,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(IndexFile::default()),
        Err(e) => return Err(e),
    };
    serde_json::from_str(&data)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e.to_string()))
}

pub(super) fn save_index(index: &IndexFile) -> io::Result<()> {
    ensure_data_dir()?;
    let path =
        index_path().ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "No index path"))?;
    let json = serde_json::to_string_pretty(index)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    write_atomic(&path, &json)
}

pub(super) fn read_session_file(id: &str) -> Option<Session> {
    let path = session_path(id)?;
    let data = fs::read_to_string(path).ok()?;
    match serde_json::from_str(&data) {
        Ok(session) => Some(session),
        Err(e) => {
            log::warn!("Ignoring unreadable session {}: {}", id, e);
            None
        }
    }
}

pub(super) fn write_session_file(session: &Session) -> io::Result<()> {
    let path = session_path(session.id())
        .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "No session path"))?;
    let json = serde_json::to_string_pretty(session)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidData, e))?;
    write_atomic(&path, &json)
}

pub(super) fn remove_session_file(id: &str) -> io::Result<()> {
    match session_path(id) {
        Some(p) => fs::remove_file(p),
        None => Ok(()),
    }
}
