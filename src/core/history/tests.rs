//! History module tests.

use std::io;

use crate::core::history::{delete_session, list_sessions, load_session, save_session};
use crate::core::math::Mode;
use crate::core::session::Session;

static PERSISTENCE_TEST_LOCK: std::sync::Mutex<()> = std::sync::Mutex::new(());

struct EnvGuard(&'static str);
impl Drop for EnvGuard {
    fn drop(&mut self) {
        unsafe {
            std::env::remove_var(self.0);
        }
    }
}

/// Point the data dir at a fresh temp dir for the duration of a test.
fn with_data_dir(f: impl FnOnce(&std::path::Path)) {
    let _lock = PERSISTENCE_TEST_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());
    let tmp = tempfile::TempDir::new().expect("temp dir");
    let data_dir = tmp.path().join("sessions");
    unsafe {
        std::env::set_var("TEST_DATA_DIR", &data_dir);
    }
    let _guard = EnvGuard("TEST_DATA_DIR");
    f(&data_dir);
}

fn session_with(question: &str) -> Session {
    let mut s = Session::new();
    s.record(question, "Use $E = kq/r^2$.", Mode::PreserveMath);
    s
}

#[test]
fn save_empty_session_returns_err() {
    with_data_dir(|_| {
        let err = save_session(&Session::new(), 10).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        assert!(err.to_string().contains("empty"));
    });
}

#[test]
fn save_then_load_roundtrip() {
    with_data_dir(|_| {
        let session = session_with("Field of a point charge?");
        save_session(&session, 10).expect("save should succeed");

        let loaded = load_session(session.id()).expect("load should return Some");
        assert_eq!(loaded, session);
    });
}

#[test]
fn save_updates_existing_index_entry() {
    with_data_dir(|_| {
        let mut session = session_with("First");
        save_session(&session, 10).expect("save");
        session.record("Second", "Plain answer", Mode::StripMath);
        save_session(&session, 10).expect("save again");

        let metas = list_sessions().expect("list");
        assert_eq!(metas.len(), 1);
        assert_eq!(metas[0].entries, 2);
        assert_eq!(metas[0].title, "First");
    });
}

#[test]
fn list_sessions_empty_on_first_run() {
    with_data_dir(|_| {
        assert!(list_sessions().expect("list").is_empty());
    });
}

#[test]
fn load_nonexistent_returns_none() {
    with_data_dir(|_| {
        assert!(load_session("nonexistent-id-12345").is_none());
    });
}

#[test]
fn load_invalid_json_returns_none() {
    with_data_dir(|data_dir| {
        let session = session_with("Hi");
        save_session(&session, 10).expect("save ok");

        let path = data_dir.join(format!("session_{}.json", session.id()));
        std::fs::write(&path, "not valid json {{{").expect("write");

        assert!(load_session(session.id()).is_none());
    });
}

#[test]
fn corrupt_index_is_an_error() {
    with_data_dir(|data_dir| {
        std::fs::create_dir_all(data_dir).expect("create dir");
        std::fs::write(data_dir.join("index.json"), "[oops").expect("write");
        let err = list_sessions().unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    });
}

#[test]
fn prune_keeps_most_recent() {
    with_data_dir(|data_dir| {
        let sessions: Vec<Session> = ["one", "two", "three"]
            .into_iter()
            .map(session_with)
            .collect();
        for s in &sessions {
            save_session(s, 2).expect("save");
        }

        let metas = list_sessions().expect("list");
        assert_eq!(metas.len(), 2);
        let ids: Vec<&str> = metas.iter().map(|m| m.id.as_str()).collect();
        assert!(ids.contains(&sessions[2].id()));
        assert!(!ids.contains(&sessions[0].id()));
        assert!(
            !data_dir
                .join(format!("session_{}.json", sessions[0].id()))
                .exists()
        );
    });
}

#[test]
fn max_zero_disables_pruning() {
    with_data_dir(|_| {
        for q in ["a", "b", "c"] {
            save_session(&session_with(q), 0).expect("save");
        }
        assert_eq!(list_sessions().expect("list").len(), 3);
    });
}

#[test]
fn delete_removes_file_and_index_entry() {
    with_data_dir(|data_dir| {
        let session = session_with("To delete");
        save_session(&session, 10).expect("save");
        delete_session(session.id()).expect("delete");

        assert!(list_sessions().expect("list").is_empty());
        assert!(
            !data_dir
                .join(format!("session_{}.json", session.id()))
                .exists()
        );
        // Second delete is a no-op.
        delete_session(session.id()).expect("delete again");
    });
}
