//! Remembers which classroom this terminal is logged into.
//!
//! The session is two plaintext entries in a key/value store. Both present and
//! non-empty means "logged in"; anything else, including unreadable storage,
//! means "logged out". There is no expiry.

mod storage;

pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};

use crate::directory::RecordId;
use std::path::PathBuf;
use tracing::{debug, warn};

pub const KEY_CLASSROOM_NAME: &str = "loggedInAula";
pub const KEY_CLASSROOM_ID: &str = "loggedInAulaId";

const SESSION_DIR: &str = "aula-kiosk";
const SESSION_FILE: &str = "session.json";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Session {
    pub classroom_name: String,
    pub classroom_id: RecordId,
}

/// Default location of the session file, `<config dir>/aula-kiosk/session.json`.
#[must_use]
pub fn default_session_file() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(SESSION_DIR).join(SESSION_FILE))
}

#[derive(Debug)]
pub struct SessionStore<S> {
    storage: S,
}

impl<S: KeyValueStore> SessionStore<S> {
    pub const fn new(storage: S) -> Self {
        Self { storage }
    }

    /// Both entries go out in a single storage write.
    ///
    /// # Errors
    /// Returns an error if either entry cannot be written.
    pub fn save(&mut self, classroom_name: &str, classroom_id: &RecordId) -> Result<(), StorageError> {
        self.storage.set_all(&[
            (KEY_CLASSROOM_NAME, classroom_name),
            (KEY_CLASSROOM_ID, classroom_id.as_str()),
        ])?;
        debug!("session saved for classroom {classroom_id}");
        Ok(())
    }

    #[must_use]
    pub fn load(&self) -> Option<Session> {
        let read = |key: &str| match self.storage.get(key) {
            Ok(value) => value.filter(|v| !v.is_empty()),
            Err(e) => {
                debug!("session storage unavailable: {e}");
                None
            }
        };

        let classroom_name = read(KEY_CLASSROOM_NAME)?;
        let classroom_id = read(KEY_CLASSROOM_ID)?;

        Some(Session {
            classroom_name,
            classroom_id: RecordId::new(classroom_id),
        })
    }

    /// Removes both entries; a failure on the first does not skip the second.
    ///
    /// # Errors
    /// Returns the first storage error encountered.
    pub fn clear(&mut self) -> Result<(), StorageError> {
        let name = self.storage.remove(KEY_CLASSROOM_NAME);
        let id = self.storage.remove(KEY_CLASSROOM_ID);
        if let Err(e) = &name {
            warn!("failed to clear {KEY_CLASSROOM_NAME}: {e}");
        }
        name.and(id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn save_then_load() {
        let mut store = SessionStore::new(MemoryStore::new());
        assert_eq!(store.load(), None);

        store.save("Aula 1", &RecordId::new("7")).unwrap();
        assert_eq!(
            store.load(),
            Some(Session {
                classroom_name: "Aula 1".to_string(),
                classroom_id: RecordId::new("7"),
            })
        );
    }

    #[test]
    fn missing_or_empty_field_means_logged_out() {
        let mut storage = MemoryStore::new();
        storage.set(KEY_CLASSROOM_NAME, "Aula 1").unwrap();
        let store = SessionStore::new(storage.clone());
        assert_eq!(store.load(), None);

        storage.set(KEY_CLASSROOM_ID, "").unwrap();
        let store = SessionStore::new(storage);
        assert_eq!(store.load(), None);
    }

    #[test]
    fn clear_removes_both_fields() {
        let mut store = SessionStore::new(MemoryStore::new());
        store.save("Aula 1", &RecordId::new("7")).unwrap();
        store.clear().unwrap();
        assert_eq!(store.load(), None);
        assert_eq!(store.storage.get(KEY_CLASSROOM_NAME).unwrap(), None);
        assert_eq!(store.storage.get(KEY_CLASSROOM_ID).unwrap(), None);
    }

    #[test]
    fn unreadable_storage_is_an_absent_session() {
        let mut path = std::env::temp_dir();
        path.push(format!("aula_kiosk_session_garbage_{}", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();

        let store = SessionStore::new(FileStore::new(&path));
        assert_eq!(store.load(), None);

        std::fs::remove_file(&path).ok();
    }
}
