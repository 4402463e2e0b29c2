use crate::session::{FileStore, KeyValueStore, MemoryStore, SessionStore, default_session_file};
use std::{path::PathBuf, time::Duration};
use tracing::{debug, warn};

/// Settings shared by every action.
#[derive(Debug, Clone)]
pub struct GlobalArgs {
    pub session_file: Option<PathBuf>,
    pub notice_ttl: Duration,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(session_file: Option<PathBuf>, notice_ttl: Duration) -> Self {
        Self {
            session_file,
            notice_ttl,
        }
    }

    /// Resolved session file, falling back to the per-user config directory.
    #[must_use]
    pub fn session_path(&self) -> Option<PathBuf> {
        self.session_file.clone().or_else(default_session_file)
    }

    /// Open the session store.
    ///
    /// Without a usable path the session lives in memory and is lost on exit.
    #[must_use]
    pub fn sessions(&self) -> SessionStore<Box<dyn KeyValueStore>> {
        let storage: Box<dyn KeyValueStore> = if let Some(path) = self.session_path() {
            debug!("session file: {}", path.display());
            Box::new(FileStore::new(path))
        } else {
            warn!("no config directory found, the session will not survive a restart");
            Box::new(MemoryStore::new())
        };
        SessionStore::new(storage)
    }
}
