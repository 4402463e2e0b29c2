//! Top-level kiosk state and the interactive screens.

mod console;
mod run;
mod screen;

pub use console::Console;
pub use run::{KioskOptions, run};
pub use screen::MainScreen;

use crate::{
    auth::{self, AuthError},
    directory::Directory,
    flight::SingleFlight,
    session::{KeyValueStore, Session, SessionStore},
};
use tracing::{debug, info, warn};

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AppState {
    Loading,
    LoggedOut,
    LoggedIn(Session),
}

/// Owns the directory client and the session, and moves between
/// [`AppState`]s. The only transitions are boot, login and logout.
pub struct Controller<D, S> {
    directory: D,
    sessions: SessionStore<S>,
    state: AppState,
    /// `login` borrows the controller exclusively, so this only trips when a
    /// clone of the flag is held elsewhere.
    login_flight: SingleFlight,
}

impl<D, S> Controller<D, S>
where
    D: Directory,
    S: KeyValueStore,
{
    pub fn new(directory: D, sessions: SessionStore<S>) -> Self {
        Self {
            directory,
            sessions,
            state: AppState::Loading,
            login_flight: SingleFlight::new(),
        }
    }

    /// Leave `Loading`, restoring a stored session if there is one.
    pub fn boot(&mut self) -> &AppState {
        if self.state == AppState::Loading {
            self.state = match self.sessions.load() {
                Some(session) => {
                    info!("restored session for classroom {}", session.classroom_id);
                    AppState::LoggedIn(session)
                }
                None => {
                    debug!("no stored session");
                    AppState::LoggedOut
                }
            };
        }
        &self.state
    }

    /// Authenticate and move to `LoggedIn`.
    ///
    /// Already logged in is not a transition: the current session is returned.
    ///
    /// # Errors
    /// Returns the authentication error; the state stays `LoggedOut`.
    pub async fn login(&mut self, classroom: &str, password: &str) -> Result<Session, AuthError> {
        self.boot();
        if let AppState::LoggedIn(session) = &self.state {
            return Ok(session.clone());
        }

        let session = auth::authenticate(
            &self.directory,
            &mut self.sessions,
            &self.login_flight,
            classroom,
            password,
        )
        .await?;

        self.state = AppState::LoggedIn(session.clone());
        Ok(session)
    }

    pub fn logout(&mut self) {
        if !matches!(self.state, AppState::LoggedIn(_)) {
            return;
        }
        if let Err(e) = self.sessions.clear() {
            warn!("Failed to clear stored session: {e}");
        }
        info!("logged out");
        self.state = AppState::LoggedOut;
    }

    #[must_use]
    pub fn state(&self) -> &AppState {
        &self.state
    }

    #[must_use]
    pub fn session(&self) -> Option<&Session> {
        match &self.state {
            AppState::LoggedIn(session) => Some(session),
            _ => None,
        }
    }

    #[must_use]
    pub fn directory(&self) -> &D {
        &self.directory
    }
}
