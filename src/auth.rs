//! Classroom login.
//!
//! Credentials are checked client-side against the full classroom table,
//! fetched fresh on every attempt. Unknown classrooms and wrong passwords
//! return the same error so classroom names cannot be probed.

use crate::{
    directory::{Directory, FIELD_CLASSROOM_NAME, FIELD_CLASSROOM_PASSWORD, Record},
    flight::SingleFlight,
    session::{KeyValueStore, Session, SessionStore},
};
use thiserror::Error;
use tracing::{error, info, instrument, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum AuthError {
    #[error("Incorrect classroom or password")]
    InvalidCredentials,
    #[error("Could not connect to the server.")]
    Unavailable,
    #[error("A login is already in progress")]
    Busy,
}

/// Classroom names compare trimmed and case-insensitively.
#[must_use]
pub fn normalize_classroom(name: &str) -> String {
    name.trim().to_lowercase()
}

/// Passwords compare trimmed but otherwise exactly.
#[must_use]
pub fn normalize_password(password: &str) -> &str {
    password.trim()
}

/// First record whose normalized name and password both match.
#[must_use]
pub fn find_classroom<'a>(records: &'a [Record], classroom: &str, password: &str) -> Option<&'a Record> {
    let classroom = normalize_classroom(classroom);
    let password = normalize_password(password);

    records.iter().find(|record| {
        let name = record
            .text(FIELD_CLASSROOM_NAME)
            .map(|name| normalize_classroom(&name))
            .unwrap_or_default();
        let stored = record.text(FIELD_CLASSROOM_PASSWORD).unwrap_or_default();
        name == classroom && normalize_password(&stored) == password
    })
}

/// Authenticate a classroom and persist the session on success.
///
/// A failure to persist is logged; the login itself still succeeds and the
/// session lives only for this process.
///
/// # Errors
/// `Busy` if another login is outstanding, `Unavailable` if the directory
/// cannot be read, `InvalidCredentials` if nothing matches.
#[instrument(skip(directory, sessions, flight, password))]
pub async fn authenticate<D, S>(
    directory: &D,
    sessions: &mut SessionStore<S>,
    flight: &SingleFlight,
    classroom: &str,
    password: &str,
) -> Result<Session, AuthError>
where
    D: Directory,
    S: KeyValueStore,
{
    let _guard = flight.try_begin().ok_or(AuthError::Busy)?;

    let records = directory.list_classrooms().await.map_err(|e| {
        error!("Error during login: {e}");
        AuthError::Unavailable
    })?;

    let record = find_classroom(&records, classroom, password).ok_or_else(|| {
        info!("login rejected");
        AuthError::InvalidCredentials
    })?;

    let session = Session {
        classroom_name: record.text(FIELD_CLASSROOM_NAME).unwrap_or_default(),
        classroom_id: record.id.clone(),
    };

    if let Err(e) = sessions.save(&session.classroom_name, &session.classroom_id) {
        warn!("session could not be persisted: {e}");
    }

    info!("logged in as classroom {}", session.classroom_id);

    Ok(session)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::directory::{AttendanceEvent, DirectoryError, RecordId};
    use crate::session::MemoryStore;
    use serde_json::json;

    struct FakeDirectory {
        classrooms: Result<Vec<Record>, u16>,
    }

    impl Directory for FakeDirectory {
        async fn list_classrooms(&self) -> Result<Vec<Record>, DirectoryError> {
            self.classrooms.clone().map_err(|status| DirectoryError::Api {
                status,
                message: None,
            })
        }

        async fn list_students(&self) -> Result<Vec<Record>, DirectoryError> {
            Ok(Vec::new())
        }

        async fn create_attendance_event(&self, _event: &AttendanceEvent) -> Result<(), DirectoryError> {
            Ok(())
        }
    }

    fn classrooms() -> Vec<Record> {
        serde_json::from_value(json!([
            {"id": 1, "fields": {"Aula": "Aula Magna", "Contraseña": "abc123"}},
            {"id": 2, "fields": {"Aula": "  Lab 2 ", "Contraseña": " pw "}},
            {"id": 3, "fields": {"Aula": "Lab 2", "Contraseña": "other"}},
            {"id": 4, "fields": {}},
        ]))
        .unwrap()
    }

    fn directory() -> FakeDirectory {
        FakeDirectory {
            classrooms: Ok(classrooms()),
        }
    }

    #[test]
    fn name_matches_ignoring_case_and_whitespace() {
        let records = classrooms();
        for input in ["Aula Magna", "aula magna", "  AULA MAGNA  ", "\taUlA mAgNa\n"] {
            let found = find_classroom(&records, input, "abc123").unwrap();
            assert_eq!(found.id, RecordId::new("1"));
        }
    }

    #[test]
    fn password_must_match_exactly_after_trim() {
        let records = classrooms();
        assert!(find_classroom(&records, "Aula Magna", " abc123 ").is_some());
        assert!(find_classroom(&records, "Aula Magna", "ABC123").is_none());
        assert!(find_classroom(&records, "Aula Magna", "abc12").is_none());
        assert!(find_classroom(&records, "Aula Magna", "").is_none());
    }

    #[test]
    fn stored_values_are_trimmed_and_first_match_wins() {
        let records = classrooms();
        let found = find_classroom(&records, "lab 2", "pw").unwrap();
        assert_eq!(found.id, RecordId::new("2"));
        let found = find_classroom(&records, "lab 2", "other").unwrap();
        assert_eq!(found.id, RecordId::new("3"));
    }

    #[tokio::test]
    async fn success_returns_stored_name_and_persists_session() {
        let mut sessions = SessionStore::new(MemoryStore::new());
        let flight = SingleFlight::new();

        let session = authenticate(&directory(), &mut sessions, &flight, " LAB 2", "pw ")
            .await
            .unwrap();

        assert_eq!(session.classroom_name, "  Lab 2 ");
        assert_eq!(session.classroom_id, RecordId::new("2"));
        assert_eq!(sessions.load(), Some(session));
        assert!(!flight.is_busy());
    }

    #[tokio::test]
    async fn unknown_classroom_and_wrong_password_look_the_same() {
        let mut sessions = SessionStore::new(MemoryStore::new());
        let flight = SingleFlight::new();

        let unknown = authenticate(&directory(), &mut sessions, &flight, "Nowhere", "abc123").await;
        let wrong = authenticate(&directory(), &mut sessions, &flight, "Aula Magna", "nope").await;

        assert_eq!(unknown, Err(AuthError::InvalidCredentials));
        assert_eq!(wrong, Err(AuthError::InvalidCredentials));
        assert_eq!(
            unknown.unwrap_err().to_string(),
            "Incorrect classroom or password"
        );
        assert_eq!(sessions.load(), None);
    }

    #[tokio::test]
    async fn directory_failure_is_a_connectivity_error() {
        let mut sessions = SessionStore::new(MemoryStore::new());
        let flight = SingleFlight::new();
        let directory = FakeDirectory {
            classrooms: Err(503),
        };

        let result = authenticate(&directory, &mut sessions, &flight, "Aula Magna", "abc123").await;
        assert_eq!(result, Err(AuthError::Unavailable));
        assert_eq!(
            AuthError::Unavailable.to_string(),
            "Could not connect to the server."
        );
        assert!(!flight.is_busy());
    }

    #[tokio::test]
    async fn concurrent_login_is_rejected() {
        let mut sessions = SessionStore::new(MemoryStore::new());
        let flight = SingleFlight::new();
        let _outstanding = flight.try_begin().unwrap();

        let result = authenticate(&directory(), &mut sessions, &flight, "Aula Magna", "abc123").await;
        assert_eq!(result, Err(AuthError::Busy));
    }
}
