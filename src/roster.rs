//! Student roster snapshot used to resolve scanned codes.
//!
//! Loaded once when the main screen is entered and never refreshed; a code
//! added remotely afterwards resolves only after the screen is entered again.

use crate::{
    directory::{
        Directory, DirectoryError, FIELD_STUDENT_CODE, FIELD_STUDENT_NAME, Record, RecordId,
    },
    flight::SingleFlight,
};
use thiserror::Error;
use tracing::{debug, info, instrument};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Student {
    pub id: RecordId,
    pub name: String,
    /// Code printed on the badge; distinct from `id`.
    pub scan_code: Option<String>,
}

impl Student {
    #[must_use]
    pub fn from_record(record: &Record) -> Self {
        Self {
            id: record.id.clone(),
            name: record.text(FIELD_STUDENT_NAME).unwrap_or_default(),
            scan_code: record.text(FIELD_STUDENT_CODE),
        }
    }
}

#[derive(Debug, Error)]
pub enum RosterError {
    #[error("student list is already loading")]
    Busy,
    #[error(transparent)]
    Directory(#[from] DirectoryError),
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Roster {
    students: Vec<Student>,
}

impl Roster {
    #[must_use]
    pub fn new(students: Vec<Student>) -> Self {
        Self { students }
    }

    #[must_use]
    pub fn from_records(records: &[Record]) -> Self {
        Self::new(records.iter().map(Student::from_record).collect())
    }

    /// Fetch every student once.
    ///
    /// # Errors
    /// `Busy` if a fetch is already outstanding, otherwise the directory error.
    #[instrument(skip_all)]
    pub async fn load<D: Directory>(directory: &D, flight: &SingleFlight) -> Result<Self, RosterError> {
        let _guard = flight.try_begin().ok_or(RosterError::Busy)?;

        debug!("loading student roster");
        let records = directory.list_students().await?;
        let roster = Self::from_records(&records);

        info!("roster loaded with {} students", roster.len());

        Ok(roster)
    }

    /// Exact match on the scan code; the first student wins when codes repeat.
    #[must_use]
    pub fn find_by_code(&self, code: &str) -> Option<&Student> {
        self.students
            .iter()
            .find(|student| student.scan_code.as_deref() == Some(code))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.students.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.students.is_empty()
    }

    pub fn students(&self) -> impl Iterator<Item = &Student> {
        self.students.iter()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::directory::AttendanceEvent;
    use serde_json::json;

    struct Students(Vec<Record>);

    impl Directory for Students {
        async fn list_classrooms(&self) -> Result<Vec<Record>, DirectoryError> {
            Ok(Vec::new())
        }

        async fn list_students(&self) -> Result<Vec<Record>, DirectoryError> {
            Ok(self.0.clone())
        }

        async fn create_attendance_event(&self, _event: &AttendanceEvent) -> Result<(), DirectoryError> {
            Ok(())
        }
    }

    fn records() -> Vec<Record> {
        serde_json::from_value(json!([
            {"id": 10, "fields": {"Alumno": "Ana", "ID": "A1"}},
            {"id": 11, "fields": {"Alumno": "Bruno", "ID": 2002}},
            {"id": 12, "fields": {"Alumno": "Carla", "ID": "A1"}},
            {"id": 13, "fields": {"Alumno": "Dani"}},
        ]))
        .unwrap()
    }

    #[test]
    fn projection_keeps_id_name_and_code() {
        let roster = Roster::from_records(&records());
        assert_eq!(roster.len(), 4);
        let first = roster.students().next().unwrap();
        assert_eq!(first.id, RecordId::new("10"));
        assert_eq!(first.name, "Ana");
        assert_eq!(first.scan_code.as_deref(), Some("A1"));
    }

    #[test]
    fn lookup_is_exact_and_first_match_wins() {
        let roster = Roster::from_records(&records());
        assert_eq!(roster.find_by_code("A1").unwrap().name, "Ana");
        assert_eq!(roster.find_by_code("2002").unwrap().name, "Bruno");
        assert!(roster.find_by_code("a1").is_none());
        assert!(roster.find_by_code(" A1").is_none());
        assert!(roster.find_by_code("").is_none());
    }

    #[tokio::test]
    async fn load_fetches_and_releases_flight() {
        let flight = SingleFlight::new();
        let roster = Roster::load(&Students(records()), &flight).await.unwrap();
        assert_eq!(roster.len(), 4);
        assert!(!flight.is_busy());
    }

    #[tokio::test]
    async fn load_is_single_flight() {
        let flight = SingleFlight::new();
        let _outstanding = flight.try_begin().unwrap();
        let result = Roster::load(&Students(records()), &flight).await;
        assert!(matches!(result, Err(RosterError::Busy)));
    }
}
