//! Remote directory backed by a hosted Ninox database.
//!
//! Three tables are used: classrooms (read), students (read) and the
//! attendance history (append only). Every request carries the same static
//! bearer key. Collections are fetched whole; there is no pagination, retry or
//! caching at this layer.

mod client;
mod records;

pub use client::{NinoxClient, records_url};
pub use records::{
    AttendanceEvent, FIELD_CLASSROOM_NAME, FIELD_CLASSROOM_PASSWORD, FIELD_EVENT_CLASSROOM,
    FIELD_EVENT_MOVEMENT, FIELD_EVENT_STUDENT, FIELD_STUDENT_CODE, FIELD_STUDENT_NAME, Movement,
    Record, RecordId,
};

use secrecy::SecretString;
use std::{future::Future, time::Duration};
use thiserror::Error;

pub const DEFAULT_API_URL: &str = "https://api.ninox.com/v1";
pub const DEFAULT_CLASSROOMS_TABLE: &str = "C";
pub const DEFAULT_STUDENTS_TABLE: &str = "A";
pub const DEFAULT_ATTENDANCE_TABLE: &str = "E";

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("Config error: {0}")]
    Config(String),

    #[error("Unable to reach the server: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request failed ({status}): {}", message.as_deref().unwrap_or("no details"))]
    Api { status: u16, message: Option<String> },

    #[error("Response error: {0}")]
    Decode(String),
}

impl DirectoryError {
    /// Message supplied by the remote API, if it sent one.
    #[must_use]
    pub fn remote_message(&self) -> Option<&str> {
        match self {
            Self::Api { message, .. } => message.as_deref(),
            _ => None,
        }
    }
}

/// Table identifiers inside the Ninox database.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Tables {
    pub classrooms: String,
    pub students: String,
    pub attendance: String,
}

impl Default for Tables {
    fn default() -> Self {
        Self {
            classrooms: DEFAULT_CLASSROOMS_TABLE.to_string(),
            students: DEFAULT_STUDENTS_TABLE.to_string(),
            attendance: DEFAULT_ATTENDANCE_TABLE.to_string(),
        }
    }
}

#[derive(Clone)]
pub struct DirectoryConfig {
    pub api_url: String,
    pub team_id: String,
    pub database_id: String,
    pub tables: Tables,
    pub api_key: SecretString,
    /// `None` leaves requests without a deadline.
    pub request_timeout: Option<Duration>,
}

impl std::fmt::Debug for DirectoryConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryConfig")
            .field("api_url", &self.api_url)
            .field("team_id", &self.team_id)
            .field("database_id", &self.database_id)
            .field("tables", &self.tables)
            .field("api_key", &"***")
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Read/write access to the three remote collections.
pub trait Directory: Send + Sync {
    /// Fetch every classroom record.
    fn list_classrooms(&self) -> impl Future<Output = Result<Vec<Record>, DirectoryError>> + Send;

    /// Fetch every student record.
    fn list_students(&self) -> impl Future<Output = Result<Vec<Record>, DirectoryError>> + Send;

    /// Append one attendance event.
    fn create_attendance_event(
        &self,
        event: &AttendanceEvent,
    ) -> impl Future<Output = Result<(), DirectoryError>> + Send;
}
