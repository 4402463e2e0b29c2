//! Turns a decoded badge payload into an attendance event.

use crate::{
    directory::{AttendanceEvent, Directory, DirectoryError, Movement, RecordId},
    notice::NoticeBoard,
    roster::{Roster, Student},
};
use tracing::{Instrument, error, info, info_span, warn};

pub const MSG_UNREADABLE: &str = "Could not read the code.";
pub const MSG_NOT_FOUND: &str = "Student not found.";
const MSG_WRITE_FALLBACK: &str = "Error saving the record";

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordOutcome {
    Recorded { student: Student, movement: Movement },
    Unreadable,
    NotFound,
    Failed(String),
}

impl RecordOutcome {
    #[must_use]
    pub fn is_recorded(&self) -> bool {
        matches!(self, Self::Recorded { .. })
    }

    /// Operator-facing text.
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Recorded { student, movement } => format!("{}: {}", movement.label(), student.name),
            Self::Unreadable => MSG_UNREADABLE.to_string(),
            Self::NotFound => MSG_NOT_FOUND.to_string(),
            Self::Failed(detail) => format!("Could not record: {detail}"),
        }
    }

    pub fn show_on(&self, notices: &mut NoticeBoard) {
        if self.is_recorded() {
            notices.success(self.message());
        } else {
            notices.error(self.message());
        }
    }
}

fn write_failure_detail(err: &DirectoryError) -> String {
    match err {
        DirectoryError::Api { message, .. } => message
            .clone()
            .unwrap_or_else(|| MSG_WRITE_FALLBACK.to_string()),
        other => other.to_string(),
    }
}

/// Resolve `payload` against the roster and write one event on a match.
///
/// Nothing is sent for an empty payload or an unknown code.
pub async fn record_scan<D: Directory>(
    directory: &D,
    roster: &Roster,
    classroom: &RecordId,
    movement: Movement,
    payload: &str,
) -> RecordOutcome {
    if payload.is_empty() {
        warn!("empty scan payload");
        return RecordOutcome::Unreadable;
    }

    let Some(student) = roster.find_by_code(payload) else {
        info!("no student for scanned code");
        return RecordOutcome::NotFound;
    };

    let event = AttendanceEvent {
        student: student.id.clone(),
        classroom: classroom.clone(),
        movement,
    };

    let span = info_span!("attendance.record", movement = %movement);
    match directory.create_attendance_event(&event).instrument(span).await {
        Ok(()) => {
            info!("{movement} recorded for student {}", student.id);
            RecordOutcome::Recorded {
                student: student.clone(),
                movement,
            }
        }
        Err(e) => {
            error!("Failed to record attendance: {e}");
            RecordOutcome::Failed(write_failure_detail(&e))
        }
    }
}
