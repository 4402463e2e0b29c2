use serde::{Deserialize, Deserializer, Serialize, Serializer, de};
use serde_json::{Map, Value, json};
use std::{fmt, str::FromStr};

pub const FIELD_CLASSROOM_NAME: &str = "Aula";
pub const FIELD_CLASSROOM_PASSWORD: &str = "Contraseña";
pub const FIELD_STUDENT_NAME: &str = "Alumno";
pub const FIELD_STUDENT_CODE: &str = "ID";
pub const FIELD_EVENT_STUDENT: &str = "Alumno";
pub const FIELD_EVENT_CLASSROOM: &str = "Aula";
pub const FIELD_EVENT_MOVEMENT: &str = "Movimiento";

/// Opaque record identifier assigned by the remote store.
///
/// Ninox hands out numeric ids; they are kept as text and written back as
/// numbers so references stay valid.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RecordId(String);

impl RecordId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn as_number(&self) -> Option<u64> {
        if self.0.is_empty() || !self.0.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        self.0.parse().ok()
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl Serialize for RecordId {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self.as_number() {
            Some(number) => serializer.serialize_u64(number),
            None => serializer.serialize_str(&self.0),
        }
    }
}

impl<'de> Deserialize<'de> for RecordId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::String(id) => Ok(Self(id)),
            Value::Number(id) => Ok(Self(id.to_string())),
            other => Err(de::Error::custom(format!(
                "record id must be a string or number, got {other}"
            ))),
        }
    }
}

/// Raw record as returned by the records endpoint.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Record {
    pub id: RecordId,
    #[serde(default)]
    pub fields: Map<String, Value>,
}

impl Record {
    /// Text value of a field; numbers and booleans are rendered, anything else is absent.
    #[must_use]
    pub fn text(&self, field: &str) -> Option<String> {
        match self.fields.get(field)? {
            Value::String(value) => Some(value.clone()),
            Value::Number(value) => Some(value.to_string()),
            Value::Bool(value) => Some(value.to_string()),
            _ => None,
        }
    }
}

/// Direction of an attendance movement.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Movement {
    Entry,
    Exit,
}

impl Movement {
    /// Value stored in the `Movimiento` field.
    #[must_use]
    pub const fn code(self) -> u8 {
        match self {
            Self::Entry => 1,
            Self::Exit => 2,
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Entry => "Check-in",
            Self::Exit => "Check-out",
        }
    }
}

impl fmt::Display for Movement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Movement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "in" | "i" | "entry" | "check-in" | "checkin" => Ok(Self::Entry),
            "out" | "o" | "exit" | "check-out" | "checkout" => Ok(Self::Exit),
            other => Err(format!("invalid movement: {other} (expected in or out)")),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AttendanceEvent {
    pub student: RecordId,
    pub classroom: RecordId,
    pub movement: Movement,
}

impl AttendanceEvent {
    /// Request body for the records endpoint, which takes a batch.
    #[must_use]
    pub fn to_batch(&self) -> Value {
        json!([{
            "fields": {
                FIELD_EVENT_STUDENT: self.student,
                FIELD_EVENT_CLASSROOM: self.classroom,
                FIELD_EVENT_MOVEMENT: self.movement.code(),
            }
        }])
    }
}
