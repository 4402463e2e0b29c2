use crate::directory::{
    DEFAULT_API_URL, DEFAULT_ATTENDANCE_TABLE, DEFAULT_CLASSROOMS_TABLE, DEFAULT_STUDENTS_TABLE,
    DirectoryConfig, Tables,
};
use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;
use std::time::Duration;

pub const ARG_API_URL: &str = "api-url";
pub const ARG_TEAM_ID: &str = "team-id";
pub const ARG_DATABASE_ID: &str = "database-id";
pub const ARG_API_KEY: &str = "api-key";
pub const ARG_CLASSROOMS_TABLE: &str = "classrooms-table";
pub const ARG_STUDENTS_TABLE: &str = "students-table";
pub const ARG_ATTENDANCE_TABLE: &str = "attendance-table";
pub const ARG_REQUEST_TIMEOUT: &str = "request-timeout-seconds";

/// Build the directory configuration from matches.
///
/// Team, database and key are only checked here, so commands that never
/// reach the directory (`logout`, `status`) run without them.
///
/// # Errors
/// Returns an error if a required argument is missing or empty.
pub fn config(matches: &ArgMatches) -> anyhow::Result<DirectoryConfig> {
    let read_required = |id: &str| -> anyhow::Result<String> {
        matches
            .get_one::<String>(id)
            .cloned()
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --{id}"))
    };
    let read_or = |id: &str, default: &str| {
        matches
            .get_one::<String>(id)
            .cloned()
            .unwrap_or_else(|| default.to_string())
    };

    Ok(DirectoryConfig {
        api_url: read_or(ARG_API_URL, DEFAULT_API_URL),
        team_id: read_required(ARG_TEAM_ID)?,
        database_id: read_required(ARG_DATABASE_ID)?,
        tables: Tables {
            classrooms: read_or(ARG_CLASSROOMS_TABLE, DEFAULT_CLASSROOMS_TABLE),
            students: read_or(ARG_STUDENTS_TABLE, DEFAULT_STUDENTS_TABLE),
            attendance: read_or(ARG_ATTENDANCE_TABLE, DEFAULT_ATTENDANCE_TABLE),
        },
        api_key: SecretString::from(read_required(ARG_API_KEY)?),
        request_timeout: matches
            .get_one::<u64>(ARG_REQUEST_TIMEOUT)
            .copied()
            .map(Duration::from_secs),
    })
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_API_URL)
                .long(ARG_API_URL)
                .help("Ninox API base URL")
                .env("AULA_KIOSK_API_URL")
                .default_value(DEFAULT_API_URL)
                .global(true),
        )
        .arg(
            Arg::new(ARG_TEAM_ID)
                .long(ARG_TEAM_ID)
                .help("Ninox team (workspace) id")
                .env("AULA_KIOSK_TEAM_ID")
                .global(true),
        )
        .arg(
            Arg::new(ARG_DATABASE_ID)
                .long(ARG_DATABASE_ID)
                .help("Ninox database id")
                .env("AULA_KIOSK_DATABASE_ID")
                .global(true),
        )
        .arg(
            Arg::new(ARG_API_KEY)
                .long(ARG_API_KEY)
                .help("Ninox API key, sent as a bearer token")
                .env("AULA_KIOSK_API_KEY")
                .hide_env_values(true)
                .global(true),
        )
        .arg(
            Arg::new(ARG_CLASSROOMS_TABLE)
                .long(ARG_CLASSROOMS_TABLE)
                .help("Table holding classrooms and their passwords")
                .env("AULA_KIOSK_CLASSROOMS_TABLE")
                .default_value(DEFAULT_CLASSROOMS_TABLE)
                .global(true),
        )
        .arg(
            Arg::new(ARG_STUDENTS_TABLE)
                .long(ARG_STUDENTS_TABLE)
                .help("Table holding students and their badge codes")
                .env("AULA_KIOSK_STUDENTS_TABLE")
                .default_value(DEFAULT_STUDENTS_TABLE)
                .global(true),
        )
        .arg(
            Arg::new(ARG_ATTENDANCE_TABLE)
                .long(ARG_ATTENDANCE_TABLE)
                .help("Table receiving attendance events")
                .env("AULA_KIOSK_ATTENDANCE_TABLE")
                .default_value(DEFAULT_ATTENDANCE_TABLE)
                .global(true),
        )
        .arg(
            Arg::new(ARG_REQUEST_TIMEOUT)
                .long(ARG_REQUEST_TIMEOUT)
                .help("Per-request timeout in seconds (default: none)")
                .env("AULA_KIOSK_REQUEST_TIMEOUT_SECONDS")
                .value_parser(clap::value_parser!(u64).range(1..))
                .global(true),
        )
}
