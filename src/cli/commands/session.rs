use clap::{Arg, ArgMatches, Command};
use std::{path::PathBuf, time::Duration};

pub const ARG_SESSION_FILE: &str = "session-file";
pub const ARG_NOTICE_SECONDS: &str = "notice-seconds";

#[derive(Debug, Clone)]
pub struct Options {
    /// `None` means the default location under the config directory.
    pub session_file: Option<PathBuf>,
    pub notice_ttl: Duration,
}

impl Options {
    #[must_use]
    pub fn parse(matches: &ArgMatches) -> Self {
        Self {
            session_file: matches.get_one::<PathBuf>(ARG_SESSION_FILE).cloned(),
            notice_ttl: Duration::from_secs(
                matches
                    .get_one::<u64>(ARG_NOTICE_SECONDS)
                    .copied()
                    .unwrap_or(5),
            ),
        }
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_SESSION_FILE)
                .long(ARG_SESSION_FILE)
                .help("Where the logged-in classroom is stored (default: <config dir>/aula-kiosk/session.json)")
                .env("AULA_KIOSK_SESSION_FILE")
                .value_parser(clap::value_parser!(PathBuf))
                .global(true),
        )
        .arg(
            Arg::new(ARG_NOTICE_SECONDS)
                .long(ARG_NOTICE_SECONDS)
                .help("Seconds a scan result stays on screen")
                .env("AULA_KIOSK_NOTICE_SECONDS")
                .default_value("5")
                .value_parser(clap::value_parser!(u64).range(1..))
                .global(true),
        )
}
