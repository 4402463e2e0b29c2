pub mod directory;
pub mod logging;
pub mod session;

use crate::directory::Movement;
use clap::{
    Arg, ColorChoice, Command,
    builder::styling::{AnsiColor, Effects, Styles},
};

pub const CMD_KIOSK: &str = "kiosk";
pub const CMD_LOGIN: &str = "login";
pub const CMD_LOGOUT: &str = "logout";
pub const CMD_STATUS: &str = "status";
pub const CMD_SCAN: &str = "scan";

pub const ARG_CLASSROOM: &str = "classroom";
pub const ARG_PASSWORD: &str = "password";
pub const ARG_OPERATION: &str = "operation";
pub const ARG_CODE: &str = "code";

#[must_use]
pub fn new() -> Command {
    let styles = Styles::styled()
        .header(AnsiColor::Yellow.on_default() | Effects::BOLD)
        .usage(AnsiColor::Green.on_default() | Effects::BOLD)
        .literal(AnsiColor::Blue.on_default() | Effects::BOLD)
        .placeholder(AnsiColor::Green.on_default());

    let long_version: &'static str = Box::leak(
        format!("{} - {}", env!("CARGO_PKG_VERSION"), crate::GIT_COMMIT_HASH).into_boxed_str(),
    );

    let command = Command::new("aula-kiosk")
        .about(env!("CARGO_PKG_DESCRIPTION"))
        .version(env!("CARGO_PKG_VERSION"))
        .long_version(long_version)
        .color(ColorChoice::Auto)
        .styles(styles)
        .subcommand(Command::new(CMD_KIOSK).about("Run the interactive kiosk (default)"))
        .subcommand(
            Command::new(CMD_LOGIN)
                .about("Log this terminal into a classroom")
                .arg(
                    Arg::new(ARG_CLASSROOM)
                        .short('c')
                        .long(ARG_CLASSROOM)
                        .help("Classroom name, matched ignoring case")
                        .env("AULA_KIOSK_CLASSROOM")
                        .required(true),
                )
                .arg(
                    Arg::new(ARG_PASSWORD)
                        .long(ARG_PASSWORD)
                        .help("Classroom password (prompted for when absent)")
                        .env("AULA_KIOSK_PASSWORD")
                        .hide_env_values(true),
                ),
        )
        .subcommand(Command::new(CMD_LOGOUT).about("Forget the stored classroom"))
        .subcommand(Command::new(CMD_STATUS).about("Show the stored classroom"))
        .subcommand(
            Command::new(CMD_SCAN)
                .about("Record one badge code for the stored classroom")
                .arg(
                    Arg::new(ARG_OPERATION)
                        .short('o')
                        .long(ARG_OPERATION)
                        .help("in (check-in) or out (check-out)")
                        .required(true)
                        .value_parser(|s: &str| s.parse::<Movement>()),
                )
                .arg(
                    Arg::new(ARG_CODE)
                        .help("Code read from the badge")
                        .required(true)
                        .allow_hyphen_values(true),
                ),
        );

    let command = directory::with_args(command);
    let command = session::with_args(command);
    logging::with_args(command)
}
