use crate::{
    cli::{
        actions::{Action, kiosk, login, logout, scan, status},
        commands::{self, directory, session},
        globals::GlobalArgs,
    },
    directory::Movement,
};
use anyhow::{Context, Result, bail};
use secrecy::SecretString;

/// Map parsed arguments to an [`Action`]. No subcommand means `kiosk`.
///
/// # Errors
/// Returns an error if required arguments are missing or inconsistent.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let (name, sub_m) = matches
        .subcommand()
        .unwrap_or((commands::CMD_KIOSK, matches));

    let options = session::Options::parse(sub_m);
    let globals = GlobalArgs::new(options.session_file, options.notice_ttl);

    let action = match name {
        commands::CMD_KIOSK => Action::Kiosk(kiosk::Args {
            globals,
            directory: directory::config(sub_m)?,
        }),
        commands::CMD_LOGIN => Action::Login(login::Args {
            globals,
            directory: directory::config(sub_m)?,
            classroom: sub_m
                .get_one::<String>(commands::ARG_CLASSROOM)
                .cloned()
                .context("missing required argument: --classroom")?,
            password: sub_m
                .get_one::<String>(commands::ARG_PASSWORD)
                .cloned()
                .map(SecretString::from),
        }),
        commands::CMD_LOGOUT => Action::Logout(logout::Args { globals }),
        commands::CMD_STATUS => Action::Status(status::Args { globals }),
        commands::CMD_SCAN => Action::Scan(scan::Args {
            globals,
            directory: directory::config(sub_m)?,
            movement: sub_m
                .get_one::<Movement>(commands::ARG_OPERATION)
                .copied()
                .context("missing required argument: --operation")?,
            code: sub_m
                .get_one::<String>(commands::ARG_CODE)
                .cloned()
                .context("missing required argument: <code>")?,
        }),
        other => bail!("unknown command: {other}"),
    };

    Ok(action)
}
