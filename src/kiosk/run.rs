use super::{Console, Controller, MainScreen};
use crate::{
    directory::{Directory, Movement},
    notice::DEFAULT_NOTICE_TTL,
    scanner::{CaptureConfig, ConsoleDecoder},
    session::{KeyValueStore, Session},
};
use anyhow::Result;
use std::{io::Write, time::Duration};
use tokio::io::AsyncBufRead;
use tracing::debug;

pub const MENU: &str = "[i] check-in  [o] check-out  [l] log out  [q] quit";

#[derive(Clone, Copy, Debug)]
pub struct KioskOptions {
    pub notice_ttl: Duration,
    pub capture: CaptureConfig,
}

impl Default for KioskOptions {
    fn default() -> Self {
        Self {
            notice_ttl: DEFAULT_NOTICE_TTL,
            capture: CaptureConfig::default(),
        }
    }
}

enum Exit {
    Logout,
    Quit,
}

/// Interactive loop: login form and main screen until the operator quits or
/// input ends.
///
/// # Errors
/// Returns an error only if the console itself fails.
pub async fn run<D, S, R, W>(
    controller: &mut Controller<D, S>,
    console: &mut Console<R, W>,
    options: &KioskOptions,
) -> Result<()>
where
    D: Directory,
    S: KeyValueStore,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    console.line("Starting application...")?;
    controller.boot();

    loop {
        let restored = controller.session().cloned();
        let session = match restored {
            Some(session) => session,
            None => match login_screen(controller, console).await? {
                Some(session) => session,
                None => return Ok(()),
            },
        };

        match main_screen(controller, console, session, options).await? {
            Exit::Logout => controller.logout(),
            Exit::Quit => return Ok(()),
        }
    }
}

async fn login_screen<D, S, R, W>(
    controller: &mut Controller<D, S>,
    console: &mut Console<R, W>,
) -> Result<Option<Session>>
where
    D: Directory,
    S: KeyValueStore,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    console.line("")?;
    console.line("== Attendance control: log in ==")?;

    loop {
        let Some(classroom) = console.prompt("Classroom: ").await? else {
            return Ok(None);
        };
        if classroom.is_empty() {
            console.line("Classroom is required.")?;
            continue;
        }

        let Some(password) = console.prompt("Password: ").await? else {
            return Ok(None);
        };
        if password.is_empty() {
            console.line("Password is required.")?;
            continue;
        }

        console.line("Verifying...")?;
        match controller.login(&classroom, &password).await {
            Ok(session) => return Ok(Some(session)),
            Err(e) => console.line(format!("! {e}"))?,
        }
    }
}

async fn main_screen<D, S, R, W>(
    controller: &Controller<D, S>,
    console: &mut Console<R, W>,
    session: Session,
    options: &KioskOptions,
) -> Result<Exit>
where
    D: Directory,
    S: KeyValueStore,
    R: AsyncBufRead + Unpin,
    W: Write,
{
    let mut screen = MainScreen::new(session, options.notice_ttl, options.capture);

    console.line("")?;
    console.line(format!("Attendance control | Classroom: {}", screen.session().classroom_name))?;
    console.line("Loading student data...")?;
    screen.load_roster(controller.directory()).await;

    loop {
        render(console, &screen)?;

        let Some(choice) = console.prompt("> ").await? else {
            return Ok(Exit::Quit);
        };

        let movement = match choice.trim().to_lowercase().as_str() {
            "" => continue,
            "l" | "logout" => return Ok(Exit::Logout),
            "q" | "quit" => return Ok(Exit::Quit),
            other => match other.parse::<Movement>() {
                Ok(movement) => movement,
                Err(_) => {
                    console.line(format!("Unknown option: {other}"))?;
                    continue;
                }
            },
        };

        debug!("operator chose {movement}");
        let mut decoder = ConsoleDecoder::new(console);
        screen.scan(controller.directory(), movement, &mut decoder).await;
    }
}

fn render<R, W>(console: &mut Console<R, W>, screen: &MainScreen) -> Result<()>
where
    R: AsyncBufRead + Unpin,
    W: Write,
{
    console.line("")?;
    console.line(format!("Classroom: {}", screen.session().classroom_name))?;
    if let Some(notice) = screen.notice() {
        let tag = if notice.is_error() { "[error]" } else { "[ok]" };
        console.line(format!("{tag} {}", notice.text))?;
    }
    console.line(MENU)?;
    Ok(())
}
