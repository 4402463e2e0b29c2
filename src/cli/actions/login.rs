use crate::{
    auth,
    cli::globals::GlobalArgs,
    directory::{DirectoryConfig, NinoxClient},
    flight::SingleFlight,
    kiosk::Console,
};
use anyhow::{Context, Result, anyhow};
use secrecy::{ExposeSecret, SecretString};

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub directory: DirectoryConfig,
    pub classroom: String,
    pub password: Option<SecretString>,
}

/// Authenticate a classroom and store the session, replacing any previous one.
/// # Errors
/// Returns an error if the credentials are rejected or the directory is unreachable.
pub async fn execute(args: Args) -> Result<()> {
    let password = match args.password {
        Some(password) => password,
        None => {
            let mut console = Console::stdio();
            let line = console
                .prompt("Password: ")
                .await?
                .ok_or_else(|| anyhow!("no password given"))?;
            SecretString::from(line)
        }
    };

    let client = NinoxClient::new(args.directory).context("Could not configure the directory client")?;
    let mut sessions = args.globals.sessions();

    let session = auth::authenticate(
        &client,
        &mut sessions,
        &SingleFlight::new(),
        &args.classroom,
        password.expose_secret(),
    )
    .await?;

    println!("Logged in: {}", session.classroom_name);
    Ok(())
}
