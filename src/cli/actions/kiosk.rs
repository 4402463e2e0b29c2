use crate::{
    cli::globals::GlobalArgs,
    directory::{DirectoryConfig, NinoxClient},
    kiosk::{self, Console, Controller, KioskOptions},
    scanner::CaptureConfig,
};
use anyhow::{Context, Result};
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub directory: DirectoryConfig,
}

/// Run the interactive kiosk on the terminal.
/// # Errors
/// Returns an error if the directory client cannot be built or the console fails.
pub async fn execute(args: Args) -> Result<()> {
    info!(
        "starting {} {} ({})",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        crate::GIT_COMMIT_HASH
    );

    let client = NinoxClient::new(args.directory).context("Could not configure the directory client")?;
    let mut controller = Controller::new(client, args.globals.sessions());
    let mut console = Console::stdio();

    let options = KioskOptions {
        notice_ttl: args.globals.notice_ttl,
        capture: CaptureConfig::default(),
    };

    kiosk::run(&mut controller, &mut console, &options).await
}
