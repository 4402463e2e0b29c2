use crate::{
    attendance,
    cli::globals::GlobalArgs,
    directory::{DirectoryConfig, Movement, NinoxClient},
    flight::SingleFlight,
    roster::Roster,
};
use anyhow::{Context, Result, bail};

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub directory: DirectoryConfig,
    pub movement: Movement,
    pub code: String,
}

/// Record one code against the stored classroom.
/// # Errors
/// Returns an error if no classroom is logged in, the roster cannot be
/// loaded, or the code was not recorded.
pub async fn execute(args: Args) -> Result<()> {
    let session = args
        .globals
        .sessions()
        .load()
        .context("No classroom is logged in; run `aula-kiosk login` first")?;

    let client = NinoxClient::new(args.directory).context("Could not configure the directory client")?;
    let roster = Roster::load(&client, &SingleFlight::new())
        .await
        .context("Error loading students")?;

    let outcome = attendance::record_scan(
        &client,
        &roster,
        &session.classroom_id,
        args.movement,
        &args.code,
    )
    .await;

    if !outcome.is_recorded() {
        bail!(outcome.message());
    }
    println!("{}", outcome.message());
    Ok(())
}
