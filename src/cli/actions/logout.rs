use crate::cli::globals::GlobalArgs;
use anyhow::{Context, Result};

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
}

/// Forget the stored classroom.
/// # Errors
/// Returns an error if the session file cannot be written.
pub fn execute(args: &Args) -> Result<()> {
    args.globals
        .sessions()
        .clear()
        .context("Could not clear the stored session")?;
    println!("Logged out");
    Ok(())
}
