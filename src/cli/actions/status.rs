use crate::cli::globals::GlobalArgs;
use anyhow::Result;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
}

/// Print the stored classroom, if any.
/// # Errors
/// Never fails; unreadable storage reads as logged out.
pub fn execute(args: &Args) -> Result<()> {
    match args.globals.sessions().load() {
        Some(session) => println!(
            "Logged in: {} (id {})",
            session.classroom_name, session.classroom_id
        ),
        None => println!("Logged out"),
    }
    Ok(())
}
