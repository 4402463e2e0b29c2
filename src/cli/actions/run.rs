use crate::cli::actions::{Action, kiosk, login, logout, scan, status};
use anyhow::Result;

/// Execute the provided action.
// Single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Kiosk(args) => kiosk::execute(args).await,
        Action::Login(args) => login::execute(args).await,
        Action::Logout(args) => logout::execute(&args),
        Action::Status(args) => status::execute(&args),
        Action::Scan(args) => scan::execute(args).await,
    }
}
