pub mod kiosk;
pub mod login;
pub mod logout;
pub mod scan;
pub mod status;

// Internal "interpreter" for `Action`.
mod run;

#[derive(Debug)]
pub enum Action {
    Kiosk(kiosk::Args),
    Login(login::Args),
    Logout(logout::Args),
    Status(status::Args),
    Scan(scan::Args),
}

impl Action {
    /// Execute the action.
    /// # Errors
    /// Returns an error if the action fails.
    pub async fn execute(self) -> anyhow::Result<()> {
        run::execute(self).await
    }
}
