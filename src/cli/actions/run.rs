use crate::cli::actions::{Action, login, reset, seed};
use anyhow::Result;

/// Execute the provided action.
// Single dispatch point for all CLI actions.
/// # Errors
/// Returns an error if the action fails.
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Reset(args) => reset::execute(args).await,
        Action::Seed(args) => seed::execute(args).await,
        Action::Login(args) => login::execute(args).await,
    }
}
