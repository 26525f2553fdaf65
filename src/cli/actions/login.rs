use crate::{
    alert::Alert,
    cli::globals::GlobalArgs,
    models::{PgUserStore, User, UserService, UserStore},
};
use anyhow::{Result, anyhow};
use secrecy::{ExposeSecret, SecretString};
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub email: String,
    pub password: SecretString,
}

/// Authenticate, reducing any failure to the alert a user would see.
///
/// # Errors
/// Returns the alert for the failed authentication.
pub async fn login<S: UserStore>(
    service: &UserService<S>,
    email: &str,
    password: &SecretString,
) -> std::result::Result<User, Alert> {
    service
        .authenticate(email, password.expose_secret())
        .await
        .map_err(|err| Alert::from_error(&err))
}

/// Execute the login action.
/// # Errors
/// Returns an error carrying the alert message if authentication fails.
pub async fn execute(args: Args) -> Result<()> {
    let store = PgUserStore::connect(&args.globals.dsn).await?;
    let service = UserService::new(store, &args.globals.user_config())?;

    let user = login(&service, &args.email, &args.password)
        .await
        .map_err(|alert| anyhow!("{alert}"))?;
    info!(user_id = user.id, "user authenticated");

    println!("{}", serde_json::to_string_pretty(&user)?);
    Ok(())
}
