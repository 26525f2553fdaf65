use crate::{
    cli::globals::GlobalArgs,
    models::{PgUserStore, User, UserService, UserStore},
};
use anyhow::{Context, Result, bail};
use secrecy::{ExposeSecret, SecretString};
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub name: String,
    pub email: String,
    pub password: SecretString,
}

/// Create a user, then confirm it resolves from its fresh remember token.
///
/// # Errors
/// Returns the validation or storage error, or an error if the remember
/// token lookup does not find the new user.
pub async fn seed_user<S: UserStore>(
    service: &UserService<S>,
    name: &str,
    email: &str,
    password: &SecretString,
) -> Result<User> {
    let user = service
        .create(User::new(name, email, password.expose_secret()))
        .await
        .context("failed to create user")?;

    let found = service
        .by_remember(&user.remember)
        .await
        .context("failed to look up user by remember token")?;
    if found.id != user.id {
        bail!(
            "remember token resolved to user {} instead of {}",
            found.id,
            user.id
        );
    }

    Ok(user)
}

/// Execute the seed action.
/// # Errors
/// Returns an error if the database is unreachable or the user is rejected.
pub async fn execute(args: Args) -> Result<()> {
    let store = PgUserStore::connect(&args.globals.dsn).await?;
    store
        .auto_migrate()
        .await
        .context("failed to migrate users table")?;
    let service = UserService::new(store, &args.globals.user_config())?;

    let user = seed_user(&service, &args.name, &args.email, &args.password).await?;
    info!(user_id = user.id, "user seeded");

    let output = serde_json::json!({
        "user": &user,
        "remember": &user.remember,
    });
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
