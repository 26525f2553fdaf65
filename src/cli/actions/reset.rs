use crate::{cli::globals::GlobalArgs, models::PgUserStore};
use anyhow::{Context, Result};
use tracing::info;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
}

/// Drop and recreate the users table.
/// # Errors
/// Returns an error if the database is unreachable or the reset fails.
pub async fn execute(args: Args) -> Result<()> {
    let store = PgUserStore::connect(&args.globals.dsn).await?;
    store
        .destructive_reset()
        .await
        .context("failed to reset users table")?;
    info!("users table reset");
    println!("users table reset");
    Ok(())
}
