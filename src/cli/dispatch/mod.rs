//! Map parsed CLI arguments to an [`Action`].

use crate::cli::actions::{Action, login, reset, seed};
use crate::cli::commands::{ARG_DSN, ARG_EMAIL, ARG_NAME, ARG_PASSWORD, password, secrets};
use crate::cli::globals::GlobalArgs;
use anyhow::{Context, Result, anyhow};
use secrecy::SecretString;

fn globals(matches: &clap::ArgMatches) -> Result<GlobalArgs> {
    let dsn = matches
        .get_one::<String>(ARG_DSN)
        .filter(|v| !v.trim().is_empty())
        .cloned()
        .context("missing required argument: --dsn")?;
    let secrets = secrets::Options::parse(matches)?;
    let cost = password::parse(matches)?;

    Ok(GlobalArgs::new(dsn, secrets.pepper, secrets.hmac_key).with_password_cost(cost))
}

fn required(matches: &clap::ArgMatches, id: &str) -> Result<String> {
    matches
        .get_one::<String>(id)
        .cloned()
        .with_context(|| format!("missing required argument: --{id}"))
}

/// Map validated CLI matches to an action.
///
/// # Errors
/// Returns an error if required arguments are missing or the subcommand is unknown.
pub fn handler(matches: &clap::ArgMatches) -> Result<Action> {
    let globals = globals(matches)?;

    match matches.subcommand() {
        Some(("reset", _)) => Ok(Action::Reset(reset::Args { globals })),
        Some(("seed", sub_m)) => Ok(Action::Seed(seed::Args {
            globals,
            name: sub_m.get_one::<String>(ARG_NAME).cloned().unwrap_or_default(),
            email: required(sub_m, ARG_EMAIL)?,
            password: SecretString::from(required(sub_m, ARG_PASSWORD)?),
        })),
        Some(("login", sub_m)) => Ok(Action::Login(login::Args {
            globals,
            email: required(sub_m, ARG_EMAIL)?,
            password: SecretString::from(required(sub_m, ARG_PASSWORD)?),
        })),
        Some((name, _)) => Err(anyhow!("unknown subcommand: {name}")),
        None => Err(anyhow!("missing subcommand")),
    }
}
