use clap::{Arg, ArgMatches, Command};
use secrecy::SecretString;

pub const ARG_PEPPER: &str = "pepper";
pub const ARG_HMAC_KEY: &str = "hmac-key";

/// Process-wide secrets for password hashing and remember tokens.
pub struct Options {
    pub pepper: SecretString,
    pub hmac_key: SecretString,
}

impl Options {
    /// # Errors
    /// Returns an error if either secret is missing or blank.
    pub fn parse(matches: &ArgMatches) -> anyhow::Result<Self> {
        let get_secret = |id: &str| -> anyhow::Result<SecretString> {
            match matches.get_one::<String>(id) {
                Some(value) if !value.trim().is_empty() => Ok(SecretString::from(value.clone())),
                _ => anyhow::bail!("missing required argument: --{id}"),
            }
        };

        Ok(Self {
            pepper: get_secret(ARG_PEPPER)?,
            hmac_key: get_secret(ARG_HMAC_KEY)?,
        })
    }
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_PEPPER)
                .long(ARG_PEPPER)
                .help("Secret appended to every password before hashing")
                .env("LENSLOCKED_PEPPER")
                .hide_env_values(true)
                .global(true),
        )
        .arg(
            Arg::new(ARG_HMAC_KEY)
                .long(ARG_HMAC_KEY)
                .help("Key used to HMAC remember tokens before storage")
                .env("LENSLOCKED_HMAC_KEY")
                .hide_env_values(true)
                .global(true),
        )
}
