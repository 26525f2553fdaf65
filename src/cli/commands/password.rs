use clap::{Arg, ArgMatches, Command};

use crate::models::PasswordCost;

pub const ARG_PASSWORD_MEMORY_KIB: &str = "password-memory-kib";
pub const ARG_PASSWORD_ITERATIONS: &str = "password-iterations";
pub const ARG_PASSWORD_PARALLELISM: &str = "password-parallelism";

/// Argon2id cost from the CLI; defaults match [`PasswordCost::default`].
///
/// # Errors
/// Returns an error if a cost argument is missing.
pub fn parse(matches: &ArgMatches) -> anyhow::Result<PasswordCost> {
    let get = |id: &str| -> anyhow::Result<u32> {
        matches
            .get_one::<u32>(id)
            .copied()
            .ok_or_else(|| anyhow::anyhow!("missing required argument: --{id}"))
    };

    Ok(PasswordCost::new(
        get(ARG_PASSWORD_MEMORY_KIB)?,
        get(ARG_PASSWORD_ITERATIONS)?,
        get(ARG_PASSWORD_PARALLELISM)?,
    ))
}

#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_PASSWORD_MEMORY_KIB)
                .long(ARG_PASSWORD_MEMORY_KIB)
                .help("Argon2id memory cost in KiB")
                .env("LENSLOCKED_PASSWORD_MEMORY_KIB")
                .default_value("19456")
                .global(true)
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new(ARG_PASSWORD_ITERATIONS)
                .long(ARG_PASSWORD_ITERATIONS)
                .help("Argon2id iterations")
                .env("LENSLOCKED_PASSWORD_ITERATIONS")
                .default_value("2")
                .global(true)
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new(ARG_PASSWORD_PARALLELISM)
                .long(ARG_PASSWORD_PARALLELISM)
                .help("Argon2id lanes")
                .env("LENSLOCKED_PASSWORD_PARALLELISM")
                .default_value("1")
                .global(true)
                .value_parser(clap::value_parser!(u32)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_password_cost_default() {
        temp_env::with_vars(
            [
                ("LENSLOCKED_PASSWORD_MEMORY_KIB", None::<&str>),
                ("LENSLOCKED_PASSWORD_ITERATIONS", None::<&str>),
                ("LENSLOCKED_PASSWORD_PARALLELISM", None::<&str>),
            ],
            || {
                let matches = with_args(Command::new("t")).get_matches_from(["t"]);
                let cost = parse(&matches).map_err(|e| e.to_string());
                assert_eq!(cost, Ok(PasswordCost::default()));
            },
        );
    }

    #[test]
    fn cost_from_env() {
        temp_env::with_vars(
            [
                ("LENSLOCKED_PASSWORD_MEMORY_KIB", Some("64")),
                ("LENSLOCKED_PASSWORD_ITERATIONS", Some("3")),
                ("LENSLOCKED_PASSWORD_PARALLELISM", Some("2")),
            ],
            || {
                let matches = with_args(Command::new("t")).get_matches_from(["t"]);
                let cost = parse(&matches).map_err(|e| e.to_string());
                assert_eq!(cost, Ok(PasswordCost::new(64, 3, 2)));
            },
        );
    }
}
