use secrecy::SecretString;

use crate::models::{PasswordCost, UserConfig};

/// Settings shared by every subcommand.
#[derive(Clone)]
pub struct GlobalArgs {
    pub dsn: String,
    pub pepper: SecretString,
    pub hmac_key: SecretString,
    pub password_cost: PasswordCost,
}

impl GlobalArgs {
    #[must_use]
    pub fn new(dsn: String, pepper: SecretString, hmac_key: SecretString) -> Self {
        Self {
            dsn,
            pepper,
            hmac_key,
            password_cost: PasswordCost::default(),
        }
    }

    #[must_use]
    pub fn with_password_cost(mut self, cost: PasswordCost) -> Self {
        self.password_cost = cost;
        self
    }

    #[must_use]
    pub fn user_config(&self) -> UserConfig {
        UserConfig::new(self.pepper.clone(), self.hmac_key.clone())
            .with_password_cost(self.password_cost)
    }
}

impl std::fmt::Debug for GlobalArgs {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GlobalArgs")
            .field("dsn", &self.dsn)
            .field("pepper", &"***")
            .field("hmac_key", &"***")
            .field("password_cost", &self.password_cost)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;

    fn args() -> GlobalArgs {
        GlobalArgs::new(
            "postgres://localhost:5432/lenslocked".to_string(),
            SecretString::from("secret-random-string"),
            SecretString::from("secret-hmac-key"),
        )
    }

    #[test]
    fn test_global_args() {
        let args = args();
        assert_eq!(args.dsn, "postgres://localhost:5432/lenslocked");
        assert_eq!(args.password_cost, PasswordCost::default());

        let config = args
            .with_password_cost(PasswordCost::new(8, 1, 1))
            .user_config();
        assert_eq!(config.pepper().expose_secret(), "secret-random-string");
        assert_eq!(config.hmac_key().expose_secret(), "secret-hmac-key");
        assert_eq!(config.password_cost(), PasswordCost::new(8, 1, 1));
    }

    #[test]
    fn test_debug_redacts_secrets() {
        let debug = format!("{:?}", args());
        assert!(debug.contains("postgres://localhost:5432/lenslocked"));
        assert!(!debug.contains("secret-random-string"));
        assert!(!debug.contains("secret-hmac-key"));
    }
}
