use secrecy::SecretString;

use super::password::PasswordCost;

/// Secret material and hashing cost for the user service.
///
/// Built once at startup and moved into [`UserService`](super::UserService);
/// nothing mutates it afterwards.
#[derive(Clone)]
pub struct UserConfig {
    pepper: SecretString,
    hmac_key: SecretString,
    password_cost: PasswordCost,
}

impl UserConfig {
    #[must_use]
    pub fn new(pepper: SecretString, hmac_key: SecretString) -> Self {
        Self {
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
    pub fn pepper(&self) -> &SecretString {
        &self.pepper
    }

    #[must_use]
    pub fn hmac_key(&self) -> &SecretString {
        &self.hmac_key
    }

    #[must_use]
    pub fn password_cost(&self) -> PasswordCost {
        self.password_cost
    }
}

impl std::fmt::Debug for UserConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserConfig")
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

    #[test]
    fn user_config_defaults_and_overrides() {
        let config = UserConfig::new(
            SecretString::from("secret-random-string"),
            SecretString::from("secret-hmac-key"),
        );
        assert_eq!(config.pepper().expose_secret(), "secret-random-string");
        assert_eq!(config.hmac_key().expose_secret(), "secret-hmac-key");
        assert_eq!(config.password_cost(), PasswordCost::default());

        let config = config.with_password_cost(PasswordCost::new(8, 1, 1));
        assert_eq!(config.password_cost(), PasswordCost::new(8, 1, 1));
    }

    #[test]
    fn debug_redacts_secrets() {
        let config = UserConfig::new(SecretString::from("pepper"), SecretString::from("key"));
        let debug = format!("{config:?}");
        assert!(!debug.contains("pepper\""));
        assert!(!debug.contains("\"key\""));
        assert!(debug.contains("***"));
    }
}
