//! Password hashing and verification.
//!
//! Passwords are Argon2id-hashed with a random salt per hash after the
//! server-side pepper is appended. The resulting PHC string carries its own
//! parameters, so raising the cost never invalidates existing hashes.

use argon2::{
    password_hash::{self, SaltString},
    Algorithm, Argon2, Params, PasswordHash, PasswordHasher as _, PasswordVerifier, Version,
};
use rand::rngs::OsRng;
use secrecy::{ExposeSecret, SecretString};

use super::error::{Error, Result};

/// Argon2id cost parameters.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PasswordCost {
    memory_kib: u32,
    iterations: u32,
    parallelism: u32,
}

impl PasswordCost {
    #[must_use]
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Self {
        Self {
            memory_kib,
            iterations,
            parallelism,
        }
    }

    #[must_use]
    pub fn memory_kib(&self) -> u32 {
        self.memory_kib
    }

    #[must_use]
    pub fn iterations(&self) -> u32 {
        self.iterations
    }

    #[must_use]
    pub fn parallelism(&self) -> u32 {
        self.parallelism
    }

    fn params(self) -> Result<Params> {
        Params::new(self.memory_kib, self.iterations, self.parallelism, None)
            .map_err(|e| Error::PasswordHash(format!("invalid Argon2 parameters: {e}")))
    }
}

impl Default for PasswordCost {
    fn default() -> Self {
        Self::new(
            Params::DEFAULT_M_COST,
            Params::DEFAULT_T_COST,
            Params::DEFAULT_P_COST,
        )
    }
}

/// Peppered Argon2id password hasher.
#[derive(Clone)]
pub struct PasswordHasher {
    argon2: Argon2<'static>,
    pepper: SecretString,
}

impl PasswordHasher {
    /// # Errors
    /// Returns an error if the cost parameters are out of range.
    pub fn new(pepper: SecretString, cost: PasswordCost) -> Result<Self> {
        let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, cost.params()?);
        Ok(Self { argon2, pepper })
    }

    fn peppered(&self, plaintext: &str) -> String {
        format!("{plaintext}{}", self.pepper.expose_secret())
    }

    /// Hash a plaintext password. Two calls on the same input never return
    /// the same string.
    ///
    /// # Errors
    /// Returns an error if Argon2 fails to hash the input.
    pub fn hash(&self, plaintext: &str) -> Result<String> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(self.peppered(plaintext).as_bytes(), &salt)
            .map_err(|e| Error::PasswordHash(e.to_string()))?
            .to_string();
        Ok(hash)
    }

    /// Verify a plaintext password against a stored PHC hash.
    ///
    /// Returns `Ok(false)` on mismatch.
    ///
    /// # Errors
    /// Returns an error if the stored hash cannot be parsed or verification
    /// itself fails.
    pub fn verify(&self, hash: &str, plaintext: &str) -> Result<bool> {
        let parsed =
            PasswordHash::new(hash).map_err(|_| Error::PasswordHash("invalid password hash".into()))?;
        match self
            .argon2
            .verify_password(self.peppered(plaintext).as_bytes(), &parsed)
        {
            Ok(()) => Ok(true),
            Err(password_hash::Error::Password) => Ok(false),
            Err(e) => Err(Error::PasswordHash(e.to_string())),
        }
    }
}

impl std::fmt::Debug for PasswordHasher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PasswordHasher")
            .field("params", self.argon2.params())
            .field("pepper", &"***")
            .finish()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn hasher(pepper: &str) -> PasswordHasher {
        PasswordHasher::new(SecretString::from(pepper), PasswordCost::new(8, 1, 1)).unwrap()
    }

    #[test]
    fn hash_and_verify_round_trip() {
        let hasher = hasher("secret-random-string");
        let hash = hasher.hash("bestboss").unwrap();
        assert!(hash.starts_with("$argon2id$"));
        assert!(hasher.verify(&hash, "bestboss").unwrap());
        assert!(!hasher.verify(&hash, "worstboss").unwrap());
    }

    #[test]
    fn hashes_are_salted() {
        let hasher = hasher("pepper");
        let first = hasher.hash("bestboss").unwrap();
        let second = hasher.hash("bestboss").unwrap();
        assert_ne!(first, second);
        assert!(hasher.verify(&first, "bestboss").unwrap());
        assert!(hasher.verify(&second, "bestboss").unwrap());
    }

    #[test]
    fn verify_requires_same_pepper() {
        let hash = hasher("pepper-one").hash("bestboss").unwrap();
        assert!(!hasher("pepper-two").verify(&hash, "bestboss").unwrap());
    }

    #[test]
    fn verify_rejects_malformed_hash() {
        let result = hasher("pepper").verify("not-a-phc-string", "bestboss");
        assert!(matches!(result, Err(Error::PasswordHash(_))));
    }

    #[test]
    fn hash_embeds_configured_cost() {
        let hasher =
            PasswordHasher::new(SecretString::from("pepper"), PasswordCost::new(16, 2, 1)).unwrap();
        let hash = hasher.hash("bestboss").unwrap();
        assert!(hash.contains("m=16,t=2,p=1"));
    }

    #[test]
    fn verify_honours_cost_stored_in_hash() {
        let cheap = hasher("pepper");
        let hash = cheap.hash("bestboss").unwrap();
        let costlier =
            PasswordHasher::new(SecretString::from("pepper"), PasswordCost::new(32, 2, 1)).unwrap();
        assert!(costlier.verify(&hash, "bestboss").unwrap());
    }

    #[test]
    fn invalid_cost_is_rejected() {
        let result = PasswordHasher::new(SecretString::from("pepper"), PasswordCost::new(1, 0, 0));
        assert!(matches!(result, Err(Error::PasswordHash(_))));
    }

    #[test]
    fn default_cost_matches_argon2_defaults() {
        let cost = PasswordCost::default();
        assert_eq!(cost.memory_kib(), 19_456);
        assert_eq!(cost.iterations(), 2);
        assert_eq!(cost.parallelism(), 1);
    }
}
