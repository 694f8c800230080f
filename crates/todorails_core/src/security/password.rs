//! One-way password hashing.
//!
//! # Responsibility
//! - Hash clear-text passwords with a per-call random salt.
//! - Verify clear text against a stored hash by recomputation.
//!
//! # Invariants
//! - Output is a PHC string; salt and cost parameters are embedded in it.
//! - Clear text is never retained or logged.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::{Algorithm, Argon2, Params, Version};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Failure inside the hashing primitive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PasswordError {
    /// Cost parameters were rejected.
    InvalidParams(String),
    /// Hashing or hash parsing failed.
    Hash(String),
}

impl Display for PasswordError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidParams(message) => write!(f, "invalid password hash params: {message}"),
            Self::Hash(message) => write!(f, "password hashing failed: {message}"),
        }
    }
}

impl Error for PasswordError {}

/// Hashing collaborator required by `UserService`.
pub trait PasswordEncoder {
    /// Returns an opaque, salted, one-way hash of `clear`.
    fn hash(&self, clear: &str) -> Result<String, PasswordError>;
    /// Returns whether `clear` produces `hash` when recomputed.
    fn verify(&self, clear: &str, hash: &str) -> Result<bool, PasswordError>;
    /// Returns whether `value` is shaped like an output of [`Self::hash`].
    fn is_hash(&self, value: &str) -> bool;
}

/// Argon2id encoder producing PHC strings.
#[derive(Clone)]
pub struct Argon2PasswordEncoder {
    argon2: Argon2<'static>,
}

impl Argon2PasswordEncoder {
    /// Builds an encoder with explicit cost parameters.
    ///
    /// `memory_kib` is the memory cost, `iterations` the time cost.
    pub fn with_params(
        memory_kib: u32,
        iterations: u32,
        parallelism: u32,
    ) -> Result<Self, PasswordError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|err| PasswordError::InvalidParams(err.to_string()))?;
        Ok(Self {
            argon2: Argon2::new(Algorithm::Argon2id, Version::V0x13, params),
        })
    }
}

impl Default for Argon2PasswordEncoder {
    fn default() -> Self {
        Self {
            argon2: Argon2::default(),
        }
    }
}

impl PasswordEncoder for Argon2PasswordEncoder {
    fn hash(&self, clear: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self
            .argon2
            .hash_password(clear.as_bytes(), &salt)
            .map_err(|err| PasswordError::Hash(err.to_string()))?;
        Ok(hash.to_string())
    }

    fn verify(&self, clear: &str, hash: &str) -> Result<bool, PasswordError> {
        let parsed = PasswordHash::new(hash).map_err(|err| PasswordError::Hash(err.to_string()))?;
        match self.argon2.verify_password(clear.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(err) => Err(PasswordError::Hash(err.to_string())),
        }
    }

    fn is_hash(&self, value: &str) -> bool {
        PasswordHash::new(value).is_ok()
    }
}

#[cfg(test)]
mod tests {
    use super::{Argon2PasswordEncoder, PasswordEncoder, PasswordError};

    fn cheap_encoder() -> Argon2PasswordEncoder {
        Argon2PasswordEncoder::with_params(64, 1, 1).expect("valid params")
    }

    #[test]
    fn hash_never_equals_clear_text_and_verifies() {
        let encoder = cheap_encoder();
        let hash = encoder.hash("hunter2").expect("hash");

        assert_ne!(hash, "hunter2");
        assert!(hash.starts_with("$argon2id$"));
        assert!(encoder.is_hash(&hash));
        assert!(encoder.verify("hunter2", &hash).expect("verify"));
        assert!(!encoder.verify("hunter3", &hash).expect("verify"));
    }

    #[test]
    fn same_password_gets_distinct_salts() {
        let encoder = cheap_encoder();
        let first = encoder.hash("hunter2").expect("hash");
        let second = encoder.hash("hunter2").expect("hash");
        assert_ne!(first, second);
    }

    #[test]
    fn clear_text_is_not_a_hash() {
        let encoder = cheap_encoder();
        assert!(!encoder.is_hash("hunter2"));
        assert!(matches!(
            encoder.verify("hunter2", "hunter2"),
            Err(PasswordError::Hash(_))
        ));
    }

    #[test]
    fn rejects_invalid_cost_params() {
        let result = Argon2PasswordEncoder::with_params(1, 0, 1);
        assert!(matches!(result, Err(PasswordError::InvalidParams(_))));
    }
}
