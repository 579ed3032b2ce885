//! Password hashing and verification utilities
//!
//! Argon2id PHC strings are stored in the account documents; the plain
//! password never leaves this module or reaches a log line. Bcrypt hashes
//! (`$2a$`, `$2b$`, `$2y$`) found on older account records are still
//! verified and reported by [`PasswordUtils::needs_rehash`].

use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use rand::rngs::OsRng;
use tracing::{debug, error};

/// Error types for password operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    #[error("Failed to hash password: {0}")]
    HashingFailed(String),
    #[error("Failed to verify password: {0}")]
    VerificationFailed(String),
    #[error("Invalid password hash format")]
    InvalidHashFormat,
}

pub trait PasswordUtils {
    /// Hashes the given password using Argon2id algorithm
    fn hash_password(password: &str) -> Result<String, PasswordError>;

    /// Verifies the given password against the stored hash
    fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError>;

    /// Returns the list of unmet requirements, empty when acceptable
    fn password_problems(password: &str) -> Vec<String>;

    /// True for stored hashes that should be replaced by an Argon2id hash
    fn needs_rehash(hash: &str) -> bool;
}

const BCRYPT_PREFIXES: [&str; 3] = ["$2a$", "$2b$", "$2y$"];

fn is_bcrypt_hash(hash: &str) -> bool {
    BCRYPT_PREFIXES.iter().any(|prefix| hash.starts_with(prefix))
}

/// Minimum length accepted at signup and reset
pub const MIN_PASSWORD_LEN: usize = 6;

pub struct PasswordUtilsImpl;

impl PasswordUtils for PasswordUtilsImpl {
    fn hash_password(password: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);
        Argon2::default()
            .hash_password(password.as_bytes(), &salt)
            .map(|hash| hash.to_string())
            .map_err(|err| {
                error!("Failed to hash password: {}", err);
                PasswordError::HashingFailed(err.to_string())
            })
    }

    fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
        if is_bcrypt_hash(hash) {
            return bcrypt::verify(password, hash).map_err(|err| {
                error!("Stored bcrypt hash is malformed: {}", err);
                PasswordError::InvalidHashFormat
            });
        }

        let parsed_hash = PasswordHash::new(hash).map_err(|err| {
            error!("Stored password hash is not a PHC string: {}", err);
            PasswordError::InvalidHashFormat
        })?;

        match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => {
                debug!("Password verification failed - invalid password");
                Ok(false)
            }
            Err(err) => {
                error!("Password verification error: {}", err);
                Err(PasswordError::VerificationFailed(err.to_string()))
            }
        }
    }

    fn password_problems(password: &str) -> Vec<String> {
        let mut problems = Vec::new();
        if password.chars().count() < MIN_PASSWORD_LEN {
            problems.push(format!("Password must be at least {} characters long", MIN_PASSWORD_LEN));
        }
        if password.trim().is_empty() {
            problems.push("Password cannot be blank".to_string());
        }
        problems
    }

    fn needs_rehash(hash: &str) -> bool {
        is_bcrypt_hash(hash)
    }
}
