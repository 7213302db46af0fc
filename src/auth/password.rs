//! Password hashing utilities

use bcrypt::{hash, verify, DEFAULT_COST};

use crate::application::mappers::PasswordEncoder;
use crate::domain::DomainResult;
use crate::support::DomainError;

/// Hash a password using bcrypt
pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    hash(password, DEFAULT_COST)
}

/// Verify a password against a hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password, hash)
}

/// Bcrypt-backed implementation of the mapping layer's password collaborator.
pub struct BcryptPasswordEncoder;

impl PasswordEncoder for BcryptPasswordEncoder {
    fn encode(&self, raw: &str) -> DomainResult<String> {
        hash_password(raw)
            .map_err(|e| DomainError::Validation(format!("Failed to hash password: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let password = "secure_password_123";
        let hashed = hash_password(password).unwrap();

        assert!(verify_password(password, &hashed).unwrap());
        assert!(!verify_password("wrong_password", &hashed).unwrap());
    }

    #[test]
    fn test_encoder_output_is_not_the_raw_password() {
        let encoded = BcryptPasswordEncoder.encode("hunter2").unwrap();
        assert_ne!(encoded, "hunter2");
        assert!(verify_password("hunter2", &encoded).unwrap());
    }
}
