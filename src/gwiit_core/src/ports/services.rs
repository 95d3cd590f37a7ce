use async_trait::async_trait;
use secrecy::Secret;
use thiserror::Error;

use crate::domain::{
    email::Email,
    password::{HashedPassword, Password, PasswordError},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Password hashing failed: {0}")]
pub struct PasswordHashError(pub String);

/// One-way password hashing. Verification re-hashes the candidate, the digest
/// is never decrypted.
#[async_trait]
pub trait PasswordHasher: Send + Sync {
    async fn hash(&self, password: &Password) -> Result<HashedPassword, PasswordHashError>;

    /// `Ok(false)` on mismatch, `Err` only when the stored digest is unusable.
    async fn verify(
        &self,
        candidate: &Secret<String>,
        expected: &HashedPassword,
    ) -> Result<bool, PasswordHashError>;
}

/// Source of temporary passwords for accounts created without one.
pub trait PasswordGenerator: Send + Sync {
    fn generate(&self) -> Result<Password, PasswordError>;
}

/// Port trait for email sending service
#[async_trait]
pub trait EmailClient: Send + Sync {
    async fn send_email(
        &self,
        recipient: &Email,
        subject: &str,
        content: &str,
    ) -> Result<(), String>;
}
