use argon2::{
    Algorithm, Argon2, Params, PasswordHash, PasswordVerifier, Version,
    password_hash::{self, PasswordHasher as _, SaltString, rand_core},
};
use gwiit_core::{HashedPassword, Password, PasswordHashError, PasswordHasher};
use secrecy::{ExposeSecret, Secret};

/// Argon2id hasher. Hashing runs on the blocking pool so request handlers
/// never stall the runtime.
#[derive(Debug, Clone, Copy, Default)]
pub struct Argon2PasswordHasher;

impl Argon2PasswordHasher {
    pub fn new() -> Self {
        Self
    }
}

fn argon2() -> Result<Argon2<'static>, PasswordHashError> {
    let params =
        Params::new(15000, 2, 1, None).map_err(|e| PasswordHashError(e.to_string()))?;
    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}

#[async_trait::async_trait]
impl PasswordHasher for Argon2PasswordHasher {
    #[tracing::instrument(name = "Computing password hash", skip_all)]
    async fn hash(&self, password: &Password) -> Result<HashedPassword, PasswordHashError> {
        let current_span: tracing::Span = tracing::Span::current();
        let password = password.as_ref().clone();

        tokio::task::spawn_blocking(move || {
            current_span.in_scope(|| {
                let salt = SaltString::generate(rand_core::OsRng);
                argon2()?
                    .hash_password(password.expose_secret().as_bytes(), &salt)
                    .map(|hash| HashedPassword::new(Secret::from(hash.to_string())))
                    .map_err(|e| PasswordHashError(e.to_string()))
            })
        })
        .await
        .map_err(|e| PasswordHashError(e.to_string()))?
    }

    #[tracing::instrument(name = "Verify password hash", skip_all)]
    async fn verify(
        &self,
        candidate: &Secret<String>,
        expected: &HashedPassword,
    ) -> Result<bool, PasswordHashError> {
        let current_span: tracing::Span = tracing::Span::current();
        let candidate = candidate.clone();
        let expected = expected.as_ref().clone();

        tokio::task::spawn_blocking(move || {
            current_span.in_scope(|| {
                let expected = PasswordHash::new(expected.expose_secret())
                    .map_err(|e| PasswordHashError(e.to_string()))?;

                match argon2()?.verify_password(candidate.expose_secret().as_bytes(), &expected) {
                    Ok(()) => Ok(true),
                    Err(password_hash::Error::Password) => Ok(false),
                    Err(e) => Err(PasswordHashError(e.to_string())),
                }
            })
        })
        .await
        .map_err(|e| PasswordHashError(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn password(raw: &str) -> Password {
        Password::parse(Secret::from(raw.to_string())).unwrap()
    }

    #[tokio::test]
    async fn hash_is_phc_encoded_and_salted() {
        let hasher = Argon2PasswordHasher::new();
        let first = hasher.hash(&password("Strong#Pass1")).await.unwrap();
        let second = hasher.hash(&password("Strong#Pass1")).await.unwrap();

        assert!(first.as_ref().expose_secret().starts_with("$argon2id$"));
        assert_ne!(
            first.as_ref().expose_secret(),
            second.as_ref().expose_secret()
        );
    }

    #[tokio::test]
    async fn verify_distinguishes_match_from_mismatch() {
        let hasher = Argon2PasswordHasher::new();
        let hash = hasher.hash(&password("Strong#Pass1")).await.unwrap();

        let right = Secret::from("Strong#Pass1".to_string());
        let wrong = Secret::from("Strong#Pass2".to_string());
        assert!(hasher.verify(&right, &hash).await.unwrap());
        assert!(!hasher.verify(&wrong, &hash).await.unwrap());
    }

    #[tokio::test]
    async fn malformed_digest_is_an_error() {
        let hasher = Argon2PasswordHasher::new();
        let garbage = HashedPassword::new(Secret::from("not-a-hash".to_string()));
        let candidate = Secret::from("Strong#Pass1".to_string());

        assert!(hasher.verify(&candidate, &garbage).await.is_err());
    }
}
