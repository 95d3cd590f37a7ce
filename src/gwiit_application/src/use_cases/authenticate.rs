use gwiit_core::{PasswordHashError, PasswordHasher, User, UserStore, UserStoreError};
use secrecy::Secret;

#[derive(Debug, thiserror::Error)]
pub enum AuthenticateError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error(transparent)]
    PasswordHashError(#[from] PasswordHashError),
    #[error(transparent)]
    UserStoreError(#[from] UserStoreError),
}

/// Checks a login identifier and password against active accounts.
pub struct AuthenticateUseCase<'a, U, H>
where
    U: UserStore,
    H: PasswordHasher,
{
    user_store: &'a U,
    password_hasher: &'a H,
}

impl<'a, U, H> AuthenticateUseCase<'a, U, H>
where
    U: UserStore,
    H: PasswordHasher,
{
    pub fn new(user_store: &'a U, password_hasher: &'a H) -> Self {
        Self {
            user_store,
            password_hasher,
        }
    }

    /// Execute the authenticate use case
    ///
    /// # Arguments
    /// * `identifier` - Email, username or badge value, matched ignoring case
    /// * `password` - Candidate password
    ///
    /// # Returns
    /// The matching active user, or `InvalidCredentials` for an unknown
    /// identifier and a wrong password alike
    #[tracing::instrument(name = "AuthenticateUseCase::execute", skip_all)]
    pub async fn execute(
        &self,
        identifier: &str,
        password: &Secret<String>,
    ) -> Result<User, AuthenticateError> {
        let user = match self
            .user_store
            .find_active_by_identifier(identifier.trim())
            .await
        {
            Ok(user) => user,
            Err(UserStoreError::UserNotFound) => return Err(AuthenticateError::InvalidCredentials),
            Err(e) => return Err(e.into()),
        };

        if !self
            .password_hasher
            .verify(password, &user.password_hash)
            .await?
        {
            return Err(AuthenticateError::InvalidCredentials);
        }

        tracing::debug!(user_id = %user.id, "User authenticated");
        Ok(user)
    }
}
