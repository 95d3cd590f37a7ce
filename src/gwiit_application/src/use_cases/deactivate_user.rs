use gwiit_core::{User, UserId, UserStore, UserStoreError};

#[derive(Debug, thiserror::Error)]
pub enum DeactivateUserError {
    #[error("Superusers can only be deactivated through the superuser flow")]
    SuperuserProtected,
    #[error(transparent)]
    UserStoreError(#[from] UserStoreError),
}

/// Soft-deletes accounts by clearing the active flag. Rows are never removed.
pub struct DeactivateUserUseCase<'a, U>
where
    U: UserStore,
{
    user_store: &'a U,
}

impl<'a, U> DeactivateUserUseCase<'a, U>
where
    U: UserStore,
{
    pub fn new(user_store: &'a U) -> Self {
        Self { user_store }
    }

    #[tracing::instrument(name = "DeactivateUserUseCase::execute", skip(self))]
    pub async fn execute(
        &self,
        user_id: UserId,
        modified_by_id: Option<UserId>,
    ) -> Result<User, DeactivateUserError> {
        let mut user = self.user_store.get_user(user_id).await?;
        if user.is_superuser {
            return Err(DeactivateUserError::SuperuserProtected);
        }

        user.is_active = false;
        if modified_by_id.is_some() {
            user.modified_by_id = modified_by_id;
        }

        Ok(self.user_store.update_user(user).await?)
    }

    /// Deactivates a superuser, refusing when it is the last active one.
    #[tracing::instrument(name = "DeactivateUserUseCase::execute_superuser", skip(self))]
    pub async fn execute_superuser(&self, user_id: UserId) -> Result<User, DeactivateUserError> {
        Ok(self.user_store.deactivate_superuser(user_id).await?)
    }
}
