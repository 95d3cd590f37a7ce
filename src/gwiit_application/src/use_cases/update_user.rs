use gwiit_core::{
    ComplexityValidator, Password, PasswordHashError, PasswordHasher, User, UserChanges,
    UserError, UserId, UserStore, UserStoreError, clean_name,
};

#[derive(Debug, thiserror::Error)]
pub enum UpdateUserError {
    #[error(transparent)]
    InvalidUser(#[from] UserError),
    #[error("Superusers stay staff and can only be deactivated through the superuser flow")]
    SuperuserProtected,
    #[error(transparent)]
    PasswordHashError(#[from] PasswordHashError),
    #[error(transparent)]
    UserStoreError(#[from] UserStoreError),
}

/// Applies administrator edits to an existing account.
pub struct UpdateUserUseCase<'a, U, H>
where
    U: UserStore,
    H: PasswordHasher,
{
    user_store: &'a U,
    password_hasher: &'a H,
}

impl<'a, U, H> UpdateUserUseCase<'a, U, H>
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

    /// Execute the update user use case
    ///
    /// # Arguments
    /// * `user_id` - The account to modify
    /// * `changes` - Fields to overwrite; see [`UserChanges`]
    ///
    /// # Returns
    /// The stored user after the update. A write racing with another change
    /// to the same user fails with `ConcurrentModification`
    #[tracing::instrument(name = "UpdateUserUseCase::execute", skip(self, changes))]
    pub async fn execute(
        &self,
        user_id: UserId,
        changes: UserChanges,
    ) -> Result<User, UpdateUserError> {
        let mut user = self.user_store.get_user(user_id).await?;

        if user.is_superuser
            && ((user.is_active && changes.is_active == Some(false))
                || changes.is_staff == Some(false))
        {
            return Err(UpdateUserError::SuperuserProtected);
        }

        let identifiers = user.identifiers.with_changes(
            changes.email.as_deref(),
            changes.username.as_deref(),
            changes.badge_barcode.as_deref(),
            changes.badge_rfid.as_deref(),
        )?;

        if let Some(raw) = changes.password {
            let password = Password::parse_with(raw, &ComplexityValidator, Some(&user))
                .map_err(UserError::from)?;
            user.password_hash = self.password_hasher.hash(&password).await?;
        }

        user.identifiers = identifiers;
        if let Some(first_name) = changes.first_name {
            user.first_name = clean_name(Some(first_name));
        }
        if let Some(last_name) = changes.last_name {
            user.last_name = clean_name(Some(last_name));
        }
        if let Some(organization_id) = changes.organization_id {
            user.organization_id = Some(organization_id);
        }
        if let Some(site_id) = changes.site_id {
            user.site_id = Some(site_id);
        }
        if let Some(is_active) = changes.is_active {
            user.is_active = is_active;
        }
        if let Some(is_staff) = changes.is_staff {
            user.is_staff = is_staff;
        }
        if let Some(modified_by_id) = changes.modified_by_id {
            user.modified_by_id = Some(modified_by_id);
        }

        Ok(self.user_store.update_user(user).await?)
    }
}
