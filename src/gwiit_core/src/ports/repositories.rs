use async_trait::async_trait;
use thiserror::Error;

use crate::{
    domain::{
        ids::UserId,
        login_identifiers::LoginField,
        relationship::{OnDelete, Reference},
        user::{NewUser, User},
    },
    query::UserQuery,
};

// UserStore port trait and errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserStoreError {
    #[error("An active user with this {0} already exists")]
    UniquenessViolation(LoginField),
    #[error("User not found")]
    UserNotFound,
    #[error("User is not a superuser")]
    NotASuperuser,
    #[error("Cannot deactivate the last remaining active superuser")]
    LastActiveSuperuser,
    #[error("User was modified concurrently")]
    ConcurrentModification,
    #[error("Still referenced by {0} user(s)")]
    ReferencedByUsers(u64),
    #[error("Unexpected error {0}")]
    UnexpectedError(String),
}

/// Persistence handle for one users database.
///
/// Login identifiers are unique among active users, ignoring case.
/// Implementations must check and write atomically so concurrent inserts
/// cannot both succeed.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Inserts the account and returns it with its assigned id.
    async fn add_user(&self, user: NewUser) -> Result<User, UserStoreError>;

    /// Replaces a stored account, re-checking uniqueness against other active users.
    ///
    /// `user.last_modified` must still equal the stored stamp, otherwise the
    /// write fails with `ConcurrentModification`. The store assigns the new stamp.
    async fn update_user(&self, user: User) -> Result<User, UserStoreError>;

    async fn get_user(&self, id: UserId) -> Result<User, UserStoreError>;

    /// Users matching every filter in `query`, ascending by id.
    async fn find_users(&self, query: &UserQuery) -> Result<Vec<User>, UserStoreError>;

    /// The active user whose email, username or badge equals `identifier`,
    /// ignoring case.
    async fn find_active_by_identifier(&self, identifier: &str) -> Result<User, UserStoreError>;

    /// Deactivates a superuser unless it is the last active one.
    async fn deactivate_superuser(&self, id: UserId) -> Result<User, UserStoreError>;

    /// Applies `policy` to every user referencing `reference` and returns how
    /// many users were affected. `Cascade` never deactivates a superuser.
    async fn release_reference(
        &self,
        reference: Reference,
        policy: OnDelete,
    ) -> Result<u64, UserStoreError>;
}
