use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

use gwiit_core::{
    NewUser, OnDelete, Reference, User, UserFilter, UserId, UserQuery, UserStore, UserStoreError,
};

#[derive(Debug, Default)]
struct Users {
    by_id: HashMap<UserId, User>,
    last_id: i64,
}

impl Users {
    /// Checks `candidate` against every other active user.
    fn ensure_unique(&self, candidate: &User) -> Result<(), UserStoreError> {
        if !candidate.is_active {
            return Ok(());
        }

        self.by_id
            .values()
            .filter(|other| other.is_active && other.id != candidate.id)
            .find_map(|other| candidate.identifiers.conflicts_with(&other.identifiers))
            .map_or(Ok(()), |field| Err(UserStoreError::UniquenessViolation(field)))
    }
}

/// In-memory store. Every check-then-write runs under a single write lock.
#[derive(Debug, Default, Clone)]
pub struct HashMapUserStore {
    users: Arc<RwLock<Users>>,
}

impl HashMapUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn reference_filter(reference: Reference) -> UserFilter {
    match reference {
        Reference::Organization(id) => UserFilter::Organization(id),
        Reference::Site(id) => UserFilter::Site(id),
    }
}

/// A modification stamp strictly later than `previous`.
fn next_stamp(previous: DateTime<Utc>) -> DateTime<Utc> {
    Utc::now().max(previous + Duration::microseconds(1))
}

fn clear_reference(user: &mut User, reference: Reference) {
    match reference {
        Reference::Organization(_) => user.organization_id = None,
        Reference::Site(_) => user.site_id = None,
    }
}

#[async_trait::async_trait]
impl UserStore for HashMapUserStore {
    async fn add_user(&self, user: NewUser) -> Result<User, UserStoreError> {
        let mut users = self.users.write().await;

        let id = UserId::new(users.last_id + 1);
        let user = user.into_user(id, Utc::now());
        users.ensure_unique(&user)?;

        users.last_id = id.get();
        users.by_id.insert(id, user.clone());
        Ok(user)
    }

    async fn update_user(&self, mut user: User) -> Result<User, UserStoreError> {
        let mut users = self.users.write().await;
        let stored = users
            .by_id
            .get(&user.id)
            .ok_or(UserStoreError::UserNotFound)?;
        if stored.last_modified != user.last_modified {
            return Err(UserStoreError::ConcurrentModification);
        }
        users.ensure_unique(&user)?;

        user.last_modified = next_stamp(user.last_modified);
        users.by_id.insert(user.id, user.clone());
        Ok(user)
    }

    async fn get_user(&self, id: UserId) -> Result<User, UserStoreError> {
        let users = self.users.read().await;
        users
            .by_id
            .get(&id)
            .cloned()
            .ok_or(UserStoreError::UserNotFound)
    }

    async fn find_users(&self, query: &UserQuery) -> Result<Vec<User>, UserStoreError> {
        let users = self.users.read().await;
        let mut matches: Vec<User> = users
            .by_id
            .values()
            .filter(|user| query.matches(user))
            .cloned()
            .collect();
        matches.sort_by_key(|user| user.id);
        Ok(matches)
    }

    async fn find_active_by_identifier(&self, identifier: &str) -> Result<User, UserStoreError> {
        let users = self.users.read().await;
        users
            .by_id
            .values()
            .filter(|user| user.is_active && user.identifiers.matches(identifier))
            .min_by_key(|user| user.id)
            .cloned()
            .ok_or(UserStoreError::UserNotFound)
    }

    async fn deactivate_superuser(&self, id: UserId) -> Result<User, UserStoreError> {
        let mut users = self.users.write().await;

        let active_superusers = users
            .by_id
            .values()
            .filter(|user| user.is_superuser && user.is_active)
            .count();

        let user = users
            .by_id
            .get_mut(&id)
            .ok_or(UserStoreError::UserNotFound)?;
        if !user.is_superuser {
            return Err(UserStoreError::NotASuperuser);
        }
        if user.is_active && active_superusers <= 1 {
            return Err(UserStoreError::LastActiveSuperuser);
        }

        user.is_active = false;
        user.last_modified = next_stamp(user.last_modified);
        Ok(user.clone())
    }

    async fn release_reference(
        &self,
        reference: Reference,
        policy: OnDelete,
    ) -> Result<u64, UserStoreError> {
        let mut users = self.users.write().await;
        let filter = reference_filter(reference);

        let referencing: Vec<UserId> = users
            .by_id
            .values()
            .filter(|user| filter.matches(user))
            .map(|user| user.id)
            .collect();
        let affected = referencing.len() as u64;

        if policy == OnDelete::Restrict {
            return match affected {
                0 => Ok(0),
                n => Err(UserStoreError::ReferencedByUsers(n)),
            };
        }

        for id in referencing {
            if let Some(user) = users.by_id.get_mut(&id) {
                clear_reference(user, reference);
                // Superusers only lose the reference.
                if policy == OnDelete::Cascade && !user.is_superuser {
                    user.is_active = false;
                }
                user.last_modified = next_stamp(user.last_modified);
            }
        }
        Ok(affected)
    }
}
