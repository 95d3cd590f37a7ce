use chrono::{DateTime, Utc};
use secrecy::Secret;
use thiserror::Error;

use super::{
    email::EmailError,
    ids::{OrganizationId, SiteId, UserId},
    login_identifiers::LoginIdentifiers,
    password::{HashedPassword, PasswordError},
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum UserError {
    #[error("At least one login identifier (email, username, badge barcode or badge RFID) must be set")]
    MissingLoginIdentifier,
    #[error(transparent)]
    InvalidEmail(#[from] EmailError),
    #[error(transparent)]
    InvalidPassword(#[from] PasswordError),
}

/// A validated account that has not been persisted yet.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub identifiers: LoginIdentifiers,
    pub password_hash: HashedPassword,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub organization_id: Option<OrganizationId>,
    pub site_id: Option<SiteId>,
    pub created_by_id: Option<UserId>,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
}

impl NewUser {
    /// Materializes the record with a store-assigned id.
    pub fn into_user(self, id: UserId, now: DateTime<Utc>) -> User {
        User {
            id,
            identifiers: self.identifiers,
            password_hash: self.password_hash,
            first_name: self.first_name,
            last_name: self.last_name,
            organization_id: self.organization_id,
            site_id: self.site_id,
            is_active: self.is_active,
            is_staff: self.is_staff,
            is_superuser: self.is_superuser,
            date_joined: now,
            date_created: now,
            last_modified: now,
            created_by_id: self.created_by_id,
            modified_by_id: None,
        }
    }
}

/// A persisted account.
#[derive(Debug, Clone)]
pub struct User {
    pub id: UserId,
    pub identifiers: LoginIdentifiers,
    pub password_hash: HashedPassword,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub organization_id: Option<OrganizationId>,
    pub site_id: Option<SiteId>,
    pub is_active: bool,
    pub is_staff: bool,
    pub is_superuser: bool,
    pub date_joined: DateTime<Utc>,
    pub date_created: DateTime<Utc>,
    pub last_modified: DateTime<Utc>,
    pub created_by_id: Option<UserId>,
    pub modified_by_id: Option<UserId>,
}

impl User {
    /// First and last name joined by a space, with missing parts dropped.
    pub fn full_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Requested modifications to an account.
///
/// `None` leaves a field untouched. For login identifiers and names an empty
/// string clears the field. Organization, site and modifier can only be set
/// here; clearing them happens when the parent is removed.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub email: Option<String>,
    pub username: Option<String>,
    pub badge_barcode: Option<String>,
    pub badge_rfid: Option<String>,
    pub password: Option<Secret<String>>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub organization_id: Option<OrganizationId>,
    pub site_id: Option<SiteId>,
    pub is_active: Option<bool>,
    pub is_staff: Option<bool>,
    pub modified_by_id: Option<UserId>,
}

/// Trims a name; blank becomes `None`.
pub fn clean_name(raw: Option<String>) -> Option<String> {
    raw.map(|name| name.trim().to_owned())
        .filter(|name| !name.is_empty())
}
