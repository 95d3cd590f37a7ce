//! Typed, composable user filters.
//!
//! A [`UserQuery`] is a conjunction of [`UserFilter`]s: every filter added
//! narrows the result, none widens it. Stores evaluate the filters natively
//! (SQL for Postgres, [`UserFilter::matches`] in memory) and return matches in
//! ascending id order.

use chrono::{DateTime, Duration, Utc};

use crate::domain::{
    email::Email,
    ids::{OrganizationId, SiteId, UserId},
    user::User,
};

/// Window used by the "recently joined" queries when none is given.
pub const DEFAULT_RECENT_DAYS: u32 = 30;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UserFilter {
    Active(bool),
    Staff(bool),
    Organization(OrganizationId),
    Site(SiteId),
    /// Joined at or after the given instant.
    JoinedSince(DateTime<Utc>),
    CreatedBy(UserId),
    ModifiedBy(UserId),
    Email(Email),
    Username(String),
    BadgeBarcode(String),
    BadgeRfid(String),
    /// Case-insensitive substring match.
    FirstNameContains(String),
    /// Case-insensitive substring match.
    LastNameContains(String),
}

impl UserFilter {
    pub fn matches(&self, user: &User) -> bool {
        match self {
            UserFilter::Active(active) => user.is_active == *active,
            UserFilter::Staff(staff) => user.is_staff == *staff,
            UserFilter::Organization(id) => user.organization_id == Some(*id),
            UserFilter::Site(id) => user.site_id == Some(*id),
            UserFilter::JoinedSince(since) => user.date_joined >= *since,
            UserFilter::CreatedBy(id) => user.created_by_id == Some(*id),
            UserFilter::ModifiedBy(id) => user.modified_by_id == Some(*id),
            UserFilter::Email(email) => user.identifiers.email() == Some(email),
            UserFilter::Username(name) => user.identifiers.username() == Some(name.as_str()),
            UserFilter::BadgeBarcode(code) => {
                user.identifiers.badge_barcode() == Some(code.as_str())
            }
            UserFilter::BadgeRfid(code) => user.identifiers.badge_rfid() == Some(code.as_str()),
            UserFilter::FirstNameContains(part) => contains_ignore_case(&user.first_name, part),
            UserFilter::LastNameContains(part) => contains_ignore_case(&user.last_name, part),
        }
    }
}

fn contains_ignore_case(field: &Option<String>, part: &str) -> bool {
    field
        .as_deref()
        .is_some_and(|value| value.to_lowercase().contains(&part.to_lowercase()))
}

/// Start of a "joined within `days`" window ending at `now`.
pub fn joined_since(days: u32, now: DateTime<Utc>) -> DateTime<Utc> {
    now - Duration::days(i64::from(days))
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserQuery {
    filters: Vec<UserFilter>,
}

impl UserQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn filter(mut self, filter: UserFilter) -> Self {
        self.filters.push(filter);
        self
    }

    pub fn filters(&self) -> &[UserFilter] {
        &self.filters
    }

    pub fn matches(&self, user: &User) -> bool {
        self.filters.iter().all(|filter| filter.matches(user))
    }

    pub fn active() -> Self {
        Self::new().filter(UserFilter::Active(true))
    }

    pub fn inactive() -> Self {
        Self::new().filter(UserFilter::Active(false))
    }

    pub fn staff() -> Self {
        Self::new().filter(UserFilter::Staff(true))
    }

    pub fn from_organization(organization_id: OrganizationId) -> Self {
        Self::new().filter(UserFilter::Organization(organization_id))
    }

    pub fn from_site(site_id: SiteId) -> Self {
        Self::new().filter(UserFilter::Site(site_id))
    }

    /// Active users that belong to both the organization and the site.
    pub fn organization_and_site(organization_id: OrganizationId, site_id: SiteId) -> Self {
        Self::active()
            .filter(UserFilter::Organization(organization_id))
            .filter(UserFilter::Site(site_id))
    }

    pub fn joined_within(days: u32, now: DateTime<Utc>) -> Self {
        Self::new().filter(UserFilter::JoinedSince(joined_since(days, now)))
    }

    pub fn created_by(user_id: UserId) -> Self {
        Self::new().filter(UserFilter::CreatedBy(user_id))
    }

    pub fn modified_by(user_id: UserId) -> Self {
        Self::new().filter(UserFilter::ModifiedBy(user_id))
    }

    pub fn by_full_name(first_name: &str, last_name: &str) -> Self {
        Self::new()
            .filter(UserFilter::FirstNameContains(first_name.to_owned()))
            .filter(UserFilter::LastNameContains(last_name.to_owned()))
    }
}
