use std::fmt;

use serde::{Deserialize, Serialize};

use super::{
    email::{Email, normalize_email},
    user::UserError,
};

/// The fields a user can log in with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginField {
    Email,
    Username,
    BadgeBarcode,
    BadgeRfid,
}

impl LoginField {
    pub const ALL: [LoginField; 4] = [
        LoginField::Email,
        LoginField::Username,
        LoginField::BadgeBarcode,
        LoginField::BadgeRfid,
    ];
}

impl fmt::Display for LoginField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            LoginField::Email => "email",
            LoginField::Username => "username",
            LoginField::BadgeBarcode => "badge barcode",
            LoginField::BadgeRfid => "badge RFID",
        };
        f.write_str(name)
    }
}

/// The set of login identifiers on an account. Never empty once constructed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoginIdentifiers {
    email: Option<Email>,
    username: Option<String>,
    badge_barcode: Option<String>,
    badge_rfid: Option<String>,
}

impl LoginIdentifiers {
    /// Validates raw identifiers for a new account.
    ///
    /// Username and badges are trimmed and blank values dropped. At least one
    /// identifier must be present before the email is normalized, so a
    /// malformed email is still reported as a format error rather than a
    /// missing identifier.
    pub fn parse(
        email: Option<&str>,
        username: Option<&str>,
        badge_barcode: Option<&str>,
        badge_rfid: Option<&str>,
    ) -> Result<Self, UserError> {
        let username = clean(username);
        let badge_barcode = clean(badge_barcode);
        let badge_rfid = clean(badge_rfid);

        let email_present = email.is_some_and(|raw| !raw.is_empty());
        if !email_present && username.is_none() && badge_barcode.is_none() && badge_rfid.is_none()
        {
            return Err(UserError::MissingLoginIdentifier);
        }

        Ok(Self {
            email: normalize_email(email)?,
            username,
            badge_barcode,
            badge_rfid,
        })
    }

    /// Rebuilds identifiers loaded from storage.
    pub fn from_parts(
        email: Option<Email>,
        username: Option<String>,
        badge_barcode: Option<String>,
        badge_rfid: Option<String>,
    ) -> Result<Self, UserError> {
        let identifiers = Self {
            email,
            username: username.filter(|value| !value.is_empty()),
            badge_barcode: badge_barcode.filter(|value| !value.is_empty()),
            badge_rfid: badge_rfid.filter(|value| !value.is_empty()),
        };

        if identifiers.iter().next().is_none() {
            return Err(UserError::MissingLoginIdentifier);
        }
        Ok(identifiers)
    }

    /// Applies an update. `None` keeps a field, an empty string clears it.
    pub fn with_changes(
        &self,
        email: Option<&str>,
        username: Option<&str>,
        badge_barcode: Option<&str>,
        badge_rfid: Option<&str>,
    ) -> Result<Self, UserError> {
        let email = match email {
            Some(raw) => normalize_email(Some(raw))?,
            None => self.email.clone(),
        };

        Self::from_parts(
            email,
            username.map_or_else(|| self.username.clone(), |raw| clean(Some(raw))),
            badge_barcode.map_or_else(|| self.badge_barcode.clone(), |raw| clean(Some(raw))),
            badge_rfid.map_or_else(|| self.badge_rfid.clone(), |raw| clean(Some(raw))),
        )
    }

    pub fn email(&self) -> Option<&Email> {
        self.email.as_ref()
    }

    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    pub fn badge_barcode(&self) -> Option<&str> {
        self.badge_barcode.as_deref()
    }

    pub fn badge_rfid(&self) -> Option<&str> {
        self.badge_rfid.as_deref()
    }

    pub fn get(&self, field: LoginField) -> Option<&str> {
        match field {
            LoginField::Email => self.email.as_ref().map(Email::as_str),
            LoginField::Username => self.username(),
            LoginField::BadgeBarcode => self.badge_barcode(),
            LoginField::BadgeRfid => self.badge_rfid(),
        }
    }

    /// Present identifiers in `LoginField::ALL` order.
    pub fn iter(&self) -> impl Iterator<Item = (LoginField, &str)> {
        LoginField::ALL
            .into_iter()
            .filter_map(|field| self.get(field).map(|value| (field, value)))
    }

    /// First field whose value is shared with `other`, ignoring case.
    pub fn conflicts_with(&self, other: &LoginIdentifiers) -> Option<LoginField> {
        self.iter()
            .find(|(field, value)| {
                other
                    .get(*field)
                    .is_some_and(|theirs| same_identifier(value, theirs))
            })
            .map(|(field, _)| field)
    }

    /// Case-insensitive match of `identifier` against any present field.
    pub fn matches(&self, identifier: &str) -> bool {
        self.iter()
            .any(|(_, value)| same_identifier(value, identifier))
    }
}

// Mirrors `lower(col) = lower($1)` in the Postgres store.
fn same_identifier(a: &str, b: &str) -> bool {
    a.to_lowercase() == b.to_lowercase()
}

fn clean(raw: Option<&str>) -> Option<String> {
    raw.map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned)
}
