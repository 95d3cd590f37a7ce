use std::{fmt, sync::LazyLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// Requires at least one dot in the domain part.
static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[a-zA-Z0-9_.+-]+@[a-zA-Z0-9-]+\.[a-zA-Z0-9.-]+$")
        .expect("email pattern must compile")
});

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmailError {
    /// Carries the lowercased, trimmed value that failed to match.
    #[error("Invalid email format: {0}")]
    InvalidFormat(String),
}

/// A lowercased, trimmed email address that matches the accepted pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct Email(String);

impl Email {
    pub fn parse(raw: &str) -> Result<Self, EmailError> {
        let normalized = raw.to_lowercase().trim().to_owned();

        if !EMAIL_PATTERN.is_match(&normalized) {
            return Err(EmailError::InvalidFormat(normalized));
        }

        Ok(Self(normalized))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Normalizes an optional email.
///
/// Absent or empty input passes through as `None`. Anything else is lowercased,
/// trimmed and validated; a present but malformed address is an error.
pub fn normalize_email(raw: Option<&str>) -> Result<Option<Email>, EmailError> {
    match raw {
        None => Ok(None),
        Some("") => Ok(None),
        Some(raw) => Email::parse(raw).map(Some),
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl<'de> Deserialize<'de> for Email {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        Self::parse(&raw).map_err(serde::de::Error::custom)
    }
}
