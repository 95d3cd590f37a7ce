use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Logical name of a tenant database, e.g. `users_db`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DatabaseName(String);

impl DatabaseName {
    pub const DEFAULT: &'static str = "default";

    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn default_database() -> Self {
        Self::new(Self::DEFAULT)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DatabaseName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Application areas whose data is routed to a dedicated database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AppLabel {
    Authentication,
    Authorization,
    Organizations,
    Sites,
    Users,
}

impl AppLabel {
    pub const ALL: [AppLabel; 5] = [
        AppLabel::Authentication,
        AppLabel::Authorization,
        AppLabel::Organizations,
        AppLabel::Sites,
        AppLabel::Users,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            AppLabel::Authentication => "authentication",
            AppLabel::Authorization => "authorization",
            AppLabel::Organizations => "organizations",
            AppLabel::Sites => "sites",
            AppLabel::Users => "users",
        }
    }

    /// Database used when no override is configured.
    pub fn default_database(self) -> DatabaseName {
        let name = match self {
            AppLabel::Authentication => "auth_db",
            AppLabel::Authorization => "authorization_db",
            AppLabel::Organizations => "organizations_db",
            AppLabel::Sites => "sites_db",
            AppLabel::Users => "users_db",
        };
        DatabaseName::new(name)
    }
}

impl fmt::Display for AppLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Unknown app label: {0}")]
pub struct UnknownAppLabel(pub String);

impl FromStr for AppLabel {
    type Err = UnknownAppLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AppLabel::ALL
            .into_iter()
            .find(|label| label.as_str() == s)
            .ok_or_else(|| UnknownAppLabel(s.to_owned()))
    }
}
