//! Maps application areas to named databases.
//!
//! Reads and writes for an app label always land on the same database. Any
//! app label without an explicit route falls back to its default database.

use std::collections::{BTreeSet, HashMap};

use gwiit_core::{AppLabel, DatabaseName, UnknownAppLabel};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RoutingError {
    #[error(transparent)]
    UnknownAppLabel(#[from] UnknownAppLabel),
    #[error("No store registered for database {0}")]
    UnknownDatabase(DatabaseName),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatabaseRouter {
    routes: HashMap<AppLabel, DatabaseName>,
}

impl Default for DatabaseRouter {
    fn default() -> Self {
        let routes = AppLabel::ALL
            .into_iter()
            .map(|label| (label, label.default_database()))
            .collect();
        Self { routes }
    }
}

impl DatabaseRouter {
    /// Default routes with `overrides` (app label name to database name)
    /// applied on top.
    pub fn from_overrides(overrides: &HashMap<String, String>) -> Result<Self, RoutingError> {
        let mut router = Self::default();
        for (label, database) in overrides {
            let label: AppLabel = label.parse()?;
            router.routes.insert(label, DatabaseName::new(database.as_str()));
        }
        Ok(router)
    }

    fn route(&self, label: AppLabel) -> DatabaseName {
        self.routes
            .get(&label)
            .cloned()
            .unwrap_or_else(DatabaseName::default_database)
    }

    pub fn db_for_read(&self, label: AppLabel) -> DatabaseName {
        self.route(label)
    }

    pub fn db_for_write(&self, label: AppLabel) -> DatabaseName {
        self.route(label)
    }

    /// Every database some app label routes to, plus `default`.
    pub fn databases(&self) -> BTreeSet<DatabaseName> {
        self.routes
            .values()
            .cloned()
            .chain([DatabaseName::default_database()])
            .collect()
    }

    /// Relations are only allowed between records living in known databases.
    pub fn allow_relation(&self, left: &DatabaseName, right: &DatabaseName) -> bool {
        let known = self.databases();
        known.contains(left) && known.contains(right)
    }

    /// An app's schema is only migrated on the database it routes to.
    pub fn allow_migrate(&self, database: &DatabaseName, label: AppLabel) -> bool {
        self.route(label) == *database
    }
}
