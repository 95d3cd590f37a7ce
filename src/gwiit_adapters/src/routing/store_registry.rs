use std::collections::HashMap;

use gwiit_core::{AppLabel, DatabaseName};

use super::database_router::{DatabaseRouter, RoutingError};

/// One store handle per named database. Handles are cheap clones sharing the
/// same underlying pool or map.
#[derive(Debug, Clone)]
pub struct StoreRegistry<S> {
    router: DatabaseRouter,
    stores: HashMap<DatabaseName, S>,
}

impl<S: Clone> StoreRegistry<S> {
    pub fn new(router: DatabaseRouter) -> Self {
        Self {
            router,
            stores: HashMap::new(),
        }
    }

    pub fn router(&self) -> &DatabaseRouter {
        &self.router
    }

    pub fn register(mut self, database: DatabaseName, store: S) -> Self {
        self.stores.insert(database, store);
        self
    }

    pub fn get(&self, database: &DatabaseName) -> Result<S, RoutingError> {
        self.stores
            .get(database)
            .cloned()
            .ok_or_else(|| RoutingError::UnknownDatabase(database.clone()))
    }

    /// The handle for the database `label` writes to.
    pub fn for_app(&self, label: AppLabel) -> Result<S, RoutingError> {
        self.get(&self.router.db_for_write(label))
    }
}
