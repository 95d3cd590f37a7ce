pub mod database_router;
pub mod store_registry;

pub use database_router::{DatabaseRouter, RoutingError};
pub use store_registry::StoreRegistry;
