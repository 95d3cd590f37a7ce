pub mod config;
pub mod email;
pub mod persistence;
pub mod routing;
pub mod security;

pub use email::{MockEmailClient, PostmarkEmailClient};
pub use persistence::{HashMapUserStore, PostgresUserStore};
pub use routing::{DatabaseRouter, RoutingError, StoreRegistry};
pub use security::{Argon2PasswordHasher, RandomPasswordGenerator};
