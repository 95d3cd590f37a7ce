pub mod helpers;
pub mod routes;
pub mod state;
pub mod tracing;
pub mod user_service;

pub use state::AppState;
pub use user_service::UserService;
