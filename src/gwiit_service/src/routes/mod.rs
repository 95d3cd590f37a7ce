pub mod error;
pub mod id_path;
pub mod users;

pub use error::{ApiError, ErrorResponse};
pub use id_path::IdPath;
pub use users::{
    authenticate, create_user, deactivate_superuser, deactivate_user, get_user, list_users,
    release_organization, release_site, update_user,
};
