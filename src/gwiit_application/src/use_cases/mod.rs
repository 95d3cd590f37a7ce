pub mod authenticate;
pub mod create_user;
pub mod deactivate_user;
pub mod release_reference;
pub mod resolve_users;
pub mod update_user;
