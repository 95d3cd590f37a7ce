pub mod database;
pub mod email;
pub mod ids;
pub mod login_identifiers;
pub mod password;
pub mod relationship;
pub mod user;
