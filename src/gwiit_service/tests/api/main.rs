mod authenticate;
mod create_user;
mod deactivate_user;
mod helpers;
mod list_users;
mod release_reference;
mod update_user;
