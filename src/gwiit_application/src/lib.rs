pub mod use_cases;

pub use use_cases::{
    authenticate::{AuthenticateError, AuthenticateUseCase},
    create_user::{CREDENTIALS_EMAIL_SUBJECT, CreateUserError, CreateUserUseCase, NewUserRequest},
    deactivate_user::{DeactivateUserError, DeactivateUserUseCase},
    release_reference::ReleaseReferenceUseCase,
    resolve_users::AssociationResolver,
    update_user::{UpdateUserError, UpdateUserUseCase},
};
