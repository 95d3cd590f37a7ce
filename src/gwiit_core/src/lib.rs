pub mod domain;
pub mod ports;
pub mod query;
pub mod strategies;

// Re-export commonly used types for convenience
pub use domain::{
    database::{AppLabel, DatabaseName, UnknownAppLabel},
    email::{Email, EmailError, normalize_email},
    ids::{OrganizationId, SiteId, UserId},
    login_identifiers::{LoginField, LoginIdentifiers},
    password::{
        HashedPassword, Password, PasswordError, PasswordViolation, SPECIAL_CHARACTERS,
        validate_password_complexity,
    },
    relationship::{OnDelete, Reference, RelationshipPolicies},
    user::{NewUser, User, UserChanges, UserError, clean_name},
};

pub use ports::{
    repositories::{UserStore, UserStoreError},
    services::{EmailClient, PasswordGenerator, PasswordHashError, PasswordHasher},
};

pub use query::{DEFAULT_RECENT_DAYS, UserFilter, UserQuery, joined_since};

pub use strategies::password_validator::{ComplexityValidator, PasswordValidator};
