//! # GWIIT - Tenant-scoped identity model
//!
//! Facade crate re-exporting the public APIs of the identity components.
//!
//! ## Structure
//!
//! - **Core domain types**: `Email`, `Password`, `LoginIdentifiers`, `User`, etc.
//! - **Ports**: `UserStore`, `PasswordHasher`, `PasswordGenerator`, `EmailClient`
//! - **Use cases**: `CreateUserUseCase`, `AssociationResolver`, etc.
//! - **Adapters**: `PostgresUserStore`, `HashMapUserStore`, `DatabaseRouter`, etc.
//! - **Service**: `UserService`, the axum HTTP surface

// ============================================================================
// Core Domain Types
// ============================================================================

/// Core domain types and value objects
pub mod core {
    pub use gwiit_core::*;
}

pub use gwiit_core::{
    AppLabel, DatabaseName, Email, EmailError, LoginField, LoginIdentifiers, NewUser, OnDelete,
    OrganizationId, Password, PasswordError, PasswordViolation, Reference, RelationshipPolicies,
    SiteId, User, UserChanges, UserError, UserFilter, UserId, UserQuery, normalize_email,
    validate_password_complexity,
};

// ============================================================================
// Ports
// ============================================================================

pub use gwiit_core::{
    EmailClient, PasswordGenerator, PasswordHasher, PasswordValidator, UserStore, UserStoreError,
};

// ============================================================================
// Use Cases (Application Layer)
// ============================================================================

/// Application use cases
pub mod use_cases {
    pub use gwiit_application::*;
}

pub use gwiit_application::{
    AssociationResolver, AuthenticateUseCase, CreateUserUseCase, DeactivateUserUseCase,
    NewUserRequest, ReleaseReferenceUseCase, UpdateUserUseCase,
};

// ============================================================================
// Adapters (Infrastructure)
// ============================================================================

/// Infrastructure adapters
pub mod adapters {
    /// Persistence implementations
    pub mod persistence {
        pub use gwiit_adapters::persistence::*;
    }

    /// Email client implementations
    pub mod email {
        pub use gwiit_adapters::email::*;
    }

    /// Database routing
    pub mod routing {
        pub use gwiit_adapters::routing::*;
    }

    /// Configuration
    pub mod config {
        pub use gwiit_adapters::config::*;
    }
}

pub use gwiit_adapters::{
    Argon2PasswordHasher, DatabaseRouter, HashMapUserStore, MockEmailClient, PostgresUserStore,
    PostmarkEmailClient, RandomPasswordGenerator, StoreRegistry,
};

// ============================================================================
// User Service (Main Entry Point)
// ============================================================================

pub use gwiit_service::{
    AppState, UserService,
    helpers::{configure_postgresql, configure_postmark_email_client},
};

// ============================================================================
// Re-export common external dependencies
// ============================================================================

/// Re-export async-trait for implementing the port traits
pub use async_trait::async_trait;

/// Re-export secrecy for working with secrets
pub use secrecy::{ExposeSecret, Secret};
