use axum::{
    Json,
    extract::rejection::PathRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use gwiit_application::{
    AuthenticateError, CreateUserError, DeactivateUserError, UpdateUserError,
};
use gwiit_core::{PasswordHashError, UserError, UserStoreError};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("User not found")]
    UserNotFound,

    #[error("{0}")]
    Conflict(String),

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Unexpected error: {0}")]
    UnexpectedError(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status_code = match self {
            ApiError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            ApiError::UserNotFound => StatusCode::NOT_FOUND,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            ApiError::UnexpectedError(ref e) => {
                tracing::error!(error = %e, "Request failed");
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        (status_code, body).into_response()
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::InvalidInput(rejection.body_text())
    }
}

impl From<UserError> for ApiError {
    fn from(error: UserError) -> Self {
        ApiError::InvalidInput(error.to_string())
    }
}

impl From<PasswordHashError> for ApiError {
    fn from(error: PasswordHashError) -> Self {
        ApiError::UnexpectedError(error.to_string())
    }
}

impl From<UserStoreError> for ApiError {
    fn from(error: UserStoreError) -> Self {
        match error {
            UserStoreError::UserNotFound => ApiError::UserNotFound,
            UserStoreError::NotASuperuser => ApiError::InvalidInput(error.to_string()),
            UserStoreError::UniquenessViolation(_)
            | UserStoreError::LastActiveSuperuser
            | UserStoreError::ConcurrentModification
            | UserStoreError::ReferencedByUsers(_) => ApiError::Conflict(error.to_string()),
            UserStoreError::UnexpectedError(e) => ApiError::UnexpectedError(e),
        }
    }
}

impl From<CreateUserError> for ApiError {
    fn from(error: CreateUserError) -> Self {
        match error {
            CreateUserError::InvalidUser(e) => e.into(),
            CreateUserError::MissingSuperuserUsername => ApiError::InvalidInput(error.to_string()),
            CreateUserError::PasswordHashError(e) => e.into(),
            CreateUserError::UserStoreError(e) => e.into(),
        }
    }
}

impl From<UpdateUserError> for ApiError {
    fn from(error: UpdateUserError) -> Self {
        match error {
            UpdateUserError::InvalidUser(e) => e.into(),
            UpdateUserError::SuperuserProtected => ApiError::Conflict(error.to_string()),
            UpdateUserError::PasswordHashError(e) => e.into(),
            UpdateUserError::UserStoreError(e) => e.into(),
        }
    }
}

impl From<DeactivateUserError> for ApiError {
    fn from(error: DeactivateUserError) -> Self {
        match error {
            DeactivateUserError::SuperuserProtected => ApiError::Conflict(error.to_string()),
            DeactivateUserError::UserStoreError(e) => e.into(),
        }
    }
}

impl From<AuthenticateError> for ApiError {
    fn from(error: AuthenticateError) -> Self {
        match error {
            AuthenticateError::InvalidCredentials => ApiError::InvalidCredentials,
            AuthenticateError::PasswordHashError(e) => e.into(),
            AuthenticateError::UserStoreError(e) => e.into(),
        }
    }
}
