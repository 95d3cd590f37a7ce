use crate::domain::{
    password::{PasswordError, SPECIAL_CHARACTERS, validate_password_complexity},
    user::User,
};

/// Trait for password rules applied when a password is set.
///
/// The account the password belongs to is passed when known, so validators
/// can compare against its attributes. New accounts pass `None`.
pub trait PasswordValidator: Send + Sync {
    fn validate(&self, password: &str, user: Option<&User>) -> Result<(), PasswordError>;

    /// Human-readable description of the rule.
    fn help_text(&self) -> String;
}

/// Requires an uppercase letter, a lowercase letter, a digit and a symbol.
#[derive(Debug, Clone, Copy, Default)]
pub struct ComplexityValidator;

impl PasswordValidator for ComplexityValidator {
    fn validate(&self, password: &str, _user: Option<&User>) -> Result<(), PasswordError> {
        validate_password_complexity(password)
    }

    fn help_text(&self) -> String {
        let symbols = SPECIAL_CHARACTERS
            .chars()
            .map(String::from)
            .collect::<Vec<_>>()
            .join(" ");
        format!(
            "Your password must contain at least one uppercase letter, one lowercase letter, \
             one digit, and one special character ({symbols})"
        )
    }
}
