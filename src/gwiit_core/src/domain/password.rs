use secrecy::{ExposeSecret, Secret};
use thiserror::Error;

use crate::strategies::password_validator::{ComplexityValidator, PasswordValidator};

use super::user::User;

/// Symbols accepted for the special-character rule.
pub const SPECIAL_CHARACTERS: &str = "@#$%^&*()-_+=";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Error)]
pub enum PasswordViolation {
    #[error("Password must contain at least one uppercase letter.")]
    MissingUppercase,
    #[error("Password must contain at least one lowercase letter.")]
    MissingLowercase,
    #[error("Password must contain at least one digit.")]
    MissingDigit,
    #[error(
        "Password must contain at least one special character ({}).",
        SPECIAL_CHARACTERS
    )]
    MissingSpecialChar,
}

/// Every rule a password failed, reported together.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{}", describe(.violations))]
pub struct PasswordError {
    violations: Vec<PasswordViolation>,
}

impl PasswordError {
    pub fn new(violations: Vec<PasswordViolation>) -> Self {
        Self { violations }
    }

    pub fn violations(&self) -> &[PasswordViolation] {
        &self.violations
    }

    pub fn contains(&self, violation: PasswordViolation) -> bool {
        self.violations.contains(&violation)
    }
}

fn describe(violations: &[PasswordViolation]) -> String {
    violations
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Checks each character class independently so callers can report all
/// missing classes at once.
pub fn validate_password_complexity(raw: &str) -> Result<(), PasswordError> {
    let checks: [(fn(char) -> bool, PasswordViolation); 4] = [
        (|c| c.is_ascii_uppercase(), PasswordViolation::MissingUppercase),
        (|c| c.is_ascii_lowercase(), PasswordViolation::MissingLowercase),
        (|c| c.is_ascii_digit(), PasswordViolation::MissingDigit),
        (
            |c| SPECIAL_CHARACTERS.contains(c),
            PasswordViolation::MissingSpecialChar,
        ),
    ];

    let violations: Vec<_> = checks
        .into_iter()
        .filter(|(class, _)| !raw.chars().any(class))
        .map(|(_, violation)| violation)
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(PasswordError::new(violations))
    }
}

/// A plaintext password that passed validation. Only ever held long enough to
/// be hashed.
#[derive(Debug, Clone)]
pub struct Password(Secret<String>);

impl Password {
    pub fn parse(raw: Secret<String>) -> Result<Self, PasswordError> {
        Self::parse_with(raw, &ComplexityValidator, None)
    }

    pub fn parse_with<V>(
        raw: Secret<String>,
        validator: &V,
        user: Option<&User>,
    ) -> Result<Self, PasswordError>
    where
        V: PasswordValidator + ?Sized,
    {
        validator.validate(raw.expose_secret(), user)?;
        Ok(Self(raw))
    }
}

impl TryFrom<Secret<String>> for Password {
    type Error = PasswordError;

    fn try_from(value: Secret<String>) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl AsRef<Secret<String>> for Password {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}

/// One-way digest of a password in PHC string format.
#[derive(Debug, Clone)]
pub struct HashedPassword(Secret<String>);

impl HashedPassword {
    pub fn new(digest: Secret<String>) -> Self {
        Self(digest)
    }
}

impl AsRef<Secret<String>> for HashedPassword {
    fn as_ref(&self) -> &Secret<String> {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn secret(raw: &str) -> Secret<String> {
        Secret::from(raw.to_string())
    }

    #[test]
    fn strong_password_passes() {
        assert!(validate_password_complexity("Strong#Pass1").is_ok());
        assert!(Password::parse(secret("Strong#Pass1")).is_ok());
    }

    #[test]
    fn weak_password_reports_every_missing_class() {
        let err = validate_password_complexity("weakpassword").unwrap_err();
        assert_eq!(
            err.violations(),
            &[
                PasswordViolation::MissingUppercase,
                PasswordViolation::MissingDigit,
                PasswordViolation::MissingSpecialChar,
            ]
        );
        assert!(!err.contains(PasswordViolation::MissingLowercase));
    }

    #[test]
    fn blank_password_fails_all_rules() {
        let err = validate_password_complexity("").unwrap_err();
        assert_eq!(err.violations().len(), 4);
    }

    #[test]
    fn each_class_is_checked_independently() {
        let cases = [
            ("strong#pass1", PasswordViolation::MissingUppercase),
            ("STRONG#PASS1", PasswordViolation::MissingLowercase),
            ("Strong#Pass", PasswordViolation::MissingDigit),
            ("StrongPass1", PasswordViolation::MissingSpecialChar),
        ];

        for (raw, expected) in cases {
            let err = validate_password_complexity(raw).unwrap_err();
            assert_eq!(err.violations(), &[expected], "{raw}");
        }
    }

    #[test]
    fn punctuation_outside_the_set_is_not_special() {
        let err = validate_password_complexity("Strong!Pass1").unwrap_err();
        assert_eq!(err.violations(), &[PasswordViolation::MissingSpecialChar]);
    }

    #[test]
    fn every_listed_symbol_counts() {
        for symbol in SPECIAL_CHARACTERS.chars() {
            let raw = format!("Abc1{symbol}");
            assert!(validate_password_complexity(&raw).is_ok(), "{raw}");
        }
    }

    #[test]
    fn error_message_lists_each_violation() {
        let message = validate_password_complexity("abc").unwrap_err().to_string();
        assert!(message.contains("uppercase"));
        assert!(message.contains("digit"));
        assert!(message.contains("special character"));
    }
}
