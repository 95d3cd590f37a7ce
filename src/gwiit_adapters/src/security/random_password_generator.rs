use gwiit_core::{Password, PasswordError, PasswordGenerator, SPECIAL_CHARACTERS};
use rand::{Rng, seq::SliceRandom};
use secrecy::Secret;
use thiserror::Error;

/// Shortest temporary password the generator will produce.
pub const MIN_GENERATED_LENGTH: usize = 16;

const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const DIGITS: &[u8] = b"0123456789";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordGeneratorError {
    #[error("Generated passwords must be at least {MIN_GENERATED_LENGTH} characters, got {0}")]
    TooShort(usize),
}

/// Produces passwords that always satisfy the complexity rules: one character
/// from each class, the rest drawn from all of them, then shuffled.
#[derive(Debug, Clone)]
pub struct RandomPasswordGenerator {
    length: usize,
}

impl RandomPasswordGenerator {
    pub fn new(length: usize) -> Result<Self, PasswordGeneratorError> {
        if length < MIN_GENERATED_LENGTH {
            return Err(PasswordGeneratorError::TooShort(length));
        }
        Ok(Self { length })
    }

    pub fn length(&self) -> usize {
        self.length
    }

    fn generate_raw(&self) -> String {
        let mut rng = rand::rng();
        let special = SPECIAL_CHARACTERS.as_bytes();
        let classes: [&[u8]; 4] = [UPPERCASE, LOWERCASE, DIGITS, special];
        let alphabet: Vec<u8> = classes.concat();

        let mut chars: Vec<u8> = classes
            .iter()
            .map(|class| class[rng.random_range(0..class.len())])
            .collect();
        chars.extend(
            (classes.len()..self.length).map(|_| alphabet[rng.random_range(0..alphabet.len())]),
        );
        chars.shuffle(&mut rng);

        chars.into_iter().map(char::from).collect()
    }
}

impl Default for RandomPasswordGenerator {
    fn default() -> Self {
        Self {
            length: MIN_GENERATED_LENGTH,
        }
    }
}

impl PasswordGenerator for RandomPasswordGenerator {
    fn generate(&self) -> Result<Password, PasswordError> {
        Password::parse(Secret::from(self.generate_raw()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gwiit_core::validate_password_complexity;
    use quickcheck_macros::quickcheck;

    #[test]
    fn short_lengths_are_rejected() {
        assert_eq!(
            RandomPasswordGenerator::new(15).unwrap_err(),
            PasswordGeneratorError::TooShort(15)
        );
        assert!(RandomPasswordGenerator::new(16).is_ok());
    }

    #[test]
    fn default_uses_minimum_length() {
        assert_eq!(RandomPasswordGenerator::default().length(), MIN_GENERATED_LENGTH);
    }

    #[test]
    fn generated_passwords_differ() {
        let generator = RandomPasswordGenerator::default();
        assert_ne!(generator.generate_raw(), generator.generate_raw());
    }

    #[quickcheck]
    fn generated_password_always_passes_complexity(extra: u8) -> bool {
        let length = MIN_GENERATED_LENGTH + usize::from(extra % 48);
        let generator = RandomPasswordGenerator::new(length).unwrap();
        let raw = generator.generate_raw();

        raw.chars().count() == length && validate_password_complexity(&raw).is_ok()
    }
}
