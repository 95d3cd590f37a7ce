pub mod argon2_password_hasher;
pub mod random_password_generator;

pub use argon2_password_hasher::Argon2PasswordHasher;
pub use random_password_generator::{
    MIN_GENERATED_LENGTH, PasswordGeneratorError, RandomPasswordGenerator,
};
