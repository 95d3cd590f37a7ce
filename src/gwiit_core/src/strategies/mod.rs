pub mod password_validator;
