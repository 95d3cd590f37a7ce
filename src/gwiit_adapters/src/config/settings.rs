use std::{collections::HashMap, time::Duration};

use config::{Config, ConfigError, Environment, File, Source};
use gwiit_core::{Email, EmailError, RelationshipPolicies};
use secrecy::Secret;
use serde::Deserialize;

use super::constants::{CONFIG_FILE, ENV_PREFIX, ENV_SEPARATOR, prod};
use crate::{
    routing::{DatabaseRouter, RoutingError},
    security::{MIN_GENERATED_LENGTH, PasswordGeneratorError, RandomPasswordGenerator},
};

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub application: ApplicationSettings,
    /// Connection settings keyed by database name.
    #[serde(default)]
    pub databases: HashMap<String, DatabaseSettings>,
    /// App label to database name, applied over the default routes.
    #[serde(default)]
    pub routing: HashMap<String, String>,
    #[serde(default)]
    pub relationships: RelationshipPolicies,
    #[serde(default)]
    pub password: PasswordSettings,
    pub email_client: Option<EmailClientSettings>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ApplicationSettings {
    pub address: String,
    #[serde(default)]
    pub allowed_origins: Vec<String>,
}

impl Default for ApplicationSettings {
    fn default() -> Self {
        Self {
            address: prod::APP_ADDRESS.to_string(),
            allowed_origins: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseSettings {
    pub url: Secret<String>,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

fn default_max_connections() -> u32 {
    5
}

#[derive(Debug, Clone, Deserialize)]
pub struct PasswordSettings {
    pub generated_length: usize,
}

impl Default for PasswordSettings {
    fn default() -> Self {
        Self {
            generated_length: MIN_GENERATED_LENGTH,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmailClientSettings {
    #[serde(default = "default_email_base_url")]
    pub base_url: String,
    #[serde(default = "default_email_sender")]
    pub sender: String,
    pub auth_token: Secret<String>,
    #[serde(default = "default_email_timeout")]
    pub timeout_in_millis: u64,
}

fn default_email_base_url() -> String {
    prod::email_client::BASE_URL.to_string()
}

fn default_email_sender() -> String {
    prod::email_client::SENDER.to_string()
}

fn default_email_timeout() -> u64 {
    prod::email_client::TIMEOUT.as_millis() as u64
}

impl EmailClientSettings {
    pub fn sender(&self) -> Result<Email, EmailError> {
        Email::parse(&self.sender)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_in_millis)
    }
}

impl Settings {
    /// Reads `config/base.json` (optional) and `GWIIT__*` environment
    /// variables, after loading a `.env` file if one exists.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_source(File::with_name(CONFIG_FILE).required(false))
    }

    /// Builds settings from `source` with environment overrides on top.
    pub fn from_source<S>(source: S) -> Result<Self, ConfigError>
    where
        S: Source + Send + Sync + 'static,
    {
        Config::builder()
            .add_source(source)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator(ENV_SEPARATOR)
                    .separator(ENV_SEPARATOR)
                    .try_parsing(true),
            )
            .build()?
            .try_deserialize()
    }

    pub fn router(&self) -> Result<DatabaseRouter, RoutingError> {
        DatabaseRouter::from_overrides(&self.routing)
    }

    pub fn password_generator(&self) -> Result<RandomPasswordGenerator, PasswordGeneratorError> {
        RandomPasswordGenerator::new(self.password.generated_length)
    }
}
