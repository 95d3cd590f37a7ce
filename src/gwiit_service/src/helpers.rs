use gwiit_adapters::{
    PostgresUserStore, PostmarkEmailClient, RoutingError, StoreRegistry,
    config::{EmailClientSettings, Settings},
    email::InvalidBaseUrl,
};
use gwiit_core::{AppLabel, DatabaseName, EmailError};
use secrecy::ExposeSecret;
use sqlx::{PgPool, migrate::MigrateError, postgres::PgPoolOptions};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SetupError {
    #[error(transparent)]
    Routing(#[from] RoutingError),
    #[error("Failed to connect to database: {0}")]
    Database(#[from] sqlx::Error),
    #[error("Failed to run migrations: {0}")]
    Migration(#[from] MigrateError),
    #[error("Invalid email client sender: {0}")]
    Sender(#[from] EmailError),
    #[error(transparent)]
    EmailEndpoint(#[from] InvalidBaseUrl),
    #[error("Failed to build HTTP client: {0}")]
    HttpClient(#[from] reqwest::Error),
}

/// Connect to every configured database and register a user store for each
///
/// The users schema is only migrated on databases the router assigns to the
/// `users` app label.
///
/// # Returns
/// A registry resolving store handles by database name or app label
pub async fn configure_postgresql(
    settings: &Settings,
) -> Result<StoreRegistry<PostgresUserStore>, SetupError> {
    let router = settings.router()?;
    let mut registry = StoreRegistry::new(router.clone());

    for (name, database) in &settings.databases {
        let name = DatabaseName::new(name.as_str());
        let pool = get_postgres_pool(database.url.expose_secret(), database.max_connections).await?;

        if router.allow_migrate(&name, AppLabel::Users) {
            tracing::info!(database = %name, "Running users migrations");
            sqlx::migrate!("../../migrations").run(&pool).await?;
        }

        registry = registry.register(name, PostgresUserStore::new(pool));
    }

    Ok(registry)
}

/// Create a PostgreSQL connection pool
pub async fn get_postgres_pool(url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(url)
        .await
}

pub fn configure_postmark_email_client(
    settings: &EmailClientSettings,
) -> Result<PostmarkEmailClient, SetupError> {
    let http_client = reqwest::Client::builder()
        .timeout(settings.timeout())
        .build()?;

    Ok(PostmarkEmailClient::new(
        &settings.base_url,
        settings.sender()?,
        settings.auth_token.clone(),
        http_client,
    )?)
}
