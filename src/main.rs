use color_eyre::eyre::{Result, eyre};
use gwiit::{
    AppLabel, AppState, Argon2PasswordHasher, EmailClient, MockEmailClient, PostgresUserStore,
    RandomPasswordGenerator, UserService, adapters::config::Settings, configure_postgresql,
    configure_postmark_email_client,
};
use tracing_error::ErrorLayer;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;
    init_tracing()?;

    let settings = Settings::load()?;

    let registry = configure_postgresql(&settings).await?;
    let user_store = registry.for_app(AppLabel::Users)?;
    let password_generator = settings.password_generator()?;

    match &settings.email_client {
        Some(email_settings) => {
            let email_client = configure_postmark_email_client(email_settings)?;
            serve(&settings, user_store, password_generator, email_client).await
        }
        None => {
            tracing::warn!("No email client configured, credential emails will not be delivered");
            serve(&settings, user_store, password_generator, MockEmailClient::new()).await
        }
    }
}

async fn serve<E>(
    settings: &Settings,
    user_store: PostgresUserStore,
    password_generator: RandomPasswordGenerator,
    email_client: E,
) -> Result<()>
where
    E: EmailClient + 'static,
{
    let state = AppState::new(
        user_store,
        Argon2PasswordHasher::new(),
        password_generator,
        email_client,
        settings.relationships,
    );

    let listener = tokio::net::TcpListener::bind(&settings.application.address)
        .await
        .map_err(|e| eyre!("Failed to bind {}: {e}", settings.application.address))?;

    UserService::new(state)
        .run_standalone(listener, &settings.application.allowed_origins)
        .await?;

    Ok(())
}

pub fn init_tracing() -> Result<()> {
    let fmt_layer = fmt::layer().compact();

    let filter_layer = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new("info"))?;

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .with(ErrorLayer::default())
        .init();

    Ok(())
}
