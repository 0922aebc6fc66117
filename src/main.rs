//! Wholesale Storefront - B2B storefront and back-office API

use anyhow::Result;
use sqlx::{postgres::PgPoolOptions, PgPool};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use wholesale_storefront::{
    api,
    auth::password::hash_password,
    db,
    domain::value_objects::Email,
    publisher::EventPublisher,
    AppState, Config,
};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;
    let db = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!("./migrations").run(&db).await?;

    bootstrap_admin(&db, &config).await?;

    let events = EventPublisher::connect(config.nats_url.as_deref()).await;
    let state = AppState::new(db, &config, events);

    let addr = format!("0.0.0.0:{}", config.port);
    tracing::info!(
        environment = %config.environment,
        events = state.events.is_enabled(),
        "wholesale storefront listening on {}",
        addr
    );
    let app = api::router(state);
    axum::serve(tokio::net::TcpListener::bind(&addr).await?, app).await?;
    Ok(())
}

/// Creates the first back-office account on an empty database.
async fn bootstrap_admin(db: &PgPool, config: &Config) -> Result<()> {
    let Some((email, password)) = &config.bootstrap_admin else {
        return Ok(());
    };
    if db::users::count(db).await? > 0 {
        return Ok(());
    }
    let email = Email::new(email)?;
    let hash = hash_password(password).map_err(|e| anyhow::anyhow!("hashing admin password: {e}"))?;
    let user = db::users::create(db, "Administrator", email.as_str(), &hash).await?;
    tracing::info!(user_id = %user.id, email = %user.email, "bootstrap admin created");
    Ok(())
}
