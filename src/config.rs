//! Service configuration, read from the environment

use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL
    pub database_url: String,
    pub port: u16,
    pub db_max_connections: u32,
    /// development | staging | production
    pub environment: String,
    /// HS256 secret for bearer tokens
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    /// How long a customer invitation stays usable
    pub registration_link_ttl_days: i64,
    pub nats_url: Option<String>,
    /// First admin account, created only when the users table is empty
    pub bootstrap_admin: Option<(String, String)>,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{0} must be set")]
    Missing(&'static str),
    #[error("{name} must be set in {environment} environment")]
    MissingSecret { name: &'static str, environment: String },
    #[error("{0} is not a valid number")]
    Invalid(&'static str),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds the config from any key lookup; `from_env` passes the process
    /// environment.
    pub fn from_lookup(get: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let var = |key: &str| get(key).filter(|v| !v.trim().is_empty());
        let environment = var("ENVIRONMENT").unwrap_or_else(|| "development".into());

        let jwt_secret = match var("JWT_SECRET") {
            Some(secret) => secret,
            None if environment == "development" => "dev-jwt-secret-not-for-production".into(),
            None => return Err(ConfigError::MissingSecret { name: "JWT_SECRET", environment }),
        };

        let bootstrap_admin = var("ADMIN_EMAIL").zip(var("ADMIN_PASSWORD"));

        Ok(Self {
            database_url: var("DATABASE_URL").ok_or(ConfigError::Missing("DATABASE_URL"))?,
            port: parse_or(var("PORT"), "PORT", 8083)?,
            db_max_connections: parse_or(var("DB_MAX_CONNECTIONS"), "DB_MAX_CONNECTIONS", 10)?,
            jwt_secret,
            jwt_expiry_hours: parse_or(var("JWT_EXPIRY_HOURS"), "JWT_EXPIRY_HOURS", 24)?,
            registration_link_ttl_days: parse_or(var("REGISTRATION_LINK_TTL_DAYS"), "REGISTRATION_LINK_TTL_DAYS", 7)?,
            nats_url: var("NATS_URL"),
            bootstrap_admin,
            environment,
        })
    }
}

fn parse_or<T: std::str::FromStr>(value: Option<String>, name: &'static str, default: T) -> Result<T, ConfigError> {
    match value {
        Some(v) => v.trim().parse().map_err(|_| ConfigError::Invalid(name)),
        None => Ok(default),
    }
}
