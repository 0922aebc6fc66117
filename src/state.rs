//! Shared application state

use sqlx::PgPool;
use std::sync::Arc;

use crate::auth::TokenKeys;
use crate::config::Config;
use crate::publisher::EventPublisher;

#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub tokens: Arc<TokenKeys>,
    pub events: EventPublisher,
    pub registration_link_ttl: chrono::Duration,
}

impl AppState {
    pub fn new(db: PgPool, config: &Config, events: EventPublisher) -> Self {
        Self {
            db,
            tokens: Arc::new(TokenKeys::new(&config.jwt_secret, config.jwt_expiry_hours)),
            events,
            registration_link_ttl: chrono::Duration::days(config.registration_link_ttl_days),
        }
    }
}
