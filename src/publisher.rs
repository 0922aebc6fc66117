//! Publishes domain events to NATS when a server is configured

use crate::domain::events::DomainEvent;

#[derive(Clone, Default)]
pub struct EventPublisher {
    client: Option<async_nats::Client>,
}

impl EventPublisher {
    pub fn disabled() -> Self {
        Self { client: None }
    }

    /// Connects to `url`; a failed connection leaves publishing disabled.
    pub async fn connect(url: Option<&str>) -> Self {
        let Some(url) = url else {
            return Self::disabled();
        };
        match async_nats::connect(url).await {
            Ok(client) => {
                tracing::info!("publishing domain events to {url}");
                Self { client: Some(client) }
            }
            Err(e) => {
                tracing::warn!("NATS unavailable ({e}); domain events disabled");
                Self::disabled()
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.client.is_some()
    }

    /// Fire and forget; failures are logged only.
    pub async fn publish(&self, event: DomainEvent) {
        let Some(client) = &self.client else {
            return;
        };
        let payload = match serde_json::to_vec(&event) {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!("failed to encode {}: {e}", event.subject());
                return;
            }
        };
        if let Err(e) = client.publish(event.subject().to_string(), payload.into()).await {
            tracing::warn!("failed to publish {}: {e}", event.subject());
        }
    }
}
