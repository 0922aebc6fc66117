//! Customer invitation links

use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::Serialize;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

const TOKEN_LEN: usize = 32;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct RegistrationLink {
    pub id: Uuid,
    pub token: String,
    pub email: Option<String>,
    pub seller_id: Option<Uuid>,
    pub created_by: Option<Uuid>,
    pub expires_at: DateTime<Utc>,
    pub used_at: Option<DateTime<Utc>>,
    pub customer_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

impl RegistrationLink {
    pub fn is_usable(&self, now: DateTime<Utc>) -> bool {
        self.used_at.is_none() && self.expires_at > now
    }
}

pub fn generate_token() -> String {
    rand::thread_rng().sample_iter(&Alphanumeric).take(TOKEN_LEN).map(char::from).collect()
}

pub async fn create(
    pool: &PgPool,
    email: Option<&str>,
    seller_id: Option<Uuid>,
    created_by: Uuid,
    expires_at: DateTime<Utc>,
) -> Result<RegistrationLink, sqlx::Error> {
    sqlx::query_as::<_, RegistrationLink>(
        r#"
        INSERT INTO registration_links (id, token, email, seller_id, created_by, expires_at, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::now_v7())
    .bind(generate_token())
    .bind(email)
    .bind(seller_id)
    .bind(created_by)
    .bind(expires_at)
    .fetch_one(pool)
    .await
}

pub async fn list(pool: &PgPool) -> Result<Vec<RegistrationLink>, sqlx::Error> {
    sqlx::query_as::<_, RegistrationLink>("SELECT * FROM registration_links ORDER BY created_at DESC")
        .fetch_all(pool)
        .await
}

/// `FOR UPDATE` so two sign-ups cannot consume the same link.
pub async fn find_by_token<'e>(db: impl PgExecutor<'e>, token: &str) -> Result<Option<RegistrationLink>, sqlx::Error> {
    sqlx::query_as::<_, RegistrationLink>("SELECT * FROM registration_links WHERE token = $1 FOR UPDATE")
        .bind(token)
        .fetch_optional(db)
        .await
}

pub async fn mark_used<'e>(db: impl PgExecutor<'e>, id: Uuid, customer_id: Uuid) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE registration_links SET used_at = NOW(), customer_id = $2 WHERE id = $1")
        .bind(id)
        .bind(customer_id)
        .execute(db)
        .await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(expires_in: chrono::Duration, used: bool) -> RegistrationLink {
        let now = Utc::now();
        RegistrationLink {
            id: Uuid::now_v7(),
            token: generate_token(),
            email: None,
            seller_id: None,
            created_by: None,
            expires_at: now + expires_in,
            used_at: used.then_some(now),
            customer_id: None,
            created_at: now,
        }
    }

    #[test]
    fn test_token_shape() {
        let token = generate_token();
        assert_eq!(token.len(), TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_alphanumeric()));
        assert_ne!(token, generate_token());
    }

    #[test]
    fn test_usability() {
        let now = Utc::now();
        assert!(link(chrono::Duration::days(1), false).is_usable(now));
        assert!(!link(chrono::Duration::days(1), true).is_usable(now));
        assert!(!link(chrono::Duration::days(-1), false).is_usable(now));
    }
}
