//! Content pages (about, terms, shipping policy...)

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Page {
    pub id: Uuid,
    pub slug: String,
    pub title: String,
    pub content: String,
    pub published: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub async fn list(pool: &PgPool) -> Result<Vec<Page>, sqlx::Error> {
    sqlx::query_as::<_, Page>("SELECT * FROM pages ORDER BY title").fetch_all(pool).await
}

pub async fn find_published(pool: &PgPool, slug: &str) -> Result<Option<Page>, sqlx::Error> {
    sqlx::query_as::<_, Page>("SELECT * FROM pages WHERE slug = $1 AND published")
        .bind(slug)
        .fetch_optional(pool)
        .await
}

pub async fn create(pool: &PgPool, slug: &str, title: &str, content: &str, published: bool) -> Result<Page, sqlx::Error> {
    sqlx::query_as::<_, Page>(
        "INSERT INTO pages (id, slug, title, content, published, created_at, updated_at) VALUES ($1, $2, $3, $4, $5, NOW(), NOW()) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(slug)
    .bind(title)
    .bind(content)
    .bind(published)
    .fetch_one(pool)
    .await
}

pub async fn update(pool: &PgPool, id: Uuid, slug: &str, title: &str, content: &str, published: bool) -> Result<Option<Page>, sqlx::Error> {
    sqlx::query_as::<_, Page>(
        "UPDATE pages SET slug = $2, title = $3, content = $4, published = $5, updated_at = NOW() WHERE id = $1 RETURNING *",
    )
    .bind(id)
    .bind(slug)
    .bind(title)
    .bind(content)
    .bind(published)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM pages WHERE id = $1").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}
