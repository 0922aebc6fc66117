//! Category queries

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub async fn list(pool: &PgPool) -> Result<Vec<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>("SELECT * FROM categories WHERE deleted_at IS NULL ORDER BY name")
        .fetch_all(pool)
        .await
}

pub async fn create(pool: &PgPool, name: &str, slug: &str, description: Option<&str>) -> Result<Category, sqlx::Error> {
    sqlx::query_as::<_, Category>(
        "INSERT INTO categories (id, name, slug, description, created_at) VALUES ($1, $2, $3, $4, NOW()) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(name)
    .bind(slug)
    .bind(description)
    .fetch_one(pool)
    .await
}

pub async fn update(pool: &PgPool, id: Uuid, name: &str, slug: &str, description: Option<&str>) -> Result<Option<Category>, sqlx::Error> {
    sqlx::query_as::<_, Category>(
        "UPDATE categories SET name = $2, slug = $3, description = $4 WHERE id = $1 AND deleted_at IS NULL RETURNING *",
    )
    .bind(id)
    .bind(name)
    .bind(slug)
    .bind(description)
    .fetch_optional(pool)
    .await
}

pub async fn soft_delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE categories SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
