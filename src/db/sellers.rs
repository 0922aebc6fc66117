//! Seller queries

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Seller {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub async fn list(pool: &PgPool) -> Result<Vec<Seller>, sqlx::Error> {
    sqlx::query_as::<_, Seller>("SELECT * FROM sellers WHERE deleted_at IS NULL ORDER BY name")
        .fetch_all(pool)
        .await
}

pub async fn exists(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let (found,): (bool,) = sqlx::query_as("SELECT EXISTS (SELECT 1 FROM sellers WHERE id = $1 AND deleted_at IS NULL)")
        .bind(id)
        .fetch_one(pool)
        .await?;
    Ok(found)
}

pub async fn create(pool: &PgPool, name: &str, email: &str, phone: Option<&str>) -> Result<Seller, sqlx::Error> {
    sqlx::query_as::<_, Seller>(
        "INSERT INTO sellers (id, name, email, phone, active, created_at, updated_at) VALUES ($1, $2, $3, $4, TRUE, NOW(), NOW()) RETURNING *",
    )
    .bind(Uuid::now_v7())
    .bind(name)
    .bind(email)
    .bind(phone)
    .fetch_one(pool)
    .await
}

pub async fn update(pool: &PgPool, id: Uuid, name: &str, email: &str, phone: Option<&str>, active: bool) -> Result<Option<Seller>, sqlx::Error> {
    sqlx::query_as::<_, Seller>(
        "UPDATE sellers SET name = $2, email = $3, phone = $4, active = $5, updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL RETURNING *",
    )
    .bind(id)
    .bind(name)
    .bind(email)
    .bind(phone)
    .bind(active)
    .fetch_optional(pool)
    .await
}

pub async fn soft_delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE sellers SET deleted_at = NOW(), active = FALSE WHERE id = $1 AND deleted_at IS NULL")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
