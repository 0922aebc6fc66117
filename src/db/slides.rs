//! Hero slider

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct HeroSlide {
    pub id: Uuid,
    pub title: String,
    pub subtitle: Option<String>,
    pub image_url: String,
    pub link_url: Option<String>,
    pub position: i32,
    pub active: bool,
    pub impressions: i64,
    pub clicks: i64,
    pub created_at: DateTime<Utc>,
}

pub struct SlideInput<'a> {
    pub title: &'a str,
    pub subtitle: Option<&'a str>,
    pub image_url: &'a str,
    pub link_url: Option<&'a str>,
    pub position: i32,
    pub active: bool,
}

#[derive(Debug, Clone, Copy)]
pub enum Counter {
    Impression,
    Click,
}

pub async fn list(pool: &PgPool, active_only: bool) -> Result<Vec<HeroSlide>, sqlx::Error> {
    sqlx::query_as::<_, HeroSlide>("SELECT * FROM hero_slides WHERE (NOT $1 OR active) ORDER BY position, created_at")
        .bind(active_only)
        .fetch_all(pool)
        .await
}

pub async fn create(pool: &PgPool, input: &SlideInput<'_>) -> Result<HeroSlide, sqlx::Error> {
    sqlx::query_as::<_, HeroSlide>(
        r#"
        INSERT INTO hero_slides (id, title, subtitle, image_url, link_url, position, active, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::now_v7())
    .bind(input.title)
    .bind(input.subtitle)
    .bind(input.image_url)
    .bind(input.link_url)
    .bind(input.position)
    .bind(input.active)
    .fetch_one(pool)
    .await
}

pub async fn update(pool: &PgPool, id: Uuid, input: &SlideInput<'_>) -> Result<Option<HeroSlide>, sqlx::Error> {
    sqlx::query_as::<_, HeroSlide>(
        r#"
        UPDATE hero_slides
        SET title = $2, subtitle = $3, image_url = $4, link_url = $5, position = $6, active = $7
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(input.title)
    .bind(input.subtitle)
    .bind(input.image_url)
    .bind(input.link_url)
    .bind(input.position)
    .bind(input.active)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM hero_slides WHERE id = $1").bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}

/// Bumps a counter on an active slide; `false` if there is no such slide.
pub async fn record(pool: &PgPool, id: Uuid, counter: Counter) -> Result<bool, sqlx::Error> {
    let sql = match counter {
        Counter::Impression => "UPDATE hero_slides SET impressions = impressions + 1 WHERE id = $1 AND active",
        Counter::Click => "UPDATE hero_slides SET clicks = clicks + 1 WHERE id = $1 AND active",
    };
    let result = sqlx::query(sql).bind(id).execute(pool).await?;
    Ok(result.rows_affected() > 0)
}
