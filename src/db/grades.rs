//! Grade queries

use sqlx::types::Json;
use sqlx::PgPool;
use std::collections::{BTreeMap, HashMap};
use uuid::Uuid;

use crate::domain::aggregates::Grade;

pub async fn list(pool: &PgPool) -> Result<Vec<Grade>, sqlx::Error> {
    sqlx::query_as::<_, Grade>("SELECT * FROM grades WHERE deleted_at IS NULL ORDER BY name")
        .fetch_all(pool)
        .await
}

pub async fn find(pool: &PgPool, id: Uuid) -> Result<Option<Grade>, sqlx::Error> {
    sqlx::query_as::<_, Grade>("SELECT * FROM grades WHERE id = $1 AND deleted_at IS NULL")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Grades referenced by a set of variants, keyed by id. Soft-deleted grades
/// are included so existing variants keep pricing.
pub async fn find_many(pool: &PgPool, ids: &[Uuid]) -> Result<HashMap<Uuid, Grade>, sqlx::Error> {
    if ids.is_empty() {
        return Ok(HashMap::new());
    }
    let grades = sqlx::query_as::<_, Grade>("SELECT * FROM grades WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(pool)
        .await?;
    Ok(grades.into_iter().map(|g| (g.id, g)).collect())
}

pub async fn create(pool: &PgPool, name: &str, sizes: &BTreeMap<String, u32>) -> Result<Grade, sqlx::Error> {
    sqlx::query_as::<_, Grade>("INSERT INTO grades (id, name, sizes, created_at) VALUES ($1, $2, $3, NOW()) RETURNING *")
        .bind(Uuid::now_v7())
        .bind(name.trim())
        .bind(Json(sizes))
        .fetch_one(pool)
        .await
}

pub async fn update(pool: &PgPool, id: Uuid, name: &str, sizes: &BTreeMap<String, u32>) -> Result<Option<Grade>, sqlx::Error> {
    sqlx::query_as::<_, Grade>("UPDATE grades SET name = $2, sizes = $3 WHERE id = $1 AND deleted_at IS NULL RETURNING *")
        .bind(id)
        .bind(name.trim())
        .bind(Json(sizes))
        .fetch_optional(pool)
        .await
}

pub async fn in_use(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let (used,): (bool,) =
        sqlx::query_as("SELECT EXISTS (SELECT 1 FROM product_variants WHERE grade_id = $1 AND deleted_at IS NULL)")
            .bind(id)
            .fetch_one(pool)
            .await?;
    Ok(used)
}

pub async fn soft_delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE grades SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
