//! Product variant queries

use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use crate::domain::aggregates::{ProductVariant, VariantKind};

pub struct VariantInput<'a> {
    pub sku: &'a str,
    pub kind: VariantKind,
    pub size: Option<&'a str>,
    pub grade_id: Option<Uuid>,
    pub stock: i32,
}

pub async fn list_for_product(pool: &PgPool, product_id: Uuid) -> Result<Vec<ProductVariant>, sqlx::Error> {
    sqlx::query_as::<_, ProductVariant>(
        "SELECT * FROM product_variants WHERE product_id = $1 AND deleted_at IS NULL ORDER BY kind, size NULLS LAST, created_at",
    )
    .bind(product_id)
    .fetch_all(pool)
    .await
}

pub async fn find(pool: &PgPool, id: Uuid) -> Result<Option<ProductVariant>, sqlx::Error> {
    sqlx::query_as::<_, ProductVariant>("SELECT * FROM product_variants WHERE id = $1 AND deleted_at IS NULL")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn create(pool: &PgPool, product_id: Uuid, input: &VariantInput<'_>) -> Result<ProductVariant, sqlx::Error> {
    sqlx::query_as::<_, ProductVariant>(
        r#"
        INSERT INTO product_variants (id, product_id, sku, kind, size, grade_id, stock, created_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::now_v7())
    .bind(product_id)
    .bind(input.sku)
    .bind(input.kind)
    .bind(input.size)
    .bind(input.grade_id)
    .bind(input.stock)
    .fetch_one(pool)
    .await
}

pub async fn update(pool: &PgPool, id: Uuid, input: &VariantInput<'_>) -> Result<Option<ProductVariant>, sqlx::Error> {
    sqlx::query_as::<_, ProductVariant>(
        r#"
        UPDATE product_variants
        SET sku = $2, kind = $3, size = $4, grade_id = $5, stock = $6
        WHERE id = $1 AND deleted_at IS NULL
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(input.sku)
    .bind(input.kind)
    .bind(input.size)
    .bind(input.grade_id)
    .bind(input.stock)
    .fetch_optional(pool)
    .await
}

pub async fn soft_delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE product_variants SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Takes `quantity` units out of stock; `false` when not enough is left.
pub async fn decrement_stock<'e>(db: impl PgExecutor<'e>, id: Uuid, quantity: i32) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE product_variants SET stock = stock - $2 WHERE id = $1 AND deleted_at IS NULL AND stock >= $2",
    )
    .bind(id)
    .bind(quantity)
    .execute(db)
    .await?;
    Ok(result.rows_affected() > 0)
}
