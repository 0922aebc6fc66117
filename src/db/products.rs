//! Product queries

use rust_decimal::Decimal;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use super::{search_term, PageRequest};
use crate::domain::aggregates::Product;

#[derive(Debug, Default, Clone)]
pub struct ProductFilter {
    pub category_id: Option<Uuid>,
    pub search: Option<String>,
    /// Admin listings also see products switched off for the storefront.
    pub include_inactive: bool,
}

pub struct ProductInput<'a> {
    pub sku: &'a str,
    pub name: &'a str,
    pub description: Option<&'a str>,
    pub category_id: Option<Uuid>,
    pub wholesale_price: Decimal,
    pub retail_price: Option<Decimal>,
    pub active: bool,
    pub image_urls: &'a [String],
}

const FILTER: &str = r#"
    deleted_at IS NULL
    AND ($1 OR active)
    AND ($2::uuid IS NULL OR category_id = $2)
    AND ($3::text IS NULL OR name ILIKE $3 OR sku ILIKE $3)
"#;

pub async fn list(pool: &PgPool, filter: &ProductFilter, page: PageRequest) -> Result<(Vec<Product>, i64), sqlx::Error> {
    let search = search_term(filter.search.as_deref());

    let products = sqlx::query_as::<_, Product>(&format!(
        "SELECT * FROM products WHERE {FILTER} ORDER BY created_at DESC LIMIT $4 OFFSET $5"
    ))
    .bind(filter.include_inactive)
    .bind(filter.category_id)
    .bind(&search)
    .bind(page.limit())
    .bind(page.offset())
    .fetch_all(pool)
    .await?;

    let (total,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM products WHERE {FILTER}"))
        .bind(filter.include_inactive)
        .bind(filter.category_id)
        .bind(&search)
        .fetch_one(pool)
        .await?;

    Ok((products, total))
}

pub async fn find(pool: &PgPool, id: Uuid, include_inactive: bool) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>("SELECT * FROM products WHERE id = $1 AND deleted_at IS NULL AND ($2 OR active)")
        .bind(id)
        .bind(include_inactive)
        .fetch_optional(pool)
        .await
}

pub async fn create(pool: &PgPool, input: &ProductInput<'_>) -> Result<Product, sqlx::Error> {
    sqlx::query_as::<_, Product>(
        r#"
        INSERT INTO products (id, sku, name, description, category_id, wholesale_price, retail_price, active, image_urls, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, NOW(), NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::now_v7())
    .bind(input.sku)
    .bind(input.name)
    .bind(input.description)
    .bind(input.category_id)
    .bind(input.wholesale_price)
    .bind(input.retail_price)
    .bind(input.active)
    .bind(input.image_urls)
    .fetch_one(pool)
    .await
}

pub async fn update(pool: &PgPool, id: Uuid, input: &ProductInput<'_>) -> Result<Option<Product>, sqlx::Error> {
    sqlx::query_as::<_, Product>(
        r#"
        UPDATE products
        SET sku = $2, name = $3, description = $4, category_id = $5, wholesale_price = $6,
            retail_price = $7, active = $8, image_urls = $9, updated_at = NOW()
        WHERE id = $1 AND deleted_at IS NULL
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(input.sku)
    .bind(input.name)
    .bind(input.description)
    .bind(input.category_id)
    .bind(input.wholesale_price)
    .bind(input.retail_price)
    .bind(input.active)
    .bind(input.image_urls)
    .fetch_optional(pool)
    .await
}

/// Soft-deletes the product and its variants together.
pub async fn soft_delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;
    let deleted = mark_deleted(&mut *tx, id).await?;
    if deleted {
        sqlx::query("UPDATE product_variants SET deleted_at = NOW() WHERE product_id = $1 AND deleted_at IS NULL")
            .bind(id)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;
    Ok(deleted)
}

async fn mark_deleted<'e>(db: impl PgExecutor<'e>, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE products SET deleted_at = NOW(), updated_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
        .bind(id)
        .execute(db)
        .await?;
    Ok(result.rows_affected() > 0)
}
