//! Cart item queries

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::types::Json;
use sqlx::{PgExecutor, PgPool};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::domain::aggregates::{
    CartItem, CartItemStatus, CartLine, Grade, ProductError, ProductVariant, VariantKind, VariantPricing,
};

#[derive(sqlx::FromRow)]
struct LineRow {
    id: Uuid,
    customer_id: Uuid,
    variant_id: Uuid,
    quantity: i32,
    status: CartItemStatus,
    order_id: Option<Uuid>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    product_id: Uuid,
    product_name: String,
    wholesale_price: Decimal,
    variant_sku: String,
    kind: VariantKind,
    size: Option<String>,
    grade_id: Option<Uuid>,
    stock: i32,
    variant_created_at: DateTime<Utc>,
    grade_name: Option<String>,
    grade_sizes: Option<Json<BTreeMap<String, u32>>>,
    grade_created_at: Option<DateTime<Utc>>,
}

impl LineRow {
    fn into_line(self) -> Result<CartLine, ProductError> {
        let variant = ProductVariant {
            id: self.variant_id,
            product_id: self.product_id,
            sku: self.variant_sku,
            kind: self.kind,
            size: self.size,
            grade_id: self.grade_id,
            stock: self.stock,
            created_at: self.variant_created_at,
        };
        let grade = match (self.grade_id, self.grade_name, self.grade_sizes, self.grade_created_at) {
            (Some(id), Some(name), Some(sizes), Some(created_at)) => Some(Grade { id, name, sizes, created_at }),
            _ => None,
        };
        let pricing = VariantPricing::for_variant(&variant, grade.as_ref(), self.wholesale_price)?;

        Ok(CartLine {
            available: variant.available(),
            item: CartItem {
                id: self.id,
                customer_id: self.customer_id,
                variant_id: self.variant_id,
                quantity: self.quantity,
                status: self.status,
                order_id: self.order_id,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            product_id: self.product_id,
            product_name: self.product_name,
            sku: variant.sku,
            pricing,
        })
    }
}

/// Active cart rows priced against the current catalog. Rows whose product
/// or variant has since been deleted are left out.
pub async fn active_lines<'e>(db: impl PgExecutor<'e>, customer_id: Uuid) -> Result<Vec<CartLine>, LoadError> {
    let rows = sqlx::query_as::<_, LineRow>(
        r#"
        SELECT ci.id, ci.customer_id, ci.variant_id, ci.quantity, ci.status, ci.order_id,
               ci.created_at, ci.updated_at,
               p.id AS product_id, p.name AS product_name, p.wholesale_price,
               v.sku AS variant_sku, v.kind, v.size, v.grade_id, v.stock, v.created_at AS variant_created_at,
               g.name AS grade_name, g.sizes AS grade_sizes, g.created_at AS grade_created_at
        FROM cart_items ci
        JOIN product_variants v ON v.id = ci.variant_id AND v.deleted_at IS NULL
        JOIN products p ON p.id = v.product_id AND p.deleted_at IS NULL AND p.active
        LEFT JOIN grades g ON g.id = v.grade_id
        WHERE ci.customer_id = $1 AND ci.status = 'active'
        ORDER BY ci.created_at
        "#,
    )
    .bind(customer_id)
    .fetch_all(db)
    .await?;

    rows.into_iter().map(|r| r.into_line().map_err(LoadError::from)).collect()
}

/// Row-locks the customer's active cart rows until the transaction ends.
/// A second checkout of the same cart waits here and then finds the rows
/// already archived.
pub async fn lock_active<'e>(db: impl PgExecutor<'e>, customer_id: Uuid) -> Result<Vec<Uuid>, sqlx::Error> {
    let rows: Vec<(Uuid,)> = sqlx::query_as("SELECT id FROM cart_items WHERE customer_id = $1 AND status = 'active' FOR UPDATE")
        .bind(customer_id)
        .fetch_all(db)
        .await?;
    Ok(rows.into_iter().map(|(id,)| id).collect())
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Db(#[from] sqlx::Error),
    #[error(transparent)]
    Pricing(#[from] ProductError),
}

impl From<LoadError> for crate::error::ApiError {
    fn from(e: LoadError) -> Self {
        match e {
            LoadError::Db(e) => e.into(),
            LoadError::Pricing(e) => e.into(),
        }
    }
}

/// Inserts a new active row; a concurrent insert for the same variant is
/// folded into the existing row.
pub async fn insert(pool: &PgPool, customer_id: Uuid, variant_id: Uuid, quantity: i32) -> Result<CartItem, sqlx::Error> {
    sqlx::query_as::<_, CartItem>(
        r#"
        INSERT INTO cart_items (id, customer_id, variant_id, quantity, status, created_at, updated_at)
        VALUES ($1, $2, $3, $4, 'active', NOW(), NOW())
        ON CONFLICT (customer_id, variant_id) WHERE status = 'active'
        DO UPDATE SET quantity = cart_items.quantity + EXCLUDED.quantity, updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(Uuid::now_v7())
    .bind(customer_id)
    .bind(variant_id)
    .bind(quantity)
    .fetch_one(pool)
    .await
}

pub async fn set_quantity(pool: &PgPool, customer_id: Uuid, item_id: Uuid, quantity: i32) -> Result<Option<CartItem>, sqlx::Error> {
    sqlx::query_as::<_, CartItem>(
        r#"
        UPDATE cart_items SET quantity = $3, updated_at = NOW()
        WHERE id = $1 AND customer_id = $2 AND status = 'active'
        RETURNING *
        "#,
    )
    .bind(item_id)
    .bind(customer_id)
    .bind(quantity)
    .fetch_optional(pool)
    .await
}

pub async fn remove(pool: &PgPool, customer_id: Uuid, item_id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM cart_items WHERE id = $1 AND customer_id = $2 AND status = 'active'")
        .bind(item_id)
        .bind(customer_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Moves the given active rows to `archived`, stamped with the order.
pub async fn archive<'e>(db: impl PgExecutor<'e>, customer_id: Uuid, item_ids: &[Uuid], order_id: Uuid) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        UPDATE cart_items SET status = 'archived', order_id = $3, updated_at = NOW()
        WHERE customer_id = $1 AND id = ANY($2) AND status = 'active'
        "#,
    )
    .bind(customer_id)
    .bind(item_ids)
    .bind(order_id)
    .execute(db)
    .await?;
    Ok(result.rows_affected())
}
