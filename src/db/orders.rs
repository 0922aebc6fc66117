//! Order queries

use sqlx::{PgConnection, PgExecutor, PgPool};
use uuid::Uuid;

use super::PageRequest;
use crate::domain::aggregates::{Order, OrderDetail, OrderItem, OrderStatus};

#[derive(Debug, Default, Clone, Copy)]
pub struct OrderFilter {
    pub customer_id: Option<Uuid>,
    pub status: Option<OrderStatus>,
}

/// Next order number; sequence values are never reused, even on rollback.
pub async fn next_number<'e>(db: impl PgExecutor<'e>) -> Result<String, sqlx::Error> {
    let (n,): (i64,) = sqlx::query_as("SELECT nextval('order_number_seq')").fetch_one(db).await?;
    Ok(Order::format_number(n))
}

pub async fn insert(conn: &mut PgConnection, detail: &OrderDetail) -> Result<(), sqlx::Error> {
    let o = &detail.order;
    sqlx::query(
        r#"
        INSERT INTO orders (id, order_number, customer_id, seller_id, status, subtotal, total_items, notes, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
        "#,
    )
    .bind(o.id)
    .bind(&o.order_number)
    .bind(o.customer_id)
    .bind(o.seller_id)
    .bind(o.status)
    .bind(o.subtotal)
    .bind(o.total_items)
    .bind(&o.notes)
    .bind(o.created_at)
    .bind(o.updated_at)
    .execute(&mut *conn)
    .await?;

    for item in &detail.items {
        sqlx::query(
            r#"
            INSERT INTO order_items (id, order_id, product_id, variant_id, sku, name, variant_label, quantity, items_per_unit, unit_price, total)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(item.id)
        .bind(item.order_id)
        .bind(item.product_id)
        .bind(item.variant_id)
        .bind(&item.sku)
        .bind(&item.name)
        .bind(&item.variant_label)
        .bind(item.quantity)
        .bind(item.items_per_unit)
        .bind(item.unit_price)
        .bind(item.total)
        .execute(&mut *conn)
        .await?;
    }
    Ok(())
}

pub async fn list(pool: &PgPool, filter: OrderFilter, page: PageRequest) -> Result<(Vec<Order>, i64), sqlx::Error> {
    let condition = "($1::uuid IS NULL OR customer_id = $1) AND ($2::order_status IS NULL OR status = $2)";

    let orders = sqlx::query_as::<_, Order>(&format!(
        "SELECT * FROM orders WHERE {condition} ORDER BY created_at DESC LIMIT $3 OFFSET $4"
    ))
    .bind(filter.customer_id)
    .bind(filter.status)
    .bind(page.limit())
    .bind(page.offset())
    .fetch_all(pool)
    .await?;

    let (total,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM orders WHERE {condition}"))
        .bind(filter.customer_id)
        .bind(filter.status)
        .fetch_one(pool)
        .await?;

    Ok((orders, total))
}

/// With `customer_id` set, orders belonging to someone else are not found.
pub async fn find(pool: &PgPool, id: Uuid, customer_id: Option<Uuid>) -> Result<Option<OrderDetail>, sqlx::Error> {
    let order = sqlx::query_as::<_, Order>("SELECT * FROM orders WHERE id = $1 AND ($2::uuid IS NULL OR customer_id = $2)")
        .bind(id)
        .bind(customer_id)
        .fetch_optional(pool)
        .await?;

    let Some(order) = order else {
        return Ok(None);
    };

    let items = sqlx::query_as::<_, OrderItem>("SELECT * FROM order_items WHERE order_id = $1 ORDER BY name, variant_label")
        .bind(id)
        .fetch_all(pool)
        .await?;

    Ok(Some(OrderDetail { order, items }))
}

pub async fn update_status(pool: &PgPool, id: Uuid, from: OrderStatus, to: OrderStatus) -> Result<Option<Order>, sqlx::Error> {
    sqlx::query_as::<_, Order>("UPDATE orders SET status = $3, updated_at = NOW() WHERE id = $1 AND status = $2 RETURNING *")
        .bind(id)
        .bind(from)
        .bind(to)
        .fetch_optional(pool)
        .await
}

/// Deletes the items and then the order in one transaction.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let mut tx = pool.begin().await?;

    sqlx::query("DELETE FROM order_items WHERE order_id = $1")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    let result = sqlx::query("DELETE FROM orders WHERE id = $1").bind(id).execute(&mut *tx).await?;

    if result.rows_affected() == 0 {
        tx.rollback().await?;
        return Ok(false);
    }

    tx.commit().await?;
    Ok(true)
}
