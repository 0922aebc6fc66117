//! Customer queries

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{PgExecutor, PgPool};
use uuid::Uuid;

use super::{search_term, PageRequest};

#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
pub struct Customer {
    pub id: Uuid,
    pub company_name: String,
    pub trade_name: Option<String>,
    pub cnpj: String,
    pub email: String,
    pub phone: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub seller_id: Option<Uuid>,
    pub active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

pub struct NewCustomer<'a> {
    pub company_name: &'a str,
    pub trade_name: Option<&'a str>,
    pub cnpj: &'a str,
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub password_hash: &'a str,
    pub seller_id: Option<Uuid>,
}

pub struct CustomerUpdate<'a> {
    pub company_name: &'a str,
    pub trade_name: Option<&'a str>,
    pub email: &'a str,
    pub phone: Option<&'a str>,
    pub seller_id: Option<Uuid>,
    pub active: bool,
}

pub async fn list(pool: &PgPool, search: Option<&str>, page: PageRequest) -> Result<(Vec<Customer>, i64), sqlx::Error> {
    let search = search_term(search);
    let filter = "deleted_at IS NULL AND ($1::text IS NULL OR company_name ILIKE $1 OR trade_name ILIKE $1 OR email ILIKE $1 OR cnpj ILIKE $1)";

    let customers = sqlx::query_as::<_, Customer>(&format!(
        "SELECT * FROM customers WHERE {filter} ORDER BY company_name LIMIT $2 OFFSET $3"
    ))
    .bind(&search)
    .bind(page.limit())
    .bind(page.offset())
    .fetch_all(pool)
    .await?;

    let (total,): (i64,) = sqlx::query_as(&format!("SELECT COUNT(*) FROM customers WHERE {filter}"))
        .bind(&search)
        .fetch_one(pool)
        .await?;

    Ok((customers, total))
}

pub async fn find(pool: &PgPool, id: Uuid) -> Result<Option<Customer>, sqlx::Error> {
    sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = $1 AND deleted_at IS NULL")
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Like `find`, but a disabled customer is not found.
pub async fn find_active(pool: &PgPool, id: Uuid) -> Result<Option<Customer>, sqlx::Error> {
    sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE id = $1 AND active AND deleted_at IS NULL")
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<Customer>, sqlx::Error> {
    sqlx::query_as::<_, Customer>("SELECT * FROM customers WHERE email = $1 AND deleted_at IS NULL")
        .bind(email)
        .fetch_optional(pool)
        .await
}

pub async fn create<'e>(db: impl PgExecutor<'e>, new: &NewCustomer<'_>) -> Result<Customer, sqlx::Error> {
    sqlx::query_as::<_, Customer>(
        r#"
        INSERT INTO customers (id, company_name, trade_name, cnpj, email, phone, password_hash, seller_id, active, created_at, updated_at)
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, TRUE, NOW(), NOW())
        RETURNING *
        "#,
    )
    .bind(Uuid::now_v7())
    .bind(new.company_name)
    .bind(new.trade_name)
    .bind(new.cnpj)
    .bind(new.email)
    .bind(new.phone)
    .bind(new.password_hash)
    .bind(new.seller_id)
    .fetch_one(db)
    .await
}

pub async fn update(pool: &PgPool, id: Uuid, update: &CustomerUpdate<'_>) -> Result<Option<Customer>, sqlx::Error> {
    sqlx::query_as::<_, Customer>(
        r#"
        UPDATE customers
        SET company_name = $2, trade_name = $3, email = $4, phone = $5, seller_id = $6, active = $7, updated_at = NOW()
        WHERE id = $1 AND deleted_at IS NULL
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(update.company_name)
    .bind(update.trade_name)
    .bind(update.email)
    .bind(update.phone)
    .bind(update.seller_id)
    .bind(update.active)
    .fetch_optional(pool)
    .await
}

pub async fn soft_delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("UPDATE customers SET deleted_at = NOW(), active = FALSE WHERE id = $1 AND deleted_at IS NULL")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}
