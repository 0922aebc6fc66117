//! Store settings (single row, id = 1)

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::PgPool;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct StoreSettings {
    pub store_name: String,
    pub logo_url: Option<String>,
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub whatsapp: Option<String>,
    pub address: Option<String>,
    pub instagram_url: Option<String>,
    pub facebook_url: Option<String>,
    pub minimum_order_value: Decimal,
    pub updated_at: DateTime<Utc>,
}

pub async fn get(pool: &PgPool) -> Result<StoreSettings, sqlx::Error> {
    sqlx::query_as::<_, StoreSettings>("SELECT * FROM store_settings WHERE id = 1")
        .fetch_one(pool)
        .await
}

pub async fn update(pool: &PgPool, s: &StoreSettings) -> Result<StoreSettings, sqlx::Error> {
    sqlx::query_as::<_, StoreSettings>(
        r#"
        INSERT INTO store_settings (id, store_name, logo_url, contact_email, contact_phone, whatsapp, address,
                                    instagram_url, facebook_url, minimum_order_value, updated_at)
        VALUES (1, $1, $2, $3, $4, $5, $6, $7, $8, $9, NOW())
        ON CONFLICT (id) DO UPDATE SET
            store_name = EXCLUDED.store_name, logo_url = EXCLUDED.logo_url,
            contact_email = EXCLUDED.contact_email, contact_phone = EXCLUDED.contact_phone,
            whatsapp = EXCLUDED.whatsapp, address = EXCLUDED.address,
            instagram_url = EXCLUDED.instagram_url, facebook_url = EXCLUDED.facebook_url,
            minimum_order_value = EXCLUDED.minimum_order_value, updated_at = NOW()
        RETURNING *
        "#,
    )
    .bind(&s.store_name)
    .bind(&s.logo_url)
    .bind(&s.contact_email)
    .bind(&s.contact_phone)
    .bind(&s.whatsapp)
    .bind(&s.address)
    .bind(&s.instagram_url)
    .bind(&s.facebook_url)
    .bind(s.minimum_order_value)
    .fetch_one(pool)
    .await
}
