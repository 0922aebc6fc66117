//! Store-wide settings

use axum::{extract::State, Json};
use rust_decimal::Decimal;
use serde::Deserialize;
use validator::Validate;

use crate::db::{self, settings::StoreSettings};
use crate::domain::value_objects::ensure_price;
use crate::error::ApiResult;
use crate::state::AppState;

use super::non_blank;

/// GET /api/settings
pub async fn get_settings(State(s): State<AppState>) -> ApiResult<Json<StoreSettings>> {
    Ok(Json(db::settings::get(&s.db).await?))
}

#[derive(Debug, Deserialize, Validate)]
pub struct SettingsRequest {
    #[validate(length(min = 1, max = 200))]
    pub store_name: String,
    #[validate(url)]
    pub logo_url: Option<String>,
    #[validate(email)]
    pub contact_email: Option<String>,
    pub contact_phone: Option<String>,
    pub whatsapp: Option<String>,
    pub address: Option<String>,
    #[validate(url)]
    pub instagram_url: Option<String>,
    #[validate(url)]
    pub facebook_url: Option<String>,
    #[serde(default)]
    pub minimum_order_value: Decimal,
}

/// PUT /api/admin/settings
pub async fn update_settings(State(s): State<AppState>, Json(r): Json<SettingsRequest>) -> ApiResult<Json<StoreSettings>> {
    r.validate()?;
    let owned = |v: &Option<String>| non_blank(v).map(str::to_string);
    let settings = StoreSettings {
        store_name: r.store_name.trim().to_string(),
        logo_url: owned(&r.logo_url),
        contact_email: owned(&r.contact_email),
        contact_phone: owned(&r.contact_phone),
        whatsapp: owned(&r.whatsapp),
        address: owned(&r.address),
        instagram_url: owned(&r.instagram_url),
        facebook_url: owned(&r.facebook_url),
        minimum_order_value: ensure_price(r.minimum_order_value)?,
        updated_at: chrono::Utc::now(),
    };
    Ok(Json(db::settings::update(&s.db, &settings).await?))
}
